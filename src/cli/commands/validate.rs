//! Validate configuration command.

use anyhow::Result;
use markets_config::{load_config, to_redacted_toml};
use std::path::Path;

pub fn run(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    match load_config(config_path) {
        Ok(config) => {
            config.validate()?;

            println!("Configuration is valid!");
            println!();
            println!("App: {}", config.app.name);
            println!("Environment: {}", config.app.environment);
            println!("Log level: {}", config.logging.level);
            println!(
                "Password: {}",
                if config.warehouse.resolve_password().is_some() {
                    "set"
                } else {
                    "not set"
                }
            );
            println!();
            print!("{}", to_redacted_toml(&config)?);
        }
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
