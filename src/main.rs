//! Markets dashboard CLI application.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use markets_config::{load_config_with, AppConfig};
use markets_monitor::setup_logging;
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // A missing default file falls back to built-in settings.
    let config = load_config_with(&cli.config, cli.config != Path::new("config/default.toml"))
        .with_context(|| format!("Failed to load configuration {:?}", cli.config))?;

    // The dashboard owns the terminal, so it only logs to a file.
    let console_logs = !matches!(cli.command, Commands::Dashboard(_));
    let level = cli
        .log_level
        .map(|l| l.as_str().to_string())
        .unwrap_or_else(|| config.logging.level.clone());
    let _guard = setup_logging(
        &level,
        cli.json_logs || config.logging.is_json(),
        config.logging.file.as_deref().map(Path::new),
        console_logs,
    );

    run(cli, config)
}

fn run(cli: Cli, config: AppConfig) -> Result<()> {
    match cli.command {
        Commands::Stocks(args) => cli::commands::stocks::run(args, &config),
        Commands::Fx(args) => cli::commands::fx::run(args, &config),
        Commands::Dashboard(args) => cli::commands::dashboard::run(args, &config),
        Commands::Seed(args) => cli::commands::seed::run(args, &config),
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config),
    }
}
