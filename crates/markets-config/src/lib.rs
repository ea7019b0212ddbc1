//! Configuration management.

mod settings;

pub use settings::{
    AppConfig, AppSettings, CacheSettings, DatasetSettings, LoggingConfig, WarehouseConfig,
    DEFAULT_PASSWORD_ENV,
};

use config::{Config, Environment, File};
use markets_core::error::{DashboardError, DashboardResult};
use std::path::Path;

/// Load configuration from file and environment.
///
/// Environment variables override the file as `MARKETS__SECTION__KEY`,
/// e.g. `MARKETS__WAREHOUSE__DATABASE=data/markets.duckdb`.
pub fn load_config(path: &Path) -> DashboardResult<AppConfig> {
    load_config_with(path, true)
}

/// Load configuration, optionally tolerating a missing file.
///
/// Unreadable, unparsable or mistyped settings are reported as
/// [`DashboardError::Config`].
pub fn load_config_with(path: &Path, required: bool) -> DashboardResult<AppConfig> {
    let config = Config::builder()
        .add_source(File::from(path).required(required))
        .add_source(
            Environment::with_prefix("MARKETS")
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("dataset.tickers")
                .with_list_parse_key("dataset.currencies")
                .with_list_parse_key("dataset.default_tickers")
                .try_parsing(true),
        )
        .build()
        .map_err(|e| DashboardError::Config(format!("{}: {e}", path.display())))?;

    config
        .try_deserialize()
        .map_err(|e| DashboardError::Config(e.to_string()))
}

/// Render a configuration as TOML with secrets removed.
pub fn to_redacted_toml(config: &AppConfig) -> DashboardResult<String> {
    let mut redacted = config.clone();
    if redacted.warehouse.password.is_some() {
        redacted.warehouse.password = Some("***".to_string());
    }
    toml::to_string_pretty(&redacted).map_err(|e| DashboardError::Config(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[warehouse]
database = "data/test.duckdb"
password = "hunter2"

[cache]
ttl_secs = 60
"#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();

        assert_eq!(config.warehouse.database, "data/test.duckdb");
        assert_eq!(config.cache.ttl_secs, 60);
        assert_eq!(config.dataset.tickers.len(), 7);
        assert_eq!(config.logging.level, "info");

        let rendered = to_redacted_toml(&config).unwrap();
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("***"));
    }

    #[test]
    fn test_mistyped_value_is_config_error() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[cache]\nttl_secs = \"soon\"").unwrap();

        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, DashboardError::Config(_)));
        assert!(err.to_string().starts_with("Configuration error"));
    }

    #[test]
    fn test_missing_file_is_optional_when_asked() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        assert!(matches!(load_config(&path), Err(DashboardError::Config(_))));
        let config = load_config_with(&path, false).unwrap();
        assert_eq!(config.dataset.fx_base_currency, "EUR");
    }
}
