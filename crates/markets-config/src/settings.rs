//! Configuration structures.

use chrono::NaiveDate;
use markets_core::error::{DashboardError, DashboardResult};
use markets_core::types::{
    DEFAULT_FX_BASE_CURRENCY, FX_CURRENCIES, FX_MIN_DATE, MAGNIFICENT_SEVEN,
};
use markets_data::{ConnectionParams, DatasetRequest, FX_TABLE, STOCK_TABLE};
use markets_views::{FxDefaults, StockDefaults, DEFAULT_TICKERS};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable consulted when no password is configured.
pub const DEFAULT_PASSWORD_ENV: &str = "MARKETS_WAREHOUSE_PASSWORD";

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub warehouse: WarehouseConfig,
    #[serde(default)]
    pub dataset: DatasetSettings,
    #[serde(default)]
    pub cache: CacheSettings,
}

impl AppConfig {
    /// Check settings that only fail at use time.
    pub fn validate(&self) -> DashboardResult<()> {
        self.warehouse.connection_params().validate()?;
        if self.dataset.tickers.is_empty() {
            return Err(DashboardError::Config(
                "dataset.tickers must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "markets-dashboard".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

/// Warehouse connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WarehouseConfig {
    pub account: String,
    pub user: String,
    /// Inline password; prefer `password_env`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Environment variable holding the password
    pub password_env: String,
    pub role: String,
    pub warehouse: String,
    pub database: String,
    pub schema: String,
    pub stock_table: String,
    pub fx_table: String,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        let params = ConnectionParams::default();
        Self {
            account: params.account,
            user: params.user,
            password: None,
            password_env: DEFAULT_PASSWORD_ENV.to_string(),
            role: params.role,
            warehouse: params.warehouse,
            database: params.database,
            schema: params.schema,
            stock_table: STOCK_TABLE.to_string(),
            fx_table: FX_TABLE.to_string(),
        }
    }
}

impl WarehouseConfig {
    /// Inline password, falling back to the configured environment variable.
    pub fn resolve_password(&self) -> Option<String> {
        self.password
            .clone()
            .or_else(|| std::env::var(&self.password_env).ok())
            .filter(|p| !p.is_empty())
    }

    /// Connection parameters with the password resolved.
    pub fn connection_params(&self) -> ConnectionParams {
        ConnectionParams {
            account: self.account.clone(),
            user: self.user.clone(),
            password: self.resolve_password(),
            role: self.role.clone(),
            warehouse: self.warehouse.clone(),
            database: self.database.clone(),
            schema: self.schema.clone(),
            stock_table: self.stock_table.clone(),
            fx_table: self.fx_table.clone(),
        }
    }
}

/// What gets loaded and what the views select by default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetSettings {
    /// Ticker allow-list for the stock fetch
    pub tickers: Vec<String>,
    pub fx_base_currency: String,
    pub fx_min_date: NaiveDate,
    /// Ordered FX currency options
    pub currencies: Vec<String>,
    pub default_tickers: Vec<String>,
    pub default_currency_count: usize,
    pub lookback_days: u64,
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            tickers: MAGNIFICENT_SEVEN.iter().map(|t| t.to_string()).collect(),
            fx_base_currency: DEFAULT_FX_BASE_CURRENCY.to_string(),
            fx_min_date: NaiveDate::parse_from_str(FX_MIN_DATE, "%Y-%m-%d")
                .unwrap_or(NaiveDate::MIN),
            currencies: FX_CURRENCIES.iter().map(|c| c.to_string()).collect(),
            default_tickers: DEFAULT_TICKERS.iter().map(|t| t.to_string()).collect(),
            default_currency_count: 3,
            lookback_days: 30,
        }
    }
}

impl DatasetSettings {
    pub fn request(&self) -> DatasetRequest {
        DatasetRequest {
            tickers: self.tickers.clone(),
            fx_base_currency: self.fx_base_currency.clone(),
            fx_min_date: self.fx_min_date,
        }
    }

    pub fn stock_defaults(&self) -> StockDefaults {
        StockDefaults {
            tickers: self.default_tickers.clone(),
            lookback_days: self.lookback_days,
        }
    }

    pub fn fx_defaults(&self) -> FxDefaults {
        FxDefaults {
            currencies: self.currencies.clone(),
            default_count: self.default_currency_count,
        }
    }
}

/// Dataset cache settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CacheSettings {
    /// Seconds before a cached dataset expires; 0 keeps it until invalidated
    pub ttl_secs: u64,
}

impl CacheSettings {
    pub fn ttl(&self) -> Option<Duration> {
        (self.ttl_secs > 0).then(|| Duration::from_secs(self.ttl_secs))
    }
}
