//! Opening the warehouse session a command reads from.

use markets_config::AppConfig;
use markets_core::error::DataError;
use markets_core::traits::WarehouseSession;
use markets_data::{DuckDbSession, InMemorySession};
use tracing::info;

use crate::cli::SourceArgs;

/// Open the configured warehouse, or the CSV files when both are given.
pub fn open_session(
    source: &SourceArgs,
    config: &AppConfig,
) -> Result<Box<dyn WarehouseSession>, DataError> {
    match (&source.stocks_csv, &source.fx_csv) {
        (Some(stocks), Some(fx)) => {
            info!(stocks = ?stocks, fx = ?fx, "Reading rows from CSV");
            Ok(Box::new(InMemorySession::from_csv(stocks, fx)?))
        }
        _ => {
            let session = DuckDbSession::connect(config.warehouse.connection_params())?;
            Ok(Box::new(session))
        }
    }
}
