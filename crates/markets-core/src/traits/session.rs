//! Warehouse session trait definitions.

use crate::error::DataError;
use crate::types::{RawFxRow, RawStockRow};
use chrono::NaiveDate;

/// A read-only session against the analytical warehouse.
///
/// The data adapter only ever talks to the warehouse through this trait, so a
/// session is passed explicitly to every fetch and can be swapped for an
/// in-memory fake.
pub trait WarehouseSession: Send + Sync {
    /// Fetch long-format stock rows.
    ///
    /// # Arguments
    /// * `tickers` - Tickers to keep
    /// * `variables` - Variable names to keep
    ///
    /// # Returns
    /// The matching raw rows, in no particular order
    fn stock_rows(&self, tickers: &[String], variables: &[&str])
        -> Result<Vec<RawStockRow>, DataError>;

    /// Fetch FX rows for one base currency on or after `min_date`.
    fn fx_rows(&self, base_currency: &str, min_date: NaiveDate)
        -> Result<Vec<RawFxRow>, DataError>;

    /// Whether the session was established.
    fn is_connected(&self) -> bool {
        true
    }

    /// Get the session name.
    fn name(&self) -> &str;
}
