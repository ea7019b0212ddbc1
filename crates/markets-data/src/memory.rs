//! In-memory warehouse session.

use chrono::NaiveDate;
use markets_core::error::DataError;
use markets_core::traits::WarehouseSession;
use markets_core::types::{RawFxRow, RawStockRow};
use std::path::Path;

use crate::csv_source::{read_fx_rows, read_stock_rows};

/// A warehouse session over rows held in memory.
///
/// Applies the same filters a real warehouse would push down. Useful as a
/// stand-in for tests and for working from CSV extracts.
#[derive(Debug, Clone)]
pub struct InMemorySession {
    name: String,
    stocks: Vec<RawStockRow>,
    fx: Vec<RawFxRow>,
    connected: bool,
}

impl InMemorySession {
    /// Create a connected session over the given rows.
    pub fn new(stocks: Vec<RawStockRow>, fx: Vec<RawFxRow>) -> Self {
        Self {
            name: "memory".to_string(),
            stocks,
            fx,
            connected: true,
        }
    }

    /// Create a session that failed to connect.
    pub fn disconnected() -> Self {
        Self {
            connected: false,
            ..Self::new(Vec::new(), Vec::new())
        }
    }

    /// Load both tables from CSV extracts.
    pub fn from_csv(stock_path: &Path, fx_path: &Path) -> Result<Self, DataError> {
        Ok(Self::new(read_stock_rows(stock_path)?, read_fx_rows(fx_path)?).with_name("csv"))
    }

    /// Rename the session.
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Raw stock rows held by the session.
    pub fn stock_table(&self) -> &[RawStockRow] {
        &self.stocks
    }
}

impl WarehouseSession for InMemorySession {
    fn stock_rows(
        &self,
        tickers: &[String],
        variables: &[&str],
    ) -> Result<Vec<RawStockRow>, DataError> {
        Ok(self
            .stocks
            .iter()
            .filter(|row| tickers.contains(&row.ticker))
            .filter(|row| variables.contains(&row.variable_name.as_str()))
            .cloned()
            .collect())
    }

    fn fx_rows(&self, base_currency: &str, min_date: NaiveDate) -> Result<Vec<RawFxRow>, DataError> {
        Ok(self
            .fx
            .iter()
            .filter(|row| row.base_currency_id == base_currency && row.date >= min_date)
            .cloned()
            .collect())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn name(&self) -> &str {
        &self.name
    }
}
