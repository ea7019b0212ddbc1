//! Stock price time series rows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Tickers the stock dataset is restricted to.
pub const MAGNIFICENT_SEVEN: [&str; 7] = ["AAPL", "MSFT", "AMZN", "GOOGL", "META", "TSLA", "NVDA"];

/// Source variable holding the Nasdaq traded volume.
pub const NASDAQ_VOLUME: &str = "Nasdaq Volume";

/// Source variable holding the post-market close price.
pub const POSTMARKET_CLOSE: &str = "Post-Market Close";

/// Variables kept when pivoting the long-format source table.
pub const STOCK_VARIABLES: [&str; 2] = [NASDAQ_VOLUME, POSTMARKET_CLOSE];

/// A long-format row of the stock price time series table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawStockRow {
    pub ticker: String,
    pub date: NaiveDate,
    pub variable_name: String,
    pub value: Option<f64>,
}

impl RawStockRow {
    /// Create a raw row with a value.
    pub fn new(ticker: &str, date: NaiveDate, variable_name: &str, value: f64) -> Self {
        Self {
            ticker: ticker.to_string(),
            date,
            variable_name: variable_name.to_string(),
            value: Some(value),
        }
    }
}

/// One pivoted stock row per `(ticker, date)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    /// Ticker symbol
    pub ticker: String,
    /// Trading date
    pub date: NaiveDate,
    /// Nasdaq traded volume
    pub nasdaq_volume: Option<f64>,
    /// Post-market close price
    pub postmarket_close: Option<f64>,
    /// Relative change of the post-market close against the previous row of
    /// the same ticker
    pub day_over_day_change: Option<f64>,
}

impl StockRecord {
    /// Create an empty record for a `(ticker, date)` key.
    pub fn new(ticker: &str, date: NaiveDate) -> Self {
        Self {
            ticker: ticker.to_string(),
            date,
            nasdaq_volume: None,
            postmarket_close: None,
            day_over_day_change: None,
        }
    }

    /// Set the post-market close.
    pub fn with_close(mut self, close: f64) -> Self {
        self.postmarket_close = Some(close);
        self
    }

    /// Set the Nasdaq volume.
    pub fn with_volume(mut self, volume: f64) -> Self {
        self.nasdaq_volume = Some(volume);
        self
    }

    /// Unique key of the record.
    pub fn key(&self) -> (&str, NaiveDate) {
        (self.ticker.as_str(), self.date)
    }
}
