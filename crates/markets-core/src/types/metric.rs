//! Metric selector for the stock view.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::StockRecord;

/// Column of a [`StockRecord`] plotted by the stock view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockMetric {
    /// Relative change against the previous row
    #[default]
    DayOverDayChange,
    /// Post-market close price
    PostmarketClose,
    /// Nasdaq traded volume
    NasdaqVolume,
}

impl StockMetric {
    /// Column name used in tables and CSV headers.
    pub fn column(&self) -> &'static str {
        match self {
            StockMetric::DayOverDayChange => "DAY_OVER_DAY_CHANGE",
            StockMetric::PostmarketClose => "POSTMARKET_CLOSE",
            StockMetric::NasdaqVolume => "NASDAQ_VOLUME",
        }
    }

    /// Read the metric's value from a record.
    #[inline]
    pub fn value(&self, record: &StockRecord) -> Option<f64> {
        match self {
            StockMetric::DayOverDayChange => record.day_over_day_change,
            StockMetric::PostmarketClose => record.postmarket_close,
            StockMetric::NasdaqVolume => record.nasdaq_volume,
        }
    }

    /// The metric following this one, wrapping around.
    pub fn next(&self) -> StockMetric {
        match self {
            StockMetric::DayOverDayChange => StockMetric::PostmarketClose,
            StockMetric::PostmarketClose => StockMetric::NasdaqVolume,
            StockMetric::NasdaqVolume => StockMetric::DayOverDayChange,
        }
    }

    /// All metrics in selector order.
    pub fn all() -> &'static [StockMetric] {
        &[
            StockMetric::DayOverDayChange,
            StockMetric::PostmarketClose,
            StockMetric::NasdaqVolume,
        ]
    }
}

impl fmt::Display for StockMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column())
    }
}

impl FromStr for StockMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "day_over_day_change" | "change" | "dod" => Ok(StockMetric::DayOverDayChange),
            "postmarket_close" | "close" => Ok(StockMetric::PostmarketClose),
            "nasdaq_volume" | "volume" => Ok(StockMetric::NasdaqVolume),
            _ => Err(format!("Invalid metric: {}", s)),
        }
    }
}
