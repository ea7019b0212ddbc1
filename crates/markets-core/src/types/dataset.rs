//! The snapshot of both series a dashboard session works on.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{FxRecord, StockRecord};

/// Stock and FX series fetched together from one warehouse session.
///
/// A dataset is immutable once loaded; views only filter and project it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub stocks: Vec<StockRecord>,
    pub fx: Vec<FxRecord>,
}

impl Dataset {
    /// Create a dataset from already-shaped series.
    pub fn new(stocks: Vec<StockRecord>, fx: Vec<FxRecord>) -> Self {
        Self { stocks, fx }
    }

    /// Earliest and latest stock dates.
    pub fn stock_date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        date_bounds(self.stocks.iter().map(|r| r.date))
    }
}

fn date_bounds(dates: impl Iterator<Item = NaiveDate>) -> Option<(NaiveDate, NaiveDate)> {
    dates.fold(None, |acc, date| match acc {
        None => Some((date, date)),
        Some((min, max)) => Some((min.min(date), max.max(date))),
    })
}
