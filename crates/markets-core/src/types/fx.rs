//! Foreign exchange rate time series rows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Base currency the FX dataset is filtered on.
pub const DEFAULT_FX_BASE_CURRENCY: &str = "EUR";

/// Earliest FX observation kept, as `YYYY-MM-DD`.
pub const FX_MIN_DATE: &str = "2019-01-01";

/// Quote currencies offered by the FX view, in display order.
pub const FX_CURRENCIES: [&str; 4] = [
    "British Pound Sterling",
    "Canadian Dollar",
    "United States Dollar",
    "Japanese Yen",
];

/// A row of the FX rates time series table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFxRow {
    pub base_currency_id: String,
    pub quote_currency_name: String,
    pub variable_name: String,
    pub date: NaiveDate,
    pub value: f64,
}

/// An FX observation for one quote currency on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FxRecord {
    /// Quote currency display name
    pub quote_currency_name: String,
    /// Observation date
    pub date: NaiveDate,
    /// Units of quote currency per unit of base currency
    pub value: f64,
    /// Base currency the row was filtered on
    pub base_currency_id: String,
    /// Source variable name, kept as a display label only
    pub exchange_rate: String,
}

impl FxRecord {
    /// Unique key of the record.
    pub fn key(&self) -> (&str, NaiveDate) {
        (self.quote_currency_name.as_str(), self.date)
    }
}

impl From<RawFxRow> for FxRecord {
    fn from(row: RawFxRow) -> Self {
        Self {
            quote_currency_name: row.quote_currency_name,
            date: row.date,
            value: row.value,
            base_currency_id: row.base_currency_id,
            exchange_rate: row.variable_name,
        }
    }
}
