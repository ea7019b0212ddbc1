//! FX rates view.

use chrono::NaiveDate;
use markets_core::types::{Dataset, FxRecord, FX_CURRENCIES};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::state::{ViewState, UNAVAILABLE_MESSAGE};

/// One plotted point of the FX view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FxPoint {
    pub quote_currency_name: String,
    pub date: NaiveDate,
    pub value: f64,
}

/// Currency options and the default selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FxDefaults {
    /// Ordered currency options
    pub currencies: Vec<String>,
    /// How many leading options are selected by default
    pub default_count: usize,
}

impl Default for FxDefaults {
    fn default() -> Self {
        Self {
            currencies: FX_CURRENCIES.iter().map(|c| c.to_string()).collect(),
            default_count: 3,
        }
    }
}

impl FxDefaults {
    /// The default selection: a prefix of the options.
    pub fn default_selection(&self) -> Vec<String> {
        self.currencies
            .iter()
            .take(self.default_count)
            .cloned()
            .collect()
    }
}

/// User selection for the FX view. `None` means "use the default".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FxQuery {
    pub currencies: Option<Vec<String>>,
}

impl FxQuery {
    /// Selected currencies with the default filled in.
    pub fn resolve(&self, defaults: &FxDefaults) -> Vec<String> {
        match &self.currencies {
            Some(currencies) => currencies.clone(),
            None => defaults.default_selection(),
        }
    }

    /// Select `currency` if it is not selected, deselect it otherwise.
    pub fn toggle_currency(&mut self, currency: &str, defaults: &FxDefaults) {
        let mut currencies = self.resolve(defaults);
        match currencies.iter().position(|c| c == currency) {
            Some(index) => {
                currencies.remove(index);
            }
            None => currencies.push(currency.to_string()),
        }
        self.currencies = Some(currencies);
    }
}

/// Keep records whose quote currency is in `currencies`. Input order is
/// preserved; an empty selection yields nothing.
pub fn filter_fx(records: &[FxRecord], currencies: &[String]) -> Vec<FxPoint> {
    records
        .iter()
        .filter(|r| currencies.contains(&r.quote_currency_name))
        .map(|r| FxPoint {
            quote_currency_name: r.quote_currency_name.clone(),
            date: r.date,
            value: r.value,
        })
        .collect()
}

/// Everything the rendering boundary needs for the FX page.
#[derive(Debug, Clone, PartialEq)]
pub struct FxView {
    pub state: ViewState<FxPoint>,
    pub options: Vec<String>,
    pub selected: Vec<String>,
}

/// Build the FX page from an optional dataset.
pub fn fx_view(dataset: Option<&Dataset>, query: &FxQuery, defaults: &FxDefaults) -> FxView {
    let selected = query.resolve(defaults);
    let state = match dataset {
        None => ViewState::Unavailable(UNAVAILABLE_MESSAGE.to_string()),
        Some(dataset) => {
            let points = filter_fx(&dataset.fx, &selected);
            debug!(currencies = ?selected, points = points.len(), "FX view filtered");
            ViewState::from_rows(points)
        }
    };

    FxView {
        state,
        options: defaults.currencies.clone(),
        selected,
    }
}
