//! Stock performance view.

use chrono::{Days, NaiveDate};
use markets_core::types::{Dataset, StockMetric, StockRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

use crate::range::DateRange;
use crate::state::{ViewState, UNAVAILABLE_MESSAGE};

/// Tickers selected when the caller picks none.
pub const DEFAULT_TICKERS: [&str; 2] = ["AAPL", "MSFT"];

/// One plotted point of the stock view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockPoint {
    pub ticker: String,
    pub date: NaiveDate,
    pub value: Option<f64>,
}

/// Defaults applied to unset stock selectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockDefaults {
    /// Tickers selected by default, kept only if present in the data
    pub tickers: Vec<String>,
    /// Length of the default window ending at the latest date
    pub lookback_days: u64,
}

impl Default for StockDefaults {
    fn default() -> Self {
        Self {
            tickers: DEFAULT_TICKERS.iter().map(|t| t.to_string()).collect(),
            lookback_days: 30,
        }
    }
}

/// User selection for the stock view. `None` means "use the default".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub tickers: Option<Vec<String>>,
    pub metric: StockMetric,
}

/// A stock query with every default filled in against a dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStockQuery {
    pub range: DateRange,
    /// Tickers present in the data within `range`
    pub available: Vec<String>,
    /// Requested tickers intersected with `available`
    pub tickers: Vec<String>,
    pub metric: StockMetric,
    /// Earliest and latest dates of the records
    pub bounds: (NaiveDate, NaiveDate),
}

impl StockQuery {
    /// Fill in defaults against the stock series of `dataset`. `None` when
    /// there are no stock records.
    ///
    /// The default range is `[latest - lookback_days, latest]`, clamped to the
    /// earliest date. Tickers are intersected with those present in the
    /// range, preserving the requested order.
    pub fn resolve(
        &self,
        dataset: &Dataset,
        defaults: &StockDefaults,
    ) -> Option<ResolvedStockQuery> {
        let (min, max) = dataset.stock_date_bounds()?;

        let default_start = max
            .checked_sub_days(Days::new(defaults.lookback_days))
            .unwrap_or(min)
            .max(min);
        let range = DateRange::new(self.start.unwrap_or(default_start), self.end.unwrap_or(max));

        let available: Vec<String> = dataset
            .stocks
            .iter()
            .filter(|r| range.contains(r.date))
            .map(|r| r.ticker.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let requested = self.tickers.as_ref().unwrap_or(&defaults.tickers);
        let mut tickers: Vec<String> = Vec::new();
        for ticker in requested {
            if available.contains(ticker) && !tickers.contains(ticker) {
                tickers.push(ticker.clone());
            }
        }

        Some(ResolvedStockQuery {
            range,
            available,
            tickers,
            metric: self.metric,
            bounds: (min, max),
        })
    }

    /// Select `ticker` if it is not in `current`, deselect it otherwise.
    pub fn toggle_ticker(&mut self, ticker: &str, current: &[String]) {
        let mut tickers = current.to_vec();
        match tickers.iter().position(|t| t == ticker) {
            Some(index) => {
                tickers.remove(index);
            }
            None => tickers.push(ticker.to_string()),
        }
        self.tickers = Some(tickers);
    }

    /// Move the start of `current` by `days` (negative widens), staying within
    /// `bounds` and not past the end.
    pub fn shift_start(&mut self, current: &DateRange, days: i64, bounds: (NaiveDate, NaiveDate)) {
        let shifted = if days >= 0 {
            current.start.checked_add_days(Days::new(days as u64))
        } else {
            current.start.checked_sub_days(Days::new(days.unsigned_abs()))
        };
        let start = shifted.unwrap_or(bounds.0).max(bounds.0).min(current.end);
        self.start = Some(start);
        self.end = Some(current.end);
    }
}

/// Keep records inside `range` whose ticker is in `tickers`, projected onto
/// `metric`. Input order is preserved.
pub fn filter_stocks(
    records: &[StockRecord],
    range: DateRange,
    tickers: &[String],
    metric: StockMetric,
) -> Vec<StockPoint> {
    if range.is_empty() || tickers.is_empty() {
        return Vec::new();
    }
    records
        .iter()
        .filter(|r| range.contains(r.date) && tickers.contains(&r.ticker))
        .map(|r| StockPoint {
            ticker: r.ticker.clone(),
            date: r.date,
            value: metric.value(r),
        })
        .collect()
}

/// Everything the rendering boundary needs for the stock page.
#[derive(Debug, Clone, PartialEq)]
pub struct StockView {
    pub state: ViewState<StockPoint>,
    pub metric: StockMetric,
    /// `None` when there was nothing to resolve against
    pub query: Option<ResolvedStockQuery>,
}

/// Build the stock page from an optional dataset.
pub fn stock_view(
    dataset: Option<&Dataset>,
    query: &StockQuery,
    defaults: &StockDefaults,
) -> StockView {
    let Some(dataset) = dataset else {
        return StockView {
            state: ViewState::Unavailable(UNAVAILABLE_MESSAGE.to_string()),
            metric: query.metric,
            query: None,
        };
    };

    let Some(resolved) = query.resolve(dataset, defaults) else {
        return StockView {
            state: ViewState::Empty,
            metric: query.metric,
            query: None,
        };
    };

    let points = filter_stocks(
        &dataset.stocks,
        resolved.range,
        &resolved.tickers,
        resolved.metric,
    );
    debug!(
        range = %resolved.range,
        tickers = ?resolved.tickers,
        metric = %resolved.metric,
        points = points.len(),
        "Stock view filtered"
    );

    StockView {
        state: ViewState::from_rows(points),
        metric: resolved.metric,
        query: Some(resolved),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use markets_core::types::FxRecord;

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn strings(list: &[&str]) -> Vec<String> {
        list.iter().map(|t| t.to_string()).collect()
    }

    fn records() -> Vec<StockRecord> {
        let mut records = Vec::new();
        for ticker in ["AAPL", "MSFT", "NVDA"] {
            for (month, d) in [(1, 2), (2, 1), (2, 20), (3, 1)] {
                let mut record = StockRecord::new(ticker, day(month, d))
                    .with_close(100.0 + d as f64)
                    .with_volume(1_000.0);
                record.day_over_day_change = Some(0.01);
                records.push(record);
            }
        }
        records
    }

    #[test]
    fn test_filter_by_range_and_tickers() {
        let records = records();
        let points = filter_stocks(
            &records,
            DateRange::new(day(2, 1), day(2, 29)),
            &strings(&["MSFT"]),
            StockMetric::PostmarketClose,
        );

        assert_eq!(points.len(), 2);
        assert!(points.iter().all(|p| p.ticker == "MSFT"));
        assert_eq!(points[0].value, Some(101.0));
        assert_eq!(points[1].value, Some(120.0));
    }

    #[test]
    fn test_range_outside_all_dates_is_empty() {
        let points = filter_stocks(
            &records(),
            DateRange::new(day(6, 1), day(6, 30)),
            &strings(&["AAPL"]),
            StockMetric::DayOverDayChange,
        );
        assert!(points.is_empty());
    }

    #[test]
    fn test_inverted_range_or_no_tickers_is_empty() {
        let records = records();
        assert!(filter_stocks(
            &records,
            DateRange::new(day(3, 1), day(1, 1)),
            &strings(&["AAPL"]),
            StockMetric::PostmarketClose,
        )
        .is_empty());
        assert!(filter_stocks(
            &records,
            DateRange::new(day(1, 1), day(3, 1)),
            &[],
            StockMetric::PostmarketClose,
        )
        .is_empty());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let records = records();
        let range = DateRange::new(day(1, 1), day(3, 1));
        let tickers = strings(&["AAPL", "NVDA"]);

        let first = filter_stocks(&records, range, &tickers, StockMetric::NasdaqVolume);
        let second = filter_stocks(&records, range, &tickers, StockMetric::NasdaqVolume);

        assert_eq!(first, second);
        assert_eq!(first.len(), 8);
    }

    #[test]
    fn test_default_range_is_last_thirty_days() {
        let resolved = StockQuery::default()
            .resolve(&Dataset::new(records(), Vec::new()), &StockDefaults::default())
            .unwrap();

        assert_eq!(resolved.range, DateRange::new(day(1, 31), day(3, 1)));
        assert_eq!(resolved.bounds, (day(1, 2), day(3, 1)));
        assert_eq!(resolved.tickers, strings(&["AAPL", "MSFT"]));
        assert_eq!(resolved.metric, StockMetric::DayOverDayChange);
    }

    #[test]
    fn test_default_start_is_clamped_to_earliest_date() {
        let records = vec![
            StockRecord::new("AAPL", day(3, 1)),
            StockRecord::new("AAPL", day(3, 5)),
        ];
        let resolved = StockQuery::default()
            .resolve(&Dataset::new(records, Vec::new()), &StockDefaults::default())
            .unwrap();

        assert_eq!(resolved.range, DateRange::new(day(3, 1), day(3, 5)));
    }

    #[test]
    fn test_default_tickers_constrained_to_present() {
        let records: Vec<_> = records().into_iter().filter(|r| r.ticker != "MSFT").collect();
        let resolved = StockQuery::default()
            .resolve(&Dataset::new(records, Vec::new()), &StockDefaults::default())
            .unwrap();

        assert_eq!(resolved.tickers, strings(&["AAPL"]));
        assert_eq!(resolved.available, strings(&["AAPL", "NVDA"]));
    }

    #[test]
    fn test_unknown_tickers_resolve_to_empty_view() {
        let dataset = Dataset::new(records(), Vec::new());
        let query = StockQuery {
            tickers: Some(strings(&["TSLA"])),
            ..StockQuery::default()
        };

        let view = stock_view(Some(&dataset), &query, &StockDefaults::default());

        assert_eq!(view.state, ViewState::Empty);
        assert!(view.query.unwrap().tickers.is_empty());
    }

    #[test]
    fn test_fx_only_dataset_resolves_nothing() {
        let fx = vec![FxRecord {
            quote_currency_name: "Japanese Yen".to_string(),
            date: day(1, 2),
            value: 160.0,
            base_currency_id: "EUR".to_string(),
            exchange_rate: "Euro to Japanese Yen".to_string(),
        }];
        let dataset = Dataset::new(Vec::new(), fx);

        assert!(StockQuery::default()
            .resolve(&dataset, &StockDefaults::default())
            .is_none());
        let view = stock_view(Some(&dataset), &StockQuery::default(), &StockDefaults::default());
        assert_eq!(view.state, ViewState::Empty);
        assert!(view.query.is_none());
    }

    #[test]
    fn test_missing_dataset_is_unavailable() {
        let view = stock_view(None, &StockQuery::default(), &StockDefaults::default());
        assert_eq!(
            view.state,
            ViewState::Unavailable(UNAVAILABLE_MESSAGE.to_string())
        );
    }

    #[test]
    fn test_view_projects_selected_metric() {
        let dataset = Dataset::new(records(), Vec::new());
        let query = StockQuery {
            start: Some(day(1, 1)),
            end: Some(day(1, 31)),
            tickers: Some(strings(&["NVDA"])),
            metric: StockMetric::NasdaqVolume,
        };

        let view = stock_view(Some(&dataset), &query, &StockDefaults::default());

        assert_eq!(
            view.state.rows(),
            &[StockPoint {
                ticker: "NVDA".to_string(),
                date: day(1, 2),
                value: Some(1_000.0),
            }]
        );
    }

    #[test]
    fn test_toggle_ticker() {
        let mut query = StockQuery::default();
        let current = strings(&["AAPL", "MSFT"]);

        query.toggle_ticker("MSFT", &current);
        assert_eq!(query.tickers, Some(strings(&["AAPL"])));

        query.toggle_ticker("NVDA", &strings(&["AAPL"]));
        assert_eq!(query.tickers, Some(strings(&["AAPL", "NVDA"])));
    }

    #[test]
    fn test_shift_start_stays_in_bounds() {
        let mut query = StockQuery::default();
        let bounds = (day(1, 2), day(3, 1));
        let current = DateRange::new(day(1, 31), day(3, 1));

        query.shift_start(&current, -60, bounds);
        assert_eq!(query.start, Some(day(1, 2)));
        assert_eq!(query.end, Some(day(3, 1)));

        query.shift_start(&current, 90, bounds);
        assert_eq!(query.start, Some(day(3, 1)));
    }
}
