//! The two warehouse fetches behind the dashboard.

use chrono::NaiveDate;
use markets_core::error::DataError;
use markets_core::traits::WarehouseSession;
use markets_core::types::{FxRecord, StockRecord, STOCK_VARIABLES};
use std::collections::BTreeSet;
use tracing::{debug, warn};

use crate::pivot::pivot_stock_rows;
use crate::window::apply_day_over_day;

/// Fetch the pivoted stock series for `allowed_tickers`.
///
/// Rows are restricted to the allowed tickers and the two known variables,
/// pivoted to one record per `(ticker, date)` and given a day-over-day change
/// over each ticker's date-ordered rows.
///
/// # Errors
/// * `InvalidArgument` if `allowed_tickers` is empty
/// * `Unavailable` if the session is not connected
/// * whatever the session returns for a failed query
///
/// Zero matching rows is a valid, empty result.
pub fn fetch_stock_series<S>(
    session: &S,
    allowed_tickers: &[String],
) -> Result<Vec<StockRecord>, DataError>
where
    S: WarehouseSession + ?Sized,
{
    let allowed: BTreeSet<&str> = allowed_tickers.iter().map(String::as_str).collect();
    if allowed.is_empty() {
        return Err(DataError::InvalidArgument(
            "at least one ticker is required".to_string(),
        ));
    }
    ensure_connected(session)?;

    let tickers: Vec<String> = allowed.iter().map(|t| t.to_string()).collect();
    let rows = session.stock_rows(&tickers, &STOCK_VARIABLES)?;
    let fetched = rows.len();

    let rows = rows.into_iter().filter(|row| {
        allowed.contains(row.ticker.as_str()) && STOCK_VARIABLES.contains(&row.variable_name.as_str())
    });
    let records = apply_day_over_day(pivot_stock_rows(rows));

    debug!(
        session = session.name(),
        raw_rows = fetched,
        records = records.len(),
        "Fetched stock series"
    );
    Ok(records)
}

/// Fetch FX observations for `base_currency` on or after `min_date`.
///
/// The source `variable_name` is carried as the `exchange_rate` label. The
/// result is ordered by `(quote_currency_name, date)`; rows repeating a key
/// are dropped, keeping the first one returned by the session.
pub fn fetch_fx_series<S>(
    session: &S,
    base_currency: &str,
    min_date: NaiveDate,
) -> Result<Vec<FxRecord>, DataError>
where
    S: WarehouseSession + ?Sized,
{
    if base_currency.trim().is_empty() {
        return Err(DataError::InvalidArgument(
            "base currency must not be empty".to_string(),
        ));
    }
    ensure_connected(session)?;

    let rows = session.fx_rows(base_currency, min_date)?;
    let fetched = rows.len();

    let mut records: Vec<FxRecord> = rows
        .into_iter()
        .filter(|row| row.base_currency_id == base_currency && row.date >= min_date)
        .map(FxRecord::from)
        .collect();

    records.sort_by(|a, b| a.key().cmp(&b.key()));
    let before = records.len();
    records.dedup_by(|later, earlier| later.key() == earlier.key());
    if records.len() < before {
        warn!(
            session = session.name(),
            dropped = before - records.len(),
            "Dropped FX rows repeating a (currency, date) key"
        );
    }

    debug!(
        session = session.name(),
        raw_rows = fetched,
        records = records.len(),
        base_currency,
        "Fetched FX series"
    );
    Ok(records)
}

fn ensure_connected<S>(session: &S) -> Result<(), DataError>
where
    S: WarehouseSession + ?Sized,
{
    if session.is_connected() {
        Ok(())
    } else {
        Err(DataError::Unavailable(format!(
            "no active warehouse session ({})",
            session.name()
        )))
    }
}
