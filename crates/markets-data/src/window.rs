//! Windowed lag over per-ticker partitions.

use markets_core::types::StockRecord;
use std::collections::BTreeMap;

/// Relative change from `previous` to `current`.
///
/// `None` when either close is missing or the previous close is zero.
#[inline]
pub fn day_over_day(previous: Option<f64>, current: Option<f64>) -> Option<f64> {
    match (previous, current) {
        (Some(prev), Some(curr)) if prev != 0.0 => Some((curr - prev) / prev),
        _ => None,
    }
}

/// Fill `day_over_day_change` on every record.
///
/// Records are partitioned by ticker, each partition is ordered by date and
/// scanned with a single lookback slot holding the previous row's close. The
/// previous row is the previous *observation*, so a gap of several calendar
/// days still yields one change value. The first row of a partition has no
/// change.
///
/// The result is ordered by `(ticker, date)`.
pub fn apply_day_over_day(records: Vec<StockRecord>) -> Vec<StockRecord> {
    let mut partitions: BTreeMap<String, Vec<StockRecord>> = BTreeMap::new();
    for record in records {
        partitions
            .entry(record.ticker.clone())
            .or_default()
            .push(record);
    }

    let mut output = Vec::with_capacity(partitions.values().map(Vec::len).sum());
    for (_, mut partition) in partitions {
        partition.sort_by_key(|r| r.date);

        let mut lookback: Option<Option<f64>> = None;
        for mut record in partition {
            record.day_over_day_change = match lookback {
                Some(previous_close) => day_over_day(previous_close, record.postmarket_close),
                None => None,
            };
            lookback = Some(record.postmarket_close);
            output.push(record);
        }
    }

    output
}
