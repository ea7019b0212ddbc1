//! Long-to-wide pivot of stock rows.

use markets_core::types::{RawStockRow, StockRecord, NASDAQ_VOLUME, POSTMARKET_CLOSE};
use std::collections::BTreeMap;

/// Collapse raw rows into one [`StockRecord`] per `(ticker, date)`.
///
/// Each known variable is projected into its column; a group missing a
/// variable leaves that column `None`. When a group carries several values for
/// the same variable the maximum wins. Unknown variables are ignored.
/// `day_over_day_change` is left unset.
///
/// The result is ordered by `(ticker, date)`.
pub fn pivot_stock_rows<I>(rows: I) -> Vec<StockRecord>
where
    I: IntoIterator<Item = RawStockRow>,
{
    let mut groups: BTreeMap<(String, chrono::NaiveDate), StockRecord> = BTreeMap::new();

    for row in rows {
        let column = match row.variable_name.as_str() {
            NASDAQ_VOLUME => Column::NasdaqVolume,
            POSTMARKET_CLOSE => Column::PostmarketClose,
            _ => continue,
        };

        let record = groups
            .entry((row.ticker.clone(), row.date))
            .or_insert_with(|| StockRecord::new(&row.ticker, row.date));

        match column {
            Column::NasdaqVolume => merge_max(&mut record.nasdaq_volume, row.value),
            Column::PostmarketClose => merge_max(&mut record.postmarket_close, row.value),
        }
    }

    groups.into_values().collect()
}

enum Column {
    NasdaqVolume,
    PostmarketClose,
}

fn merge_max(slot: &mut Option<f64>, value: Option<f64>) {
    if let Some(value) = value {
        *slot = Some(slot.map_or(value, |current| current.max(value)));
    }
}
