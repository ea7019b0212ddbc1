//! Core data types for the markets dashboard.

mod dataset;
mod fx;
mod metric;
mod stock;

pub use dataset::Dataset;
pub use fx::{FxRecord, RawFxRow, DEFAULT_FX_BASE_CURRENCY, FX_CURRENCIES, FX_MIN_DATE};
pub use metric::StockMetric;
pub use stock::{
    RawStockRow, StockRecord, MAGNIFICENT_SEVEN, NASDAQ_VOLUME, POSTMARKET_CLOSE,
    STOCK_VARIABLES,
};
