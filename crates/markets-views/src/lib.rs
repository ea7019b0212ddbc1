//! View filter and projection layer.
//!
//! Runs on every interactive input change, purely over an already-loaded
//! [`Dataset`](markets_core::types::Dataset). Nothing here touches the
//! warehouse or mutates the dataset.

mod fx;
mod page;
mod range;
mod series;
mod state;
mod stocks;

pub use fx::{filter_fx, fx_view, FxDefaults, FxPoint, FxQuery, FxView};
pub use page::Page;
pub use range::DateRange;
pub use series::{group_series, Series, SeriesPoint};
pub use state::{ViewState, UNAVAILABLE_MESSAGE};
pub use stocks::{
    filter_stocks, stock_view, ResolvedStockQuery, StockDefaults, StockPoint, StockQuery,
    StockView, DEFAULT_TICKERS,
};
