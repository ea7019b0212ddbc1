//! Data source adapter for the markets dashboard.
//!
//! Raw long-format warehouse rows go in, pivoted stock records with a
//! day-over-day change and filtered FX records come out. Every fetch takes the
//! warehouse session explicitly and results are memoized in a [`MemoCache`].

mod adapter;
mod cache;
mod csv_source;
mod duckdb_session;
mod loader;
mod memory;
mod pivot;
mod window;

pub use adapter::{fetch_fx_series, fetch_stock_series};
pub use cache::{CacheKey, CacheStats, MemoCache};
pub use csv_source::{read_fx_rows, read_stock_rows};
pub use duckdb_session::{ConnectionParams, DuckDbSession, FX_TABLE, STOCK_TABLE};
pub use loader::{load_dataset, DatasetLoader, DatasetRequest};
pub use memory::InMemorySession;
pub use pivot::pivot_stock_rows;
pub use window::{apply_day_over_day, day_over_day};
