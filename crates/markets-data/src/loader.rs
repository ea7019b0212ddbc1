//! Loading both dashboard datasets through the memo cache.

use chrono::NaiveDate;
use markets_core::error::DataError;
use markets_core::traits::WarehouseSession;
use markets_core::types::{Dataset, DEFAULT_FX_BASE_CURRENCY, FX_MIN_DATE, MAGNIFICENT_SEVEN};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::adapter::{fetch_fx_series, fetch_stock_series};
use crate::cache::{CacheKey, CacheStats, MemoCache};

/// Arguments of a dataset load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetRequest {
    /// Tickers the stock series is restricted to
    pub tickers: Vec<String>,
    /// FX base currency
    pub fx_base_currency: String,
    /// Earliest FX date kept
    pub fx_min_date: NaiveDate,
}

impl Default for DatasetRequest {
    fn default() -> Self {
        Self {
            tickers: MAGNIFICENT_SEVEN.iter().map(|t| t.to_string()).collect(),
            fx_base_currency: DEFAULT_FX_BASE_CURRENCY.to_string(),
            fx_min_date: NaiveDate::parse_from_str(FX_MIN_DATE, "%Y-%m-%d")
                .unwrap_or(NaiveDate::MIN),
        }
    }
}

impl DatasetRequest {
    /// Cache key for this request against a named session.
    pub fn cache_key(&self, session_name: &str) -> CacheKey {
        CacheKey::new("load_dataset")
            .arg(session_name)
            .arg(self.tickers.join(","))
            .arg(&self.fx_base_currency)
            .arg(self.fx_min_date)
    }
}

/// Fetch both series from one session.
///
/// Either both series load or the whole load fails.
pub fn load_dataset<S>(session: &S, request: &DatasetRequest) -> Result<Dataset, DataError>
where
    S: WarehouseSession + ?Sized,
{
    let stocks = fetch_stock_series(session, &request.tickers)?;
    let fx = fetch_fx_series(session, &request.fx_base_currency, request.fx_min_date)?;

    info!(
        session = session.name(),
        stock_records = stocks.len(),
        fx_records = fx.len(),
        "Loaded dataset"
    );
    Ok(Dataset::new(stocks, fx))
}

/// Memoized dataset loads for one request.
#[derive(Debug)]
pub struct DatasetLoader {
    request: DatasetRequest,
    cache: MemoCache<Dataset>,
}

impl DatasetLoader {
    /// Create a loader; `ttl` of `None` keeps the dataset until invalidated.
    pub fn new(request: DatasetRequest, ttl: Option<Duration>) -> Self {
        Self {
            request,
            cache: MemoCache::new(ttl),
        }
    }

    /// The request this loader serves.
    pub fn request(&self) -> &DatasetRequest {
        &self.request
    }

    /// Load the dataset, hitting the warehouse only on a cache miss.
    pub fn load<S>(&mut self, session: &S) -> Result<Arc<Dataset>, DataError>
    where
        S: WarehouseSession + ?Sized,
    {
        let key = self.request.cache_key(session.name());
        let request = &self.request;
        self.cache
            .get_or_try_insert_with(key, || load_dataset(session, request))
            .inspect_err(|e| warn!(error = %e, "Dataset load failed"))
    }

    /// Load from a session that may not exist.
    ///
    /// A missing session means the connection was never established, which
    /// is reported as unavailable data.
    pub fn load_optional<S>(&mut self, session: Option<&S>) -> Result<Arc<Dataset>, DataError>
    where
        S: WarehouseSession + ?Sized,
    {
        match session {
            Some(session) => self.load(session),
            None => Err(DataError::Unavailable(
                "no active warehouse session".to_string(),
            )),
        }
    }

    /// Drop the cached dataset so the next load refetches.
    pub fn invalidate(&mut self) {
        self.cache.invalidate_all();
        info!(generation = self.cache.generation(), "Dataset cache invalidated");
    }

    /// Current cache generation.
    pub fn generation(&self) -> u64 {
        self.cache.generation()
    }

    /// Cache hit/miss counters.
    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemorySession;
    use markets_core::types::{RawFxRow, RawStockRow, POSTMARKET_CLOSE};

    fn session() -> InMemorySession {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        InMemorySession::new(
            vec![RawStockRow::new("AAPL", date, POSTMARKET_CLOSE, 185.0)],
            vec![RawFxRow {
                base_currency_id: "EUR".to_string(),
                quote_currency_name: "Canadian Dollar".to_string(),
                variable_name: "Euro to Canadian Dollar".to_string(),
                date,
                value: 1.46,
            }],
        )
    }

    #[test]
    fn test_default_request() {
        let request = DatasetRequest::default();
        assert_eq!(request.tickers.len(), 7);
        assert_eq!(request.fx_base_currency, "EUR");
        assert_eq!(request.fx_min_date, NaiveDate::from_ymd_opt(2019, 1, 1).unwrap());
    }

    #[test]
    fn test_load_is_memoized_until_invalidated() {
        let session = session();
        let mut loader = DatasetLoader::new(DatasetRequest::default(), None);

        let first = loader.load(&session).unwrap();
        let second = loader.load(&session).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.stocks.len(), 1);
        assert_eq!(first.fx.len(), 1);

        loader.invalidate();
        let third = loader.load(&session).unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(*first, *third);
        assert_eq!(loader.generation(), 1);
        assert_eq!(loader.stats(), CacheStats { hits: 1, misses: 2 });
    }

    #[test]
    fn test_missing_session_is_unavailable() {
        let mut loader = DatasetLoader::new(DatasetRequest::default(), None);
        let err = loader.load_optional::<InMemorySession>(None).unwrap_err();
        assert!(matches!(err, DataError::Unavailable(_)));
    }

    #[test]
    fn test_failed_load_caches_nothing() {
        let mut loader = DatasetLoader::new(DatasetRequest::default(), None);
        assert!(loader.load(&InMemorySession::disconnected()).is_err());

        let dataset = loader.load(&session()).unwrap();
        assert_eq!(dataset.stocks.len(), 1);
    }

    #[test]
    fn test_cache_key_depends_on_session_and_arguments() {
        let request = DatasetRequest::default();
        let other = DatasetRequest {
            fx_base_currency: "USD".to_string(),
            ..DatasetRequest::default()
        };

        assert_ne!(request.cache_key("memory"), request.cache_key("duckdb"));
        assert_ne!(request.cache_key("memory"), other.cache_key("memory"));
    }
}
