//! Error types for the markets dashboard.

use thiserror::Error;

/// Top-level dashboard error.
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Warehouse and pipeline errors.
///
/// `Connection` is terminal for a session and surfaces once at startup.
/// `Unavailable` is per-view and recoverable. An empty result set is never
/// an error.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Warehouse connection failed: {0}")]
    Connection(String),

    #[error("Data unavailable: {0}")]
    Unavailable(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl DataError {
    /// Whether the error means the warehouse could not be reached at all.
    pub fn is_connection(&self) -> bool {
        matches!(self, DataError::Connection(_))
    }
}

/// Result type alias for dashboard operations.
pub type DashboardResult<T> = Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_error_converts_into_dashboard_error() {
        let err: DashboardError = DataError::Unavailable("no session".to_string()).into();
        assert!(matches!(err, DashboardError::Data(DataError::Unavailable(_))));
        assert_eq!(err.to_string(), "Data error: Data unavailable: no session");
    }

    #[test]
    fn test_is_connection() {
        assert!(DataError::Connection("refused".into()).is_connection());
        assert!(!DataError::Query("bad sql".into()).is_connection());
    }
}
