//! Outcome of building a view.

use serde::Serialize;

/// Message shown when a view has no dataset to work on.
pub const UNAVAILABLE_MESSAGE: &str =
    "Data could not be loaded. Please check your warehouse connection.";

/// What a view hands to the rendering boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "rows", rename_all = "snake_case")]
pub enum ViewState<T> {
    /// No dataset; carries a user-visible message
    Unavailable(String),
    /// The filters exclude everything
    Empty,
    /// Rows to draw
    Ready(Vec<T>),
}

impl<T> ViewState<T> {
    /// Build from filtered rows.
    pub fn from_rows(rows: Vec<T>) -> Self {
        if rows.is_empty() {
            ViewState::Empty
        } else {
            ViewState::Ready(rows)
        }
    }

    /// Rows to draw; empty unless ready.
    pub fn rows(&self) -> &[T] {
        match self {
            ViewState::Ready(rows) => rows,
            _ => &[],
        }
    }

    /// User-visible message for the non-ready states.
    pub fn message(&self) -> Option<&str> {
        match self {
            ViewState::Unavailable(message) => Some(message),
            ViewState::Empty => Some("Nothing to draw for the current selection."),
            ViewState::Ready(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows() {
        assert_eq!(ViewState::<u8>::from_rows(Vec::new()), ViewState::Empty);
        assert_eq!(ViewState::from_rows(vec![1]), ViewState::Ready(vec![1]));
    }

    #[test]
    fn test_messages() {
        let unavailable: ViewState<u8> = ViewState::Unavailable(UNAVAILABLE_MESSAGE.to_string());
        assert_eq!(unavailable.message(), Some(UNAVAILABLE_MESSAGE));
        assert!(unavailable.rows().is_empty());
        assert!(ViewState::Ready(vec![1]).message().is_none());
    }

    #[test]
    fn test_json_is_tagged_by_status() {
        use crate::stocks::StockPoint;
        use chrono::NaiveDate;

        let point = StockPoint {
            ticker: "AAPL".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            value: None,
        };
        let ready = serde_json::to_value(ViewState::Ready(vec![point.clone()])).unwrap();
        assert_eq!(
            ready,
            serde_json::json!({
                "status": "ready",
                "rows": [{ "ticker": "AAPL", "date": "2024-01-02", "value": null }]
            })
        );
        let back: StockPoint = serde_json::from_value(ready["rows"][0].clone()).unwrap();
        assert_eq!(back, point);

        let empty = serde_json::to_value(ViewState::<StockPoint>::Empty).unwrap();
        assert_eq!(empty, serde_json::json!({ "status": "empty" }));

        let unavailable =
            serde_json::to_value(ViewState::<StockPoint>::Unavailable(UNAVAILABLE_MESSAGE.into()))
                .unwrap();
        assert_eq!(unavailable["status"], "unavailable");
        assert_eq!(unavailable["rows"], UNAVAILABLE_MESSAGE);
    }
}
