//! Grouping view rows into per-key chart series.

use chrono::NaiveDate;

use crate::fx::FxPoint;
use crate::stocks::StockPoint;

/// A row that belongs to a named series.
pub trait SeriesPoint {
    /// Series the point belongs to (ticker or currency).
    fn series_key(&self) -> &str;
    /// X coordinate.
    fn date(&self) -> NaiveDate;
    /// Y coordinate; `None` is not drawn.
    fn y(&self) -> Option<f64>;
}

impl SeriesPoint for StockPoint {
    fn series_key(&self) -> &str {
        &self.ticker
    }

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn y(&self) -> Option<f64> {
        self.value
    }
}

impl SeriesPoint for FxPoint {
    fn series_key(&self) -> &str {
        &self.quote_currency_name
    }

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn y(&self) -> Option<f64> {
        Some(self.value)
    }
}

/// One line of a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub key: String,
    pub points: Vec<(NaiveDate, f64)>,
}

impl Series {
    /// Smallest and largest y value.
    pub fn y_bounds(&self) -> Option<(f64, f64)> {
        self.points.iter().map(|(_, y)| *y).fold(None, |acc, y| match acc {
            None => Some((y, y)),
            Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
        })
    }
}

/// Split rows into one series per key, in order of first appearance.
/// Points without a y value are skipped; a key whose points are all skipped
/// still gets an (empty) series.
pub fn group_series<P: SeriesPoint>(points: &[P]) -> Vec<Series> {
    let mut series: Vec<Series> = Vec::new();
    for point in points {
        let index = match series.iter().position(|s| s.key == point.series_key()) {
            Some(index) => index,
            None => {
                series.push(Series {
                    key: point.series_key().to_string(),
                    points: Vec::new(),
                });
                series.len() - 1
            }
        };
        if let Some(y) = point.y() {
            series[index].points.push((point.date(), y));
        }
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(ticker: &str, d: u32, value: Option<f64>) -> StockPoint {
        StockPoint {
            ticker: ticker.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, d).unwrap(),
            value,
        }
    }

    #[test]
    fn test_group_series_by_ticker() {
        let points = vec![
            point("AAPL", 1, None),
            point("AAPL", 2, Some(0.01)),
            point("MSFT", 1, None),
            point("MSFT", 2, Some(-0.02)),
            point("MSFT", 3, Some(0.03)),
        ];

        let series = group_series(&points);

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].key, "AAPL");
        assert_eq!(series[0].points.len(), 1);
        assert_eq!(series[1].points.len(), 2);
        assert_eq!(series[1].y_bounds(), Some((-0.02, 0.03)));
    }

    #[test]
    fn test_all_null_series_is_kept_empty() {
        let series = group_series(&[point("TSLA", 1, None)]);
        assert_eq!(series.len(), 1);
        assert!(series[0].points.is_empty());
        assert_eq!(series[0].y_bounds(), None);
    }
}
