//! CSV extracts of the warehouse tables.

use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use markets_core::error::DataError;
use markets_core::types::{RawFxRow, RawStockRow};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Stock CSV record format.
#[derive(Debug, Deserialize)]
struct StockCsvRecord {
    #[serde(alias = "TICKER", alias = "Ticker", alias = "symbol")]
    ticker: String,
    #[serde(alias = "DATE", alias = "Date")]
    date: String,
    #[serde(alias = "VARIABLE_NAME", alias = "variable")]
    variable_name: String,
    #[serde(alias = "VALUE", alias = "Value", default)]
    value: Option<f64>,
}

/// FX CSV record format.
#[derive(Debug, Deserialize)]
struct FxCsvRecord {
    #[serde(alias = "BASE_CURRENCY_ID", alias = "base")]
    base_currency_id: String,
    #[serde(alias = "QUOTE_CURRENCY_NAME", alias = "quote")]
    quote_currency_name: String,
    #[serde(alias = "VARIABLE_NAME", alias = "EXCHANGE_RATE", alias = "exchange_rate")]
    variable_name: String,
    #[serde(alias = "DATE", alias = "Date")]
    date: String,
    #[serde(alias = "VALUE", alias = "Value")]
    value: f64,
}

/// Read long-format stock rows from a CSV file.
pub fn read_stock_rows(path: &Path) -> Result<Vec<RawStockRow>, DataError> {
    let rows = read_records::<StockCsvRecord>(path)?
        .into_iter()
        .map(|record| {
            Ok(RawStockRow {
                ticker: record.ticker,
                date: parse_date(&record.date)?,
                variable_name: record.variable_name,
                value: record.value,
            })
        })
        .collect::<Result<Vec<_>, DataError>>()?;

    debug!(path = %path.display(), rows = rows.len(), "Read stock CSV");
    Ok(rows)
}

/// Read FX rows from a CSV file.
pub fn read_fx_rows(path: &Path) -> Result<Vec<RawFxRow>, DataError> {
    let rows = read_records::<FxCsvRecord>(path)?
        .into_iter()
        .map(|record| {
            Ok(RawFxRow {
                base_currency_id: record.base_currency_id,
                quote_currency_name: record.quote_currency_name,
                variable_name: record.variable_name,
                date: parse_date(&record.date)?,
                value: record.value,
            })
        })
        .collect::<Result<Vec<_>, DataError>>()?;

    debug!(path = %path.display(), rows = rows.len(), "Read FX CSV");
    Ok(rows)
}

fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, DataError> {
    if !path.exists() {
        return Err(DataError::Unavailable(format!(
            "CSV file not found: {}",
            path.display()
        )));
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| DataError::Parse(e.to_string()))?;

    reader
        .deserialize()
        .map(|result| result.map_err(|e| DataError::Parse(e.to_string())))
        .collect()
}

/// Parse the date formats found in warehouse extracts.
fn parse_date(date_str: &str) -> Result<NaiveDate, DataError> {
    for format in ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(date_str, format) {
            return Ok(date);
        }
    }

    // Timestamps exported from DATE columns cast to TIMESTAMP
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.date());
        }
    }

    Err(DataError::Parse(format!("Could not parse date: {}", date_str)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();

        assert_eq!(parse_date("2024-01-15").unwrap(), expected);
        assert_eq!(parse_date("2024/01/15").unwrap(), expected);
        assert_eq!(parse_date("01/15/2024").unwrap(), expected);
        assert_eq!(parse_date("2024-01-15 00:00:00").unwrap(), expected);
        assert!(parse_date("yesterday").is_err());
    }

    #[test]
    fn test_read_stock_rows_with_upper_case_headers() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "TICKER,DATE,VARIABLE_NAME,VALUE").unwrap();
        writeln!(file, "AAPL,2024-01-02,Post-Market Close,185.5").unwrap();
        writeln!(file, "AAPL,2024-01-02,Nasdaq Volume,").unwrap();

        let rows = read_stock_rows(file.path()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].value, Some(185.5));
        assert_eq!(rows[1].value, None);
    }

    #[test]
    fn test_read_fx_rows() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "base_currency_id,quote_currency_name,variable_name,date,value"
        )
        .unwrap();
        writeln!(file, "EUR,Japanese Yen,Euro to Japanese Yen,2023-06-01,150.1").unwrap();

        let rows = read_fx_rows(file.path()).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].quote_currency_name, "Japanese Yen");
        assert_eq!(rows[0].value, 150.1);
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let err = read_stock_rows(Path::new("/nonexistent/stocks.csv")).unwrap_err();
        assert!(matches!(err, DataError::Unavailable(_)));
    }
}
