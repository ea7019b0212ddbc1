//! Behavior tests for the warehouse-to-dataset pipeline.
//!
//! The same seed rows go through the DuckDB session and the in-memory session;
//! both must produce identical series.

use chrono::NaiveDate;
use markets_core::error::DataError;
use markets_core::types::{RawFxRow, RawStockRow, NASDAQ_VOLUME, POSTMARKET_CLOSE};
use markets_data::{
    fetch_fx_series, fetch_stock_series, read_fx_rows, read_stock_rows, ConnectionParams,
    DatasetLoader, DatasetRequest, DuckDbSession, InMemorySession,
};
use std::fs;
use std::sync::Arc;
use tempfile::tempdir;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn seed_stocks() -> Vec<RawStockRow> {
    let mut rows = Vec::new();
    let closes = [("AAPL", [100.0, 110.0, 99.0]), ("MSFT", [400.0, 404.0, 404.0])];
    for (ticker, series) in closes {
        for (i, close) in series.iter().enumerate() {
            let date = day(2024, 1, 2 + i as u32 * 2);
            rows.push(RawStockRow::new(ticker, date, POSTMARKET_CLOSE, *close));
            rows.push(RawStockRow::new(ticker, date, NASDAQ_VOLUME, 1_000.0 * (i + 1) as f64));
        }
    }
    rows.push(RawStockRow::new("IBM", day(2024, 1, 2), POSTMARKET_CLOSE, 160.0));
    rows
}

fn seed_fx() -> Vec<RawFxRow> {
    let row = |base: &str, quote: &str, date: NaiveDate, value: f64| RawFxRow {
        base_currency_id: base.to_string(),
        quote_currency_name: quote.to_string(),
        variable_name: format!("{base} to {quote}"),
        date,
        value,
    };
    vec![
        row("EUR", "United States Dollar", day(2019, 1, 2), 1.14),
        row("EUR", "United States Dollar", day(2018, 12, 31), 1.15),
        row("EUR", "Japanese Yen", day(2020, 3, 1), 120.5),
        row("USD", "Japanese Yen", day(2020, 3, 1), 108.0),
    ]
}

fn tickers() -> Vec<String> {
    ["AAPL", "MSFT", "AMZN"].iter().map(|t| t.to_string()).collect()
}

fn seeded_duckdb() -> DuckDbSession {
    let session = DuckDbSession::connect(ConnectionParams::default()).expect("connect");
    session.seed_stock_rows(&seed_stocks()).expect("seed stocks");
    session.seed_fx_rows(&seed_fx()).expect("seed fx");
    session
}

#[test]
fn duckdb_and_memory_sessions_produce_identical_series() {
    let duck = seeded_duckdb();
    let memory = InMemorySession::new(seed_stocks(), seed_fx());

    let duck_stocks = fetch_stock_series(&duck, &tickers()).expect("duckdb stocks");
    let memory_stocks = fetch_stock_series(&memory, &tickers()).expect("memory stocks");
    assert_eq!(duck_stocks, memory_stocks);
    assert_eq!(duck_stocks.len(), 6);

    let duck_fx = fetch_fx_series(&duck, "EUR", day(2019, 1, 1)).expect("duckdb fx");
    let memory_fx = fetch_fx_series(&memory, "EUR", day(2019, 1, 1)).expect("memory fx");
    assert_eq!(duck_fx, memory_fx);
    assert_eq!(duck_fx.len(), 2);
}

#[test]
fn day_over_day_change_is_computed_per_ticker() {
    let records = fetch_stock_series(&seeded_duckdb(), &tickers()).expect("stocks");

    let aapl: Vec<_> = records.iter().filter(|r| r.ticker == "AAPL").collect();
    assert_eq!(aapl[0].day_over_day_change, None);
    assert_eq!(aapl[1].day_over_day_change, Some(0.10));
    assert_eq!(aapl[2].day_over_day_change, Some(-0.1));

    let msft: Vec<_> = records.iter().filter(|r| r.ticker == "MSFT").collect();
    assert_eq!(msft[0].day_over_day_change, None);
    assert_eq!(msft[1].day_over_day_change, Some(0.01));
    assert_eq!(msft[2].day_over_day_change, Some(0.0));
}

#[test]
fn seeding_from_csv_extracts_round_trips_through_duckdb_file() {
    let temp = tempdir().expect("tempdir");
    let stock_csv = temp.path().join("stocks.csv");
    let fx_csv = temp.path().join("fx.csv");
    fs::write(
        &stock_csv,
        "TICKER,DATE,VARIABLE_NAME,VALUE\n\
         AAPL,2024-01-01,Post-Market Close,100\n\
         AAPL,2024-01-02,Post-Market Close,105\n",
    )
    .expect("write stocks");
    fs::write(
        &fx_csv,
        "BASE_CURRENCY_ID,QUOTE_CURRENCY_NAME,VARIABLE_NAME,DATE,VALUE\n\
         EUR,Canadian Dollar,Euro to Canadian Dollar,2023-06-01,1.45\n",
    )
    .expect("write fx");

    let params = ConnectionParams {
        database: temp.path().join("warehouse.duckdb").display().to_string(),
        ..ConnectionParams::default()
    };

    {
        let session = DuckDbSession::connect(params.clone()).expect("connect for seed");
        session
            .seed_stock_rows(&read_stock_rows(&stock_csv).expect("read stocks"))
            .expect("seed stocks");
        session
            .seed_fx_rows(&read_fx_rows(&fx_csv).expect("read fx"))
            .expect("seed fx");
    }

    let session = DuckDbSession::connect(params).expect("reconnect");
    let mut loader = DatasetLoader::new(DatasetRequest::default(), None);
    let dataset = loader.load(&session).expect("load");

    assert_eq!(dataset.stocks.len(), 2);
    assert_eq!(dataset.stocks[1].day_over_day_change, Some(0.05));
    assert_eq!(dataset.fx.len(), 1);
    assert_eq!(dataset.fx[0].exchange_rate, "Euro to Canadian Dollar");
}

#[test]
fn csv_session_matches_duckdb_session() {
    let temp = tempdir().expect("tempdir");
    let stock_csv = temp.path().join("stocks.csv");
    let fx_csv = temp.path().join("fx.csv");
    fs::write(
        &stock_csv,
        "ticker,date,variable_name,value\nNVDA,2024-02-01,Post-Market Close,600\nNVDA,2024-02-02,Post-Market Close,630\n",
    )
    .expect("write stocks");
    fs::write(
        &fx_csv,
        "base_currency_id,quote_currency_name,variable_name,date,value\n",
    )
    .expect("write fx");

    let session = InMemorySession::from_csv(&stock_csv, &fx_csv).expect("csv session");
    let records = fetch_stock_series(&session, &["NVDA".to_string()]).expect("stocks");

    assert_eq!(session.stock_table().len(), 2);
    assert_eq!(records[1].day_over_day_change, Some(0.05));
}

#[test]
fn dataset_load_is_all_or_nothing() {
    let session = DuckDbSession::connect(ConnectionParams::default()).expect("connect");
    session.seed_stock_rows(&seed_stocks()).expect("seed stocks");

    // FX table exists but the stock-only seed leaves it empty: both load.
    let mut loader = DatasetLoader::new(DatasetRequest::default(), None);
    let dataset = loader.load(&session).expect("load");
    assert!(dataset.fx.is_empty());
    assert!(!dataset.stocks.is_empty());

    // A session without tables fails the whole load.
    let empty = DuckDbSession::connect(ConnectionParams::default()).expect("connect");
    let mut loader = DatasetLoader::new(DatasetRequest::default(), None);
    let err = loader.load(&empty).expect_err("no tables");
    assert!(matches!(err, DataError::Query(_)));
}

#[test]
fn cached_dataset_is_shared_until_invalidated() {
    let session = seeded_duckdb();
    let mut loader = DatasetLoader::new(DatasetRequest::default(), None);

    let first = loader.load(&session).expect("first");
    session
        .seed_stock_rows(&[RawStockRow::new("AAPL", day(2024, 1, 20), POSTMARKET_CLOSE, 120.0)])
        .expect("late row");

    let cached = loader.load(&session).expect("cached");
    assert!(Arc::ptr_eq(&first, &cached));

    loader.invalidate();
    let refreshed = loader.load(&session).expect("refreshed");
    assert_eq!(refreshed.stocks.len(), first.stocks.len() + 1);
}
