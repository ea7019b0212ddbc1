//! Writing view results to the terminal.

use anyhow::Result;
use markets_views::{FxView, StockView, ViewState};
use std::io::Write;

use crate::cli::OutputFormat;

/// Write the stock view in the requested format.
pub fn write_stocks<W: Write>(out: &mut W, view: &StockView, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &view.state)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(&mut *out);
            writer.write_record(["TICKER", "DATE", view.metric.column()])?;
            for point in view.state.rows() {
                writer.write_record([
                    point.ticker.clone(),
                    point.date.to_string(),
                    point.value.map(|v| v.to_string()).unwrap_or_default(),
                ])?;
            }
            writer.flush()?;
        }
        OutputFormat::Text => {
            if let Some(query) = &view.query {
                writeln!(out, "Range:   {}", query.range)?;
                writeln!(out, "Tickers: {}", query.tickers.join(", "))?;
            }
            writeln!(out, "Metric:  {}", view.metric)?;
            if let Some(message) = view.state.message() {
                writeln!(out, "{message}")?;
                return Ok(());
            }
            writeln!(out)?;
            writeln!(out, "{:<8} {:<12} {:>20}", "TICKER", "DATE", view.metric.column())?;
            for point in view.state.rows() {
                let value = point
                    .value
                    .map(|v| format!("{v:.6}"))
                    .unwrap_or_else(|| "-".to_string());
                writeln!(
                    out,
                    "{:<8} {:<12} {:>20}",
                    point.ticker,
                    point.date.to_string(),
                    value
                )?;
            }
        }
    }
    Ok(())
}

/// Write the FX view in the requested format.
pub fn write_fx<W: Write>(out: &mut W, view: &FxView, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &view.state)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(&mut *out);
            writer.write_record(["QUOTE_CURRENCY_NAME", "DATE", "VALUE"])?;
            for point in view.state.rows() {
                writer.write_record([
                    point.quote_currency_name.clone(),
                    point.date.to_string(),
                    point.value.to_string(),
                ])?;
            }
            writer.flush()?;
        }
        OutputFormat::Text => {
            writeln!(out, "Currencies: {}", view.selected.join(", "))?;
            if let ViewState::Ready(points) = &view.state {
                writeln!(out)?;
                writeln!(out, "{:<26} {:<12} {:>14}", "QUOTE_CURRENCY_NAME", "DATE", "VALUE")?;
                for point in points {
                    writeln!(
                        out,
                        "{:<26} {:<12} {:>14.6}",
                        point.quote_currency_name,
                        point.date.to_string(),
                        point.value
                    )?;
                }
            } else if let Some(message) = view.state.message() {
                writeln!(out, "{message}")?;
            }
        }
    }
    Ok(())
}
