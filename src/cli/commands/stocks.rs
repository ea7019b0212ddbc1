//! Stocks command implementation.

use anyhow::{Context, Result};
use markets_config::AppConfig;
use markets_data::DatasetLoader;
use markets_views::{stock_view, StockQuery};
use tracing::info;

use super::{output, session::open_session};
use crate::cli::StocksArgs;

pub fn run(args: StocksArgs, config: &AppConfig) -> Result<()> {
    let session =
        open_session(&args.source, config).context("Failed to connect to the warehouse")?;

    let mut loader = DatasetLoader::new(config.dataset.request(), config.cache.ttl());
    let dataset = loader
        .load(session.as_ref())
        .context("Failed to load the stock and FX series")?;

    let query = StockQuery {
        start: args.start,
        end: args.end,
        tickers: args.tickers,
        metric: args.metric.into(),
    };
    let view = stock_view(Some(dataset.as_ref()), &query, &config.dataset.stock_defaults());
    info!(rows = view.state.rows().len(), metric = %view.metric, "Stock view ready");

    let stdout = std::io::stdout();
    output::write_stocks(&mut stdout.lock(), &view, args.output)
}
