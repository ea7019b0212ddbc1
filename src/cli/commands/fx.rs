//! FX command implementation.

use anyhow::{Context, Result};
use markets_config::AppConfig;
use markets_data::DatasetLoader;
use markets_views::{fx_view, FxQuery};
use tracing::info;

use super::{output, session::open_session};
use crate::cli::FxArgs;

pub fn run(args: FxArgs, config: &AppConfig) -> Result<()> {
    let session =
        open_session(&args.source, config).context("Failed to connect to the warehouse")?;

    let mut loader = DatasetLoader::new(config.dataset.request(), config.cache.ttl());
    let dataset = loader
        .load(session.as_ref())
        .context("Failed to load the stock and FX series")?;

    let query = FxQuery {
        currencies: args.currencies,
    };
    let view = fx_view(Some(dataset.as_ref()), &query, &config.dataset.fx_defaults());
    info!(rows = view.state.rows().len(), "FX view ready");

    let stdout = std::io::stdout();
    output::write_fx(&mut stdout.lock(), &view, args.output)
}
