//! Dashboard command implementation.

use anyhow::{Context, Result};
use markets_config::AppConfig;
use markets_data::DatasetLoader;
use markets_monitor::{Dashboard, DashboardState};
use tracing::{error, info};

use super::session::open_session;
use crate::cli::DashboardArgs;

pub fn run(args: DashboardArgs, config: &AppConfig) -> Result<()> {
    let mut state = DashboardState::new(
        config.dataset.stock_defaults(),
        config.dataset.fx_defaults(),
    );
    let mut loader = DatasetLoader::new(config.dataset.request(), config.cache.ttl());

    // A failed connection is final for this run; the pages show the
    // unavailable message instead of exiting.
    let session = match open_session(&args.source, config) {
        Ok(session) => {
            info!(session = session.name(), "Warehouse session opened");
            state.set_dataset(loader.load(session.as_ref()));
            Some(session)
        }
        Err(e) => {
            error!(error = %e, "Warehouse connection failed");
            state.set_dataset(Err(e));
            None
        }
    };

    let dashboard = Dashboard::new(args.refresh_ms);
    dashboard
        .run(&mut state, || {
            loader.invalidate();
            loader.load_optional(session.as_deref())
        })
        .context("Dashboard terminal error")?;

    info!(generation = loader.generation(), "Dashboard closed");
    Ok(())
}
