//! Seed command implementation.

use anyhow::{Context, Result};
use markets_config::AppConfig;
use markets_data::{read_fx_rows, read_stock_rows, DuckDbSession};
use tracing::info;

use crate::cli::SeedArgs;

pub fn run(args: SeedArgs, config: &AppConfig) -> Result<()> {
    let stock_rows = read_stock_rows(&args.stocks)
        .with_context(|| format!("Failed to read stock rows from {:?}", args.stocks))?;
    let fx_rows = read_fx_rows(&args.fx)
        .with_context(|| format!("Failed to read FX rows from {:?}", args.fx))?;

    let session = DuckDbSession::connect(config.warehouse.connection_params())
        .context("Failed to connect to the warehouse")?;
    session.ensure_tables().context("Failed to create tables")?;

    let stocks = session
        .seed_stock_rows(&stock_rows)
        .context("Failed to write stock rows")?;
    let fx = session
        .seed_fx_rows(&fx_rows)
        .context("Failed to write FX rows")?;

    info!(stocks, fx, database = %config.warehouse.database, "Warehouse seeded");
    println!(
        "Seeded {} stock rows and {} FX rows into {}",
        stocks, fx, config.warehouse.database
    );
    Ok(())
}
