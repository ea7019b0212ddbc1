//! CLI definitions.

pub mod commands;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use markets_core::types::StockMetric;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "markets")]
#[command(author, version, about = "Stock and FX warehouse dashboard")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level; defaults to the configured level
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the filtered stock series
    Stocks(StocksArgs),
    /// Print the filtered FX series
    Fx(FxArgs),
    /// Open the terminal dashboard
    Dashboard(DashboardArgs),
    /// Load raw CSV rows into the DuckDB warehouse
    Seed(SeedArgs),
    /// Validate configuration
    ValidateConfig,
}

/// Where rows come from when not reading the configured warehouse.
#[derive(clap::Args, Clone, Default)]
pub struct SourceArgs {
    /// Read raw stock rows from this CSV instead of the warehouse
    #[arg(long, requires = "fx_csv")]
    pub stocks_csv: Option<PathBuf>,

    /// Read raw FX rows from this CSV instead of the warehouse
    #[arg(long, requires = "stocks_csv")]
    pub fx_csv: Option<PathBuf>,
}

#[derive(Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum MetricArg {
    DayOverDayChange,
    PostmarketClose,
    NasdaqVolume,
}

impl From<MetricArg> for StockMetric {
    fn from(metric: MetricArg) -> Self {
        match metric {
            MetricArg::DayOverDayChange => StockMetric::DayOverDayChange,
            MetricArg::PostmarketClose => StockMetric::PostmarketClose,
            MetricArg::NasdaqVolume => StockMetric::NasdaqVolume,
        }
    }
}

#[derive(clap::Args)]
pub struct StocksArgs {
    /// Start date (YYYY-MM-DD); defaults to 30 days before the latest date
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// End date (YYYY-MM-DD); defaults to the latest date
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Tickers to show (comma-separated)
    #[arg(short = 'T', long, value_delimiter = ',')]
    pub tickers: Option<Vec<String>>,

    /// Metric to project
    #[arg(short, long, default_value = "day-over-day-change")]
    pub metric: MetricArg,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub output: OutputFormat,

    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(clap::Args)]
pub struct FxArgs {
    /// Quote currencies to show (comma-separated display names)
    #[arg(long, value_delimiter = ',')]
    pub currencies: Option<Vec<String>>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub output: OutputFormat,

    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(clap::Args)]
pub struct DashboardArgs {
    /// Input poll interval in milliseconds
    #[arg(long, default_value = "250")]
    pub refresh_ms: u64,

    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(clap::Args)]
pub struct SeedArgs {
    /// CSV of raw stock rows
    #[arg(long)]
    pub stocks: PathBuf,

    /// CSV of raw FX rows
    #[arg(long)]
    pub fx: PathBuf,
}
