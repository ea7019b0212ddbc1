//! Logging setup.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer, Registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Setup logging with the given level.
///
/// Console output goes to stderr so command output on stdout stays clean;
/// `console = false` disables it entirely.
/// `RUST_LOG` overrides `level`. With `file` set, events are also written to a
/// daily rolling file through a non-blocking writer; keep the returned guard
/// alive until exit so buffered lines are flushed.
pub fn setup_logging(
    level: &str,
    json: bool,
    file: Option<&Path>,
    console: bool,
) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let mut layers: Vec<BoxedLayer> = Vec::new();
    if console {
        layers.push(if json {
            fmt::layer().json().with_writer(std::io::stderr).boxed()
        } else {
            fmt::layer().pretty().with_writer(std::io::stderr).boxed()
        });
    }

    let guard = file.map(|path| {
        let directory = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let file_name = path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "markets.log".into());

        let appender = tracing_appender::rolling::daily(directory, file_name);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        layers.push(if json {
            fmt::layer().json().with_writer(writer).boxed()
        } else {
            fmt::layer().with_ansi(false).with_writer(writer).boxed()
        });
        guard
    });

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .init();

    guard
}
