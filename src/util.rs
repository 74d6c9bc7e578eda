use crate::errors::StartupError;

use std::fs::OpenOptions;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Route tracing events to both the append-only `log_file` and stderr.
/// `RUST_LOG` overrides the default `info` filter.
///
/// Returned guard flushes the file writer on drop, keep it alive until exit.
pub fn init_logging(log_file: &str) -> Result<WorkerGuard, StartupError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .map_err(|source| StartupError::LogFile {
            path: log_file.to_string(),
            source,
        })?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false).with_target(true))
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();

    Ok(guard)
}

/// Start timing measurement.
pub fn measure_start(start: &mut std::time::Instant) {
    *start = std::time::Instant::now();
}

/// Log elapsed time since `start`.
pub fn measure_end(start: &std::time::Instant) {
    tracing::debug!(elapsed_ms = start.elapsed().as_millis() as u64, "command finished");
}
