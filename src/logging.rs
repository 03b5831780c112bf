use std::path::PathBuf;

use anyhow::{Result, anyhow};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Directory holding the daily log files
pub fn log_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("ai-lawyer").join("logs"))
}

/// Initialize tracing with a daily rolling log file.
///
/// The terminal belongs to the TUI, so nothing is written to stdout or stderr.
/// The filter comes from RUST_LOG and defaults to `info`. Keep the returned
/// guard alive for the life of the process or buffered lines are lost.
pub fn init_tracing() -> Result<WorkerGuard> {
    let log_dir = log_dir().ok_or_else(|| anyhow!("Could not determine data directory"))?;
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = rolling::daily(&log_dir, "ai-lawyer.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            fmt::Layer::new()
                .with_writer(writer)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter)
        .try_init()
        .map_err(|e| anyhow!("Failed to set global default subscriber: {e}"))?;

    tracing::debug!(
        target: "ai_lawyer::logging",
        path = %log_dir.display(),
        "Tracing initialized with file output"
    );

    Ok(guard)
}
