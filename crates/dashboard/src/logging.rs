//! File logging for the dashboard.
//!
//! The terminal belongs to the UI while the dashboard runs, so every event
//! goes to a daily-rolling file under the log directory instead.

use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::error::{Error, Result};

/// File name prefix of the rolling log.
pub const LOG_FILE_PREFIX: &str = "dashboard.log";

/// Installs a global subscriber writing to `log_dir`.
///
/// The level comes from `RUST_LOG` and defaults to `info`. Events are flushed
/// until the returned guard is dropped.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or a global subscriber
/// is already installed.
pub fn init_file_logging(log_dir: &Path) -> Result<WorkerGuard> {
    fs::create_dir_all(log_dir)?;

    let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))?;

    Ok(guard)
}
