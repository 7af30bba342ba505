//! Process initialization: logging and the runtime.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::runtime::Runtime;
use tracing_appender::rolling::{RollingFileAppender, Rotation};

const LOG_FILE_PREFIX: &str = "audamo";
const LOG_FILE_SUFFIX: &str = "log";

/// Daily log files kept before the oldest is deleted.
const MAX_LOG_FILES: usize = 7;

/// Directory holding the log files (`~/.local/state/audamo`).
pub fn log_dir() -> PathBuf {
    dirs::state_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("audamo")
}

/// Daily rotated `audamo.<date>.log` files in `dir`.
fn file_appender(dir: &Path) -> Option<RollingFileAppender> {
    std::fs::create_dir_all(dir).ok()?;
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(MAX_LOG_FILES)
        .build(dir)
        .ok()
}

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr and, when the log directory is writable, to daily
/// rotated files inside [`log_dir`].
pub fn init_logging(debug: bool) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    // By default, only log from the audamo crate
    // Users can override with RUST_LOG environment variable
    let default_level = if debug { "audamo=debug" } else { "audamo=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let dir = log_dir();
    let file_appender = file_appender(&dir);
    let file_enabled = file_appender.is_some();
    let file_layer =
        file_appender.map(|appender| fmt::layer().with_ansi(false).with_writer(appender));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(file_layer)
        .with(filter)
        .init();

    if !file_enabled {
        tracing::debug!("Log directory {:?} is not writable, logging to stderr only", dir);
    }
}

/// Build the single-threaded runtime the daemon loop runs on.
pub fn build_runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to initialize tokio runtime")
}
