use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::models::{CoreError, CoreResult};

pub const LOG_FILTER_ENV: &str = "USERSEARCH_LOG";
const DEFAULT_FILTER: &str = "info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

pub fn init_stderr() -> CoreResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(install_failure)
}

/// Appends plain-text logs to `path`; used while the terminal UI owns the screen.
pub fn init_file(path: &Path) -> CoreResult<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            CoreError::internal(format!("failed to open log file '{}': {e}", path.display()))
        })?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(install_failure)
}

fn install_failure(error: impl std::fmt::Display) -> CoreError {
    CoreError::internal(format!("failed to install log subscriber: {error}"))
}
