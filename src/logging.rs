//! Tracing setup
//!
//! The TUI owns the terminal, so logs go to `measures.log` in the data dir.
//! Filtering follows the `MEASURES_LOG` env var (default `info`).

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::{MeasuresError, Result};

pub const LOG_ENV: &str = "MEASURES_LOG";
const LOG_FILE: &str = "measures.log";

/// Install the global file subscriber, returning the log file path
///
/// A second call (e.g. from tests) leaves the first subscriber in place.
pub fn init(log_dir: &Path) -> Result<PathBuf> {
    let path = log_dir.join(LOG_FILE);
    let io_err = |source| MeasuresError::Io {
        path: path.clone(),
        source,
    };
    std::fs::create_dir_all(log_dir).map_err(io_err)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(io_err)?;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .is_ok();
    if installed {
        tracing::debug!(path = %path.display(), "logging initialized");
    }
    Ok(path)
}
