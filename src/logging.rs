use std::error::Error;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::app_dirs::AppDirs;

/// Enables logging and carries the filter directives.
pub const LOG_ENV: &str = "TYPER_ZONE_LOG";

/// Where logs should go, if anywhere. The terminal belongs to the UI, so
/// logging only ever targets a file.
pub fn log_destination(log_file: Option<&Path>, env_set: bool) -> Option<PathBuf> {
    match (log_file, env_set) {
        (Some(path), _) => Some(path.to_path_buf()),
        (None, true) => AppDirs::log_path(),
        (None, false) => None,
    }
}

/// Install the global subscriber. Returns the log path when logging is on.
pub fn init(log_file: Option<&Path>) -> Result<Option<PathBuf>, Box<dyn Error>> {
    let env_set = std::env::var_os(LOG_ENV).is_some();
    let Some(path) = log_destination(log_file, env_set) else {
        return Ok(None);
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| e.to_string())?;

    Ok(Some(path))
}
