//! Opt-in `tracing` output.
//!
//! The chat terminal owns the screen, so diagnostics always go to a file.
//! Nothing is installed unless `REX_LOG` is set.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::core::config::Config;

pub const LOG_FILTER_ENV: &str = "REX_LOG";

/// Where trace output goes when `--trace-file` is not given.
pub fn default_trace_path() -> PathBuf {
    Config::config_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("rex.log")
}

/// Install a file-backed subscriber filtered by `REX_LOG`.
///
/// Returns the path written to, or `None` when tracing stays disabled.
pub fn init_tracing(trace_file: Option<&Path>) -> Result<Option<PathBuf>, Box<dyn std::error::Error>> {
    let Ok(filter) = EnvFilter::try_from_env(LOG_FILTER_ENV) else {
        return Ok(None);
    };

    let path = trace_file
        .map(Path::to_path_buf)
        .unwrap_or_else(default_trace_path);
    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| -> Box<dyn std::error::Error> { err })?;

    Ok(Some(path))
}
