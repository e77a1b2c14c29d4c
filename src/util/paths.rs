//! On-disk layout
//!
//! Everything tabspaces writes lives under one data directory:
//! `tabspaces.db` holds the key-value entries, `logs/tabspaces.log` the
//! tracing output and `config.toml` the user settings.

use std::path::PathBuf;
use std::sync::OnceLock;

static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Pin the data directory for the rest of the process.
///
/// `--data-dir` lands here; `None` keeps `~/.tabspaces`. Only the first call
/// counts, so call it before opening the store or the log file.
pub fn init_data_dir(custom_path: Option<PathBuf>) {
    let path = custom_path.unwrap_or_else(default_data_dir);
    if DATA_DIR.set(path.clone()).is_err() {
        let existing = DATA_DIR
            .get()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<unknown>".to_string());
        tracing::debug!(
            path = %path.display(),
            existing = %existing,
            "Data directory already initialized"
        );
    }
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".tabspaces"))
        .unwrap_or_else(|| PathBuf::from(".tabspaces"))
}

pub fn data_dir() -> PathBuf {
    DATA_DIR.get().cloned().unwrap_or_else(default_data_dir)
}

/// SQLite file backing the persistent store; unused with `--memory`
pub fn database_path() -> PathBuf {
    data_dir().join("tabspaces.db")
}

pub fn logs_dir() -> PathBuf {
    data_dir().join("logs")
}

/// Append-only log; the bridge owns stdout, so nothing is logged there
pub fn log_file_path() -> PathBuf {
    logs_dir().join("tabspaces.log")
}

/// Settings merged over the defaults; an example copy is written on first run
pub fn config_path() -> PathBuf {
    data_dir().join("config.toml")
}
