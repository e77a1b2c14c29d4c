use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::sync::SyncSettings;
use crate::util::paths::config_path;
use crate::util::DEFAULT_NAME_LENGTH;

/// Example configuration file contents (bundled with the binary)
pub const EXAMPLE_CONFIG: &str = include_str!("config.toml.example");

/// Where workspace records are persisted
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum StorageBackend {
    Sqlite,
    Memory,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Storage backend for the key/value store
    pub storage_backend: StorageBackend,
    /// Custom database location (None = `<data_dir>/tabspaces.db`)
    pub database_path: Option<PathBuf>,
    /// Length of generated workspace names
    pub name_length: usize,
    /// Fallback for the remember-workspaces option
    pub remember_workspaces: bool,
    /// Log filter used when RUST_LOG is unset
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_backend: StorageBackend::Sqlite,
            database_path: None,
            name_length: DEFAULT_NAME_LENGTH,
            remember_workspaces: false,
            log_level: "warn".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlStorageConfig {
    pub backend: Option<StorageBackend>,
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlWorkspacesConfig {
    pub name_length: Option<usize>,
    pub remember_workspaces: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlLoggingConfig {
    pub level: Option<String>,
}

/// TOML representation of the config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub storage: Option<TomlStorageConfig>,
    pub workspaces: Option<TomlWorkspacesConfig>,
    pub logging: Option<TomlLoggingConfig>,
}

impl Config {
    /// Load configuration from the data directory, merging with defaults
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    /// Load configuration from `path`, writing the example file on first run
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            Self::create_default_config(path);
        }

        let mut config = Config::default();
        let Ok(contents) = fs::read_to_string(path) else {
            return config;
        };
        match toml::from_str::<TomlConfig>(&contents) {
            Ok(toml_config) => config.merge(toml_config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring malformed config file");
            }
        }
        config
    }

    fn merge(&mut self, toml_config: TomlConfig) {
        if let Some(storage) = toml_config.storage {
            if let Some(backend) = storage.backend {
                self.storage_backend = backend;
            }
            if storage.path.is_some() {
                self.database_path = storage.path;
            }
        }

        if let Some(workspaces) = toml_config.workspaces {
            if let Some(length) = workspaces.name_length.filter(|len| *len > 0) {
                self.name_length = length;
            }
            if let Some(remember) = workspaces.remember_workspaces {
                self.remember_workspaces = remember;
            }
        }

        if let Some(level) = toml_config.logging.and_then(|logging| logging.level) {
            self.log_level = level;
        }
    }

    /// Create the default config file from the bundled example
    fn create_default_config(path: &Path) {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                if let Err(e) = fs::create_dir_all(parent) {
                    eprintln!("Failed to create config directory: {}", e);
                    return;
                }
            }
        }

        if let Err(e) = fs::write(path, EXAMPLE_CONFIG) {
            eprintln!("Failed to write default config: {}", e);
        }
    }

    pub fn with_storage_backend(mut self, backend: StorageBackend) -> Self {
        self.storage_backend = backend;
        self
    }

    /// Knobs handed to the sync controller
    pub fn sync_settings(&self) -> SyncSettings {
        SyncSettings {
            name_length: self.name_length,
            remember_workspaces: self.remember_workspaces,
        }
    }
}
