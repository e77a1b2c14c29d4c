//! User preference flags

use serde_json::Value;
use std::sync::Arc;

use super::error::StorageError;
use super::keys::option_key;
use super::kv::KeyValueStore;

/// Name of the preference that keeps a closed window's workspaces
pub const REMEMBER_WORKSPACES: &str = "rememberWorkspaces";

/// Data access object for user preferences
#[derive(Clone)]
pub struct OptionsStore {
    kv: Arc<dyn KeyValueStore>,
}

impl OptionsStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Read a preference value, `None` when it was never saved
    pub async fn read(&self, name: &str) -> Result<Option<Value>, StorageError> {
        self.kv.get(&option_key(name)).await
    }

    /// Save a preference value
    pub async fn save(&self, name: &str, value: Value) -> Result<(), StorageError> {
        self.kv.set(&option_key(name), value).await
    }

    /// Read a boolean preference, falling back to `default` when unset or not a bool
    pub async fn read_flag(&self, name: &str, default: bool) -> Result<bool, StorageError> {
        let value = self.read(name).await?;
        Ok(value.and_then(|v| v.as_bool()).unwrap_or(default))
    }

    /// Whether workspaces of a closed window should be kept
    pub async fn remember_workspaces(&self, default: bool) -> Result<bool, StorageError> {
        self.read_flag(REMEMBER_WORKSPACES, default).await
    }
}
