//! Workspace record data access object

use std::sync::Arc;

use super::error::StorageError;
use super::keys::workspace_key;
use super::kv::{get_typed, set_typed, KeyValueStore};
use super::models::{WorkspaceId, WorkspaceRecord};

/// Data access object for per-workspace state records
#[derive(Clone)]
pub struct WorkspaceStore {
    kv: Arc<dyn KeyValueStore>,
}

impl WorkspaceStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Get a workspace record by ID
    pub async fn get_by_id(&self, id: WorkspaceId) -> Result<Option<WorkspaceRecord>, StorageError> {
        get_typed(self.kv.as_ref(), &workspace_key(id)).await
    }

    /// Write the full record, replacing whatever was stored
    pub async fn save(&self, record: &WorkspaceRecord) -> Result<(), StorageError> {
        set_typed(self.kv.as_ref(), &workspace_key(record.id), record).await
    }

    /// Delete a workspace record
    pub async fn delete(&self, id: WorkspaceId) -> Result<(), StorageError> {
        self.kv.remove(&workspace_key(id)).await
    }
}
