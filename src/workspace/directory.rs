//! Workspace directory
//!
//! Per window: the ordered list of workspace ids (creation order) and the
//! onboarding flag. The directory is also where ids turn into hydrated
//! [`Workspace`] entities.

use std::sync::Arc;

use futures::future::join_all;

use crate::data::keys::{first_creation_key, window_key};
use crate::data::{
    get_typed, set_typed, KeyValueStore, StorageError, WindowId, WorkspaceId, WorkspaceRecord,
    WorkspaceStore,
};
use crate::util::IdGenerator;

use super::entity::Workspace;
use super::error::WorkspaceError;

/// What a window looks like right now
#[derive(Debug, Clone)]
pub enum WindowState {
    /// The window has no workspaces at all.
    NoWorkspaces,
    /// Exactly the settled case: one workspace is active.
    HasActiveWorkspace(Workspace),
    /// Workspaces exist but none is active. Only observable while another
    /// operation is between its deactivate and activate steps.
    Unsettled { workspaces: usize },
}

#[derive(Clone)]
pub struct WorkspaceDirectory {
    kv: Arc<dyn KeyValueStore>,
    workspaces: WorkspaceStore,
    ids: Arc<IdGenerator>,
}

impl WorkspaceDirectory {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            workspaces: WorkspaceStore::new(kv.clone()),
            kv,
            ids: Arc::new(IdGenerator::new()),
        }
    }

    /// Mint a fresh workspace id
    pub fn mint_id(&self) -> WorkspaceId {
        self.ids.next()
    }

    pub(crate) fn observe_id(&self, id: WorkspaceId) {
        self.ids.observe(id);
    }

    /// The window's id list; `None` when the window has no directory entry
    pub async fn ids_for_window(
        &self,
        window_id: WindowId,
    ) -> Result<Option<Vec<WorkspaceId>>, StorageError> {
        get_typed(self.kv.as_ref(), &window_key(window_id)).await
    }

    async fn window_ids(&self, window_id: WindowId) -> Result<Vec<WorkspaceId>, StorageError> {
        Ok(self.ids_for_window(window_id).await?.unwrap_or_default())
    }

    /// All workspaces of a window in creation order.
    ///
    /// Ids whose record is missing are skipped and logged.
    pub async fn list_for_window(&self, window_id: WindowId) -> Result<Vec<Workspace>, StorageError> {
        let ids = self.window_ids(window_id).await?;
        let records = join_all(ids.iter().map(|id| self.workspaces.get_by_id(*id))).await;

        let mut workspaces = Vec::with_capacity(ids.len());
        for (id, record) in ids.into_iter().zip(records) {
            match record? {
                Some(record) => workspaces.push(Workspace::from_record(record)),
                None => tracing::warn!(
                    workspace_id = %id,
                    window_id = %window_id,
                    "Directory lists a workspace whose record was not found"
                ),
            }
        }
        Ok(workspaces)
    }

    /// Number of workspaces listed for a window, without hydrating them
    pub async fn count_for_window(&self, window_id: WindowId) -> Result<usize, StorageError> {
        Ok(self.window_ids(window_id).await?.len())
    }

    /// Append an id to the window's list; returns `false` when it was already there
    pub async fn add_to_window(
        &self,
        id: WorkspaceId,
        window_id: WindowId,
    ) -> Result<bool, StorageError> {
        let mut ids = self.window_ids(window_id).await?;
        if ids.contains(&id) {
            return Ok(false);
        }
        ids.push(id);
        set_typed(self.kv.as_ref(), &window_key(window_id), &ids).await?;
        Ok(true)
    }

    /// Drop an id from the window's list; returns `false` when it was not there
    pub async fn remove_from_window(
        &self,
        id: WorkspaceId,
        window_id: WindowId,
    ) -> Result<bool, StorageError> {
        let mut ids = self.window_ids(window_id).await?;
        let Some(position) = ids.iter().position(|listed| *listed == id) else {
            tracing::debug!(
                workspace_id = %id,
                window_id = %window_id,
                "Workspace already absent from window directory"
            );
            return Ok(false);
        };
        ids.remove(position);
        set_typed(self.kv.as_ref(), &window_key(window_id), &ids).await?;
        Ok(true)
    }

    /// Successor to activate after the active workspace goes away: the oldest one left
    pub async fn next_id(&self, window_id: WindowId) -> Result<Option<WorkspaceId>, StorageError> {
        Ok(self.window_ids(window_id).await?.first().copied())
    }

    /// Remove everything stored for a window.
    ///
    /// The directory entry goes first so that an interrupted teardown leaves
    /// orphaned workspace records rather than a list pointing at missing ones.
    /// Record removal is best-effort. Returns how many records were removed.
    pub async fn destroy_window(&self, window_id: WindowId) -> Result<usize, StorageError> {
        let ids = self.window_ids(window_id).await?;

        self.kv.remove(&window_key(window_id)).await?;

        let results = join_all(ids.iter().map(|id| self.workspaces.delete(*id))).await;
        let mut removed = 0;
        for (id, result) in ids.iter().zip(results) {
            match result {
                Ok(()) => removed += 1,
                Err(e) => tracing::warn!(
                    workspace_id = %id,
                    window_id = %window_id,
                    error = %e,
                    "Failed to remove workspace record during window teardown"
                ),
            }
        }

        self.kv.remove(&first_creation_key(window_id)).await?;

        tracing::info!(
            window_id = %window_id,
            workspaces = ids.len(),
            removed,
            "Window state torn down"
        );
        Ok(removed)
    }

    /// Whether the user has never created a workspace in this window by hand
    pub async fn is_first_time_create(&self, window_id: WindowId) -> Result<bool, StorageError> {
        let flag: Option<bool> = get_typed(self.kv.as_ref(), &first_creation_key(window_id)).await?;
        Ok(flag != Some(false))
    }

    pub async fn set_first_time_create_to_false(
        &self,
        window_id: WindowId,
    ) -> Result<(), StorageError> {
        set_typed(self.kv.as_ref(), &first_creation_key(window_id), &false).await
    }

    /// Hydrate one workspace; `None` when no record exists
    pub async fn load(&self, id: WorkspaceId) -> Result<Option<Workspace>, StorageError> {
        Ok(self
            .workspaces
            .get_by_id(id)
            .await?
            .map(Workspace::from_record))
    }

    /// Hydrate one workspace, treating a missing record as an error
    pub async fn require(&self, id: WorkspaceId) -> Result<Workspace, WorkspaceError> {
        self.load(id).await?.ok_or_else(|| {
            tracing::warn!(workspace_id = %id, "Workspace not found");
            WorkspaceError::NotFound(id)
        })
    }

    /// The window's active workspace, if any
    pub async fn active_for_window(
        &self,
        window_id: WindowId,
    ) -> Result<Option<Workspace>, StorageError> {
        let mut active = self
            .list_for_window(window_id)
            .await?
            .into_iter()
            .filter(Workspace::is_active);

        let first = active.next();
        let extra = active.count();
        if extra > 0 {
            tracing::warn!(
                window_id = %window_id,
                extra,
                "More than one active workspace in window"
            );
        }
        Ok(first)
    }

    pub async fn window_state(&self, window_id: WindowId) -> Result<WindowState, StorageError> {
        let workspaces = self.list_for_window(window_id).await?;
        if workspaces.is_empty() {
            return Ok(WindowState::NoWorkspaces);
        }
        let count = workspaces.len();
        Ok(match workspaces.into_iter().find(Workspace::is_active) {
            Some(active) => WindowState::HasActiveWorkspace(active),
            None => WindowState::Unsettled { workspaces: count },
        })
    }

    pub(crate) async fn save_record(&self, record: &WorkspaceRecord) -> Result<(), StorageError> {
        self.workspaces.save(record).await
    }

    pub(crate) async fn delete_record(&self, id: WorkspaceId) -> Result<(), StorageError> {
        self.workspaces.delete(id).await
    }
}
