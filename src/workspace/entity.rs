//! Workspace entity
//!
//! A [`Workspace`] is one hydrated record plus its lifecycle state. Every
//! mutating operation persists the full record before returning.

use serde::Serialize;

use crate::data::{TabId, WindowId, WorkspaceId, WorkspaceRecord};
use crate::host::HostApi;

use super::directory::WorkspaceDirectory;
use super::error::WorkspaceError;

/// Lifecycle state of a workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WorkspaceState {
    /// Its tabs are the visible ones in its window.
    Active,
    /// Its tabs are hidden (or about to be).
    Inactive,
    /// Record and directory entry are gone; the entity must not be used again.
    Destroyed,
}

/// Initial state of a workspace about to be created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWorkspace {
    pub name: String,
    pub active: bool,
    pub tabs: Vec<TabId>,
    pub window_id: WindowId,
}

#[derive(Debug, Clone)]
pub struct Workspace {
    record: WorkspaceRecord,
    state: WorkspaceState,
}

impl Workspace {
    /// Hydrate an entity from its persisted record
    pub fn from_record(record: WorkspaceRecord) -> Self {
        let state = if record.active {
            WorkspaceState::Active
        } else {
            WorkspaceState::Inactive
        };
        Self { record, state }
    }

    pub fn id(&self) -> WorkspaceId {
        self.record.id
    }

    pub fn name(&self) -> &str {
        &self.record.name
    }

    pub fn window_id(&self) -> WindowId {
        self.record.window_id
    }

    pub fn tabs(&self) -> &[TabId] {
        &self.record.tabs
    }

    pub fn state(&self) -> WorkspaceState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == WorkspaceState::Active
    }

    pub fn record(&self) -> &WorkspaceRecord {
        &self.record
    }

    pub fn into_record(self) -> WorkspaceRecord {
        self.record
    }

    pub fn contains_tab(&self, tab_id: TabId) -> bool {
        self.record.tabs.contains(&tab_id)
    }

    /// Append a tab unless it is already a member; returns whether it was added
    pub fn push_tab(&mut self, tab_id: TabId) -> bool {
        if self.contains_tab(tab_id) {
            return false;
        }
        self.record.tabs.push(tab_id);
        true
    }

    /// Put a tab first, moving it there if it is already a member
    pub fn push_front_tab(&mut self, tab_id: TabId) {
        self.record.tabs.retain(|t| *t != tab_id);
        self.record.tabs.insert(0, tab_id);
    }

    /// Remove a tab; returns whether it was a member
    pub fn remove_tab(&mut self, tab_id: TabId) -> bool {
        let before = self.record.tabs.len();
        self.record.tabs.retain(|t| *t != tab_id);
        self.record.tabs.len() != before
    }

    fn ensure_live(&self) -> Result<(), WorkspaceError> {
        if self.state == WorkspaceState::Destroyed {
            return Err(WorkspaceError::Destroyed(self.record.id));
        }
        Ok(())
    }

    fn transition(&mut self, next: WorkspaceState) -> Result<(), WorkspaceError> {
        self.ensure_live()?;
        if self.state != next {
            tracing::debug!(
                workspace_id = %self.record.id,
                from = ?self.state,
                to = ?next,
                "Workspace state transition"
            );
        }
        self.state = next;
        self.record.active = next == WorkspaceState::Active;
        Ok(())
    }

    /// Create a workspace, persist it and register it in its window's directory.
    ///
    /// When `id` is `None` a fresh time-derived id is minted.
    pub async fn create(
        directory: &WorkspaceDirectory,
        id: Option<WorkspaceId>,
        initial: NewWorkspace,
    ) -> Result<Self, WorkspaceError> {
        let id = match id {
            Some(id) => {
                directory.observe_id(id);
                id
            }
            None => directory.mint_id(),
        };

        let mut tabs: Vec<TabId> = Vec::with_capacity(initial.tabs.len());
        for tab in initial.tabs {
            if !tabs.contains(&tab) {
                tabs.push(tab);
            }
        }

        let workspace = Self::from_record(WorkspaceRecord {
            id,
            name: initial.name,
            active: initial.active,
            tabs,
            window_id: initial.window_id,
        });

        workspace.save(directory).await?;
        directory.add_to_window(id, workspace.window_id()).await?;

        tracing::info!(
            workspace_id = %id,
            window_id = %workspace.window_id(),
            tabs = workspace.tabs().len(),
            active = workspace.is_active(),
            "Workspace created"
        );
        Ok(workspace)
    }

    /// Rename a persisted workspace. Nothing is written when the id is unknown.
    pub async fn rename(
        directory: &WorkspaceDirectory,
        id: WorkspaceId,
        name: impl Into<String>,
    ) -> Result<Self, WorkspaceError> {
        let mut workspace = directory.require(id).await?;
        workspace.record.name = name.into();
        workspace.save(directory).await?;
        Ok(workspace)
    }

    /// Reveal this workspace's tabs, focus one of them and mark it active.
    ///
    /// `focus` is honored when it is one of this workspace's tabs; otherwise
    /// the first tab is focused. A workspace without tabs only flips its flag.
    pub async fn activate(
        &mut self,
        directory: &WorkspaceDirectory,
        host: &dyn HostApi,
        focus: Option<TabId>,
    ) -> Result<(), WorkspaceError> {
        self.ensure_live()?;

        if let Some(first) = self.record.tabs.first().copied() {
            host.show_tabs(&self.record.tabs).await?;
            let target = focus.filter(|tab| self.contains_tab(*tab)).unwrap_or(first);
            host.focus_tab(target).await?;
        }

        self.transition(WorkspaceState::Active)?;
        self.save(directory).await
    }

    /// Mark inactive without touching the host
    pub async fn deactivate(&mut self, directory: &WorkspaceDirectory) -> Result<(), WorkspaceError> {
        self.transition(WorkspaceState::Inactive)?;
        self.save(directory).await
    }

    /// Mark inactive and hide all of this workspace's tabs
    pub async fn hide_tabs(
        &mut self,
        directory: &WorkspaceDirectory,
        host: &dyn HostApi,
    ) -> Result<(), WorkspaceError> {
        self.transition(WorkspaceState::Inactive)?;
        if !self.record.tabs.is_empty() {
            host.hide_tabs(&self.record.tabs).await?;
        }
        self.save(directory).await
    }

    /// Close this workspace's tabs and remove every trace of it from storage.
    ///
    /// Callers pass a freshly loaded entity so that tabs added since an
    /// earlier load are closed too.
    pub async fn destroy(
        &mut self,
        directory: &WorkspaceDirectory,
        host: &dyn HostApi,
    ) -> Result<(), WorkspaceError> {
        self.ensure_live()?;

        if !self.record.tabs.is_empty() {
            host.close_tabs(&self.record.tabs).await?;
        }
        directory.delete_record(self.record.id).await?;
        directory
            .remove_from_window(self.record.id, self.record.window_id)
            .await?;

        tracing::info!(
            workspace_id = %self.record.id,
            window_id = %self.record.window_id,
            closed_tabs = self.record.tabs.len(),
            "Workspace destroyed"
        );
        self.state = WorkspaceState::Destroyed;
        Ok(())
    }

    /// Persist the full record
    pub async fn save(&self, directory: &WorkspaceDirectory) -> Result<(), WorkspaceError> {
        self.ensure_live()?;
        directory.save_record(&self.record).await?;
        Ok(())
    }
}
