//! Synchronization controller
//!
//! Host events and user commands both land here. The controller keeps no
//! workspace state of its own: every operation re-reads the persisted records
//! it is about to change. The one piece of in-memory state is the queue of
//! tabs created before their window had an active workspace.

use std::sync::Arc;

use futures::future::join_all;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::broadcast;

use crate::data::{KeyValueStore, OptionsStore, TabId, WindowId, WorkspaceId};
use crate::host::HostApi;
use crate::util::{generate_workspace_name, DEFAULT_NAME_LENGTH, MAX_WORKSPACE_ID};
use crate::workspace::{NewWorkspace, WindowState, Workspace, WorkspaceDirectory, WorkspaceError};

use super::events::{HostEvent, WorkspaceEvent};
use super::menu::TabMenu;
use super::pending::PendingTabs;

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Behavior knobs taken from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncSettings {
    /// Length of generated workspace names
    pub name_length: usize,
    /// Whether to keep a closed window's workspaces when the user never chose
    pub remember_workspaces: bool,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            name_length: DEFAULT_NAME_LENGTH,
            remember_workspaces: false,
        }
    }
}

/// Parameters of the create-workspace command
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkspaceParams {
    /// Caller-chosen id; a time-derived one is minted when absent
    #[serde(default)]
    pub id: Option<WorkspaceId>,
    /// A random name is generated when absent or blank
    #[serde(default)]
    pub name: Option<String>,
    pub window_id: WindowId,
    #[serde(default)]
    pub tabs: Vec<TabId>,
}

pub struct SyncController {
    directory: WorkspaceDirectory,
    options: OptionsStore,
    host: Arc<dyn HostApi>,
    pending: PendingTabs,
    events: broadcast::Sender<WorkspaceEvent>,
    settings: SyncSettings,
}

impl SyncController {
    pub fn new(kv: Arc<dyn KeyValueStore>, host: Arc<dyn HostApi>, settings: SyncSettings) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            directory: WorkspaceDirectory::new(kv.clone()),
            options: OptionsStore::new(kv),
            host,
            pending: PendingTabs::new(),
            events,
            settings,
        }
    }

    pub fn directory(&self) -> &WorkspaceDirectory {
        &self.directory
    }

    /// Receive a notification for every state change made from now on
    pub fn subscribe(&self) -> broadcast::Receiver<WorkspaceEvent> {
        self.events.subscribe()
    }

    /// Tabs of a window still waiting for an active workspace
    pub fn pending_tabs(&self, window_id: WindowId) -> Vec<TabId> {
        self.pending.queued(window_id)
    }

    fn emit(&self, event: WorkspaceEvent) {
        // No subscribers is the common case outside of tests and the bridge.
        let _ = self.events.send(event);
    }

    // ------------------------------------------------------------------
    // Host events
    // ------------------------------------------------------------------

    /// Apply one host lifecycle event. Redelivering an event is harmless.
    pub async fn handle_event(&self, event: HostEvent) -> Result<(), WorkspaceError> {
        tracing::debug!(?event, "Handling host event");
        match event {
            HostEvent::Installed | HostEvent::UpdateAvailable => self.on_installed().await,
            HostEvent::WindowCreated { window_id } => self.on_window_created(window_id).await,
            HostEvent::WindowRemoved { window_id } => self.on_window_removed(window_id).await,
            HostEvent::WindowFocusChanged { window_id } => {
                tracing::debug!(window_id = %window_id, "Window focus changed");
                Ok(())
            }
            HostEvent::TabCreated { tab_id, window_id } => {
                self.on_tab_created(tab_id, window_id).await
            }
            HostEvent::TabRemoved { tab_id, window_id } => {
                self.on_tab_removed(tab_id, window_id).await
            }
        }
    }

    async fn on_installed(&self) -> Result<(), WorkspaceError> {
        let window_id = self.host.current_window().await?;
        if self.directory.active_for_window(window_id).await?.is_some() {
            tracing::debug!(window_id = %window_id, "Current window already has an active workspace");
            return Ok(());
        }

        let tabs = self.host.query_tabs(window_id).await?;
        self.create_workspace(CreateWorkspaceParams {
            window_id,
            tabs,
            ..Default::default()
        })
        .await?;
        Ok(())
    }

    async fn on_window_created(&self, window_id: WindowId) -> Result<(), WorkspaceError> {
        self.create_workspace(CreateWorkspaceParams {
            window_id,
            ..Default::default()
        })
        .await?;
        Ok(())
    }

    async fn on_window_removed(&self, window_id: WindowId) -> Result<(), WorkspaceError> {
        let dropped = self.pending.discard_window(window_id);
        if !dropped.is_empty() {
            tracing::debug!(window_id = %window_id, tabs = ?dropped, "Dropped pending tabs of closed window");
        }

        let remember = self
            .options
            .remember_workspaces(self.settings.remember_workspaces)
            .await?;
        if remember {
            tracing::info!(window_id = %window_id, "Keeping workspaces of closed window");
            return Ok(());
        }

        self.directory.destroy_window(window_id).await?;
        self.emit(WorkspaceEvent::WindowTornDown { window_id });
        Ok(())
    }

    async fn on_tab_created(&self, tab_id: TabId, window_id: WindowId) -> Result<(), WorkspaceError> {
        let workspaces = self.directory.list_for_window(window_id).await?;
        if workspaces.iter().any(|ws| ws.contains_tab(tab_id)) {
            tracing::debug!(tab_id = %tab_id, window_id = %window_id, "Tab already tracked");
            return Ok(());
        }

        match workspaces.into_iter().find(Workspace::is_active) {
            Some(mut active) => {
                active.push_tab(tab_id);
                active.save(&self.directory).await?;
                tracing::debug!(
                    tab_id = %tab_id,
                    workspace_id = %active.id(),
                    "Tab added to active workspace"
                );
            }
            None => {
                self.pending.push(window_id, tab_id);
                tracing::debug!(
                    tab_id = %tab_id,
                    window_id = %window_id,
                    "No active workspace yet, tab queued"
                );
                // A workspace may have become active between the lookup and the push.
                self.flush_pending(window_id).await?;
            }
        }
        Ok(())
    }

    async fn on_tab_removed(&self, tab_id: TabId, window_id: WindowId) -> Result<(), WorkspaceError> {
        if self.pending.discard_tab(window_id, tab_id) {
            tracing::debug!(tab_id = %tab_id, "Removed tab was still queued");
        }

        let workspaces = self.directory.list_for_window(window_id).await?;
        let Some(mut owner) = workspaces.into_iter().find(|ws| ws.contains_tab(tab_id)) else {
            tracing::debug!(
                tab_id = %tab_id,
                window_id = %window_id,
                "Removed tab not tracked by any workspace"
            );
            return Ok(());
        };

        owner.remove_tab(tab_id);
        owner.save(&self.directory).await?;
        if !owner.tabs().is_empty() {
            return Ok(());
        }

        let was_active = owner.is_active();
        let Some(mut emptied) = self.directory.load(owner.id()).await? else {
            return Ok(());
        };
        if !emptied.tabs().is_empty() {
            tracing::debug!(workspace_id = %emptied.id(), "Workspace gained tabs, keeping it");
            return Ok(());
        }

        emptied.destroy(&self.directory, self.host.as_ref()).await?;
        self.emit(WorkspaceEvent::Destroyed {
            workspace_id: emptied.id(),
            window_id,
        });

        if was_active {
            match self.directory.next_id(window_id).await? {
                Some(next) => {
                    self.activate_workspace(next, window_id, None).await?;
                }
                None => {
                    tracing::info!(window_id = %window_id, "Last workspace of window removed");
                }
            }
        }
        Ok(())
    }

    /// Append queued tabs to the window's active workspace, if it has one.
    /// Returns how many tabs were adopted.
    async fn flush_pending(&self, window_id: WindowId) -> Result<usize, WorkspaceError> {
        if self.pending.is_empty(window_id) {
            return Ok(0);
        }
        let Some(mut active) = self.directory.active_for_window(window_id).await? else {
            return Ok(0);
        };

        let queued = self.pending.take(window_id);
        let adopted: Vec<TabId> = queued
            .into_iter()
            .filter(|tab| active.push_tab(*tab))
            .collect();
        if adopted.is_empty() {
            return Ok(0);
        }

        if let Err(e) = active.save(&self.directory).await {
            self.pending.requeue(window_id, adopted);
            return Err(e);
        }

        tracing::debug!(
            workspace_id = %active.id(),
            tabs = ?adopted,
            "Queued tabs adopted"
        );
        let count = adopted.len();
        self.emit(WorkspaceEvent::TabsAdopted {
            workspace_id: active.id(),
            window_id,
            tab_ids: adopted,
        });
        Ok(count)
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// All workspaces of a window in creation order
    pub async fn get_workspaces(&self, window_id: WindowId) -> Result<Vec<Workspace>, WorkspaceError> {
        Ok(self.directory.list_for_window(window_id).await?)
    }

    pub async fn active_workspace(
        &self,
        window_id: WindowId,
    ) -> Result<Option<Workspace>, WorkspaceError> {
        Ok(self.directory.active_for_window(window_id).await?)
    }

    pub async fn window_state(&self, window_id: WindowId) -> Result<WindowState, WorkspaceError> {
        Ok(self.directory.window_state(window_id).await?)
    }

    /// Create a workspace as the window's active one
    pub async fn create_workspace(
        &self,
        params: CreateWorkspaceParams,
    ) -> Result<Workspace, WorkspaceError> {
        let window_id = params.window_id;
        if let Some(id) = params.id {
            if id.0 > MAX_WORKSPACE_ID {
                return Err(WorkspaceError::InvalidInput(format!(
                    "Workspace id {} is above {}",
                    id, MAX_WORKSPACE_ID
                )));
            }
            if self.directory.load(id).await?.is_some() {
                return Err(WorkspaceError::InvalidInput(format!(
                    "Workspace {} already exists",
                    id
                )));
            }
        }

        let name = params
            .name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| self.generate_workspace_name());

        if let Some(mut current) = self.directory.active_for_window(window_id).await? {
            current.deactivate(&self.directory).await?;
        }

        let created = Workspace::create(
            &self.directory,
            params.id,
            NewWorkspace {
                name,
                active: true,
                tabs: params.tabs,
                window_id,
            },
        )
        .await?;

        self.emit(WorkspaceEvent::Created {
            workspace_id: created.id(),
            window_id,
        });

        if self.flush_pending(window_id).await? > 0 {
            return self.directory.require(created.id()).await;
        }
        Ok(created)
    }

    pub async fn rename_workspace(
        &self,
        id: WorkspaceId,
        name: impl Into<String>,
    ) -> Result<Workspace, WorkspaceError> {
        Workspace::rename(&self.directory, id, name).await
    }

    pub async fn num_workspaces(&self, window_id: WindowId) -> Result<usize, WorkspaceError> {
        Ok(self.directory.count_for_window(window_id).await?)
    }

    pub async fn is_first_time_create_wsp(&self, window_id: WindowId) -> Result<bool, WorkspaceError> {
        Ok(self.directory.is_first_time_create(window_id).await?)
    }

    pub async fn set_first_time_create_wsp_to_false(
        &self,
        window_id: WindowId,
    ) -> Result<(), WorkspaceError> {
        Ok(self.directory.set_first_time_create_to_false(window_id).await?)
    }

    /// Hide the tabs of every inactive workspace in the window
    pub async fn hide_inactive_wsp_tabs(&self, window_id: WindowId) -> Result<(), WorkspaceError> {
        let inactive: Vec<Workspace> = self
            .directory
            .list_for_window(window_id)
            .await?
            .into_iter()
            .filter(|ws| !ws.is_active())
            .collect();

        let results = join_all(inactive.into_iter().map(|mut ws| async move {
            ws.hide_tabs(&self.directory, self.host.as_ref()).await
        }))
        .await;
        results.into_iter().collect()
    }

    /// Destroy a workspace on explicit request.
    ///
    /// No replacement is activated; the caller picks one when it destroys the
    /// active workspace.
    pub async fn destroy_workspace(&self, id: WorkspaceId) -> Result<(), WorkspaceError> {
        let mut workspace = self.directory.require(id).await?;
        workspace.destroy(&self.directory, self.host.as_ref()).await?;
        self.emit(WorkspaceEvent::Destroyed {
            workspace_id: id,
            window_id: workspace.window_id(),
        });
        Ok(())
    }

    /// Make `id` the window's active workspace, optionally focusing one of its tabs
    pub async fn activate_workspace(
        &self,
        id: WorkspaceId,
        window_id: WindowId,
        focus: Option<TabId>,
    ) -> Result<Workspace, WorkspaceError> {
        let mut target = self.directory.require(id).await?;
        if target.window_id() != window_id {
            return Err(WorkspaceError::InvalidInput(format!(
                "Workspace {} belongs to window {}, not {}",
                id,
                target.window_id(),
                window_id
            )));
        }

        if let Some(mut current) = self.directory.active_for_window(window_id).await? {
            if current.id() != id {
                current.deactivate(&self.directory).await?;
            }
        }

        target
            .activate(&self.directory, self.host.as_ref(), focus)
            .await?;
        self.emit(WorkspaceEvent::Activated {
            workspace_id: id,
            window_id,
        });

        self.hide_inactive_wsp_tabs(window_id).await?;
        if self.flush_pending(window_id).await? > 0 {
            return self.directory.require(id).await;
        }
        Ok(target)
    }

    /// Move a tab to another workspace of the same window and switch to it
    pub async fn move_tab(
        &self,
        tab_id: TabId,
        from: WorkspaceId,
        to: WorkspaceId,
    ) -> Result<(), WorkspaceError> {
        if from == to {
            return Err(WorkspaceError::InvalidInput(
                "Source and destination workspace are the same".to_string(),
            ));
        }

        let mut source = self.directory.require(from).await?;
        let mut destination = self.directory.require(to).await?;
        let window_id = destination.window_id();
        if source.window_id() != window_id {
            return Err(WorkspaceError::InvalidInput(format!(
                "Workspaces {} and {} belong to different windows",
                from, to
            )));
        }

        if !source.remove_tab(tab_id) {
            return Err(WorkspaceError::InvalidInput(format!(
                "Tab {} is not in workspace {}",
                tab_id, from
            )));
        }

        destination.push_front_tab(tab_id);
        destination.save(&self.directory).await?;
        source.save(&self.directory).await?;

        if source.tabs().is_empty() {
            if let Some(mut emptied) = self.directory.load(from).await? {
                if emptied.tabs().is_empty() {
                    emptied.destroy(&self.directory, self.host.as_ref()).await?;
                    self.emit(WorkspaceEvent::Destroyed {
                        workspace_id: from,
                        window_id,
                    });
                }
            }
        }

        self.activate_workspace(to, window_id, Some(tab_id)).await?;
        Ok(())
    }

    /// Context menu for moving a tab out of the window's active workspace
    pub async fn tab_menu(&self, window_id: WindowId) -> Result<TabMenu, WorkspaceError> {
        Ok(TabMenu::build(
            self.directory.list_for_window(window_id).await?,
        ))
    }

    pub fn generate_workspace_name(&self) -> String {
        generate_workspace_name(self.settings.name_length)
    }

    pub async fn read_option(&self, name: &str) -> Result<Option<Value>, WorkspaceError> {
        Ok(self.options.read(name).await?)
    }

    pub async fn save_option(&self, name: &str, value: Value) -> Result<(), WorkspaceError> {
        Ok(self.options.save(name, value).await?)
    }
}

impl std::fmt::Debug for SyncController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncController")
            .field("settings", &self.settings)
            .field("subscribers", &self.events.receiver_count())
            .finish()
    }
}
