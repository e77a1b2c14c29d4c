//! Controller harness backed by an in-memory store and the host mirror

use std::sync::Arc;

use tabspaces::sync::TabMenu;
use tabspaces::{
    CreateWorkspaceParams, HostEvent, HostMirror, MemoryKvStore, SyncController, SyncSettings,
    TabId, WindowId, Workspace,
};

pub struct Harness {
    pub kv: MemoryKvStore,
    pub host: HostMirror,
    pub controller: Arc<SyncController>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_settings(SyncSettings::default())
    }

    pub fn with_settings(settings: SyncSettings) -> Self {
        let kv = MemoryKvStore::new();
        let host = HostMirror::new();
        let controller = Arc::new(SyncController::new(
            Arc::new(kv.clone()),
            Arc::new(host.clone()),
            settings,
        ));
        Self {
            kv,
            host,
            controller,
        }
    }

    /// Open a tab in the host and deliver the matching event
    pub async fn tab_created(&self, window_id: i64, tab_id: i64) {
        self.host.open_tab(WindowId(window_id), TabId(tab_id));
        self.controller
            .handle_event(HostEvent::TabCreated {
                tab_id: TabId(tab_id),
                window_id: WindowId(window_id),
            })
            .await
            .expect("tab created");
    }

    /// Close a tab in the host and deliver the matching event
    pub async fn tab_removed(&self, window_id: i64, tab_id: i64) {
        self.host.forget_tab(TabId(tab_id));
        self.controller
            .handle_event(HostEvent::TabRemoved {
                tab_id: TabId(tab_id),
                window_id: WindowId(window_id),
            })
            .await
            .expect("tab removed");
    }

    pub async fn window_created(&self, window_id: i64) {
        self.host.open_window(WindowId(window_id));
        self.controller
            .handle_event(HostEvent::WindowCreated {
                window_id: WindowId(window_id),
            })
            .await
            .expect("window created");
    }

    pub async fn window_removed(&self, window_id: i64) {
        self.host.close_window(WindowId(window_id));
        self.controller
            .handle_event(HostEvent::WindowRemoved {
                window_id: WindowId(window_id),
            })
            .await
            .expect("window removed");
    }

    /// Open `tabs` in the host and create an active workspace holding them
    pub async fn workspace(&self, window_id: i64, name: &str, tabs: &[i64]) -> Workspace {
        for tab in tabs {
            self.host.open_tab(WindowId(window_id), TabId(*tab));
        }
        self.controller
            .create_workspace(CreateWorkspaceParams {
                name: Some(name.to_string()),
                window_id: WindowId(window_id),
                tabs: tabs.iter().copied().map(TabId).collect(),
                ..Default::default()
            })
            .await
            .expect("create workspace")
    }

    /// Reload a workspace from storage
    pub async fn reload(&self, workspace: &Workspace) -> Option<Workspace> {
        self.controller
            .directory()
            .load(workspace.id())
            .await
            .expect("load workspace")
    }

    pub async fn workspaces(&self, window_id: i64) -> Vec<Workspace> {
        self.controller
            .get_workspaces(WindowId(window_id))
            .await
            .expect("list workspaces")
    }

    pub async fn active(&self, window_id: i64) -> Option<Workspace> {
        self.controller
            .active_workspace(WindowId(window_id))
            .await
            .expect("active workspace")
    }

    pub async fn menu(&self, window_id: i64) -> TabMenu {
        self.controller
            .tab_menu(WindowId(window_id))
            .await
            .expect("tab menu")
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

pub fn tabs(ids: &[i64]) -> Vec<TabId> {
    ids.iter().copied().map(TabId).collect()
}
