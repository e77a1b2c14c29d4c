//! Host lifecycle events consumed and workspace events emitted

use serde::{Deserialize, Serialize};

use crate::data::{TabId, WindowId, WorkspaceId};

/// Lifecycle event reported by the host browser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum HostEvent {
    /// The extension was installed or updated.
    Installed,
    /// An update is about to be applied.
    UpdateAvailable,
    WindowCreated {
        window_id: WindowId,
    },
    WindowRemoved {
        window_id: WindowId,
    },
    WindowFocusChanged {
        window_id: WindowId,
    },
    TabCreated {
        tab_id: TabId,
        window_id: WindowId,
    },
    TabRemoved {
        tab_id: TabId,
        window_id: WindowId,
    },
}

impl HostEvent {
    /// Window the event concerns, if it names one
    pub fn window_id(&self) -> Option<WindowId> {
        match self {
            HostEvent::Installed | HostEvent::UpdateAvailable => None,
            HostEvent::WindowCreated { window_id }
            | HostEvent::WindowRemoved { window_id }
            | HostEvent::WindowFocusChanged { window_id }
            | HostEvent::TabCreated { window_id, .. }
            | HostEvent::TabRemoved { window_id, .. } => Some(*window_id),
        }
    }
}

/// Notification broadcast after the engine changed persisted state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum WorkspaceEvent {
    Created {
        workspace_id: WorkspaceId,
        window_id: WindowId,
    },
    Activated {
        workspace_id: WorkspaceId,
        window_id: WindowId,
    },
    Destroyed {
        workspace_id: WorkspaceId,
        window_id: WindowId,
    },
    /// Queued tabs were appended to the window's active workspace.
    TabsAdopted {
        workspace_id: WorkspaceId,
        window_id: WindowId,
        tab_ids: Vec<TabId>,
    },
    WindowTornDown {
        window_id: WindowId,
    },
}
