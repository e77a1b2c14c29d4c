//! "Move Tab to Another Workspace" context menu model

use serde::Serialize;

use crate::data::WorkspaceId;
use crate::workspace::Workspace;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabMenu {
    /// Moving only makes sense with somewhere to move to.
    pub enabled: bool,
    /// Source workspace for a move started from this menu
    pub current_workspace_id: Option<WorkspaceId>,
    pub entries: Vec<TabMenuEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabMenuEntry {
    pub workspace_id: WorkspaceId,
    pub title: String,
    pub enabled: bool,
}

impl TabMenu {
    /// Build the menu for one window's workspaces, entries sorted by name
    pub fn build(mut workspaces: Vec<Workspace>) -> Self {
        workspaces.sort_by(|a, b| {
            a.name()
                .to_lowercase()
                .cmp(&b.name().to_lowercase())
                .then_with(|| a.name().cmp(b.name()))
        });

        let current_workspace_id = workspaces.iter().find(|ws| ws.is_active()).map(Workspace::id);
        let entries = workspaces
            .iter()
            .map(|ws| TabMenuEntry {
                workspace_id: ws.id(),
                title: format!("{} ({} tabs)", ws.name(), ws.tabs().len()),
                enabled: !ws.is_active(),
            })
            .collect();

        Self {
            enabled: workspaces.len() > 1,
            current_workspace_id,
            entries,
        }
    }
}
