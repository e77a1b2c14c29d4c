//! Per-window workspace invariants

use std::collections::HashSet;

use tabspaces::{SyncController, WindowId};

/// Why a window's workspaces are not in a settled state
#[derive(Debug, PartialEq, Eq)]
pub enum Violation {
    ActiveCount(usize),
    DuplicateTab(i64),
}

/// Exactly one active workspace when any exist, and no tab in two workspaces
pub async fn check_window(controller: &SyncController, window_id: i64) -> Result<(), Violation> {
    let workspaces = controller
        .get_workspaces(WindowId(window_id))
        .await
        .expect("list workspaces");

    let active = workspaces.iter().filter(|ws| ws.is_active()).count();
    if !workspaces.is_empty() && active != 1 {
        return Err(Violation::ActiveCount(active));
    }

    let mut seen = HashSet::new();
    for tab in workspaces.iter().flat_map(|ws| ws.tabs()) {
        if !seen.insert(*tab) {
            return Err(Violation::DuplicateTab(tab.0));
        }
    }
    Ok(())
}
