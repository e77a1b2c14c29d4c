//! Storage key layout
//!
//! Every record lives under its own key; nothing is ever written across two
//! keys atomically.

use super::models::{WindowId, WorkspaceId};

const WORKSPACE_PREFIX: &str = "ld-wsp";
const OPTION_PREFIX: &str = "ld-option";

/// Key of a workspace's full-state record
pub fn workspace_key(id: WorkspaceId) -> String {
    format!("{WORKSPACE_PREFIX}-{id}")
}

/// Key of a window's ordered workspace id list
pub fn window_key(window_id: WindowId) -> String {
    format!("{WORKSPACE_PREFIX}-window-{window_id}")
}

/// Key of a window's "first workspace creation" onboarding flag
pub fn first_creation_key(window_id: WindowId) -> String {
    format!("{}-first-wsp-creation", window_key(window_id))
}

/// Key of a user preference
pub fn option_key(name: &str) -> String {
    format!("{OPTION_PREFIX}-{name}")
}
