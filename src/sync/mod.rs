//! Event handling and workspace commands
//!
//! [`SyncController`] is the single entry point for host lifecycle events and
//! for commands coming from the UI.

mod controller;
mod events;
mod menu;
mod pending;

pub use controller::{CreateWorkspaceParams, SyncController, SyncSettings};
pub use events::{HostEvent, WorkspaceEvent};
pub use menu::{TabMenu, TabMenuEntry};
pub use pending::PendingTabs;
