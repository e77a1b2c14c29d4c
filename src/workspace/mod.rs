//! Workspace entity and per-window directory

mod directory;
mod entity;
mod error;

pub use directory::{WindowState, WorkspaceDirectory};
pub use entity::{NewWorkspace, Workspace, WorkspaceState};
pub use error::WorkspaceError;
