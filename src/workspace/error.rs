//! Workspace engine error types

use thiserror::Error;

use crate::data::{StorageError, WorkspaceId};
use crate::host::HostError;

/// Error type for workspace and synchronization operations
#[derive(Error, Debug)]
pub enum WorkspaceError {
    /// No persisted record exists for this id.
    #[error("Workspace {0} not found")]
    NotFound(WorkspaceId),

    /// The entity was destroyed earlier in this operation.
    #[error("Workspace {0} has been destroyed")]
    Destroyed(WorkspaceId),

    /// The request cannot be applied as given.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Persistence adapter failure.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Host rejected a tab command.
    #[error("Host error: {0}")]
    Host(#[from] HostError),
}

impl WorkspaceError {
    /// Stable machine-readable kind, used in error responses
    pub fn kind(&self) -> &'static str {
        match self {
            WorkspaceError::NotFound(_) => "not_found",
            WorkspaceError::Destroyed(_) => "destroyed",
            WorkspaceError::InvalidInput(_) => "invalid_input",
            WorkspaceError::Storage(_) => "storage",
            WorkspaceError::Host(_) => "host",
        }
    }
}
