pub mod api;
pub mod bridge;
pub mod config;
pub mod data;
pub mod host;
pub mod sync;
pub mod util;
pub mod workspace;

pub use api::{dispatch, ErrorBody, Request, Response};
pub use bridge::Bridge;
pub use config::Config;
pub use data::{
    Database, KeyValueStore, MemoryKvStore, SqliteKvStore, TabId, WindowId, WorkspaceId,
    WorkspaceRecord,
};
pub use host::{HostApi, HostCommand, HostError, HostMirror};
pub use sync::{CreateWorkspaceParams, HostEvent, SyncController, SyncSettings, WorkspaceEvent};
pub use util::generate_workspace_name;
pub use workspace::{WindowState, Workspace, WorkspaceDirectory, WorkspaceError, WorkspaceState};
