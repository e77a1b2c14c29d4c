//! Data persistence layer
//!
//! A key/value adapter (SQLite-backed or in-memory) plus the typed stores
//! built on top of it.

mod database;
mod error;
pub mod keys;
mod kv;
mod migrations;
mod models;
mod options;
mod sqlite_store;
mod workspace;

pub use database::Database;
pub use error::StorageError;
pub use kv::{get_typed, set_typed, KeyValueStore, MemoryKvStore};
pub use models::{TabId, WindowId, WorkspaceId, WorkspaceRecord};
pub use options::{OptionsStore, REMEMBER_WORKSPACES};
pub use sqlite_store::SqliteKvStore;
pub use workspace::WorkspaceStore;
