//! Storage error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Malformed record at '{key}': {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Failed to create data directory: {0}")]
    CreateDir(std::io::Error),
}
