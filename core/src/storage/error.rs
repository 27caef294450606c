//! Error types for roster snapshot storage

use std::path::PathBuf;
use thiserror::Error;

/// Errors while reading or writing roster snapshots
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read snapshot {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write snapshot {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create data directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed snapshot {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize snapshot")]
    Serialize(#[from] serde_json::Error),
}
