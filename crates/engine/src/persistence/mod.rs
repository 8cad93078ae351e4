mod atomic_io;
mod repository;
mod store;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub use atomic_io::backup_path_for;
pub use repository::{PlayerStateSnapshot, SaveRepository, SaveSnapshot, SnapshotRequest};
pub use store::{PlayerStateRow, SaveRow, SaveStore, Transaction};

pub const CURRENT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to read/write save store {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("save store {path} is not valid: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode save store: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("save schema version {found} is not supported (expected {expected})")]
    SchemaMismatch { found: u32, expected: u32 },
    #[error("save {save_id} has no player state")]
    MissingPlayerState { save_id: i64 },
    #[error("player state references missing save {save_id}")]
    ForeignKeyViolation { save_id: i64 },
}
