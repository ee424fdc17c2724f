use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
/// Errors returned by the snapshot store.
pub enum StorageError {
    /// IO error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No snapshot exists at the path.
    #[error("snapshot not found at {path}")]
    NotFound {
        /// Resolved path that was checked.
        path: PathBuf,
    },

    /// Serialization/deserialization error (including failed archive validation).
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The snapshot was written by an incompatible format version.
    #[error("unsupported snapshot version {found} (expected {expected})")]
    UnsupportedVersion {
        /// Version recorded in the file.
        found: u32,
        /// Version this build reads.
        expected: u32,
    },
}

/// Convenience result type for snapshot operations.
pub type StorageResult<T> = Result<T, StorageError>;
