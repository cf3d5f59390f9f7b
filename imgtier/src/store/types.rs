//! Blob store result and error types.

use std::path::PathBuf;
use thiserror::Error;

/// Persistent tier errors.
///
/// The coordinator never surfaces these to fetch callers; they are only
/// returned directly by maintenance calls such as clearing the store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Subdirectory is absolute or climbs out of the root.
    #[error("invalid subdirectory '{0}': must be a relative path inside the store root")]
    InvalidSubdirectory(String),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Outcome of clearing a directory of the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClearResult {
    pub files_deleted: u64,
    pub bytes_freed: u64,
}
