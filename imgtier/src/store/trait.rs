//! Blob store abstraction.

use crate::cache::ImageKey;
use crate::store::types::{ClearResult, StorageError};
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

/// Boxed future returned by [`BlobStore`] methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Key/subdirectory-addressed byte store.
///
/// The trait is object safe so the coordinator can hold an
/// `Arc<dyn BlobStore>` and tests can substitute their own store.
pub trait BlobStore: Send + Sync {
    /// Read the bytes stored for `key`, or `None` when absent.
    fn read<'a>(
        &'a self,
        key: &'a ImageKey,
        subdirectory: Option<&'a str>,
    ) -> BoxFuture<'a, Result<Option<Vec<u8>>, StorageError>>;

    /// Whether an entry exists for `key`.
    fn exists<'a>(&'a self, key: &'a ImageKey, subdirectory: Option<&'a str>) -> BoxFuture<'a, bool>;

    /// Store `data` for `key`, replacing any previous entry.
    fn write<'a>(
        &'a self,
        key: &'a ImageKey,
        subdirectory: Option<&'a str>,
        data: Vec<u8>,
    ) -> BoxFuture<'a, Result<(), StorageError>>;

    /// Delete every entry in `subdirectory`, or in the whole store for `None`.
    fn clear<'a>(&'a self, subdirectory: Option<&'a str>) -> BoxFuture<'a, Result<ClearResult, StorageError>>;

    /// Create the directory for `subdirectory` if needed and return its path.
    fn ensure_directory<'a>(
        &'a self,
        subdirectory: Option<&'a str>,
    ) -> BoxFuture<'a, Result<PathBuf, StorageError>>;
}
