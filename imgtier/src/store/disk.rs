//! Filesystem-backed blob store.

use crate::cache::ImageKey;
use crate::store::path::{blob_filename, directory_for};
use crate::store::r#trait::{BlobStore, BoxFuture};
use crate::store::types::{ClearResult, StorageError};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, trace};

/// Blob store rooted at a directory on the local filesystem.
///
/// # Layout
///
/// ```text
/// {root}/{subdirectory}/{key}.{extension}
/// ```
///
/// Directories are created lazily on the first write into them and
/// remembered afterwards. Writes land in a temporary file beside the target
/// and are renamed into place, so readers never see a partial file and the
/// last concurrent writer wins.
pub struct DiskBlobStore {
    root: PathBuf,
    extension: String,
    /// Directories known to exist
    created_dirs: Mutex<HashSet<PathBuf>>,
    /// Suffix source for temporary file names
    temp_counter: AtomicU64,
}

impl DiskBlobStore {
    /// Create a store rooted at `root` using files with `extension`.
    ///
    /// Nothing is created on disk until the first write or
    /// [`BlobStore::ensure_directory`] call.
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
            created_dirs: Mutex::new(HashSet::new()),
            temp_counter: AtomicU64::new(0),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Path of the blob for `key`.
    pub fn path_for(&self, key: &ImageKey, subdirectory: Option<&str>) -> Result<PathBuf, StorageError> {
        Ok(directory_for(&self.root, subdirectory)?.join(blob_filename(key, &self.extension)))
    }

    async fn create_dir_once(&self, dir: &Path) -> Result<(), StorageError> {
        if self.created_dirs.lock().contains(dir) {
            return Ok(());
        }

        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| StorageError::io(dir, e))?;
        debug!(dir = %dir.display(), "Created blob store directory");

        self.created_dirs.lock().insert(dir.to_path_buf());
        Ok(())
    }

    fn temp_path(&self, target: &Path) -> PathBuf {
        let n = self.temp_counter.fetch_add(1, Ordering::Relaxed);
        let name = target
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default();
        target.with_file_name(format!(".{}.{}.{}.tmp", name, std::process::id(), n))
    }

    /// Forget remembered directories at or below `dir`.
    fn forget_dirs_under(&self, dir: &Path) {
        self.created_dirs.lock().retain(|known| !known.starts_with(dir));
    }
}

impl BlobStore for DiskBlobStore {
    fn read<'a>(
        &'a self,
        key: &'a ImageKey,
        subdirectory: Option<&'a str>,
    ) -> BoxFuture<'a, Result<Option<Vec<u8>>, StorageError>> {
        Box::pin(async move {
            let path = self.path_for(key, subdirectory)?;
            match tokio::fs::read(&path).await {
                Ok(data) => {
                    trace!(key = %key, path = %path.display(), bytes = data.len(), "Blob read");
                    Ok(Some(data))
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(StorageError::io(path, e)),
            }
        })
    }

    fn exists<'a>(&'a self, key: &'a ImageKey, subdirectory: Option<&'a str>) -> BoxFuture<'a, bool> {
        Box::pin(async move {
            match self.path_for(key, subdirectory) {
                Ok(path) => tokio::fs::try_exists(&path).await.unwrap_or(false),
                Err(_) => false,
            }
        })
    }

    fn write<'a>(
        &'a self,
        key: &'a ImageKey,
        subdirectory: Option<&'a str>,
        data: Vec<u8>,
    ) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            let dir = directory_for(&self.root, subdirectory)?;
            self.create_dir_once(&dir).await?;

            let path = dir.join(blob_filename(key, &self.extension));
            let temp_path = self.temp_path(&path);

            if let Err(e) = tokio::fs::write(&temp_path, &data).await {
                // The directory may have been removed behind our back.
                if e.kind() == io::ErrorKind::NotFound {
                    self.forget_dirs_under(&dir);
                }
                return Err(StorageError::io(&temp_path, e));
            }

            if let Err(e) = tokio::fs::rename(&temp_path, &path).await {
                let _ = tokio::fs::remove_file(&temp_path).await;
                return Err(StorageError::io(&path, e));
            }

            debug!(key = %key, path = %path.display(), bytes = data.len(), "Blob written");
            Ok(())
        })
    }

    fn clear<'a>(&'a self, subdirectory: Option<&'a str>) -> BoxFuture<'a, Result<ClearResult, StorageError>> {
        Box::pin(async move {
            let dir = directory_for(&self.root, subdirectory)?;
            let target = dir.clone();

            let result = tokio::task::spawn_blocking(move || remove_contents(&target))
                .await
                .map_err(|e| StorageError::io(&dir, io::Error::other(e)))??;

            // Subdirectories below `dir` were removed; the directory itself stays.
            self.forget_dirs_under(&dir);
            if tokio::fs::try_exists(&dir).await.unwrap_or(false) {
                self.created_dirs.lock().insert(dir.clone());
            }

            debug!(
                dir = %dir.display(),
                files = result.files_deleted,
                bytes = result.bytes_freed,
                "Blob store cleared"
            );
            Ok(result)
        })
    }

    fn ensure_directory<'a>(
        &'a self,
        subdirectory: Option<&'a str>,
    ) -> BoxFuture<'a, Result<PathBuf, StorageError>> {
        Box::pin(async move {
            let dir = directory_for(&self.root, subdirectory)?;
            self.create_dir_once(&dir).await?;
            Ok(dir)
        })
    }
}

/// Remove everything inside `dir`, keeping `dir` itself.
///
/// A missing directory counts as already clear.
fn remove_contents(dir: &Path) -> Result<ClearResult, StorageError> {
    let mut result = ClearResult::default();

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(result),
        Err(e) => return Err(StorageError::io(dir, e)),
    };

    for entry in entries {
        let entry = entry.map_err(|e| StorageError::io(dir, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| StorageError::io(&path, e))?;

        if file_type.is_dir() {
            let nested = remove_contents(&path)?;
            result.files_deleted += nested.files_deleted;
            result.bytes_freed += nested.bytes_freed;
            fs::remove_dir(&path).map_err(|e| StorageError::io(&path, e))?;
        } else {
            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            match fs::remove_file(&path) {
                Ok(()) => {
                    result.files_deleted += 1;
                    result.bytes_freed += size;
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(StorageError::io(&path, e)),
            }
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn create_store() -> (TempDir, DiskBlobStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = DiskBlobStore::new(temp_dir.path().join("Images"), "jpg");
        (temp_dir, store)
    }

    fn key(name: &str) -> ImageKey {
        ImageKey::new(name)
    }

    #[tokio::test]
    async fn test_write_then_read_round_trip() {
        let (_temp, store) = create_store();

        store.write(&key("k1"), None, vec![1, 2, 3]).await.unwrap();

        let data = store.read(&key("k1"), None).await.unwrap();
        assert_eq!(data, Some(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn test_read_missing_is_none() {
        let (_temp, store) = create_store();
        assert_eq!(store.read(&key("nope"), None).await.unwrap(), None);
        assert!(!store.exists(&key("nope"), None).await);
    }

    #[tokio::test]
    async fn test_root_not_created_until_first_write() {
        let (_temp, store) = create_store();
        assert!(!store.root().exists());

        store.write(&key("k"), None, vec![0]).await.unwrap();

        assert!(store.root().is_dir());
        assert!(store.root().join("k.jpg").is_file());
    }

    #[tokio::test]
    async fn test_subdirectory_layout() {
        let (_temp, store) = create_store();

        store.write(&key("k"), Some("avatars"), vec![9]).await.unwrap();

        assert!(store.root().join("avatars").join("k.jpg").is_file());
        assert!(store.exists(&key("k"), Some("avatars")).await);
        assert!(!store.exists(&key("k"), None).await);
    }

    #[tokio::test]
    async fn test_overwrite_last_write_wins() {
        let (_temp, store) = create_store();

        store.write(&key("k"), None, vec![1]).await.unwrap();
        store.write(&key("k"), None, vec![2, 2]).await.unwrap();

        assert_eq!(store.read(&key("k"), None).await.unwrap(), Some(vec![2, 2]));
    }

    #[tokio::test]
    async fn test_write_leaves_no_temp_files() {
        let (_temp, store) = create_store();

        for i in 0..5u8 {
            store.write(&key("k"), None, vec![i; 32]).await.unwrap();
        }

        let leftovers: Vec<_> = fs::read_dir(store.root())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "tmp"))
            .collect();
        assert!(leftovers.is_empty(), "Temp files should not remain");
    }

    #[tokio::test]
    async fn test_concurrent_writes_same_key_never_corrupt() {
        let (_temp, store) = create_store();
        let store = std::sync::Arc::new(store);

        let handles: Vec<_> = (0..8u8)
            .map(|i| {
                let store = std::sync::Arc::clone(&store);
                tokio::spawn(async move {
                    let key = ImageKey::new("shared");
                    let result = store.write(&key, None, vec![i; 4096]).await;
                    result
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let data = store.read(&key("shared"), None).await.unwrap().unwrap();
        assert_eq!(data.len(), 4096);
        assert!(data.iter().all(|b| *b == data[0]), "file mixes two writes");
    }

    #[tokio::test]
    async fn test_clear_root_removes_everything() {
        let (_temp, store) = create_store();
        store.write(&key("a"), None, vec![0; 10]).await.unwrap();
        store.write(&key("b"), Some("nested"), vec![0; 5]).await.unwrap();

        let result = store.clear(None).await.unwrap();

        assert_eq!(result.files_deleted, 2);
        assert_eq!(result.bytes_freed, 15);
        assert!(store.read(&key("a"), None).await.unwrap().is_none());
        assert!(!store.root().join("nested").exists());
        assert!(store.root().exists(), "root itself is kept");
    }

    #[tokio::test]
    async fn test_clear_subdirectory_only() {
        let (_temp, store) = create_store();
        store.write(&key("a"), None, vec![1]).await.unwrap();
        store.write(&key("b"), Some("thumbs"), vec![2]).await.unwrap();

        let result = store.clear(Some("thumbs")).await.unwrap();

        assert_eq!(result.files_deleted, 1);
        assert!(store.read(&key("a"), None).await.unwrap().is_some());
        assert!(store.read(&key("b"), Some("thumbs")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear_missing_directory_is_noop() {
        let (_temp, store) = create_store();
        let result = store.clear(Some("never-written")).await.unwrap();
        assert_eq!(result, ClearResult::default());
    }

    #[tokio::test]
    async fn test_write_after_clear_recreates_nested_directory() {
        let (_temp, store) = create_store();
        store.write(&key("a"), Some("x/y"), vec![1]).await.unwrap();
        store.clear(None).await.unwrap();

        store.write(&key("a"), Some("x/y"), vec![2]).await.unwrap();

        assert_eq!(store.read(&key("a"), Some("x/y")).await.unwrap(), Some(vec![2]));
    }

    #[tokio::test]
    async fn test_ensure_directory_is_idempotent() {
        let (_temp, store) = create_store();

        let first = store.ensure_directory(Some("avatars")).await.unwrap();
        let second = store.ensure_directory(Some("avatars")).await.unwrap();

        assert_eq!(first, second);
        assert!(first.is_dir());
    }

    #[tokio::test]
    async fn test_invalid_subdirectory_rejected() {
        let (_temp, store) = create_store();
        let result = store.write(&key("a"), Some("../escape"), vec![1]).await;
        assert!(matches!(result, Err(StorageError::InvalidSubdirectory(_))));
    }

    #[tokio::test]
    async fn test_hashed_key_round_trip() {
        let (_temp, store) = create_store();
        let odd = key("https://cdn.example.com/a b.png");

        store.write(&odd, None, vec![7, 7]).await.unwrap();

        assert_eq!(store.read(&odd, None).await.unwrap(), Some(vec![7, 7]));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// Whatever bytes are written under a key are read back unchanged.
        #[test]
        fn prop_round_trip_is_byte_identical(
            raw_key in ".{0,40}",
            data in proptest::collection::vec(any::<u8>(), 0..2048),
        ) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            let (_temp, store) = create_store();
            let key = ImageKey::new(raw_key);

            let read = runtime.block_on(async {
                store.write(&key, None, data.clone()).await.unwrap();
                store.read(&key, None).await.unwrap()
            });

            prop_assert_eq!(read, Some(data));
        }
    }
}
