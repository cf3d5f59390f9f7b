//! Persistent tier: encoded image bytes on disk.
//!
//! Entries live at `<root>/<subdirectory?>/<filename>` where the filename is
//! derived from the key alone, so lookups need no index.

mod disk;
mod path;
mod r#trait;
mod types;

pub use disk::DiskBlobStore;
pub use path::{blob_filename, blob_path, directory_for};
pub use r#trait::{BlobStore, BoxFuture};
pub use types::{ClearResult, StorageError};
