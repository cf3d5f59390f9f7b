//! In-memory tier holding decoded images.
//!
//! Entries are original-resolution images keyed by [`ImageKey`]. The cache is
//! bounded by pixel-buffer bytes and evicts least recently used entries.

mod memory;
mod stats;
mod r#trait;
mod types;

pub use memory::MemoryCache;
pub use r#trait::{ImageCache, NoOpImageCache};
pub use stats::CacheStats;
pub use types::{image_size_bytes, same_content, CacheError, ImageKey};
