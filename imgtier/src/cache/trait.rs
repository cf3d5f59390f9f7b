//! Memory tier abstraction.

use crate::cache::types::{CacheError, ImageKey};
use image::DynamicImage;
use std::sync::Arc;

/// Memory tier used by the retrieval coordinator.
///
/// Implementations hold original-resolution decoded images. Access is
/// expected to be fast and non-blocking.
pub trait ImageCache: Send + Sync {
    /// Look up an image.
    fn get(&self, key: &ImageKey) -> Option<Arc<DynamicImage>>;

    /// Store an image, replacing any previous entry for `key`.
    fn put(&self, key: ImageKey, image: Arc<DynamicImage>) -> Result<(), CacheError>;

    fn contains(&self, key: &ImageKey) -> bool;

    /// Drop every entry.
    fn clear(&self);

    /// Number of resident entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Memory tier that never stores anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpImageCache;

impl ImageCache for NoOpImageCache {
    fn get(&self, _key: &ImageKey) -> Option<Arc<DynamicImage>> {
        None
    }

    fn put(&self, _key: ImageKey, _image: Arc<DynamicImage>) -> Result<(), CacheError> {
        Ok(())
    }

    fn contains(&self, _key: &ImageKey) -> bool {
        false
    }

    fn clear(&self) {}

    fn len(&self) -> usize {
        0
    }
}
