//! In-memory image cache with LRU eviction.

use crate::cache::types::{image_size_bytes, CacheError, ImageKey};
use crate::cache::{CacheStats, ImageCache};
use image::DynamicImage;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Entry in the memory cache.
#[derive(Debug, Clone)]
struct CacheEntry {
    image: Arc<DynamicImage>,
    size_bytes: usize,
    /// Logical clock value of the last access
    last_accessed: u64,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<ImageKey, CacheEntry>,
    current_size_bytes: usize,
    clock: u64,
    stats: CacheStats,
}

impl Inner {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn refresh_stats(&mut self) {
        let (size, count) = (self.current_size_bytes, self.entries.len());
        self.stats.update_size(size, count);
    }
}

/// Decoded-image cache bounded by pixel-buffer bytes.
///
/// All state sits behind a single mutex, so a racing `get` and `put` for the
/// same key never observe a half-updated entry or size counter.
pub struct MemoryCache {
    inner: Mutex<Inner>,
    max_size_bytes: usize,
}

impl MemoryCache {
    /// Create a cache holding at most `max_size_bytes` of pixel data.
    pub fn new(max_size_bytes: usize) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            max_size_bytes,
        }
    }

    pub fn entry_count(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn size_bytes(&self) -> usize {
        self.inner.lock().current_size_bytes
    }

    pub fn max_size_bytes(&self) -> usize {
        self.max_size_bytes
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats.clone()
    }

    /// Evict least recently used entries until `required` more bytes fit.
    fn evict_for(&self, inner: &mut Inner, required: usize) {
        if inner.current_size_bytes + required <= self.max_size_bytes {
            return;
        }
        let target = self.max_size_bytes.saturating_sub(required);

        let mut candidates: Vec<(ImageKey, u64, usize)> = inner
            .entries
            .iter()
            .map(|(k, e)| (k.clone(), e.last_accessed, e.size_bytes))
            .collect();
        candidates.sort_by_key(|(_, accessed, _)| *accessed);

        let mut evicted = 0;
        for (key, _, size) in candidates {
            if inner.current_size_bytes <= target {
                break;
            }
            inner.entries.remove(&key);
            inner.current_size_bytes = inner.current_size_bytes.saturating_sub(size);
            evicted += 1;
        }

        if evicted > 0 {
            tracing::debug!(
                evicted,
                size_bytes = inner.current_size_bytes,
                "Memory cache evicted least recently used images"
            );
        }
        inner.stats.record_evictions(evicted);
    }
}

impl ImageCache for MemoryCache {
    fn get(&self, key: &ImageKey) -> Option<Arc<DynamicImage>> {
        let mut inner = self.inner.lock();
        let now = inner.tick();

        let hit = inner.entries.get_mut(key).map(|entry| {
            entry.last_accessed = now;
            Arc::clone(&entry.image)
        });

        match hit {
            Some(_) => inner.stats.record_hit(),
            None => inner.stats.record_miss(),
        }
        hit
    }

    fn put(&self, key: ImageKey, image: Arc<DynamicImage>) -> Result<(), CacheError> {
        let size = image_size_bytes(&image);
        if size > self.max_size_bytes {
            return Err(CacheError::EntryTooLarge {
                size,
                capacity: self.max_size_bytes,
            });
        }

        let mut inner = self.inner.lock();

        // Replacing an entry frees its bytes first.
        if let Some(previous) = inner.entries.remove(&key) {
            inner.current_size_bytes = inner.current_size_bytes.saturating_sub(previous.size_bytes);
        }

        self.evict_for(&mut inner, size);

        let now = inner.tick();
        inner.entries.insert(
            key,
            CacheEntry {
                image,
                size_bytes: size,
                last_accessed: now,
            },
        );
        inner.current_size_bytes += size;
        inner.refresh_stats();
        Ok(())
    }

    fn contains(&self, key: &ImageKey) -> bool {
        self.inner.lock().entries.contains_key(key)
    }

    fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.current_size_bytes = 0;
        inner.refresh_stats();
    }

    fn len(&self) -> usize {
        self.entry_count()
    }
}
