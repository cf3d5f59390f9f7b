//! Request description submitted to the coordinator.

use crate::cache::ImageKey;
use crate::codec::TargetSize;
use crate::fetch::TransportRequest;

/// Per-request behaviour switches. All off by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FetchOptions {
    /// Write a successful network result to the blob store.
    pub persist_to_disk: bool,
    /// Store disk and network results in the memory cache.
    pub populate_memory_cache: bool,
    /// After a cached delivery, still go to the network and deliver again
    /// if the network copy differs.
    pub force_refresh: bool,
}

impl FetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Persist to disk and populate the memory cache.
    pub fn cache_everywhere() -> Self {
        Self {
            persist_to_disk: true,
            populate_memory_cache: true,
            force_refresh: false,
        }
    }

    pub fn persist_to_disk(mut self, enabled: bool) -> Self {
        self.persist_to_disk = enabled;
        self
    }

    pub fn populate_memory_cache(mut self, enabled: bool) -> Self {
        self.populate_memory_cache = enabled;
        self
    }

    pub fn force_refresh(mut self, enabled: bool) -> Self {
        self.force_refresh = enabled;
        self
    }
}

/// One image request.
///
/// # Example
///
/// ```
/// use imgtier::codec::TargetSize;
/// use imgtier::fetch::TransportRequest;
/// use imgtier::retrieval::{FetchOptions, FetchRequest};
///
/// let request = FetchRequest::new("avatar-42", TransportRequest::get("https://example.com/42.png"))
///     .with_size(TargetSize::new(64, 64))
///     .with_options(FetchOptions::cache_everywhere().force_refresh(true))
///     .with_subdirectory("avatars");
///
/// assert_eq!(request.key.as_str(), "avatar-42");
/// assert!(request.options.force_refresh);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub key: ImageKey,
    pub transport: TransportRequest,
    /// Exact size for delivered copies; cached copies keep full resolution.
    pub target_size: Option<TargetSize>,
    pub options: FetchOptions,
    /// Blob store subdirectory relative to the store root.
    pub subdirectory: Option<String>,
}

impl FetchRequest {
    pub fn new(key: impl Into<ImageKey>, transport: TransportRequest) -> Self {
        Self {
            key: key.into(),
            transport,
            target_size: None,
            options: FetchOptions::default(),
            subdirectory: None,
        }
    }

    pub fn with_size(mut self, size: TargetSize) -> Self {
        self.target_size = Some(size);
        self
    }

    pub fn with_options(mut self, options: FetchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_subdirectory(mut self, subdirectory: impl Into<String>) -> Self {
        let subdirectory = subdirectory.into();
        self.subdirectory = (!subdirectory.is_empty()).then_some(subdirectory);
        self
    }

    pub fn subdirectory(&self) -> Option<&str> {
        self.subdirectory.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let request = FetchRequest::new("k", TransportRequest::get("http://x"));

        assert_eq!(request.options, FetchOptions::default());
        assert!(!request.options.persist_to_disk);
        assert!(!request.options.populate_memory_cache);
        assert!(!request.options.force_refresh);
        assert!(request.target_size.is_none());
        assert!(request.subdirectory().is_none());
    }

    #[test]
    fn test_options_combine() {
        let options = FetchOptions::new().persist_to_disk(true).force_refresh(true);

        assert!(options.persist_to_disk);
        assert!(!options.populate_memory_cache);
        assert!(options.force_refresh);
    }

    #[test]
    fn test_empty_subdirectory_means_root() {
        let request = FetchRequest::new("k", TransportRequest::get("http://x")).with_subdirectory("");
        assert!(request.subdirectory().is_none());
    }
}
