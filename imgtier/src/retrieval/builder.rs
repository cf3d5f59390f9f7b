//! Coordinator construction.

use crate::cache::{ImageCache, MemoryCache};
use crate::codec::{ImageCodec, StandardCodec};
use crate::config::{default_cache_directory, ConfigFile, DEFAULT_MEMORY_CACHE_SIZE};
use crate::fetch::{Fetcher, HttpFetcher, TransportError};
use crate::log::{Logger, TracingLogger};
use crate::retrieval::RetrievalCoordinator;
use crate::store::{BlobStore, DiskBlobStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Assembles a [`RetrievalCoordinator`] from its tiers.
///
/// Every tier except the fetcher has a default:
///
/// | Tier        | Default                                              |
/// |-------------|------------------------------------------------------|
/// | memory      | [`MemoryCache`] of 256MB                             |
/// | codec       | [`StandardCodec`], JPEG quality 100                  |
/// | blob store  | [`DiskBlobStore`] at the cache directory, codec's extension |
/// | diagnostics | [`TracingLogger`]                                    |
///
/// ```no_run
/// use imgtier::fetch::HttpFetcher;
/// use imgtier::retrieval::CoordinatorBuilder;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let coordinator = CoordinatorBuilder::new(HttpFetcher::new()?)
///     .with_cache_directory("/tmp/imgtier")
///     .build();
/// # let _ = coordinator;
/// # Ok(())
/// # }
/// ```
pub struct CoordinatorBuilder<F> {
    fetcher: F,
    memory: Option<Arc<dyn ImageCache>>,
    store: Option<Arc<dyn BlobStore>>,
    cache_directory: Option<PathBuf>,
    codec: Option<Arc<dyn ImageCodec>>,
    logger: Option<Arc<dyn Logger>>,
}

impl<F: Fetcher + 'static> CoordinatorBuilder<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            memory: None,
            store: None,
            cache_directory: None,
            codec: None,
            logger: None,
        }
    }

    pub fn with_memory_cache(mut self, memory: Arc<dyn ImageCache>) -> Self {
        self.memory = Some(memory);
        self
    }

    /// Use `store` instead of a [`DiskBlobStore`].
    pub fn with_blob_store(mut self, store: Arc<dyn BlobStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Root of the default [`DiskBlobStore`]. Ignored with a custom store.
    pub fn with_cache_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.cache_directory = Some(directory.into());
        self
    }

    pub fn with_codec(mut self, codec: Arc<dyn ImageCodec>) -> Self {
        self.codec = Some(codec);
        self
    }

    /// Sink for swallowed failures (storage, resize, encode).
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn build(self) -> RetrievalCoordinator<F> {
        let codec = self
            .codec
            .unwrap_or_else(|| Arc::new(StandardCodec::default()));
        let memory = self
            .memory
            .unwrap_or_else(|| Arc::new(MemoryCache::new(DEFAULT_MEMORY_CACHE_SIZE)));
        let store = match self.store {
            Some(store) => store,
            None => {
                let root = self.cache_directory.unwrap_or_else(default_cache_directory);
                info!(root = %root.display(), extension = codec.extension(), "Using disk blob store");
                Arc::new(DiskBlobStore::new(root, codec.extension()))
            }
        };
        let logger = self.logger.unwrap_or_else(|| Arc::new(TracingLogger::new()));

        RetrievalCoordinator::from_parts(self.fetcher, memory, store, codec, logger)
    }
}

impl CoordinatorBuilder<HttpFetcher> {
    /// Builder wired from a loaded configuration file.
    pub fn from_config(config: &ConfigFile) -> Result<Self, TransportError> {
        let fetcher = HttpFetcher::with_config(config.download.timeout, &config.download.user_agent)?;
        let codec = StandardCodec::new(config.codec.output_format());

        Ok(Self::new(fetcher)
            .with_memory_cache(Arc::new(MemoryCache::new(config.cache.memory_size)))
            .with_codec(Arc::new(codec))
            .with_cache_directory(config.cache.directory.clone()))
    }
}
