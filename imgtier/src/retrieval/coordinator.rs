//! Retrieval coordinator: tier ordering, multi-answer delivery and
//! cache coherency.

use crate::cache::{same_content, ImageCache, ImageKey};
use crate::coalesce::{CoalesceResult, CoalescerStats, NetworkOutcome, RequestCoalescer};
use crate::codec::{CodecError, ImageCodec, TargetSize};
use crate::fetch::Fetcher;
use crate::log::Logger;
use crate::retrieval::request::FetchRequest;
use crate::retrieval::response::{FetchError, FetchResult, ImageOrigin};
use crate::retrieval::stats::{RetrievalCounters, RetrievalStats};
use crate::retrieval::stream::{FetchItem, FetchStream};
use crate::store::{BlobStore, ClearResult, StorageError};
use crate::log_warn;
use image::DynamicImage;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, trace};

/// Answers image requests from memory, disk and network.
///
/// # Request flow
///
/// ```text
/// fetch(request)
///   │
///   ├─► memory hit ──► deliver(Memory) ──┐
///   │                                    │ force_refresh?
///   ├─► disk hit ────► deliver(Disk) ────┤   no ──► end
///   │                                    │   yes
///   └─► miss ────────────────────────────┴─► coalesced network fetch
///                                              │
///                                              ├─ failure ──► deliver(Err) ──► end
///                                              ├─ unchanged refresh ──► end
///                                              └─ deliver(Network), then
///                                                 populate memory / persist
/// ```
///
/// Every request runs on its own task; [`RetrievalCoordinator::fetch`]
/// returns immediately. The coordinator is cheap to clone and all clones
/// share the same tiers, coalescer and statistics.
pub struct RetrievalCoordinator<F> {
    inner: Arc<Inner<F>>,
}

impl<F> Clone for RetrievalCoordinator<F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<F> {
    memory: Arc<dyn ImageCache>,
    store: Arc<dyn BlobStore>,
    fetcher: F,
    codec: Arc<dyn ImageCodec>,
    coalescer: RequestCoalescer,
    counters: RetrievalCounters,
    logger: Arc<dyn Logger>,
}

impl<F: Fetcher + 'static> RetrievalCoordinator<F> {
    pub(crate) fn from_parts(
        fetcher: F,
        memory: Arc<dyn ImageCache>,
        store: Arc<dyn BlobStore>,
        codec: Arc<dyn ImageCodec>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                memory,
                store,
                fetcher,
                codec,
                coalescer: RequestCoalescer::new(),
                counters: RetrievalCounters::default(),
                logger,
            }),
        }
    }

    /// Submit a request and receive its deliveries as a stream.
    ///
    /// Must be called from within a tokio runtime.
    pub fn fetch(&self, request: FetchRequest) -> FetchStream {
        let (tx, stream) = FetchStream::channel();
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            inner.run(request, tx).await;
        });
        stream
    }

    /// Drop every decoded image held in memory.
    pub fn clear_memory_cache(&self) {
        self.inner.memory.clear();
        debug!("Memory cache cleared");
    }

    /// Delete stored blobs in `subdirectory`, or the whole store for `None`.
    pub async fn clear_disk_cache(&self, subdirectory: Option<&str>) -> Result<ClearResult, StorageError> {
        self.inner.store.clear(subdirectory).await
    }

    /// Create the store directory for `subdirectory` if needed.
    pub async fn ensure_directory(&self, subdirectory: Option<&str>) -> Result<PathBuf, StorageError> {
        self.inner.store.ensure_directory(subdirectory).await
    }

    /// Snapshot of the retrieval counters.
    pub fn stats(&self) -> RetrievalStats {
        self.inner.counters.snapshot()
    }

    /// Snapshot of the in-flight fetch registry counters.
    pub fn coalescer_stats(&self) -> CoalescerStats {
        self.inner.coalescer.stats()
    }

    /// Emit retrieval and coalescing counters at info level.
    pub fn log_stats(&self) {
        let stats = self.stats();
        info!(
            requests = stats.requests,
            memory_hits = stats.memory_hits,
            disk_hits = stats.disk_hits,
            network_fetches = stats.network_fetches,
            network_failures = stats.network_failures,
            suppressed_refreshes = stats.suppressed_refreshes,
            hit_rate = format!("{:.1}%", stats.cache_hit_rate() * 100.0),
            "Retrieval statistics"
        );
        self.inner.coalescer.log_stats();
    }

    /// The memory tier.
    pub fn memory_cache(&self) -> &Arc<dyn ImageCache> {
        &self.inner.memory
    }

    /// The disk tier.
    pub fn blob_store(&self) -> &Arc<dyn BlobStore> {
        &self.inner.store
    }

    /// Codec used for decoding, resizing and persisting.
    pub fn codec(&self) -> &Arc<dyn ImageCodec> {
        &self.inner.codec
    }
}

impl<F: Fetcher> Inner<F> {
    async fn run(&self, request: FetchRequest, tx: mpsc::Sender<FetchItem>) {
        self.counters.record_request();
        let key = &request.key;
        let options = request.options;

        // Content this request has already handed out from a cache tier.
        let mut delivered_cached: Option<Arc<DynamicImage>> = None;

        if let Some(image) = self.memory.get(key) {
            self.counters.record_memory_hit();
            debug!(key = %key, "Memory cache hit");
            self.deliver(&tx, &request, ImageOrigin::Memory, &image).await;
            delivered_cached = Some(image);
        } else if let Some(image) = self.load_from_disk(&request).await {
            self.counters.record_disk_hit();
            debug!(key = %key, "Disk cache hit");
            self.deliver(&tx, &request, ImageOrigin::Disk, &image).await;
            if options.populate_memory_cache {
                self.remember(key, &image);
            }
            delivered_cached = Some(image);
        }

        if delivered_cached.is_some() && !options.force_refresh {
            return;
        }

        let image = match self.network_outcome(&request).await {
            Ok(image) => image,
            Err(err) => {
                self.counters.record_network_failure();
                debug!(key = %key, error = %err, "Network fetch failed");
                self.send(&tx, Err(err)).await;
                return;
            }
        };

        if let Some(cached) = &delivered_cached {
            // The caller already holds this content.
            if same_content(cached, &image) {
                self.counters.record_suppressed_refresh();
                debug!(key = %key, "Network copy unchanged - refresh suppressed");
                return;
            }
        }

        self.deliver(&tx, &request, ImageOrigin::Network, &image).await;

        if options.populate_memory_cache {
            self.remember(key, &image);
        }
        if options.persist_to_disk {
            self.persist(&request, &image).await;
        }
    }

    /// Fetch through the coalescer, leading the fetch or waiting on one.
    async fn network_outcome(&self, request: &FetchRequest) -> NetworkOutcome {
        match self.coalescer.register(&request.key) {
            CoalesceResult::NewRequest(lease) => {
                self.counters.record_network_fetch();
                let outcome = self.fetch_and_decode(request).await;
                lease.complete(outcome.clone());
                outcome
            }
            CoalesceResult::Coalesced(waiter) => {
                self.counters.record_coalesced_wait();
                waiter.wait().await
            }
        }
    }

    async fn fetch_and_decode(&self, request: &FetchRequest) -> NetworkOutcome {
        trace!(key = %request.key, url = %request.transport.url, "Fetching from network");
        let bytes = self.fetcher.fetch(&request.transport).await?;

        let codec = Arc::clone(&self.codec);
        let image = blocking(move || codec.decode(&bytes))
            .await
            .map_err(|e| FetchError::InvalidImageData(e.to_string()))?;

        Ok(Arc::new(image))
    }

    /// Read and decode the stored blob. Read errors and undecodable entries
    /// count as a miss.
    async fn load_from_disk(&self, request: &FetchRequest) -> Option<Arc<DynamicImage>> {
        let key = &request.key;

        let bytes = match self.store.read(key, request.subdirectory()).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                trace!(key = %key, "Disk cache miss");
                return None;
            }
            Err(e) => {
                self.counters.record_storage_failure();
                log_warn!(self.logger, "Blob store read failed for '{}': {}", key, e);
                return None;
            }
        };

        let codec = Arc::clone(&self.codec);
        match blocking(move || codec.decode(&bytes)).await {
            Ok(image) => Some(Arc::new(image)),
            Err(e) => {
                self.counters.record_storage_failure();
                log_warn!(self.logger, "Ignoring undecodable disk entry for '{}': {}", key, e);
                None
            }
        }
    }

    async fn deliver(
        &self,
        tx: &mpsc::Sender<FetchItem>,
        request: &FetchRequest,
        origin: ImageOrigin,
        image: &Arc<DynamicImage>,
    ) {
        let image = self.sized(&request.key, image, request.target_size).await;
        debug!(key = %request.key, origin = %origin, "Delivering image");
        self.send(
            tx,
            Ok(FetchResult {
                key: request.key.clone(),
                image,
                origin,
            }),
        )
        .await;
    }

    async fn send(&self, tx: &mpsc::Sender<FetchItem>, item: FetchItem) {
        if tx.send(item).await.is_ok() {
            self.counters.record_delivery();
        } else {
            trace!("Caller dropped fetch stream");
        }
    }

    /// Copy of `image` at the requested size. The source is never modified;
    /// a failed resize falls back to the original.
    async fn sized(&self, key: &ImageKey, image: &Arc<DynamicImage>, target: Option<TargetSize>) -> Arc<DynamicImage> {
        let Some(size) = target else {
            return Arc::clone(image);
        };

        let codec = Arc::clone(&self.codec);
        let source = Arc::clone(image);
        match blocking(move || codec.resize(&source, size)).await {
            Ok(resized) => Arc::new(resized),
            Err(e) => {
                self.counters.record_resize_failure();
                log_warn!(self.logger, "Resize of '{}' to {} failed, delivering original: {}", key, size, e);
                Arc::clone(image)
            }
        }
    }

    fn remember(&self, key: &ImageKey, image: &Arc<DynamicImage>) {
        if let Err(e) = self.memory.put(key.clone(), Arc::clone(image)) {
            self.counters.record_storage_failure();
            log_warn!(self.logger, "Memory cache rejected '{}': {}", key, e);
        }
    }

    async fn persist(&self, request: &FetchRequest, image: &Arc<DynamicImage>) {
        let key = &request.key;
        let codec = Arc::clone(&self.codec);
        let source = Arc::clone(image);

        let bytes = match blocking(move || codec.encode(&source)).await {
            Ok(bytes) => bytes,
            Err(e) => {
                self.counters.record_storage_failure();
                log_warn!(self.logger, "Encoding '{}' for disk failed: {}", key, e);
                return;
            }
        };

        match self.store.write(key, request.subdirectory(), bytes).await {
            Ok(()) => trace!(key = %key, "Persisted to blob store"),
            Err(e) => {
                self.counters.record_storage_failure();
                log_warn!(self.logger, "Blob store write failed for '{}': {}", key, e);
            }
        }
    }
}

/// Run a codec operation on the blocking pool.
async fn blocking<T, Op>(op: Op) -> Result<T, CodecError>
where
    Op: FnOnce() -> Result<T, CodecError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(op)
        .await
        .unwrap_or_else(|e| Err(CodecError::Worker(e.to_string())))
}
