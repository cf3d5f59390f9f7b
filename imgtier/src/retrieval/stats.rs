//! Retrieval counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of coordinator activity.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RetrievalStats {
    /// Requests submitted
    pub requests: u64,
    /// Requests answered first by the memory cache
    pub memory_hits: u64,
    /// Requests answered first by the blob store
    pub disk_hits: u64,
    /// Network fetches actually performed
    pub network_fetches: u64,
    /// Requests that waited on another request's fetch
    pub coalesced_waits: u64,
    /// Network outcomes that were failures
    pub network_failures: u64,
    /// Refreshes dropped because the content had not changed
    pub suppressed_refreshes: u64,
    /// Resizes that failed and fell back to the original image
    pub resize_failures: u64,
    /// Swallowed blob store, memory cache or encode failures
    pub storage_failures: u64,
    /// Items pushed to request streams
    pub deliveries: u64,
}

impl RetrievalStats {
    /// Fraction of requests answered by either cache tier.
    pub fn cache_hit_rate(&self) -> f64 {
        if self.requests == 0 {
            0.0
        } else {
            (self.memory_hits + self.disk_hits) as f64 / self.requests as f64
        }
    }
}

/// Live counters behind [`RetrievalStats`].
#[derive(Debug, Default)]
pub(crate) struct RetrievalCounters {
    requests: AtomicU64,
    memory_hits: AtomicU64,
    disk_hits: AtomicU64,
    network_fetches: AtomicU64,
    coalesced_waits: AtomicU64,
    network_failures: AtomicU64,
    suppressed_refreshes: AtomicU64,
    resize_failures: AtomicU64,
    storage_failures: AtomicU64,
    deliveries: AtomicU64,
}

macro_rules! counter {
    ($($name:ident => $field:ident),* $(,)?) => {
        $(
            pub(crate) fn $name(&self) {
                self.$field.fetch_add(1, Ordering::Relaxed);
            }
        )*
    };
}

impl RetrievalCounters {
    counter! {
        record_request => requests,
        record_memory_hit => memory_hits,
        record_disk_hit => disk_hits,
        record_network_fetch => network_fetches,
        record_coalesced_wait => coalesced_waits,
        record_network_failure => network_failures,
        record_suppressed_refresh => suppressed_refreshes,
        record_resize_failure => resize_failures,
        record_storage_failure => storage_failures,
        record_delivery => deliveries,
    }

    pub(crate) fn snapshot(&self) -> RetrievalStats {
        RetrievalStats {
            requests: self.requests.load(Ordering::Relaxed),
            memory_hits: self.memory_hits.load(Ordering::Relaxed),
            disk_hits: self.disk_hits.load(Ordering::Relaxed),
            network_fetches: self.network_fetches.load(Ordering::Relaxed),
            coalesced_waits: self.coalesced_waits.load(Ordering::Relaxed),
            network_failures: self.network_failures.load(Ordering::Relaxed),
            suppressed_refreshes: self.suppressed_refreshes.load(Ordering::Relaxed),
            resize_failures: self.resize_failures.load(Ordering::Relaxed),
            storage_failures: self.storage_failures.load(Ordering::Relaxed),
            deliveries: self.deliveries.load(Ordering::Relaxed),
        }
    }
}
