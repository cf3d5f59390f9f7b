//! Request coalescing for network fetches.
//!
//! When several requests for the same key miss both cache tiers at once,
//! only the first performs the network fetch. The others subscribe to its
//! outcome and each receives the decoded image (or the failure) exactly once.
//!
//! ```text
//! Request A ─┐
//!            │                         ┌──────────┐
//! Request B ─┼──► RequestCoalescer ───►│ Fetcher  │  (one call)
//!            │        │                └────┬─────┘
//! Request C ─┘        │                     │
//!                     ▼                     ▼
//!             [B, C wait on the       outcome broadcast
//!              leader's outcome] ◄──────────┘
//! ```
//!
//! The registry is a `DashMap` keyed by [`ImageKey`]; the entry API makes
//! check-and-insert atomic. Statistics use atomic counters.

use crate::cache::ImageKey;
use crate::fetch::TransportError;
use crate::retrieval::FetchError;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use image::DynamicImage;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info};

/// Outcome shared between the leader and every coalesced waiter.
///
/// The image is the original-resolution decode; each observer resizes its
/// own copy.
pub type NetworkOutcome = Result<Arc<DynamicImage>, FetchError>;

/// Tracks in-flight network fetches by key.
pub struct RequestCoalescer {
    in_flight: DashMap<ImageKey, broadcast::Sender<NetworkOutcome>>,
    total_requests: AtomicU64,
    coalesced_requests: AtomicU64,
    new_requests: AtomicU64,
}

/// Statistics for monitoring coalescing effectiveness.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CoalescerStats {
    /// Total registrations
    pub total_requests: u64,
    /// Registrations that waited on an existing fetch
    pub coalesced_requests: u64,
    /// Registrations that started a fetch
    pub new_requests: u64,
}

impl CoalescerStats {
    /// Returns the coalescing ratio (0.0 to 1.0)
    pub fn coalescing_ratio(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.coalesced_requests as f64 / self.total_requests as f64
        }
    }
}

impl RequestCoalescer {
    pub fn new() -> Self {
        Self {
            in_flight: DashMap::new(),
            total_requests: AtomicU64::new(0),
            coalesced_requests: AtomicU64::new(0),
            new_requests: AtomicU64::new(0),
        }
    }

    /// Register interest in a network fetch for `key`.
    ///
    /// Returns [`CoalesceResult::NewRequest`] when no fetch is in flight; the
    /// caller must perform it and hand the outcome to
    /// [`FetchLease::complete`]. Otherwise returns
    /// [`CoalesceResult::Coalesced`] with a receiver for the leader's outcome.
    pub fn register(&self, key: &ImageKey) -> CoalesceResult<'_> {
        self.total_requests.fetch_add(1, Ordering::Relaxed);

        match self.in_flight.entry(key.clone()) {
            Entry::Occupied(entry) => {
                let rx = entry.get().subscribe();
                self.coalesced_requests.fetch_add(1, Ordering::Relaxed);
                debug!(key = %key, "Coalescing request - waiting for in-flight fetch");
                CoalesceResult::Coalesced(Waiter { rx })
            }
            Entry::Vacant(entry) => {
                // Typical fan-out is a handful of waiters; one message is ever sent.
                let (tx, _rx) = broadcast::channel(16);
                entry.insert(tx);
                self.new_requests.fetch_add(1, Ordering::Relaxed);
                debug!(key = %key, in_flight_count = self.in_flight.len(), "New network fetch");
                CoalesceResult::NewRequest(FetchLease {
                    coalescer: self,
                    key: key.clone(),
                    completed: false,
                })
            }
        }
    }

    /// Remove the in-flight entry for `key` and broadcast `outcome` to all
    /// waiters. Does nothing if no fetch is registered.
    pub fn complete(&self, key: &ImageKey, outcome: NetworkOutcome) {
        if let Some((_, tx)) = self.in_flight.remove(key) {
            let waiters = tx.receiver_count();
            // Receivers may have been dropped.
            let _ = tx.send(outcome);

            if waiters > 0 {
                debug!(key = %key, waiters, "Broadcast outcome to coalesced waiters");
            }
        }
    }

    /// Remove the in-flight entry without an outcome.
    ///
    /// Dropping the sender closes the channel; waiters observe
    /// [`TransportError::Abandoned`].
    pub fn cancel(&self, key: &ImageKey) {
        if self.in_flight.remove(key).is_some() {
            debug!(key = %key, "Cancelled in-flight fetch - waiters will be abandoned");
        }
    }

    pub fn stats(&self) -> CoalescerStats {
        CoalescerStats {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            coalesced_requests: self.coalesced_requests.load(Ordering::Relaxed),
            new_requests: self.new_requests.load(Ordering::Relaxed),
        }
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    pub fn log_stats(&self) {
        let stats = self.stats();
        info!(
            total_requests = stats.total_requests,
            coalesced = stats.coalesced_requests,
            new_requests = stats.new_requests,
            in_flight = self.in_flight_count(),
            coalescing_ratio = format!("{:.1}%", stats.coalescing_ratio() * 100.0),
            "Request coalescing statistics"
        );
    }
}

impl Default for RequestCoalescer {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of registering a fetch.
pub enum CoalesceResult<'a> {
    /// No fetch was in flight; the holder leads one.
    NewRequest(FetchLease<'a>),
    /// Another request leads; wait for its outcome.
    Coalesced(Waiter),
}

impl CoalesceResult<'_> {
    pub fn is_new_request(&self) -> bool {
        matches!(self, Self::NewRequest(_))
    }
}

/// Obligation to finish the fetch for a key.
///
/// Dropping the lease without completing cancels the entry so waiters are
/// released with [`TransportError::Abandoned`] instead of hanging.
#[must_use = "the fetch must be completed or waiters are abandoned"]
pub struct FetchLease<'a> {
    coalescer: &'a RequestCoalescer,
    key: ImageKey,
    completed: bool,
}

impl FetchLease<'_> {
    pub fn key(&self) -> &ImageKey {
        &self.key
    }

    /// Broadcast `outcome` to every waiter and release the key.
    pub fn complete(mut self, outcome: NetworkOutcome) {
        self.completed = true;
        self.coalescer.complete(&self.key, outcome);
    }
}

impl Drop for FetchLease<'_> {
    fn drop(&mut self) {
        if !self.completed {
            self.coalescer.cancel(&self.key);
        }
    }
}

/// Receiving side of a coalesced fetch.
pub struct Waiter {
    rx: broadcast::Receiver<NetworkOutcome>,
}

impl Waiter {
    /// Wait for the leader's outcome.
    pub async fn wait(mut self) -> NetworkOutcome {
        match self.rx.recv().await {
            Ok(outcome) => outcome,
            Err(_) => Err(FetchError::Network(TransportError::Abandoned)),
        }
    }
}
