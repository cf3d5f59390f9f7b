//! imgtier - three-tier image retrieval and caching
//!
//! Images are looked up by key in an in-memory cache, then in a blob store
//! on disk, then fetched from the network. A request may be answered twice:
//! once from a cache tier and again with a fresher network copy when asked
//! to refresh. Concurrent network fetches for the same key are coalesced.
//!
//! # Layout
//!
//! - [`cache`]: decoded images in memory, LRU bounded by bytes
//! - [`store`]: encoded bytes on disk
//! - [`fetch`]: network transport
//! - [`codec`]: decode, encode and resize
//! - [`coalesce`]: one in-flight fetch per key
//! - [`retrieval`]: the coordinator tying the tiers together
//! - [`config`], [`log`], [`logging`]: configuration and diagnostics
//!
//! # Example
//!
//! ```ignore
//! use imgtier::config::ConfigFile;
//! use imgtier::retrieval::{CoordinatorBuilder, FetchRequest};
//!
//! let config = ConfigFile::load()?;
//! let coordinator = CoordinatorBuilder::from_config(&config)?.build();
//! let deliveries = coordinator.fetch(request).collect_all().await;
//! ```

pub mod cache;
pub mod coalesce;
pub mod codec;
pub mod config;
pub mod fetch;
pub mod log;
pub mod logging;
pub mod retrieval;
pub mod store;

/// Version of the imgtier library and CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
