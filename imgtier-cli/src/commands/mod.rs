//! CLI command implementations.
//!
//! - [`fetch`] - Run one request through the tiers
//! - [`cache`] - Blob store maintenance (clear, init, path)
//! - [`config`] - Configuration file (path, show, init)

pub mod cache;
pub mod config;
pub mod fetch;
