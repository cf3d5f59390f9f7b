//! Network tier.
//!
//! A [`Fetcher`] turns a [`TransportRequest`] into raw response bytes. It
//! knows nothing about caching, decoding or retries; the coordinator treats
//! the request as opaque and only inspects the outcome.

mod http;
mod types;

pub use http::{HttpFetcher, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
pub use types::{Fetcher, HttpMethod, TransportError, TransportRequest};

#[cfg(test)]
pub use http::tests::MockFetcher;
