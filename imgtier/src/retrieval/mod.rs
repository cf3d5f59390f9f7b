//! Three-tier image retrieval.
//!
//! [`RetrievalCoordinator::fetch`] answers a [`FetchRequest`] from the
//! fastest tier holding the image and streams up to two [`FetchResult`]s:
//! a cached copy first, then, when `force_refresh` is set and the network
//! copy differs, the fresh one.
//!
//! ```no_run
//! use futures::StreamExt;
//! use imgtier::fetch::{HttpFetcher, TransportRequest};
//! use imgtier::retrieval::{CoordinatorBuilder, FetchOptions, FetchRequest};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let coordinator = CoordinatorBuilder::new(HttpFetcher::new()?).build();
//!
//! let request = FetchRequest::new("logo", TransportRequest::get("https://example.com/logo.png"))
//!     .with_options(FetchOptions::cache_everywhere().force_refresh(true));
//!
//! let mut deliveries = coordinator.fetch(request);
//! while let Some(item) = deliveries.next().await {
//!     let result = item?;
//!     println!("{} from {}", result.key, result.origin);
//! }
//! # Ok(())
//! # }
//! ```

mod builder;
mod coordinator;
mod request;
mod response;
mod stats;
mod stream;

pub use builder::CoordinatorBuilder;
pub use coordinator::RetrievalCoordinator;
pub use request::{FetchOptions, FetchRequest};
pub use response::{FetchError, FetchResult, ImageOrigin};
pub use stats::RetrievalStats;
pub use stream::{FetchItem, FetchStream};
