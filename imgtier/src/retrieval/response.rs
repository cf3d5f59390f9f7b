//! Results delivered to callers.

use crate::cache::ImageKey;
use crate::fetch::TransportError;
use image::DynamicImage;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Tier that produced a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageOrigin {
    Memory,
    Disk,
    Network,
}

impl fmt::Display for ImageOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImageOrigin::Memory => "memory",
            ImageOrigin::Disk => "disk",
            ImageOrigin::Network => "network",
        };
        f.write_str(name)
    }
}

/// One delivery for a request.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub key: ImageKey,
    /// Delivered image, resized when the request asked for a size.
    pub image: Arc<DynamicImage>,
    pub origin: ImageOrigin,
}

/// Terminal failure of a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The network fetch failed
    #[error("network error: {0}")]
    Network(#[from] TransportError),

    /// The network returned bytes that are not an image
    #[error("invalid image data: {0}")]
    InvalidImageData(String),
}
