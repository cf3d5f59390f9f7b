//! Codec types.

use std::fmt;
use thiserror::Error;

/// Default JPEG quality for stored images.
pub const DEFAULT_JPEG_QUALITY: u8 = 100;

/// Codec failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Bytes could not be decoded as an image
    #[error("invalid image data: {0}")]
    InvalidImageData(String),

    /// Requested size cannot be produced
    #[error("resize to {width}x{height} failed: {reason}")]
    ResizeFailed { width: u32, height: u32, reason: String },

    /// Image could not be encoded for storage
    #[error("encoding failed: {0}")]
    EncodeFailed(String),

    /// Blocking worker running the operation panicked or was cancelled
    #[error("codec worker failed: {0}")]
    Worker(String),
}

/// Exact output dimensions for a delivered image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetSize {
    pub width: u32,
    pub height: u32,
}

impl TargetSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for TargetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Encoding used when persisting images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Lossy JPEG with quality 1-100
    Jpeg { quality: u8 },
    /// Lossless PNG
    Png,
}

impl OutputFormat {
    /// File extension for stored blobs.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg { .. } => "jpg",
            OutputFormat::Png => "png",
        }
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Jpeg {
            quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Jpeg { quality } => write!(f, "jpeg (quality {})", quality),
            OutputFormat::Png => f.write_str("png"),
        }
    }
}
