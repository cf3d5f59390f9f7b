//! Image codec: bytes to pixels and back, plus resizing.
//!
//! # Example
//!
//! ```
//! use imgtier::codec::{ImageCodec, OutputFormat, StandardCodec, TargetSize};
//! use image::{DynamicImage, RgbImage};
//! use std::sync::Arc;
//!
//! let codec: Arc<dyn ImageCodec> = Arc::new(StandardCodec::new(OutputFormat::Png));
//! assert_eq!(codec.extension(), "png");
//!
//! let image = DynamicImage::ImageRgb8(RgbImage::new(8, 4));
//! let thumb = codec.resize(&image, TargetSize::new(2, 1)).unwrap();
//! assert_eq!((thumb.width(), thumb.height()), (2, 1));
//! ```

mod standard;
mod types;

pub use standard::{ImageCodec, StandardCodec};
pub use types::{CodecError, OutputFormat, TargetSize, DEFAULT_JPEG_QUALITY};
