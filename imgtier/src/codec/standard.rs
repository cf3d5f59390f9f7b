//! Codec trait and the `image`-crate implementation.

use super::types::{CodecError, OutputFormat, TargetSize};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

/// Image decoding, encoding and resizing.
///
/// All operations are pure and CPU-bound. Implementations must be
/// thread-safe since the coordinator calls them from the blocking pool.
pub trait ImageCodec: Send + Sync {
    /// Decode encoded bytes into an image.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidImageData`] when the bytes are not a
    /// supported image.
    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, CodecError>;

    /// Encode an image in this codec's storage format.
    fn encode(&self, image: &DynamicImage) -> Result<Vec<u8>, CodecError>;

    /// Produce a copy of `image` at exactly `size`. The input is untouched.
    fn resize(&self, image: &DynamicImage, size: TargetSize) -> Result<DynamicImage, CodecError>;

    /// File extension matching [`ImageCodec::encode`] output.
    fn extension(&self) -> &str;
}

/// Codec backed by the `image` crate.
///
/// Decoding sniffs the format from the bytes. Encoding uses the fixed
/// [`OutputFormat`] chosen at construction.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardCodec {
    format: OutputFormat,
}

impl StandardCodec {
    pub fn new(format: OutputFormat) -> Self {
        let format = match format {
            OutputFormat::Jpeg { quality } => OutputFormat::Jpeg {
                quality: quality.clamp(1, 100),
            },
            other => other,
        };
        Self { format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

impl ImageCodec for StandardCodec {
    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, CodecError> {
        image::load_from_memory(bytes).map_err(|e| CodecError::InvalidImageData(e.to_string()))
    }

    fn encode(&self, image: &DynamicImage) -> Result<Vec<u8>, CodecError> {
        let mut buffer = Vec::new();
        match self.format {
            OutputFormat::Jpeg { quality } => {
                // JPEG has no alpha channel.
                let rgb = image.to_rgb8();
                JpegEncoder::new_with_quality(&mut buffer, quality)
                    .encode_image(&rgb)
                    .map_err(|e| CodecError::EncodeFailed(e.to_string()))?;
            }
            OutputFormat::Png => {
                image
                    .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
                    .map_err(|e| CodecError::EncodeFailed(e.to_string()))?;
            }
        }
        Ok(buffer)
    }

    fn resize(&self, image: &DynamicImage, size: TargetSize) -> Result<DynamicImage, CodecError> {
        if size.width == 0 || size.height == 0 {
            return Err(CodecError::ResizeFailed {
                width: size.width,
                height: size.height,
                reason: "dimensions must be non-zero".to_string(),
            });
        }
        if image.width() == size.width && image.height() == size.height {
            return Ok(image.clone());
        }
        Ok(image.resize_exact(size.width, size.height, FilterType::Triangle))
    }

    fn extension(&self) -> &str {
        self.format.extension()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::same_content;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 16) as u8, (y * 16) as u8, 128])
        }))
    }

    #[test]
    fn test_png_round_trip_is_lossless() {
        let codec = StandardCodec::new(OutputFormat::Png);
        let original = gradient(12, 9);

        let bytes = codec.encode(&original).unwrap();
        let decoded = codec.decode(&bytes).unwrap();

        assert!(same_content(&original, &decoded));
    }

    #[test]
    fn test_jpeg_round_trip_keeps_dimensions() {
        let codec = StandardCodec::default();
        let original = gradient(16, 8);

        let bytes = codec.encode(&original).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8], "JPEG SOI marker");

        let decoded = codec.decode(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 8));
    }

    #[test]
    fn test_jpeg_drops_alpha() {
        let codec = StandardCodec::new(OutputFormat::Jpeg { quality: 80 });
        let rgba = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 40])));

        let decoded = codec.decode(&codec.encode(&rgba).unwrap()).unwrap();

        assert!(!decoded.color().has_alpha());
    }

    #[test]
    fn test_decode_garbage_is_invalid_image_data() {
        let codec = StandardCodec::default();
        let result = codec.decode(b"definitely not an image");
        assert!(matches!(result, Err(CodecError::InvalidImageData(_))));
    }

    #[test]
    fn test_resize_exact_dimensions() {
        let codec = StandardCodec::default();
        let original = gradient(20, 10);

        let resized = codec.resize(&original, TargetSize::new(7, 3)).unwrap();

        assert_eq!((resized.width(), resized.height()), (7, 3));
        assert_eq!((original.width(), original.height()), (20, 10));
    }

    #[test]
    fn test_resize_zero_dimension_fails() {
        let codec = StandardCodec::default();
        let result = codec.resize(&gradient(4, 4), TargetSize::new(0, 4));
        assert!(matches!(result, Err(CodecError::ResizeFailed { width: 0, .. })));
    }

    #[test]
    fn test_quality_is_clamped() {
        let codec = StandardCodec::new(OutputFormat::Jpeg { quality: 0 });
        assert_eq!(codec.format(), OutputFormat::Jpeg { quality: 1 });
        assert_eq!(codec.extension(), "jpg");
    }

    #[test]
    fn test_png_extension() {
        assert_eq!(StandardCodec::new(OutputFormat::Png).extension(), "png");
    }
}
