//! Keys, errors and content helpers shared by the cache tiers.

use image::DynamicImage;
use std::borrow::Borrow;
use std::fmt;
use thiserror::Error;

/// Identifier of a logical image, shared by every tier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageKey(String);

impl ImageKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ImageKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ImageKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for ImageKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Memory tier errors.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The image alone exceeds the cache capacity.
    #[error("image of {size} bytes exceeds memory cache capacity of {capacity} bytes")]
    EntryTooLarge { size: usize, capacity: usize },
}

/// Number of bytes held by the image's pixel buffer.
pub fn image_size_bytes(image: &DynamicImage) -> usize {
    image.as_bytes().len()
}

/// Compare two decoded images by content.
///
/// Two independently decoded images are equal when their dimensions,
/// colour type and pixel bytes match.
pub fn same_content(a: &DynamicImage, b: &DynamicImage) -> bool {
    a.width() == b.width()
        && a.height() == b.height()
        && a.color() == b.color()
        && a.as_bytes() == b.as_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn solid(width: u32, height: u32, pixel: [u8; 3]) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(pixel)))
    }

    #[test]
    fn test_image_key_display_and_borrow() {
        let key = ImageKey::new("avatar-42");
        assert_eq!(key.to_string(), "avatar-42");
        assert_eq!(key.as_str(), "avatar-42");

        let borrowed: &str = key.borrow();
        assert_eq!(borrowed, "avatar-42");
    }

    #[test]
    fn test_image_key_from_conversions() {
        assert_eq!(ImageKey::from("a"), ImageKey::from("a".to_string()));
    }

    #[test]
    fn test_same_content_independent_copies() {
        let a = solid(4, 4, [10, 20, 30]);
        let b = solid(4, 4, [10, 20, 30]);
        assert!(same_content(&a, &b));
    }

    #[test]
    fn test_same_content_differs_on_pixels() {
        let a = solid(4, 4, [10, 20, 30]);
        let b = solid(4, 4, [10, 20, 31]);
        assert!(!same_content(&a, &b));
    }

    #[test]
    fn test_same_content_differs_on_dimensions() {
        // 2x8 and 4x4 share a buffer length
        let a = solid(2, 8, [0, 0, 0]);
        let b = solid(4, 4, [0, 0, 0]);
        assert!(!same_content(&a, &b));
    }

    #[test]
    fn test_same_content_differs_on_color_type() {
        let rgb = solid(2, 2, [0, 0, 0]);
        let luma = DynamicImage::ImageLuma8(image::GrayImage::new(2, 6));
        assert!(!same_content(&rgb, &luma));
    }

    #[test]
    fn test_image_size_bytes() {
        assert_eq!(image_size_bytes(&solid(4, 2, [1, 2, 3])), 4 * 2 * 3);
    }
}
