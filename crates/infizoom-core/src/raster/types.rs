//! Core raster types.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shared, immutable handle to a raster.
///
/// History steps own their images through this handle; the orchestrator and
/// the animators clone it for the duration of their work.
pub type RasterHandle = Arc<Raster>;

/// Error types for loading an image into a raster.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The bytes are not an image format we can read.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The image data is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    /// The decoded image has no pixels.
    #[error("Decoded image is empty ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    /// A raw pixel buffer does not match the stated dimensions.
    #[error("Pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSizeMismatch { expected: usize, actual: usize },
}

/// Resampling filter for resize operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterType {
    /// Nearest neighbor. Keeps hard pixel edges, used for pixelated previews.
    Nearest,
    /// Bilinear interpolation.
    #[default]
    Bilinear,
    /// Lanczos3 interpolation (slower, highest quality).
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Orientation {
    #[default]
    Normal = 1,
    FlipHorizontal = 2,
    Rotate180 = 3,
    FlipVertical = 4,
    /// Flip horizontal + rotate 270 CW.
    Transpose = 5,
    Rotate90CW = 6,
    /// Flip horizontal + rotate 90 CW.
    Transverse = 7,
    Rotate270CW = 8,
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}

/// An RGB raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGB pixel data in row-major order (3 bytes per pixel).
    /// Length should be width * height * 3.
    pub pixels: Vec<u8>,
}

impl Raster {
    /// Create a new Raster with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            (width as usize) * (height as usize) * 3,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a raster from untrusted pixel data.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::BufferSizeMismatch` when `pixels` is not
    /// `width * height * 3` bytes long.
    pub fn try_new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, DecodeError> {
        let raster = Self {
            width,
            height,
            pixels,
        };
        raster.check_buffer()?;
        Ok(raster)
    }

    /// Verify the pixel buffer length matches the dimensions.
    pub fn check_buffer(&self) -> Result<(), DecodeError> {
        let expected = self.pixel_count() * 3;
        if self.pixels.len() != expected {
            return Err(DecodeError::BufferSizeMismatch {
                expected,
                actual: self.pixels.len(),
            });
        }
        Ok(())
    }

    /// Create a raster filled with a single color.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let count = (width as usize) * (height as usize);
        let mut pixels = Vec::with_capacity(count * 3);
        for _ in 0..count {
            pixels.extend_from_slice(&rgb);
        }
        Self::new(width, height, pixels)
    }

    /// Create a Raster from an image::RgbImage.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// Convert to an image::RgbImage for further processing.
    pub fn to_rgb_image(&self) -> Option<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// Wrap this raster in a shared handle.
    pub fn into_handle(self) -> RasterHandle {
        Arc::new(self)
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Whether this raster has no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }

    /// Whether both rasters have the same dimensions.
    pub fn same_size(&self, other: &Raster) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Read the RGB value at (x, y).
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let idx = ((y as usize) * (self.width as usize) + x as usize) * 3;
        [self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]]
    }

    /// Write the RGB value at (x, y).
    #[inline]
    pub fn put_pixel(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        let idx = ((y as usize) * (self.width as usize) + x as usize) * 3;
        self.pixels[idx..idx + 3].copy_from_slice(&rgb);
    }

    /// Expand to RGBA with full opacity.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixel_count() * 4);
        for px in self.pixels.chunks_exact(3) {
            out.extend_from_slice(&[px[0], px[1], px[2], 255]);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_type_conversion() {
        assert!(matches!(
            FilterType::Nearest.to_image_filter(),
            image::imageops::FilterType::Nearest
        ));
        assert!(matches!(
            FilterType::Bilinear.to_image_filter(),
            image::imageops::FilterType::Triangle
        ));
        assert!(matches!(
            FilterType::Lanczos3.to_image_filter(),
            image::imageops::FilterType::Lanczos3
        ));
    }

    #[test]
    fn test_orientation_from_u32() {
        assert_eq!(Orientation::from(1), Orientation::Normal);
        assert_eq!(Orientation::from(6), Orientation::Rotate90CW);
        assert_eq!(Orientation::from(99), Orientation::Normal);
    }

    #[test]
    fn test_raster_filled() {
        let r = Raster::filled(4, 3, [10, 20, 30]);
        assert_eq!(r.pixel_count(), 12);
        assert_eq!(r.pixels.len(), 36);
        assert_eq!(r.pixel(3, 2), [10, 20, 30]);
        assert!(!r.is_empty());
    }

    #[test]
    fn test_raster_put_pixel() {
        let mut r = Raster::filled(2, 2, [0, 0, 0]);
        r.put_pixel(1, 1, [1, 2, 3]);
        assert_eq!(r.pixel(1, 1), [1, 2, 3]);
        assert_eq!(r.pixel(0, 1), [0, 0, 0]);
    }

    #[test]
    fn test_try_new_rejects_short_buffer() {
        let result = Raster::try_new(800, 600, vec![0u8; 10]);
        assert!(matches!(
            result,
            Err(DecodeError::BufferSizeMismatch {
                expected: 1_440_000,
                actual: 10
            })
        ));
        assert!(Raster::try_new(2, 1, vec![0u8; 6]).is_ok());
    }

    #[test]
    fn test_check_buffer_catches_tampered_pixels() {
        let mut r = Raster::filled(3, 3, [1, 1, 1]);
        assert!(r.check_buffer().is_ok());
        r.pixels.truncate(5);
        assert!(r.check_buffer().is_err());
    }

    #[test]
    fn test_raster_empty() {
        let r = Raster::new(0, 0, vec![]);
        assert!(r.is_empty());
    }

    #[test]
    fn test_to_rgba() {
        let r = Raster::new(1, 1, vec![5, 6, 7]);
        assert_eq!(r.to_rgba(), vec![5, 6, 7, 255]);
    }

    #[test]
    fn test_rgb_image_round_trip_dimensions() {
        let r = Raster::filled(5, 7, [1, 1, 1]);
        let img = r.to_rgb_image().unwrap();
        assert_eq!(img.dimensions(), (5, 7));
        assert_eq!(Raster::from_rgb_image(img), r);
    }

    #[test]
    fn test_decode_error_display() {
        let err = DecodeError::EmptyImage {
            width: 0,
            height: 10,
        };
        assert_eq!(err.to_string(), "Decoded image is empty (0x10)");
    }
}
