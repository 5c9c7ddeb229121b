//! WASM-compatible wrapper types for raster data.
//!
//! This module provides JavaScript-friendly types that wrap the core Infizoom
//! types, handling the conversion between Rust and JavaScript data
//! representations.

use infizoom_core::geometry::{Rect, Space};
use infizoom_core::raster::{FilterType, Raster};
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

/// An RGB raster wrapper for JavaScript.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. When you call `pixels()` or
/// `rgba()`, a copy is made to JavaScript memory as a `Uint8Array`.
#[wasm_bindgen]
pub struct JsRaster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsRaster {
    /// Create a raster from dimensions and RGB pixel data (3 bytes per
    /// pixel, row-major order).
    ///
    /// Throws when `pixels` is not `width * height * 3` bytes long.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<JsRaster, JsValue> {
        let raster = Raster::try_new(width, height, pixels)
            .map_err(|e| JsValue::from_str(&format!("Invalid RGB data: {}", e)))?;
        Ok(JsRaster::from_raster(raster))
    }

    /// Create a raster from RGBA canvas data, dropping the alpha channel.
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Result<JsRaster, JsValue> {
        let expected = (width as usize) * (height as usize) * 4;
        if rgba.len() != expected {
            return Err(JsValue::from_str(&format!(
                "Invalid RGBA data: expected {} bytes, got {}",
                expected,
                rgba.len()
            )));
        }
        let pixels = rgba
            .chunks_exact(4)
            .flat_map(|p| [p[0], p[1], p[2]])
            .collect();
        Ok(JsRaster {
            width,
            height,
            pixels,
        })
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of bytes in the RGB buffer (width * height * 3)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGB pixel data as Uint8Array (copied).
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Returns opaque RGBA pixel data, ready for `ImageData`.
    pub fn rgba(&self) -> Vec<u8> {
        self.pixels
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect()
    }

    /// Explicitly free WASM memory.
    ///
    /// This is optional - wasm-bindgen's finalizer will handle cleanup automatically.
    pub fn free(self) {
        // Dropping self releases the memory
    }
}

impl JsRaster {
    pub(crate) fn from_raster(raster: Raster) -> Self {
        Self {
            width: raster.width,
            height: raster.height,
            pixels: raster.pixels,
        }
    }

    /// Convert to a core Raster. Clones the pixel data.
    ///
    /// Every constructor checks the buffer length, so the result is well
    /// formed.
    pub(crate) fn to_raster(&self) -> Raster {
        Raster::new(self.width, self.height, self.pixels.clone())
    }
}

/// Convert a u8 filter type value to the core FilterType enum.
///
/// Values:
/// - 0 = Nearest (pixelated)
/// - 1 = Bilinear (smooth)
/// - 2 = Lanczos3 (best quality, slowest)
///
/// Any other value defaults to Bilinear.
pub(crate) fn filter_from_u8(value: u8) -> FilterType {
    match value {
        0 => FilterType::Nearest,
        2 => FilterType::Lanczos3,
        _ => FilterType::Bilinear,
    }
}

/// Flatten a rectangle to `[x, y, w, h]` for JavaScript.
pub(crate) fn rect_to_vec<S: Space>(rect: &Rect<S>) -> Vec<f64> {
    vec![rect.x, rect.y, rect.w, rect.h]
}

/// Deserialize an optional config object; `undefined` or `null` gives the
/// defaults, and missing fields keep their default values.
pub(crate) fn config_from_js<T: DeserializeOwned + Default>(value: JsValue) -> Result<T, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_constructor_rejects_short_buffer() {
        assert!(JsRaster::new(800, 600, vec![0u8; 10]).is_err());
    }

    #[wasm_bindgen_test]
    fn test_from_rgba_rejects_short_buffer() {
        assert!(JsRaster::from_rgba(2, 2, &[0u8; 3]).is_err());
    }
}
