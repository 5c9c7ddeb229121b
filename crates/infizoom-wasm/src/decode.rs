//! Image loading WASM bindings.
//!
//! # Functions
//!
//! - [`decode_image`] - Decode an uploaded JPEG or PNG, honouring EXIF orientation
//! - [`resize`] - Resize a raster to exact dimensions
//! - [`resize_to_fit`] - Resize a raster to fit within a max edge, preserving aspect ratio
//!
//! # Example
//!
//! ```typescript
//! import { decode_image, resize_to_fit } from '@infizoom/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! const preview = resize_to_fit(image, 2048, 1);
//! ```

use crate::types::{filter_from_u8, JsRaster};
use infizoom_core::raster;
use wasm_bindgen::prelude::*;

/// Decode an image file from bytes.
///
/// The format is detected from the content. EXIF orientation is applied so
/// the raster is upright.
///
/// # Errors
///
/// Returns an error if the format is unknown, the data is corrupted, or
/// the image has no pixels.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsRaster, JsValue> {
    raster::decode_image(bytes)
        .map(JsRaster::from_raster)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Resize a raster to exact dimensions.
///
/// `filter`: 0=Nearest, 1=Bilinear (default), 2=Lanczos3.
///
/// # Errors
///
/// Returns an error if width or height is zero.
#[wasm_bindgen]
pub fn resize(image: &JsRaster, width: u32, height: u32, filter: u8) -> Result<JsRaster, JsValue> {
    raster::resize(&image.to_raster(), width, height, filter_from_u8(filter))
        .map(JsRaster::from_raster)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Resize a raster so its longest edge is at most `max_edge`. Rasters that
/// already fit are returned unchanged.
#[wasm_bindgen]
pub fn resize_to_fit(image: &JsRaster, max_edge: u32, filter: u8) -> Result<JsRaster, JsValue> {
    raster::resize_to_fit(&image.to_raster(), max_edge, filter_from_u8(filter))
        .map(JsRaster::from_raster)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}


/// WASM-specific tests that require JsValue.
///
/// These can only run on wasm32 targets. Use `wasm-pack test` to run them.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_decode_invalid_bytes() {
        assert!(decode_image(&[0, 1, 2, 3]).is_err());
    }

    #[wasm_bindgen_test]
    fn test_resize_zero_fails() {
        let img = JsRaster::new(2, 2, vec![0u8; 12]).unwrap();
        assert!(resize(&img, 0, 2, 1).is_err());
    }
}
