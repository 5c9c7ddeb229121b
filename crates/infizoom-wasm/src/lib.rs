//! Infizoom WASM - WebAssembly bindings for Infizoom
//!
//! This crate exposes the infizoom-core zoom-and-enhance pipeline to
//! JavaScript/TypeScript applications. The browser side owns the canvas, the
//! animation clock and the network calls to the describe and enhance
//! services; everything else runs here.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for raster data
//! - `geometry` - Letterbox fitting and screen-to-image mapping
//! - `decode` - Image loading and resizing
//! - `session` - The zoom session and its host-driven enhancement jobs
//! - `reveal` - The pixel-reveal animation
//!
//! # Usage
//!
//! ```typescript
//! import init, { decode_image, scale_to_fit, JsZoomSession } from '@infizoom/wasm';
//!
//! await init();
//!
//! const session = new JsZoomSession();
//! session.load_bytes(new Uint8Array(await file.arrayBuffer()));
//! const image = session.current_image();
//! const letterbox = scale_to_fit(canvas.width, canvas.height, image.width / image.height);
//! ```

use wasm_bindgen::prelude::*;

mod decode;
mod geometry;
mod reveal;
mod session;
mod types;

pub use decode::{decode_image, resize, resize_to_fit};
pub use geometry::{ease_in_out_cubic, fixed_box_at, scale_to_fit, screen_to_source, JsLetterbox};
pub use reveal::JsPixelReveal;
pub use session::{JsEnhancementJob, JsZoomSession};
pub use types::JsRaster;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
