//! Pixel-reveal WASM bindings.
//!
//! The host drives the animation from `requestAnimationFrame`, calling
//! `advance_to` with the elapsed time and drawing `frame_rgba()`.

use crate::types::JsRaster;
use infizoom_core::reveal::{PixelReveal, RevealState};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use wasm_bindgen::prelude::*;

/// A running pixel reveal.
#[wasm_bindgen]
pub struct JsPixelReveal {
    inner: PixelReveal,
}

#[wasm_bindgen]
impl JsPixelReveal {
    /// Reveal `high` over `low` in `steps` chunks. `seed` fixes the pixel
    /// order.
    #[wasm_bindgen(constructor)]
    pub fn new(low: &JsRaster, high: &JsRaster, steps: u32, seed: u32) -> Result<JsPixelReveal, JsValue> {
        let mut rng = SmallRng::seed_from_u64(seed as u64);
        PixelReveal::new(low.to_raster(), high.to_raster(), steps, &mut rng)
            .map(JsPixelReveal::from_reveal)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Reveal one chunk. Returns whether the animation is still running.
    pub fn tick(&mut self) -> bool {
        self.inner.tick() == RevealState::Running
    }

    /// Catch up to `elapsed_ms` of a `duration_ms` reveal. Returns whether
    /// the animation is still running.
    pub fn advance_to(&mut self, elapsed_ms: f64, duration_ms: f64) -> bool {
        self.inner.advance_to(elapsed_ms, duration_ms) == RevealState::Running
    }

    pub fn finish(&mut self) {
        self.inner.finish();
    }

    /// Stop the animation without completing it.
    pub fn cancel(&mut self) {
        self.inner.cancel();
    }

    #[wasm_bindgen(getter)]
    pub fn progress(&self) -> f64 {
        self.inner.progress()
    }

    #[wasm_bindgen(getter)]
    pub fn is_complete(&self) -> bool {
        self.inner.state() == RevealState::Complete
    }

    pub fn frame(&self) -> JsRaster {
        JsRaster::from_raster(self.inner.frame().clone())
    }

    /// Current frame as RGBA, ready for `ImageData`.
    pub fn frame_rgba(&self) -> Vec<u8> {
        self.inner.frame().to_rgba()
    }
}

impl JsPixelReveal {
    pub(crate) fn from_reveal(inner: PixelReveal) -> Self {
        Self { inner }
    }
}
