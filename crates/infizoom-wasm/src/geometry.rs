//! Geometry WASM bindings.
//!
//! Letterbox fitting and the screen-to-source mapping the canvas layer needs
//! to turn pointer input into selections. Rectangles cross the boundary as
//! `[x, y, w, h]` arrays.

use crate::types::rect_to_vec;
use infizoom_core::geometry::{self, Letterbox, Rect, Screen};
use wasm_bindgen::prelude::*;

/// Where an image is drawn inside the canvas.
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct JsLetterbox {
    inner: Letterbox,
}

#[wasm_bindgen]
impl JsLetterbox {
    #[wasm_bindgen(constructor)]
    pub fn new(draw_w: f64, draw_h: f64, offset_x: f64, offset_y: f64) -> JsLetterbox {
        JsLetterbox {
            inner: Letterbox {
                draw_w,
                draw_h,
                offset_x,
                offset_y,
            },
        }
    }

    #[wasm_bindgen(getter)]
    pub fn draw_w(&self) -> f64 {
        self.inner.draw_w
    }

    #[wasm_bindgen(getter)]
    pub fn draw_h(&self) -> f64 {
        self.inner.draw_h
    }

    #[wasm_bindgen(getter)]
    pub fn offset_x(&self) -> f64 {
        self.inner.offset_x
    }

    #[wasm_bindgen(getter)]
    pub fn offset_y(&self) -> f64 {
        self.inner.offset_y
    }

    /// Map a screen rectangle into the pixels of an image `image_w` wide.
    pub fn to_source(&self, x: f64, y: f64, w: f64, h: f64, image_w: f64) -> Vec<f64> {
        rect_to_vec(&self.inner.to_source(Rect::<Screen>::new(x, y, w, h), image_w))
    }

    /// Map a source rectangle back onto the canvas, for overlays.
    pub fn to_screen(&self, x: f64, y: f64, w: f64, h: f64, image_w: f64) -> Vec<f64> {
        rect_to_vec(&self.inner.to_screen(Rect::new(x, y, w, h), image_w))
    }
}

impl JsLetterbox {
    pub(crate) fn letterbox(&self) -> &Letterbox {
        &self.inner
    }
}

/// Fit an image of aspect `inner_aspect` (width / height) centered inside
/// an `outer_w x outer_h` canvas.
#[wasm_bindgen]
pub fn scale_to_fit(outer_w: f64, outer_h: f64, inner_aspect: f64) -> JsLetterbox {
    JsLetterbox {
        inner: geometry::scale_to_fit(outer_w, outer_h, inner_aspect),
    }
}

/// Inverse-map a screen rectangle into source pixels.
#[wasm_bindgen]
pub fn screen_to_source(x: f64, y: f64, w: f64, h: f64, scale: f64, offset_x: f64, offset_y: f64) -> Vec<f64> {
    rect_to_vec(&geometry::to_source_space(
        Rect::new(x, y, w, h),
        scale,
        offset_x,
        offset_y,
    ))
}

/// The click-to-zoom box: `fraction` of the image on each axis, centered on
/// the click and shifted inside the image.
#[wasm_bindgen]
pub fn fixed_box_at(
    click_x: f64,
    click_y: f64,
    fraction: f64,
    image_w: f64,
    image_h: f64,
) -> Result<Vec<f64>, JsValue> {
    geometry::fixed_box_at(click_x, click_y, fraction, image_w, image_h)
        .map(|rect| rect_to_vec(&rect))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Cubic ease-in-out, for hosts animating their own transitions.
#[wasm_bindgen]
pub fn ease_in_out_cubic(t: f64) -> f64 {
    geometry::ease_in_out_cubic(t)
}
