//! Whole-raster resizing.
//!
//! Thin wrappers over `image::imageops::resize`. Sub-rectangle resampling
//! lives in [`crate::compose`].

use super::{FilterType, Raster};
use crate::compose::ComposeError;

/// Resize a raster to exact dimensions.
///
/// # Errors
///
/// Returns `ComposeError::InvalidTarget` for a zero target dimension and
/// `ComposeError::EmptySource` for an empty input.
pub fn resize(
    raster: &Raster,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<Raster, ComposeError> {
    if width == 0 || height == 0 {
        return Err(ComposeError::InvalidTarget { width, height });
    }

    if raster.width == width && raster.height == height {
        return Ok(raster.clone());
    }

    let rgb = raster.to_rgb_image().ok_or(ComposeError::EmptySource)?;
    let resized = image::imageops::resize(&rgb, width, height, filter.to_image_filter());
    Ok(Raster::from_rgb_image(resized))
}

/// Resize a raster so its longest edge is at most `max_edge`, keeping the
/// aspect ratio. Rasters that already fit are returned unchanged.
pub fn resize_to_fit(
    raster: &Raster,
    max_edge: u32,
    filter: FilterType,
) -> Result<Raster, ComposeError> {
    if max_edge == 0 {
        return Err(ComposeError::InvalidTarget {
            width: 0,
            height: 0,
        });
    }
    if raster.width <= max_edge && raster.height <= max_edge {
        return Ok(raster.clone());
    }

    let (w, h) = fit_dimensions(raster.width, raster.height, max_edge);
    resize(raster, w, h, filter)
}

fn fit_dimensions(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (0, 0);
    }

    let ratio = width as f64 / height as f64;
    if width >= height {
        let h = (max_edge as f64 / ratio).round() as u32;
        (max_edge, h.max(1))
    } else {
        let w = (max_edge as f64 * ratio).round() as u32;
        (w.max(1), max_edge)
    }
}
