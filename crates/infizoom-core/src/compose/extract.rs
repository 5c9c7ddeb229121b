//! Sub-rectangle extraction with nearest or bilinear sampling.
//!
//! # Algorithm
//!
//! Inverse mapping: for each output pixel `(i, j)` we locate the center of
//! the matching cell inside the source rectangle,
//!
//! ```text
//! u = rect.x + (i + 0.5) * rect.w / target_w
//! v = rect.y + (j + 0.5) * rect.h / target_h
//! ```
//!
//! and sample the source there. Coordinates past the raster edge are clamped
//! to the nearest edge pixel, so a rectangle that touches the border never
//! bleeds black into the result.

use super::{ComposeError, Sampling};
use crate::geometry::{PixelSpace, Rect};
use crate::raster::Raster;

/// Resample `rect` of `source` into a new `target_w x target_h` raster.
///
/// `Sampling::Nearest` keeps hard block edges (the pixelated preview) and
/// `Sampling::Smooth` interpolates. Output is deterministic for identical
/// inputs.
///
/// # Errors
///
/// Returns `ComposeError` when the target has a zero dimension, the source
/// is empty or its buffer is short, or the rectangle has no area.
pub fn extract_raster<S: PixelSpace>(
    source: &Raster,
    rect: &Rect<S>,
    target_w: u32,
    target_h: u32,
    sampling: Sampling,
) -> Result<Raster, ComposeError> {
    if target_w == 0 || target_h == 0 {
        return Err(ComposeError::InvalidTarget {
            width: target_w,
            height: target_h,
        });
    }
    if source.is_empty() {
        return Err(ComposeError::EmptySource);
    }
    if source.check_buffer().is_err() {
        return Err(ComposeError::MalformedSource {
            width: source.width,
            height: source.height,
            actual: source.pixels.len(),
        });
    }
    if rect.is_empty() {
        return Err(ComposeError::EmptyRegion {
            w: rect.w,
            h: rect.h,
        });
    }

    let step_x = rect.w / target_w as f64;
    let step_y = rect.h / target_h as f64;
    let mut output = Raster::new(
        target_w,
        target_h,
        vec![0u8; (target_w as usize) * (target_h as usize) * 3],
    );

    for j in 0..target_h {
        let v = rect.y + (j as f64 + 0.5) * step_y;
        for i in 0..target_w {
            let u = rect.x + (i as f64 + 0.5) * step_x;
            let pixel = match sampling {
                Sampling::Nearest => sample_nearest(source, u, v),
                // Pixel centers sit at +0.5, the interpolator works on integer centers
                Sampling::Smooth => sample_bilinear(source, u - 0.5, v - 0.5),
            };
            output.put_pixel(i, j, pixel);
        }
    }

    Ok(output)
}

/// Smoothly upscale `rect` of `source` by `factor`.
///
/// This is the degrade path of the enhancement pipeline: a plain resample of
/// the selection with no generated detail.
pub fn upscale<S: PixelSpace>(
    source: &Raster,
    rect: &Rect<S>,
    factor: f64,
) -> Result<Raster, ComposeError> {
    let w = (rect.w * factor).round().max(1.0) as u32;
    let h = (rect.h * factor).round().max(1.0) as u32;
    extract_raster(source, rect, w, h, Sampling::Smooth)
}

#[inline]
fn clamp_index(v: f64, len: u32) -> u32 {
    if v <= 0.0 {
        0
    } else {
        (v as u32).min(len - 1)
    }
}

#[inline]
fn pixel_f64(source: &Raster, x: u32, y: u32) -> [f64; 3] {
    let p = source.pixel(x, y);
    [p[0] as f64, p[1] as f64, p[2] as f64]
}

fn sample_nearest(source: &Raster, u: f64, v: f64) -> [u8; 3] {
    source.pixel(
        clamp_index(u.floor(), source.width),
        clamp_index(v.floor(), source.height),
    )
}

/// Bilinear sample around integer pixel centers, clamped at the edges.
fn sample_bilinear(source: &Raster, x: f64, y: f64) -> [u8; 3] {
    let max_x = (source.width - 1) as f64;
    let max_y = (source.height - 1) as f64;
    let x = x.clamp(0.0, max_x);
    let y = y.clamp(0.0, max_y);

    let x0 = x.floor() as u32;
    let y0 = y.floor() as u32;
    let x1 = (x0 + 1).min(source.width - 1);
    let y1 = (y0 + 1).min(source.height - 1);
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = pixel_f64(source, x0, y0);
    let p10 = pixel_f64(source, x1, y0);
    let p01 = pixel_f64(source, x0, y1);
    let p11 = pixel_f64(source, x1, y1);

    let mut result = [0u8; 3];
    for c in 0..3 {
        let v = p00[c] * (1.0 - fx) * (1.0 - fy)
            + p10[c] * fx * (1.0 - fy)
            + p01[c] * (1.0 - fx) * fy
            + p11[c] * fx * fy;
        result[c] = v.clamp(0.0, 255.0).round() as u8;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Crop, Source};

    /// Create a test raster where each pixel encodes its position.
    fn test_raster(width: u32, height: u32) -> Raster {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push((x % 256) as u8);
                pixels.push((y % 256) as u8);
                pixels.push(((x + y) % 256) as u8);
            }
        }
        Raster::new(width, height, pixels)
    }

    #[test]
    fn test_extract_integer_region_nearest_is_exact_copy() {
        let src = test_raster(20, 20);
        let rect = Rect::<Source>::new(3.0, 4.0, 5.0, 6.0);
        let out = extract_raster(&src, &rect, 5, 6, Sampling::Nearest).unwrap();
        assert_eq!((out.width, out.height), (5, 6));
        for y in 0..6 {
            for x in 0..5 {
                assert_eq!(out.pixel(x, y), src.pixel(x + 3, y + 4));
            }
        }
    }

    #[test]
    fn test_extract_integer_region_bilinear_is_exact_copy() {
        let src = test_raster(20, 20);
        let rect = Rect::<Source>::new(2.0, 2.0, 8.0, 8.0);
        let out = extract_raster(&src, &rect, 8, 8, Sampling::Smooth).unwrap();
        assert_eq!(out.pixel(0, 0), src.pixel(2, 2));
        assert_eq!(out.pixel(7, 7), src.pixel(9, 9));
    }

    #[test]
    fn test_nearest_upscale_is_blocky() {
        let src = test_raster(4, 4);
        let rect = Rect::<Source>::new(0.0, 0.0, 2.0, 2.0);
        let out = extract_raster(&src, &rect, 8, 8, Sampling::Nearest).unwrap();
        // Each source pixel becomes a 4x4 block
        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(out.pixel(x, y), src.pixel(x / 4, y / 4));
            }
        }
    }

    #[test]
    fn test_extract_is_deterministic() {
        let src = test_raster(50, 40);
        let rect = Rect::<Crop>::new(3.3, 7.7, 20.5, 11.25);
        let a = extract_raster(&src, &rect, 37, 19, Sampling::Smooth).unwrap();
        let b = extract_raster(&src, &rect, 37, 19, Sampling::Smooth).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_extract_edge_rect_does_not_go_black() {
        let src = Raster::filled(10, 10, [200, 200, 200]);
        let rect = Rect::<Source>::new(0.0, 0.0, 10.0, 10.0);
        for sampling in [Sampling::Nearest, Sampling::Smooth] {
            let out = extract_raster(&src, &rect, 23, 17, sampling).unwrap();
            assert!(out.pixels.iter().all(|&v| v == 200), "{:?} bled at edge", sampling);
        }
    }

    #[test]
    fn test_extract_errors() {
        let src = test_raster(10, 10);
        let rect = Rect::<Source>::new(0.0, 0.0, 5.0, 5.0);
        assert!(matches!(
            extract_raster(&src, &rect, 0, 5, Sampling::Nearest),
            Err(ComposeError::InvalidTarget { .. })
        ));
        assert!(matches!(
            extract_raster(&Raster::new(0, 0, vec![]), &rect, 5, 5, Sampling::Nearest),
            Err(ComposeError::EmptySource)
        ));
        let empty = Rect::<Source>::new(1.0, 1.0, 0.0, 5.0);
        assert!(matches!(
            extract_raster(&src, &empty, 5, 5, Sampling::Nearest),
            Err(ComposeError::EmptyRegion { .. })
        ));
    }

    #[test]
    fn test_upscale_doubles_fractional_selection() {
        let src = test_raster(800, 600);
        let rect = Rect::<Source>::new(350.0, 262.5, 100.0, 75.0);
        let out = upscale(&src, &rect, 2.0).unwrap();
        assert_eq!((out.width, out.height), (200, 150));
    }

    #[test]
    fn test_upscale_blends_the_selected_region() {
        // Odd columns bright, green channel tracks the row
        let mut src = Raster::filled(800, 600, [0, 0, 0]);
        for y in 0..600 {
            for x in 0..800 {
                let r = if x % 2 == 1 { 200 } else { 0 };
                src.put_pixel(x, y, [r, (y % 256) as u8, 0]);
            }
        }
        let rect = Rect::<Source>::new(350.0, 262.5, 100.0, 75.0);
        let out = upscale(&src, &rect, 2.0).unwrap();

        // Bilinear between a dark and a bright column; nearest would give 0 or 200
        let reds: Vec<u8> = (0..4).map(|x| out.pixel(x, 0)[0]).collect();
        assert_eq!(reds, vec![50, 50, 150, 150]);
        // Rows 262.25 and 336.75 of the source
        assert_eq!(out.pixel(0, 0)[1], 6);
        assert_eq!(out.pixel(0, 149)[1], 81);
    }

    #[test]
    fn test_extract_rejects_short_buffer() {
        let src = Raster {
            width: 10,
            height: 10,
            pixels: vec![0u8; 12],
        };
        let rect = Rect::<Source>::new(0.0, 0.0, 5.0, 5.0);
        assert!(matches!(
            extract_raster(&src, &rect, 5, 5, Sampling::Smooth),
            Err(ComposeError::MalformedSource { actual: 12, .. })
        ));
    }
}
