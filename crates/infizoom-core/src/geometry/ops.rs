//! Bounds-aware rectangle operations on source-image selections.

use super::{Crop, GeometryError, Rect, Source};

/// Shift a fixed-size box so it lies inside `[0, bounds_w] x [0, bounds_h]`.
///
/// The box is moved, never resized.
///
/// # Errors
///
/// Returns `GeometryError::BoxExceedsBounds` when the box is wider or taller
/// than the bounds, since no shift can make it fit.
pub fn clamp_box_to_bounds(
    rect: Rect<Source>,
    bounds_w: f64,
    bounds_h: f64,
) -> Result<Rect<Source>, GeometryError> {
    if rect.w > bounds_w || rect.h > bounds_h {
        return Err(GeometryError::BoxExceedsBounds {
            box_w: rect.w,
            box_h: rect.h,
            bounds_w,
            bounds_h,
        });
    }

    let x = rect.x.min(bounds_w - rect.w).max(0.0);
    let y = rect.y.min(bounds_h - rect.h).max(0.0);
    Ok(Rect::new(x, y, rect.w, rect.h))
}

/// Build the fixed-size selection box for a click.
///
/// The box spans `fraction` of the image on each axis, is centered on the
/// click point, and is then shifted inside the image.
pub fn fixed_box_at(
    click_x: f64,
    click_y: f64,
    fraction: f64,
    bounds_w: f64,
    bounds_h: f64,
) -> Result<Rect<Source>, GeometryError> {
    let w = bounds_w * fraction;
    let h = bounds_h * fraction;
    let centered = Rect::new(click_x - w / 2.0, click_y - h / 2.0, w, h);
    tracing::debug!(?centered, "fixed box before clamping");
    clamp_box_to_bounds(centered, bounds_w, bounds_h)
}

/// Grow a rectangle by `ratio` of its own size on every side, then clip it
/// to `[0, bounds_w] x [0, bounds_h]`.
///
/// The pad amount is computed from the unpadded size; clipping may make the
/// padding asymmetric near edges.
pub fn pad(rect: Rect<Source>, ratio: f64, bounds_w: f64, bounds_h: f64) -> Rect<Source> {
    let pad_x = rect.w * ratio;
    let pad_y = rect.h * ratio;
    let grown = Rect::new(
        rect.x - pad_x,
        rect.y - pad_y,
        rect.w + 2.0 * pad_x,
        rect.h + 2.0 * pad_y,
    );
    grown.intersect(&Rect::full(bounds_w, bounds_h))
}

/// Re-express `rect` relative to `from`, scaled onto a raster of
/// `target_w x target_h` pixels that was rendered from `from`.
///
/// `out_x = target_w * (rect.x - from.x) / from.w`, and likewise for the
/// other components. A degenerate `from` produces non-finite values.
pub fn map_into(rect: &Rect<Source>, from: &Rect<Source>, target_w: f64, target_h: f64) -> Rect<Crop> {
    let sx = target_w / from.w;
    let sy = target_h / from.h;
    Rect::<Source>::new(
        (rect.x - from.x) * sx,
        (rect.y - from.y) * sy,
        rect.w * sx,
        rect.h * sy,
    )
    .retag()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_box_inside_is_unchanged() {
        let r = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert_eq!(clamp_box_to_bounds(r, 100.0, 100.0).unwrap(), r);
    }

    #[test]
    fn test_clamp_box_shifts_from_bottom_right() {
        let r = Rect::new(90.0, 95.0, 20.0, 20.0);
        let clamped = clamp_box_to_bounds(r, 100.0, 100.0).unwrap();
        assert_eq!(clamped, Rect::new(80.0, 80.0, 20.0, 20.0));
    }

    #[test]
    fn test_clamp_box_shifts_from_top_left() {
        let r = Rect::new(-5.0, -15.0, 20.0, 20.0);
        let clamped = clamp_box_to_bounds(r, 100.0, 100.0).unwrap();
        assert_eq!(clamped, Rect::new(0.0, 0.0, 20.0, 20.0));
    }

    #[test]
    fn test_clamp_box_larger_than_bounds_errors() {
        let r = Rect::new(0.0, 0.0, 120.0, 20.0);
        assert!(matches!(
            clamp_box_to_bounds(r, 100.0, 100.0),
            Err(GeometryError::BoxExceedsBounds { .. })
        ));
    }

    #[test]
    fn test_fixed_box_at_center() {
        let r = fixed_box_at(400.0, 300.0, 0.125, 800.0, 600.0).unwrap();
        assert_eq!(r, Rect::new(350.0, 262.5, 100.0, 75.0));
    }

    #[test]
    fn test_fixed_box_at_corner_is_clamped() {
        let r = fixed_box_at(795.0, 2.0, 0.125, 800.0, 600.0).unwrap();
        assert_eq!(r, Rect::new(700.0, 0.0, 100.0, 75.0));
    }

    #[test]
    fn test_pad_interior() {
        let r = Rect::new(100.0, 100.0, 40.0, 20.0);
        assert_eq!(pad(r, 0.25, 1000.0, 1000.0), Rect::new(90.0, 95.0, 60.0, 30.0));
    }

    #[test]
    fn test_pad_clipped_at_edges() {
        let r = Rect::new(0.0, 0.0, 40.0, 20.0);
        // Unclipped would be (-10, -5, 60, 30)
        assert_eq!(pad(r, 0.25, 45.0, 1000.0), Rect::new(0.0, 0.0, 45.0, 25.0));
    }

    #[test]
    fn test_map_into_identity() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        let from = Rect::new(0.0, 0.0, 100.0, 100.0);
        let mapped = map_into(&r, &from, 100.0, 100.0);
        assert_eq!(mapped, Rect::new(10.0, 20.0, 30.0, 40.0));
    }

    #[test]
    fn test_map_into_padded_crop() {
        let sel = Rect::new(350.0, 262.5, 100.0, 75.0);
        let padded = pad(sel, 0.25, 800.0, 600.0);
        // Padded crop re-rendered at twice the resolution
        let mapped = map_into(&sel, &padded, padded.w * 2.0, padded.h * 2.0);
        assert!((mapped.x - 50.0).abs() < 1e-9);
        assert!((mapped.y - 37.5).abs() < 1e-9);
        assert!((mapped.w - 200.0).abs() < 1e-9);
        assert!((mapped.h - 150.0).abs() < 1e-9);
    }
}
