//! Interpolation helpers for animating between rectangles.

use super::{Rect, Space};

/// Componentwise linear interpolation between two rectangles.
///
/// Evaluated as `start * (1 - t) + end * t` so that `t = 0` returns `start`
/// and `t = 1` returns `end` bit-for-bit. `t` is expected in `[0, 1]`.
pub fn interpolate_rect<S: Space>(start: &Rect<S>, end: &Rect<S>, t: f64) -> Rect<S> {
    let lerp = |a: f64, b: f64| a * (1.0 - t) + b * t;
    Rect::new(
        lerp(start.x, end.x),
        lerp(start.y, end.y),
        lerp(start.w, end.w),
        lerp(start.h, end.h),
    )
}

/// Cubic ease-in-out.
///
/// `4t³` for `t < 0.5`, otherwise `1 - (-2t + 2)³ / 2`.
#[inline]
pub fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Source;

    #[test]
    fn test_ease_boundaries() {
        assert_eq!(ease_in_out_cubic(0.0), 0.0);
        assert_eq!(ease_in_out_cubic(1.0), 1.0);
        assert_eq!(ease_in_out_cubic(0.5), 0.5);
    }

    #[test]
    fn test_ease_symmetry() {
        for i in 0..=50 {
            let t = i as f64 / 100.0;
            let sum = ease_in_out_cubic(t) + ease_in_out_cubic(1.0 - t);
            assert!((sum - 1.0).abs() < 1e-12, "asymmetric at {}", t);
        }
    }

    #[test]
    fn test_ease_monotonic() {
        let mut prev = ease_in_out_cubic(0.0);
        for i in 1..=1000 {
            let val = ease_in_out_cubic(i as f64 / 1000.0);
            assert!(val >= prev, "ease_in_out_cubic should be non-decreasing");
            prev = val;
        }
    }

    #[test]
    fn test_interpolate_midpoint() {
        let a = Rect::<Source>::new(0.0, 0.0, 800.0, 600.0);
        let b = Rect::new(350.0, 262.5, 100.0, 75.0);
        let mid = interpolate_rect(&a, &b, 0.5);
        assert_eq!(mid, Rect::new(175.0, 131.25, 450.0, 337.5));
    }
}
