//! Selection geometry: rectangles, coordinate spaces and the pure math that
//! moves selections between them.
//!
//! # Coordinate Spaces
//!
//! Every [`Rect`] carries a zero-sized tag naming the space it lives in:
//!
//! - [`Screen`] - on-screen canvas pixels, where the user draws or clicks
//! - [`Source`] - pixels of the current history step's image
//! - [`Crop`] - pixels of a raster rendered from some sub-rectangle of a
//!   source image (the enhanced padded crop, or an export frame)
//!
//! Moving between spaces only happens through the functions in this module,
//! so passing a screen rectangle where a source one is expected does not
//! compile.
//!
//! Origin is the top-left corner; `x` grows right and `y` grows down.

mod easing;
mod letterbox;
mod ops;

pub use easing::{ease_in_out_cubic, interpolate_rect};
pub use letterbox::{scale_to_fit, to_source_space, Letterbox};
pub use ops::{clamp_box_to_bounds, fixed_box_at, map_into, pad};

use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by geometry operations that are not total.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// A fixed-size box cannot be shifted inside bounds smaller than itself.
    #[error("Box {box_w}x{box_h} does not fit inside bounds {bounds_w}x{bounds_h}")]
    BoxExceedsBounds {
        box_w: f64,
        box_h: f64,
        bounds_w: f64,
        bounds_h: f64,
    },

    /// The selection has no area.
    #[error("Selection is empty ({w}x{h})")]
    EmptySelection { w: f64, h: f64 },
}

/// Marker trait for coordinate spaces.
pub trait Space: Copy + Default + fmt::Debug + PartialEq + 'static {
    /// Short name used in debug output.
    const NAME: &'static str;
}

/// Spaces whose coordinates address the pixels of an actual raster.
///
/// Only rectangles in these spaces can be cropped out of a raster.
pub trait PixelSpace: Space {}

/// On-screen canvas coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Screen;

/// Coordinates in the current source image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Source;

/// Coordinates in a raster rendered from a sub-rectangle of a source image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Crop;

impl Space for Screen {
    const NAME: &'static str = "screen";
}
impl Space for Source {
    const NAME: &'static str = "source";
}
impl Space for Crop {
    const NAME: &'static str = "crop";
}
impl PixelSpace for Source {}
impl PixelSpace for Crop {}

/// An axis-aligned rectangle in coordinate space `S`.
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Rect<S: Space> {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    #[serde(skip)]
    space: PhantomData<S>,
}

impl<S: Space> fmt::Debug for Rect<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rect<{}>({}, {}, {}x{})",
            S::NAME,
            self.x,
            self.y,
            self.w,
            self.h
        )
    }
}

impl<S: Space> Rect<S> {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            x,
            y,
            w,
            h,
            space: PhantomData,
        }
    }

    /// The rectangle covering a whole `width x height` area.
    pub fn full(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Build a rectangle from two opposite corners given in any order,
    /// as produced by a drag in any direction.
    pub fn from_corners(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self::new(x0.min(x1), y0.min(y1), (x1 - x0).abs(), (y1 - y0).abs())
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Width over height. Zero-height rectangles report `f64::INFINITY`.
    pub fn aspect(&self) -> f64 {
        if self.h == 0.0 {
            f64::INFINITY
        } else {
            self.w / self.h
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.w > 0.0 && self.h > 0.0)
    }

    /// Whether `other` lies entirely inside this rectangle.
    pub fn contains(&self, other: &Rect<S>) -> bool {
        const EPS: f64 = 1e-9;
        other.x >= self.x - EPS
            && other.y >= self.y - EPS
            && other.right() <= self.right() + EPS
            && other.bottom() <= self.bottom() + EPS
    }

    /// Whether this rectangle lies inside `[0, bounds_w] x [0, bounds_h]`.
    pub fn within(&self, bounds_w: f64, bounds_h: f64) -> bool {
        Rect::<S>::full(bounds_w, bounds_h).contains(self)
    }

    /// Intersection with another rectangle. Disjoint rectangles yield a
    /// zero-sized rectangle.
    pub fn intersect(&self, other: &Rect<S>) -> Rect<S> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        Rect::new(x0, y0, (x1 - x0).max(0.0), (y1 - y0).max(0.0))
    }

    /// Reject rectangles without area.
    pub fn non_empty(self) -> Result<Self, GeometryError> {
        if self.is_empty() {
            Err(GeometryError::EmptySelection {
                w: self.w,
                h: self.h,
            })
        } else {
            Ok(self)
        }
    }

    /// Re-tag into another space. Only conversions in this module may do
    /// this; they are responsible for the coordinate math.
    fn retag<T: Space>(self) -> Rect<T> {
        Rect::new(self.x, self.y, self.w, self.h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_corners_any_direction() {
        let a = Rect::<Screen>::from_corners(10.0, 20.0, 4.0, 2.0);
        assert_eq!(a, Rect::new(4.0, 2.0, 6.0, 18.0));
        let b = Rect::<Screen>::from_corners(4.0, 2.0, 10.0, 20.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_intersect_overlapping() {
        let a = Rect::<Source>::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(a.intersect(&b), Rect::new(5.0, 5.0, 5.0, 5.0));
    }

    #[test]
    fn test_intersect_disjoint_is_empty() {
        let a = Rect::<Source>::new(0.0, 0.0, 1.0, 1.0);
        let b = Rect::new(5.0, 5.0, 1.0, 1.0);
        assert!(a.intersect(&b).is_empty());
    }

    #[test]
    fn test_contains_and_within() {
        let outer = Rect::<Source>::new(0.0, 0.0, 100.0, 100.0);
        assert!(outer.contains(&Rect::new(10.0, 10.0, 90.0, 90.0)));
        assert!(!outer.contains(&Rect::new(10.0, 10.0, 91.0, 90.0)));
        assert!(Rect::<Source>::new(1.0, 1.0, 2.0, 2.0).within(3.0, 3.0));
    }

    #[test]
    fn test_non_empty() {
        assert!(Rect::<Source>::new(0.0, 0.0, 0.0, 5.0).non_empty().is_err());
        assert!(Rect::<Source>::new(0.0, 0.0, 1.0, 5.0).non_empty().is_ok());
    }

    #[test]
    fn test_aspect() {
        assert_eq!(Rect::<Source>::new(0.0, 0.0, 100.0, 75.0).aspect(), 100.0 / 75.0);
        assert!(Rect::<Source>::new(0.0, 0.0, 1.0, 0.0).aspect().is_infinite());
    }

    #[test]
    fn test_debug_names_space() {
        let r = Rect::<Crop>::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(format!("{:?}", r), "Rect<crop>(1, 2, 3x4)");
    }
}
