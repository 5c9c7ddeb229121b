//! Mapping between the on-screen canvas and the source image.

use serde::{Deserialize, Serialize};

use super::{Rect, Screen, Source};

/// Where an image of a given aspect ratio is drawn inside a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Letterbox {
    pub draw_w: f64,
    pub draw_h: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Letterbox {
    /// Screen pixels per source pixel for an image `image_w` pixels wide.
    pub fn scale(&self, image_w: f64) -> f64 {
        self.draw_w / image_w
    }

    /// Map a screen rectangle into the source image drawn in this letterbox.
    pub fn to_source(&self, rect: Rect<Screen>, image_w: f64) -> Rect<Source> {
        to_source_space(rect, self.scale(image_w), self.offset_x, self.offset_y)
    }

    /// Map a source rectangle back onto the screen, for overlays.
    pub fn to_screen(&self, rect: Rect<Source>, image_w: f64) -> Rect<Screen> {
        let scale = self.scale(image_w);
        Rect::new(
            rect.x * scale + self.offset_x,
            rect.y * scale + self.offset_y,
            rect.w * scale,
            rect.h * scale,
        )
    }

    /// The drawn image area in screen space.
    pub fn drawn_rect(&self) -> Rect<Screen> {
        Rect::new(self.offset_x, self.offset_y, self.draw_w, self.draw_h)
    }
}

/// Compute the largest rectangle of aspect `inner_aspect` (width / height)
/// that fits centered inside an `outer_w x outer_h` box.
pub fn scale_to_fit(outer_w: f64, outer_h: f64, inner_aspect: f64) -> Letterbox {
    let outer_aspect = outer_w / outer_h;
    let (draw_w, draw_h) = if outer_aspect > inner_aspect {
        // Outer box is wider: pillarbox
        (outer_h * inner_aspect, outer_h)
    } else {
        (outer_w, outer_w / inner_aspect)
    };

    Letterbox {
        draw_w,
        draw_h,
        offset_x: (outer_w - draw_w) / 2.0,
        offset_y: (outer_h - draw_h) / 2.0,
    }
}

/// Inverse-map a screen rectangle into source-image pixels:
/// `x' = (x - offset_x) / scale`, `w' = w / scale`, and likewise for y, h.
pub fn to_source_space(
    screen_rect: Rect<Screen>,
    scale: f64,
    offset_x: f64,
    offset_y: f64,
) -> Rect<Source> {
    Rect::new(
        (screen_rect.x - offset_x) / scale,
        (screen_rect.y - offset_y) / scale,
        screen_rect.w / scale,
        screen_rect.h / scale,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_to_fit_wide_canvas_pillarboxes() {
        let lb = scale_to_fit(1000.0, 500.0, 4.0 / 3.0);
        assert!((lb.draw_h - 500.0).abs() < 1e-9);
        assert!((lb.draw_w - 666.666_666_666_666_7).abs() < 1e-6);
        assert!((lb.offset_x - (1000.0 - lb.draw_w) / 2.0).abs() < 1e-9);
        assert_eq!(lb.offset_y, 0.0);
    }

    #[test]
    fn test_scale_to_fit_tall_canvas_letterboxes() {
        let lb = scale_to_fit(400.0, 800.0, 2.0);
        assert_eq!(lb.draw_w, 400.0);
        assert_eq!(lb.draw_h, 200.0);
        assert_eq!(lb.offset_x, 0.0);
        assert_eq!(lb.offset_y, 300.0);
    }

    #[test]
    fn test_scale_to_fit_exact_aspect() {
        let lb = scale_to_fit(800.0, 600.0, 800.0 / 600.0);
        assert_eq!(lb.draw_w, 800.0);
        assert_eq!(lb.draw_h, 600.0);
        assert_eq!(lb.offset_x, 0.0);
        assert_eq!(lb.offset_y, 0.0);
    }

    #[test]
    fn test_to_source_space() {
        let screen = Rect::<Screen>::new(110.0, 20.0, 50.0, 25.0);
        let src = to_source_space(screen, 0.5, 10.0, 0.0);
        assert_eq!(src, Rect::new(200.0, 40.0, 100.0, 50.0));
    }

    #[test]
    fn test_letterbox_screen_source_round_trip() {
        let lb = scale_to_fit(1000.0, 500.0, 2.0 / 1.0);
        let image_w = 2000.0;
        let src = Rect::<Source>::new(200.0, 100.0, 400.0, 300.0);
        let back = lb.to_source(lb.to_screen(src, image_w), image_w);
        assert!((back.x - src.x).abs() < 1e-9);
        assert!((back.y - src.y).abs() < 1e-9);
        assert!((back.w - src.w).abs() < 1e-9);
        assert!((back.h - src.h).abs() < 1e-9);
    }
}
