//! Dashed rectangle outline drawn over export frames.

use crate::geometry::{Crop, Rect};
use crate::raster::Raster;

/// Stroke settings for [`draw_dashed_rect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashStyle {
    pub dash: u32,
    pub gap: u32,
    pub width: u32,
    pub color: [u8; 3],
}

/// Outline `rect` with a dashed stroke drawn inward from its edges.
///
/// The dash pattern restarts at the first pixel of each edge. Parts of the
/// rectangle outside the raster are clipped.
pub fn draw_dashed_rect(raster: &mut Raster, rect: &Rect<Crop>, style: &DashStyle) {
    if rect.is_empty() || raster.is_empty() || style.width == 0 {
        return;
    }

    let x0 = rect.x.round() as i64;
    let y0 = rect.y.round() as i64;
    let x1 = rect.right().round() as i64 - 1;
    let y1 = rect.bottom().round() as i64 - 1;
    if x1 < x0 || y1 < y0 {
        return;
    }

    let period = (style.dash + style.gap).max(1) as i64;
    let on = |p: i64| p % period < style.dash as i64;
    let lw = style.width as i64;

    for x in x0..=x1 {
        if on(x - x0) {
            for t in 0..lw {
                plot(raster, x, y0 + t, style.color);
                plot(raster, x, y1 - t, style.color);
            }
        }
    }
    for y in y0..=y1 {
        if on(y - y0) {
            for t in 0..lw {
                plot(raster, x0 + t, y, style.color);
                plot(raster, x1 - t, y, style.color);
            }
        }
    }
}

#[inline]
fn plot(raster: &mut Raster, x: i64, y: i64, color: [u8; 3]) {
    if x >= 0 && y >= 0 && x < raster.width as i64 && y < raster.height as i64 {
        raster.put_pixel(x as u32, y as u32, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [u8; 3] = [255, 255, 255];
    const BLACK: [u8; 3] = [0, 0, 0];

    fn style(width: u32) -> DashStyle {
        DashStyle {
            dash: 3,
            gap: 2,
            width,
            color: WHITE,
        }
    }

    #[test]
    fn test_dash_pattern_on_top_edge() {
        let mut raster = Raster::filled(20, 20, BLACK);
        draw_dashed_rect(&mut raster, &Rect::new(2.0, 2.0, 10.0, 10.0), &style(1));

        assert_eq!(raster.pixel(2, 2), WHITE);
        assert_eq!(raster.pixel(4, 2), WHITE);
        assert_eq!(raster.pixel(5, 2), BLACK);
        assert_eq!(raster.pixel(6, 2), BLACK);
        assert_eq!(raster.pixel(7, 2), WHITE);
        // Bottom and right edges sit on the last covered pixel
        assert_eq!(raster.pixel(2, 11), WHITE);
        assert_eq!(raster.pixel(11, 2), WHITE);
        // Interior and outside untouched
        assert_eq!(raster.pixel(6, 6), BLACK);
        assert_eq!(raster.pixel(13, 13), BLACK);
    }

    #[test]
    fn test_line_width_draws_inward() {
        let mut raster = Raster::filled(20, 20, BLACK);
        draw_dashed_rect(&mut raster, &Rect::new(2.0, 2.0, 10.0, 10.0), &style(2));
        assert_eq!(raster.pixel(2, 3), WHITE);
        assert_eq!(raster.pixel(2, 1), BLACK);
    }

    #[test]
    fn test_clips_to_raster() {
        let mut raster = Raster::filled(10, 10, BLACK);
        draw_dashed_rect(&mut raster, &Rect::new(-5.0, -5.0, 50.0, 50.0), &style(2));
        // Every edge is off-raster, nothing drawn
        assert!(raster.pixels.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_empty_rect_is_noop() {
        let mut raster = Raster::filled(10, 10, BLACK);
        draw_dashed_rect(&mut raster, &Rect::new(1.0, 1.0, 0.0, 5.0), &style(1));
        assert!(raster.pixels.iter().all(|&v| v == 0));
    }
}
