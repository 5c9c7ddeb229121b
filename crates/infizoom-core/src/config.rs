//! Tunable constants for the enhancement pipeline, the reveal animation and
//! the zoom export.
//!
//! All structs deserialize with `#[serde(default)]`, so a host only needs to
//! send the fields it wants to override.

use serde::{Deserialize, Serialize};

/// Description used when the describe service fails or answers with nothing.
pub const FALLBACK_DESCRIPTION: &str = "user selected a region to enhance";

/// Enhancement pipeline settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhanceConfig {
    /// Context padding (fraction of the selection on each side) for a new zoom.
    pub initial_padding: f64,
    /// Context padding when regenerating the current step.
    pub regenerate_padding: f64,
    /// Base width of the padded crop sent to the enhance service.
    pub working_width: u32,
    /// Width of the final raster committed to history.
    pub final_width: u32,
    /// Upscale factor of the non-AI fallback result.
    pub fallback_upscale: f64,
    /// Size of the click-to-zoom box as a fraction of each image dimension.
    pub fixed_box_fraction: f64,
    /// Description used when describing the selection fails.
    pub fallback_description: String,
}

impl Default for EnhanceConfig {
    fn default() -> Self {
        Self {
            initial_padding: 0.25,
            regenerate_padding: 0.5,
            working_width: 512,
            final_width: 1024,
            fallback_upscale: 2.0,
            fixed_box_fraction: 0.125,
            fallback_description: FALLBACK_DESCRIPTION.to_string(),
        }
    }
}

/// Pixel-reveal animation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Number of chunks the pixels are revealed in.
    pub steps: u32,
    /// Wall-clock length of the whole reveal.
    pub duration_ms: u32,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            steps: 60,
            duration_ms: 1000,
        }
    }
}

/// Zoom-sequence export settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomExportConfig {
    /// Output width; height follows the first selection's aspect ratio.
    pub width: u32,
    pub fps: u32,
    /// Length of each zoom-in phase.
    pub zoom_seconds: f64,
    /// Frames spent on each enhanced image after its zoom.
    pub hold_frames: u32,
    pub dash_length: u32,
    pub gap_length: u32,
    pub line_width: u32,
    pub overlay_color: [u8; 3],
    /// Palette size per GIF frame (2-256).
    pub max_colors: u16,
}

impl Default for ZoomExportConfig {
    fn default() -> Self {
        Self {
            width: 512,
            fps: 30,
            zoom_seconds: 1.0,
            hold_frames: 15,
            dash_length: 6,
            gap_length: 4,
            line_width: 2,
            overlay_color: [255, 255, 255],
            max_colors: 256,
        }
    }
}

impl ZoomExportConfig {
    /// Frames in each zoom-in phase.
    pub fn zoom_frames(&self) -> u32 {
        (self.fps as f64 * self.zoom_seconds).round() as u32
    }

    /// Frames emitted per consecutive history pair.
    pub fn frames_per_pair(&self) -> u32 {
        self.zoom_frames() + self.hold_frames
    }

    /// Per-frame display time.
    pub fn frame_delay_ms(&self) -> u32 {
        (1000.0 / self.fps.max(1) as f64).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enhance_defaults() {
        let c = EnhanceConfig::default();
        assert_eq!(c.initial_padding, 0.25);
        assert_eq!(c.regenerate_padding, 0.5);
        assert_eq!(c.working_width, 512);
        assert_eq!(c.final_width, 1024);
        assert_eq!(c.fallback_description, FALLBACK_DESCRIPTION);
    }

    #[test]
    fn test_export_frame_math() {
        let c = ZoomExportConfig::default();
        assert_eq!(c.zoom_frames(), 30);
        assert_eq!(c.frames_per_pair(), 45);
        assert_eq!(c.frame_delay_ms(), 33);
    }

    #[test]
    fn test_reveal_defaults() {
        let c = RevealConfig::default();
        assert_eq!(c.steps, 60);
        assert_eq!(c.duration_ms, 1000);
    }
}
