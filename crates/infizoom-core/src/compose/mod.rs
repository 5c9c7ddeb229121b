//! Cropping and resampling sub-regions of rasters.
//!
//! This is where selection rectangles meet pixels: the enhancement pipeline
//! uses it to build the pixelated preview, the describe crop, the padded
//! enhance crop, the final re-crop of the enhanced result, and the fallback
//! upscale. The zoom exporter uses it to render every frame.
//!
//! Rectangles passed here must be in a [`PixelSpace`](crate::geometry::PixelSpace)
//! that addresses the raster being sampled. Fractional rectangle edges are
//! honoured: sampling is done in continuous coordinates, not on a rounded
//! pixel grid.

mod extract;

pub use extract::{extract_raster, upscale};

use thiserror::Error;

/// How pixels are sampled when a region is extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sampling {
    /// Hard block edges, for the pixelated preview.
    Nearest,
    /// Bilinear interpolation with edge clamping.
    #[default]
    Smooth,
}

/// Errors raised when a raster cannot be produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ComposeError {
    /// The requested output raster has a zero dimension.
    #[error("Invalid target size {width}x{height}")]
    InvalidTarget { width: u32, height: u32 },

    /// The source raster has no pixels to sample.
    #[error("Source raster is empty")]
    EmptySource,

    /// The source pixel buffer does not match its dimensions.
    #[error("Source raster is malformed: {actual} bytes for {width}x{height}")]
    MalformedSource { width: u32, height: u32, actual: usize },

    /// The region to sample has no area.
    #[error("Region to extract is empty ({w}x{h})")]
    EmptyRegion { w: f64, h: f64 },
}
