//! Frame encoding for export.
//!
//! This module provides:
//! - The [`FrameEncoder`] contract the zoom exporter streams frames into
//! - An animated GIF implementation with per-frame palettes
//!
//! Frames are pushed one at a time so the exporter never holds the whole
//! sequence in memory.
//!
//! # Examples
//!
//! ```ignore
//! use infizoom_core::encode::{FrameEncoder, GifFrameEncoder};
//!
//! let mut encoder = GifFrameEncoder::new(256);
//! encoder.push_frame(&frame, 33)?;
//! let gif_bytes = encoder.finish()?;
//! ```

mod animated_gif;

pub use animated_gif::GifFrameEncoder;

use thiserror::Error;

use crate::raster::Raster;

/// Errors that can occur while encoding frames.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// `finish` was called before any frame was pushed
    #[error("No frames to encode")]
    NoFrames,

    /// Width or height is zero or exceeds what the format can store
    #[error("Invalid frame dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// A frame does not match the size of the first frame
    #[error("Frame is {width}x{height}, expected {expected_width}x{expected_height}")]
    FrameSizeMismatch {
        width: u32,
        height: u32,
        expected_width: u32,
        expected_height: u32,
    },

    /// The underlying encoder failed
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

/// Sink for a sequence of equally sized frames.
pub trait FrameEncoder {
    /// Append a frame shown for `delay_ms` milliseconds.
    fn push_frame(&mut self, frame: &Raster, delay_ms: u32) -> Result<(), EncodeError>;

    /// Close the stream and return the encoded bytes.
    fn finish(self) -> Result<Vec<u8>, EncodeError>
    where
        Self: Sized;
}
