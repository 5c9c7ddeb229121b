//! Animated GIF encoding.
//!
//! Each frame is quantized on its own with NeuQuant and written with a local
//! palette, so long zooms through very different images keep their colors.
//! The first frame's palette doubles as the global palette.

use std::borrow::Cow;

use super::{EncodeError, FrameEncoder};
use crate::raster::Raster;

/// NeuQuant sampling factor (1 = best, 30 = fastest).
const SAMPLE_FACTOR: i32 = 10;

/// Streams frames into an in-memory animated GIF that loops forever.
pub struct GifFrameEncoder {
    encoder: Option<gif::Encoder<Vec<u8>>>,
    width: u32,
    height: u32,
    max_colors: usize,
    frames: usize,
}

impl GifFrameEncoder {
    /// `max_colors` is clamped to the 2-256 range GIF palettes allow.
    pub fn new(max_colors: u16) -> Self {
        Self {
            encoder: None,
            width: 0,
            height: 0,
            max_colors: (max_colors as usize).clamp(2, 256),
            frames: 0,
        }
    }

    /// Frames written so far.
    pub fn frame_count(&self) -> usize {
        self.frames
    }

    fn start(&mut self, frame: &Raster, palette: &[u8]) -> Result<(), EncodeError> {
        if frame.is_empty() || frame.width > u16::MAX as u32 || frame.height > u16::MAX as u32 {
            return Err(EncodeError::InvalidDimensions {
                width: frame.width,
                height: frame.height,
            });
        }

        let mut encoder = gif::Encoder::new(Vec::new(), frame.width as u16, frame.height as u16, palette)
            .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;
        encoder
            .set_repeat(gif::Repeat::Infinite)
            .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

        self.width = frame.width;
        self.height = frame.height;
        self.encoder = Some(encoder);
        Ok(())
    }
}

impl FrameEncoder for GifFrameEncoder {
    fn push_frame(&mut self, frame: &Raster, delay_ms: u32) -> Result<(), EncodeError> {
        if self.encoder.is_some() && (frame.width != self.width || frame.height != self.height) {
            return Err(EncodeError::FrameSizeMismatch {
                width: frame.width,
                height: frame.height,
                expected_width: self.width,
                expected_height: self.height,
            });
        }

        let (palette, indices) = quantize(frame, self.max_colors);
        if self.encoder.is_none() {
            self.start(frame, &palette)?;
        }

        let gif_frame = gif::Frame {
            width: self.width as u16,
            height: self.height as u16,
            delay: delay_centiseconds(delay_ms),
            palette: Some(palette),
            buffer: Cow::Owned(indices),
            ..Default::default()
        };

        let encoder = self
            .encoder
            .as_mut()
            .ok_or_else(|| EncodeError::EncodingFailed("encoder not started".to_string()))?;
        encoder
            .write_frame(&gif_frame)
            .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;
        self.frames += 1;
        Ok(())
    }

    fn finish(self) -> Result<Vec<u8>, EncodeError> {
        let encoder = self.encoder.ok_or(EncodeError::NoFrames)?;
        let bytes = encoder
            .into_inner()
            .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;
        tracing::debug!(frames = self.frames, bytes = bytes.len(), "gif finished");
        Ok(bytes)
    }
}

/// GIF delays are in hundredths of a second, with a floor of one.
fn delay_centiseconds(delay_ms: u32) -> u16 {
    ((delay_ms as f64 / 10.0).round() as u32).clamp(1, u16::MAX as u32) as u16
}

/// Reduce an RGB raster to a flat RGB palette plus one index per pixel.
fn quantize(frame: &Raster, max_colors: usize) -> (Vec<u8>, Vec<u8>) {
    let rgba = frame.to_rgba();
    let nq = color_quant::NeuQuant::new(SAMPLE_FACTOR, max_colors, &rgba);

    let mut palette = Vec::with_capacity(max_colors * 3);
    for i in 0..max_colors {
        match nq.lookup(i) {
            Some(color) => palette.extend_from_slice(&color[..3]),
            None => palette.extend_from_slice(&[0, 0, 0]),
        }
    }

    let indices = rgba.chunks_exact(4).map(|p| nq.index_of(p) as u8).collect();
    (palette, indices)
}
