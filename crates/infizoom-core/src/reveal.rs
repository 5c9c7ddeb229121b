//! Progressive pixel reveal from a low-detail to a high-detail raster.
//!
//! Every pixel is assigned a random position in a permutation of
//! `0..width*height`. Each tick copies the next `ceil(N / steps)` pixels of
//! that order from the high-detail raster into the frame, so after the last
//! tick the frame equals the high-detail raster exactly.
//!
//! The animator does not own a timer. The host calls [`PixelReveal::tick`]
//! per animation frame, or [`PixelReveal::advance_to`] with elapsed
//! wall-clock time.

use std::fmt;

use rand::Rng;
use thiserror::Error;

use crate::config::RevealConfig;
use crate::raster::Raster;

/// Errors raised when setting up a reveal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RevealError {
    #[error("Reveal rasters differ in size: {low_w}x{low_h} vs {high_w}x{high_h}")]
    SizeMismatch {
        low_w: u32,
        low_h: u32,
        high_w: u32,
        high_h: u32,
    },

    #[error("Cannot reveal an empty raster")]
    EmptyRaster,

    #[error("Reveal raster is malformed: {0}")]
    Malformed(String),
}

/// Where the animation stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    Running,
    /// Every pixel has been revealed and the completion callback has fired.
    Complete,
    /// Cancelled before completion. No callback will fire.
    Abandoned,
}

/// A uniformly random permutation of `0..n` (Fisher-Yates).
pub fn shuffled_indices<R: Rng>(n: usize, rng: &mut R) -> Vec<usize> {
    let mut order: Vec<usize> = (0..n).collect();
    for i in (1..n).rev() {
        let j = rng.random_range(0..=i);
        order.swap(i, j);
    }
    order
}

/// The reveal animator.
pub struct PixelReveal {
    frame: Raster,
    high: Raster,
    order: Vec<usize>,
    revealed: usize,
    chunk: usize,
    steps: u32,
    state: RevealState,
    on_complete: Option<Box<dyn FnOnce()>>,
}

impl fmt::Debug for PixelReveal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelReveal")
            .field("width", &self.frame.width)
            .field("height", &self.frame.height)
            .field("revealed", &self.revealed)
            .field("chunk", &self.chunk)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl PixelReveal {
    /// Start a reveal from `low` to `high` in `steps` chunks.
    ///
    /// # Errors
    ///
    /// Returns `RevealError::SizeMismatch` when the rasters differ in size,
    /// `RevealError::EmptyRaster` when they have no pixels, or
    /// `RevealError::Malformed` when a pixel buffer is the wrong length.
    pub fn new<R: Rng>(
        low: Raster,
        high: Raster,
        steps: u32,
        rng: &mut R,
    ) -> Result<Self, RevealError> {
        if !low.same_size(&high) {
            return Err(RevealError::SizeMismatch {
                low_w: low.width,
                low_h: low.height,
                high_w: high.width,
                high_h: high.height,
            });
        }
        if high.is_empty() {
            return Err(RevealError::EmptyRaster);
        }
        for raster in [&low, &high] {
            raster
                .check_buffer()
                .map_err(|e| RevealError::Malformed(e.to_string()))?;
        }

        let n = high.pixel_count();
        let steps = steps.max(1);
        let chunk = n.div_ceil(steps as usize);

        Ok(Self {
            frame: low,
            high,
            order: shuffled_indices(n, rng),
            revealed: 0,
            chunk,
            steps,
            state: RevealState::Running,
            on_complete: None,
        })
    }

    /// Start a reveal with the step count from `config`.
    pub fn from_config<R: Rng>(
        low: Raster,
        high: Raster,
        config: &RevealConfig,
        rng: &mut R,
    ) -> Result<Self, RevealError> {
        Self::new(low, high, config.steps, rng)
    }

    /// Register the completion callback. It fires once, when the last pixel
    /// is revealed. Registering on an already complete reveal fires it
    /// immediately; on an abandoned one it is dropped.
    pub fn on_complete<F: FnOnce() + 'static>(&mut self, callback: F) {
        match self.state {
            RevealState::Running => self.on_complete = Some(Box::new(callback)),
            RevealState::Complete => callback(),
            RevealState::Abandoned => {}
        }
    }

    /// Reveal one chunk.
    pub fn tick(&mut self) -> RevealState {
        self.advance(1)
    }

    /// Reveal `chunks` chunks at once.
    pub fn advance(&mut self, chunks: u32) -> RevealState {
        let target = self.revealed + self.chunk * chunks as usize;
        self.reveal_until(target)
    }

    /// Catch up to where the animation should be after `elapsed_ms` of a
    /// `duration_ms` long reveal.
    pub fn advance_to(&mut self, elapsed_ms: f64, duration_ms: f64) -> RevealState {
        if duration_ms <= 0.0 || elapsed_ms >= duration_ms {
            return self.finish();
        }
        let fraction = (elapsed_ms / duration_ms).max(0.0);
        let chunks = (fraction * self.steps as f64).floor() as usize;
        self.reveal_until(chunks * self.chunk)
    }

    /// Reveal everything that is left.
    pub fn finish(&mut self) -> RevealState {
        self.reveal_until(self.order.len())
    }

    /// Abandon the animation. Further ticks do nothing and the completion
    /// callback is dropped without firing.
    pub fn cancel(&mut self) {
        if self.state == RevealState::Running {
            tracing::debug!(revealed = self.revealed, "reveal abandoned");
            self.state = RevealState::Abandoned;
            self.on_complete = None;
        }
    }

    fn reveal_until(&mut self, target: usize) -> RevealState {
        if self.state != RevealState::Running {
            return self.state;
        }

        let end = target.min(self.order.len());
        for &index in &self.order[self.revealed.min(end)..end] {
            let offset = index * 3;
            self.frame.pixels[offset..offset + 3].copy_from_slice(&self.high.pixels[offset..offset + 3]);
        }
        self.revealed = self.revealed.max(end);

        if self.revealed == self.order.len() {
            self.state = RevealState::Complete;
            if let Some(callback) = self.on_complete.take() {
                callback();
            }
        }
        self.state
    }

    pub fn state(&self) -> RevealState {
        self.state
    }

    /// The frame to display now.
    pub fn frame(&self) -> &Raster {
        &self.frame
    }

    pub fn into_frame(self) -> Raster {
        self.frame
    }

    /// Fraction of pixels revealed, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        self.revealed as f64 / self.order.len() as f64
    }

    /// Pixels revealed per tick.
    pub fn chunk_size(&self) -> usize {
        self.chunk
    }

    /// The reveal order (pixel indices).
    pub fn order(&self) -> &[usize] {
        &self.order
    }
}
