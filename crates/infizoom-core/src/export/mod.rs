//! Zoom-sequence export.
//!
//! Replays the active history as an animation: for each consecutive pair of
//! steps the camera eases from the full previous image into the selection
//! that produced the next one (with the selection outlined), then holds on
//! the enhanced image. Frames stream into a [`FrameEncoder`](crate::encode::FrameEncoder).

mod overlay;
mod zoom;

pub use overlay::{draw_dashed_rect, DashStyle};
pub use zoom::{canvas_size, export_zoom_gif, frame_count, synthesize};

use thiserror::Error;

use crate::compose::ComposeError;
use crate::encode::EncodeError;

/// Errors raised while exporting a zoom sequence.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExportError {
    /// A zoom needs at least the original and one enhanced step.
    #[error("Need at least 2 history steps to export, found {found}")]
    TooFewSteps { found: usize },

    /// A step after the original has no selection rectangle.
    #[error("History step {index} has no selection rectangle")]
    MissingSelection { index: usize },

    #[error("Failed to render frame: {0}")]
    Compose(#[from] ComposeError),

    #[error("Failed to encode frame: {0}")]
    Encode(#[from] EncodeError),
}
