//! The zoom-and-enhance pipeline.
//!
//! This module provides:
//! - Contracts for the external describe and enhance services ([`Describer`],
//!   [`Enhancer`])
//! - A single enhancement job: input crops, service calls with fallbacks,
//!   and the re-crop of the result ([`EnhancementJob`])
//! - The state machine that serializes jobs and commits their results to
//!   the history ([`Orchestrator`])
//! - A convenience session tying history, orchestrator and services
//!   together ([`ZoomSession`])
//!
//! # Flow
//!
//! A selection is staged, confirmed, described, enhanced, revealed and only
//! then committed. Service failures never surface as errors: a failed
//! describe uses a fixed fallback description, and a failed enhance falls
//! back to a bilinear upscale of the selection.
//!
//! ```ignore
//! use infizoom_core::enhance::{EnhanceMode, ZoomSession};
//!
//! let mut session = ZoomSession::new(describer, enhancer, Default::default());
//! session.load_bytes(&bytes)?;
//! session.stage_fixed_box(400.0, 300.0, &letterbox)?;
//! session.enhance().await?;
//! session.finish_reveal()?;
//! ```

mod job;
mod orchestrator;
mod service;
mod session;

pub use job::{EnhanceMode, EnhancementJob, EnhancementResult, Outcome};
pub use orchestrator::{Orchestrator, Phase, StagedSelection};
pub use service::{Describer, Enhancer, ServiceError};
pub use session::{SessionError, ZoomSession};

use thiserror::Error;

use crate::compose::ComposeError;
use crate::geometry::GeometryError;
use crate::history::HistoryError;

/// Errors from sequencing or preparing an enhancement.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnhanceError {
    /// A job is already enhancing or revealing.
    #[error("An enhancement is already in progress")]
    Busy,

    /// Fresh enhancement requested with no staged selection.
    #[error("No selection is staged")]
    NothingStaged,

    #[error("No enhancement is in progress")]
    NotEnhancing,

    #[error("No enhancement result is waiting to be revealed")]
    NotRevealing,

    #[error("Invalid selection: {0}")]
    Geometry(#[from] GeometryError),

    #[error("Failed to build raster: {0}")]
    Compose(#[from] ComposeError),

    #[error("History rejected the step: {0}")]
    History(#[from] HistoryError),
}
