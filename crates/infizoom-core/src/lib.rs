//! Infizoom Core - Infinite zoom-and-enhance engine
//!
//! This crate provides the core of Infizoom: selection geometry, cropping and
//! resampling, the zoom history, the enhancement pipeline with its describe
//! and enhance service contracts, the pixel-reveal animation, and the
//! animated zoom export.

pub mod compose;
pub mod config;
pub mod encode;
pub mod enhance;
pub mod export;
pub mod geometry;
pub mod history;
pub mod raster;
pub mod reveal;

pub use config::{EnhanceConfig, RevealConfig, ZoomExportConfig};
pub use enhance::{Describer, EnhanceMode, Enhancer, ServiceError, ZoomSession};
pub use geometry::{Rect, Screen, Source};
pub use history::{History, HistoryStep};
pub use raster::{Raster, RasterHandle};
pub use reveal::PixelReveal;

/// Semantic annotation of a zoom step, produced by the describe service
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Description {
    /// What the selected region shows
    pub selection_description: String,
    /// Guidance for the enhance service
    #[serde(default)]
    pub prompt: Option<String>,
}

impl Description {
    pub fn new(selection_description: impl Into<String>, prompt: Option<String>) -> Self {
        Self {
            selection_description: selection_description.into(),
            prompt,
        }
    }

    /// The prompt, or `""` when the describer gave none
    pub fn prompt_or_empty(&self) -> &str {
        self.prompt.as_deref().unwrap_or("")
    }
}
