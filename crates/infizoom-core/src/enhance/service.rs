//! Contracts for the external describe and enhance services.
//!
//! Both are async and may be slow or fail. The pipeline never retries: any
//! failure is mapped to a fallback at the call site (see
//! [`EnhancementJob::run`](super::EnhancementJob::run)).
//!
//! The traits are `?Send` because the whole pipeline runs on a single
//! cooperative task (a browser event loop, or a current-thread executor).

use async_trait::async_trait;
use thiserror::Error;

use crate::raster::Raster;
use crate::Description;

/// Failure modes of the external services.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// Transport or server failure.
    #[error("Service call failed: {0}")]
    Failed(String),

    /// The service refused the request (e.g. content policy).
    #[error("Request was blocked: {0}")]
    Blocked(String),

    /// The service answered but produced no candidates.
    #[error("Service returned no candidates")]
    NoCandidates,

    /// The answer could not be interpreted.
    #[error("Malformed service response: {0}")]
    Malformed(String),
}

/// Produces a semantic description of a selected region.
#[async_trait(?Send)]
pub trait Describer {
    /// Describe `image`, given the descriptions of every earlier zoom step.
    async fn describe(
        &self,
        image: &Raster,
        prior: &[Description],
    ) -> Result<Description, ServiceError>;
}

/// Generates a higher-detail version of an image.
#[async_trait(?Send)]
pub trait Enhancer {
    /// Enhance `image`, guided by the prompt history (oldest first, the
    /// current selection's prompt last).
    async fn enhance(&self, image: &Raster, prompts: &[String]) -> Result<Raster, ServiceError>;
}
