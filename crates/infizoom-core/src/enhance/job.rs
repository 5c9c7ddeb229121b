//! One in-flight enhancement: inputs prepared from the selection, the two
//! service calls with their fallbacks, and the re-crop of the result.

use super::{Describer, EnhanceError, Enhancer, ServiceError};
use crate::compose::{extract_raster, upscale, Sampling};
use crate::config::EnhanceConfig;
use crate::geometry::{map_into, pad, Rect, Screen, Source};
use crate::raster::{resize, FilterType, Raster, RasterHandle};
use crate::Description;

/// Whether a job creates a new step or replaces the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnhanceMode {
    /// Zoom into a new selection and append a step.
    Fresh,
    /// Re-run the current step's selection with wider context and replace it.
    Regenerate,
}

impl EnhanceMode {
    fn padding(self, config: &EnhanceConfig) -> f64 {
        match self {
            EnhanceMode::Fresh => config.initial_padding,
            EnhanceMode::Regenerate => config.regenerate_padding,
        }
    }

    fn working_width(self, config: &EnhanceConfig) -> u32 {
        match self {
            EnhanceMode::Fresh => {
                (config.working_width as f64 * (1.0 + config.initial_padding)).round() as u32
            }
            EnhanceMode::Regenerate => config.working_width,
        }
    }
}

/// How the final raster was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The enhance service produced the detail.
    Enhanced,
    /// The enhance service failed; the final raster is a plain upscale.
    Fallback,
}

/// Everything needed to run the external calls for one selection.
///
/// Built by [`Orchestrator::begin`](super::Orchestrator::begin) and consumed
/// by [`run`](Self::run), or driven step by step by a host that performs the
/// service calls itself ([`describe_input`](Self::describe_input),
/// [`enhance_input`](Self::enhance_input), [`finish`](Self::finish)).
#[derive(Debug, Clone)]
pub struct EnhancementJob {
    mode: EnhanceMode,
    selection: Rect<Source>,
    screen: Option<Rect<Screen>>,
    source: RasterHandle,
    source_crop: Raster,
    low_preview: Raster,
    padded_rect: Rect<Source>,
    padded_crop: Raster,
    prior_descriptions: Vec<Description>,
    prior_prompts: Vec<String>,
    carried_description: Option<Description>,
    config: EnhanceConfig,
}

/// A finished job, ready to be revealed and committed.
#[derive(Debug, Clone)]
pub struct EnhancementResult {
    pub mode: EnhanceMode,
    pub selection: Rect<Source>,
    pub screen: Option<Rect<Screen>>,
    pub description: Description,
    /// Pixelated preview, scaled to the size of `final_raster`.
    pub low_preview: Raster,
    pub final_raster: Raster,
    pub outcome: Outcome,
}

/// Inputs to [`EnhancementJob::prepare`] taken from the history.
#[derive(Debug, Clone)]
pub(crate) struct JobContext {
    pub source: RasterHandle,
    pub prior_descriptions: Vec<Description>,
    pub prior_prompts: Vec<String>,
    pub carried_description: Option<Description>,
}

fn natural_size(rect: &Rect<Source>) -> (u32, u32) {
    (
        rect.w.round().max(1.0) as u32,
        rect.h.round().max(1.0) as u32,
    )
}

fn height_for_width(width: u32, rect: &Rect<Source>) -> u32 {
    (width as f64 * rect.h / rect.w).round().max(1.0) as u32
}

impl EnhancementJob {
    pub(crate) fn prepare(
        mode: EnhanceMode,
        selection: Rect<Source>,
        screen: Option<Rect<Screen>>,
        context: JobContext,
        config: &EnhanceConfig,
    ) -> Result<Self, EnhanceError> {
        let source = context.source;
        let (img_w, img_h) = (source.width as f64, source.height as f64);
        let selection = selection.intersect(&Rect::full(img_w, img_h)).non_empty()?;

        let (nat_w, nat_h) = natural_size(&selection);
        let low_preview = extract_raster(&source, &selection, nat_w, nat_h, Sampling::Nearest)?;
        let source_crop = extract_raster(&source, &selection, nat_w, nat_h, Sampling::Smooth)?;

        let padded_rect = pad(selection, mode.padding(config), img_w, img_h);
        let work_w = mode.working_width(config).max(1);
        let work_h = height_for_width(work_w, &padded_rect);
        let padded_crop = extract_raster(&source, &padded_rect, work_w, work_h, Sampling::Smooth)?;

        tracing::debug!(
            ?mode,
            ?selection,
            ?padded_rect,
            work_w,
            work_h,
            "prepared enhancement job"
        );

        Ok(Self {
            mode,
            selection,
            screen,
            source,
            source_crop,
            low_preview,
            padded_rect,
            padded_crop,
            prior_descriptions: context.prior_descriptions,
            prior_prompts: context.prior_prompts,
            carried_description: context.carried_description,
            config: config.clone(),
        })
    }

    pub fn mode(&self) -> EnhanceMode {
        self.mode
    }

    /// The selection, clipped to the source image.
    pub fn selection(&self) -> Rect<Source> {
        self.selection
    }

    pub fn padded_rect(&self) -> Rect<Source> {
        self.padded_rect
    }

    /// Nearest-neighbor preview of the selection at its natural pixel size.
    pub fn low_preview(&self) -> &Raster {
        &self.low_preview
    }

    /// Crop to send to the describe service, or `None` when the job already
    /// carries a description (regenerate).
    pub fn describe_input(&self) -> Option<&Raster> {
        match self.carried_description {
            Some(_) => None,
            None => Some(&self.source_crop),
        }
    }

    /// Padded crop to send to the enhance service.
    pub fn enhance_input(&self) -> &Raster {
        &self.padded_crop
    }

    /// Descriptions of the active steps before this job.
    pub fn prior_descriptions(&self) -> &[Description] {
        &self.prior_descriptions
    }

    /// Map a describe result onto the description the job will use.
    ///
    /// Failures and empty answers become the fallback description.
    pub fn resolve_description(&self, result: Result<Description, ServiceError>) -> Description {
        if let Some(carried) = &self.carried_description {
            return carried.clone();
        }
        match result {
            Ok(d) if !d.selection_description.trim().is_empty() => d,
            Ok(_) => {
                tracing::warn!("describe returned an empty description, using fallback");
                Description::new(self.config.fallback_description.clone(), None)
            }
            Err(e) => {
                tracing::warn!(error = %e, "describe failed, using fallback");
                Description::new(self.config.fallback_description.clone(), None)
            }
        }
    }

    /// Prompt history for the enhance call: prior prompts, then this one.
    pub fn prompts_for(&self, description: &Description) -> Vec<String> {
        let mut prompts = self.prior_prompts.clone();
        prompts.push(description.prompt_or_empty().to_string());
        prompts
    }

    /// Run both service calls in order and build the result.
    ///
    /// Describe strictly precedes enhance. Neither service failure aborts
    /// the job; only structural problems (e.g. a degenerate result raster)
    /// are returned as errors.
    pub async fn run<D, E>(self, describer: &D, enhancer: &E) -> Result<EnhancementResult, EnhanceError>
    where
        D: Describer + ?Sized,
        E: Enhancer + ?Sized,
    {
        let description = match self.describe_input() {
            Some(crop) => {
                let answer = describer.describe(crop, &self.prior_descriptions).await;
                self.resolve_description(answer)
            }
            None => self.resolve_description(Err(ServiceError::NoCandidates)),
        };

        let prompts = self.prompts_for(&description);
        let enhanced = enhancer.enhance(&self.padded_crop, &prompts).await;
        self.finish(description, enhanced)
    }

    /// Turn the enhance result into the final raster.
    ///
    /// On success the selection is mapped into the enhanced padded raster and
    /// re-extracted at `final_width`. On any failure the selection is
    /// upscaled from the source instead.
    pub fn finish(
        self,
        description: Description,
        enhanced: Result<Raster, ServiceError>,
    ) -> Result<EnhancementResult, EnhanceError> {
        let enhanced = match enhanced {
            Ok(raster) if raster.is_empty() => Err(ServiceError::NoCandidates),
            Ok(raster) => match raster.check_buffer() {
                Ok(()) => Ok(raster),
                Err(e) => Err(ServiceError::Malformed(e.to_string())),
            },
            Err(e) => Err(e),
        };

        let (final_raster, outcome) = match enhanced {
            Ok(raster) => {
                let mapped = map_into(
                    &self.selection,
                    &self.padded_rect,
                    raster.width as f64,
                    raster.height as f64,
                );
                let final_w = self.config.final_width.max(1);
                let final_h = height_for_width(final_w, &self.selection);
                let out = extract_raster(&raster, &mapped, final_w, final_h, Sampling::Smooth)?;
                (out, Outcome::Enhanced)
            }
            Err(e) => {
                tracing::warn!(error = %e, "enhance failed, falling back to upscale");
                let out = upscale(&self.source, &self.selection, self.config.fallback_upscale)?;
                (out, Outcome::Fallback)
            }
        };

        let low_preview = resize(
            &self.low_preview,
            final_raster.width,
            final_raster.height,
            FilterType::Nearest,
        )?;

        tracing::info!(
            ?outcome,
            width = final_raster.width,
            height = final_raster.height,
            "enhancement finished"
        );

        Ok(EnhancementResult {
            mode: self.mode,
            selection: self.selection,
            screen: self.screen,
            description,
            low_preview,
            final_raster,
            outcome,
        })
    }
}
