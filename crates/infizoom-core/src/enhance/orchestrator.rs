//! The enhancement state machine.
//!
//! ```text
//! Idle -> Staged -> Enhancing -> Revealing(Enhanced) -> Idle
//!                            \-> Revealing(Fallback) -> Idle
//! ```
//!
//! Only one job may be in flight. While `Enhancing` or `Revealing`, new
//! stage requests are rejected with [`EnhanceError::Busy`].

use super::job::JobContext;
use super::{EnhanceError, EnhanceMode, EnhancementJob, EnhancementResult};
use crate::config::EnhanceConfig;
use crate::geometry::{Rect, Screen, Source};
use crate::history::{History, HistoryError, HistoryStep};

/// A selection the user marked but has not confirmed yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StagedSelection {
    pub selection: Rect<Source>,
    pub screen: Rect<Screen>,
}

/// Current phase of the orchestrator.
#[derive(Debug, Clone, Default)]
pub enum Phase {
    #[default]
    Idle,
    Staged(StagedSelection),
    /// A job has been handed out and its result is pending.
    Enhancing(EnhanceMode),
    /// A result is being revealed and will be committed when the reveal ends.
    Revealing(Box<EnhancementResult>),
}

/// Sequences staging, enhancement, reveal and commit.
#[derive(Debug, Clone, Default)]
pub struct Orchestrator {
    phase: Phase,
    config: EnhanceConfig,
}

impl Orchestrator {
    pub fn new(config: EnhanceConfig) -> Self {
        Self {
            phase: Phase::Idle,
            config,
        }
    }

    pub fn config(&self) -> &EnhanceConfig {
        &self.config
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Whether a job is in flight (enhancing or revealing).
    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Enhancing(_) | Phase::Revealing(_))
    }

    pub fn staged(&self) -> Option<&StagedSelection> {
        match &self.phase {
            Phase::Staged(staged) => Some(staged),
            _ => None,
        }
    }

    /// The result waiting for its reveal to finish.
    pub fn pending_reveal(&self) -> Option<&EnhancementResult> {
        match &self.phase {
            Phase::Revealing(result) => Some(result),
            _ => None,
        }
    }

    /// Mark a selection. Replaces any earlier staged selection.
    pub fn stage(&mut self, selection: Rect<Source>, screen: Rect<Screen>) -> Result<(), EnhanceError> {
        if self.is_busy() {
            tracing::debug!("stage rejected: job in flight");
            return Err(EnhanceError::Busy);
        }
        let selection = selection.non_empty()?;
        tracing::debug!(?selection, "selection staged");
        self.phase = Phase::Staged(StagedSelection { selection, screen });
        Ok(())
    }

    /// Drop the staged selection. Returns whether there was one.
    pub fn cancel(&mut self) -> bool {
        if matches!(self.phase, Phase::Staged(_)) {
            self.phase = Phase::Idle;
            true
        } else {
            false
        }
    }

    /// Start a job and move to `Enhancing`.
    ///
    /// `Fresh` consumes the staged selection. `Regenerate` re-runs the
    /// current step's selection over the previous image; a staged selection
    /// is discarded.
    ///
    /// Once the job inputs are built, either mode discards the redo branch
    /// of the history. On error the phase and the history are left as they
    /// were.
    pub fn begin(&mut self, history: &mut History, mode: EnhanceMode) -> Result<EnhancementJob, EnhanceError> {
        if self.is_busy() {
            return Err(EnhanceError::Busy);
        }

        let job = match mode {
            EnhanceMode::Fresh => {
                let staged = *self.staged().ok_or(EnhanceError::NothingStaged)?;
                let context = JobContext {
                    source: history.current().image.clone(),
                    prior_descriptions: history.descriptions(),
                    prior_prompts: history.prompts(),
                    carried_description: None,
                };
                tracing::debug!(cursor = history.cursor(), "beginning fresh enhancement");
                let job = EnhancementJob::prepare(
                    mode,
                    staged.selection,
                    Some(staged.screen),
                    context,
                    &self.config,
                )?;
                history.truncate_after_cursor();
                job
            }
            EnhanceMode::Regenerate => {
                let previous = history
                    .previous()
                    .ok_or(HistoryError::CannotRegenerateOriginal)?;
                let current = history.current();
                let selection = current.selection_rect.ok_or(HistoryError::MissingSelection)?;
                let earlier = &history.active()[..history.cursor()];
                let context = JobContext {
                    source: previous.image.clone(),
                    prior_descriptions: earlier
                        .iter()
                        .filter_map(|s| s.description.clone())
                        .collect(),
                    prior_prompts: earlier
                        .iter()
                        .filter_map(|s| s.description.as_ref())
                        .map(|d| d.prompt_or_empty().to_string())
                        .collect(),
                    carried_description: current.description.clone(),
                };
                tracing::debug!(cursor = history.cursor(), "beginning regeneration");
                let job = EnhancementJob::prepare(mode, selection, None, context, &self.config)?;
                if let Some(staged) = self.staged() {
                    tracing::debug!(selection = ?staged.selection, "staged selection discarded by regenerate");
                }
                history.truncate_after_cursor();
                job
            }
        };

        self.phase = Phase::Enhancing(mode);
        Ok(job)
    }

    /// Accept a finished job and move to `Revealing`.
    pub fn complete(&mut self, result: EnhancementResult) -> Result<&EnhancementResult, EnhanceError> {
        match self.phase {
            Phase::Enhancing(mode) if mode == result.mode => {}
            _ => return Err(EnhanceError::NotEnhancing),
        }
        self.phase = Phase::Revealing(Box::new(result));
        self.pending_reveal().ok_or(EnhanceError::NotRevealing)
    }

    /// Give up on the in-flight job after a structural failure.
    pub fn abort(&mut self) {
        if self.is_busy() {
            tracing::warn!("enhancement aborted");
            self.phase = Phase::Idle;
        }
    }

    /// The reveal is done: write the result into the history and go idle.
    ///
    /// Returns the history cursor after the commit.
    pub fn finish_reveal(&mut self, history: &mut History) -> Result<usize, EnhanceError> {
        let result = match std::mem::take(&mut self.phase) {
            Phase::Revealing(result) => *result,
            other => {
                self.phase = other;
                return Err(EnhanceError::NotRevealing);
            }
        };

        let step = HistoryStep::zoomed(
            result.final_raster.into_handle(),
            result.description,
            result.selection,
        );
        match result.mode {
            EnhanceMode::Fresh => Ok(history.commit(step)?),
            EnhanceMode::Regenerate => {
                history.regenerate(step)?;
                Ok(history.cursor())
            }
        }
    }
}
