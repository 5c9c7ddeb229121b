//! Zoom history: a linear log of immutable steps plus a cursor.
//!
//! Step 0 is the loaded image. Every later step is the enhanced result of a
//! selection made on the step before it, and records that selection in the
//! previous step's pixel space.
//!
//! Steps after the cursor are the "redo" tail. They survive undo/redo, but the
//! next committing action discards them (branch truncation).

use thiserror::Error;

use crate::geometry::{Rect, Source};
use crate::raster::RasterHandle;
use crate::Description;

/// Errors for history mutations that would break its invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    /// Steps after the original must record the selection that produced them.
    #[error("History step is missing its selection rectangle")]
    MissingSelection,

    /// The original image cannot be regenerated.
    #[error("Cannot regenerate the original image (cursor is at step 0)")]
    CannotRegenerateOriginal,
}

/// One entry in the zoom history.
#[derive(Debug, Clone)]
pub struct HistoryStep {
    pub image: RasterHandle,
    /// Annotation that guided the enhancement. `None` for the original.
    pub description: Option<Description>,
    /// Selection in the previous step's image that produced this one.
    /// `None` for the original.
    pub selection_rect: Option<Rect<Source>>,
}

impl HistoryStep {
    /// The loaded image, before any zoom.
    pub fn original(image: RasterHandle) -> Self {
        Self {
            image,
            description: None,
            selection_rect: None,
        }
    }

    /// An enhanced zoom into `selection_rect` of the previous step.
    pub fn zoomed(image: RasterHandle, description: Description, selection_rect: Rect<Source>) -> Self {
        Self {
            image,
            description: Some(description),
            selection_rect: Some(selection_rect),
        }
    }
}

/// Result of moving the cursor.
#[derive(Debug, Clone, Copy)]
pub struct Navigation<'a> {
    /// Step now under the cursor.
    pub step: &'a HistoryStep,
    /// Selection rect of the step one past the cursor, for drawing a
    /// "previous crop" overlay on the current image.
    pub overlay_rect: Option<Rect<Source>>,
}

/// The zoom history.
#[derive(Debug, Clone)]
pub struct History {
    steps: Vec<HistoryStep>,
    cursor: usize,
}

impl History {
    /// Start a history from a freshly loaded image.
    pub fn new(image: RasterHandle) -> Self {
        Self {
            steps: vec![HistoryStep::original(image)],
            cursor: 0,
        }
    }

    /// Replace the whole history with a single original step.
    pub fn load(&mut self, image: RasterHandle) {
        tracing::info!(
            width = image.width,
            height = image.height,
            discarded = self.steps.len(),
            "history reset"
        );
        self.steps = vec![HistoryStep::original(image)];
        self.cursor = 0;
    }

    /// Drop every step after the cursor. Returns how many were removed.
    pub fn truncate_after_cursor(&mut self) -> usize {
        let removed = self.steps.len() - (self.cursor + 1);
        if removed > 0 {
            tracing::debug!(removed, cursor = self.cursor, "discarding redo branch");
            self.steps.truncate(self.cursor + 1);
        }
        removed
    }

    /// Append a step after the cursor, discarding any redo tail first.
    ///
    /// Returns the new cursor.
    pub fn commit(&mut self, step: HistoryStep) -> Result<usize, HistoryError> {
        if step.selection_rect.is_none() {
            return Err(HistoryError::MissingSelection);
        }
        self.truncate_after_cursor();
        self.steps.push(step);
        self.cursor = self.steps.len() - 1;
        tracing::info!(cursor = self.cursor, "committed zoom step");
        Ok(self.cursor)
    }

    /// Replace the step under the cursor in place. The cursor does not move
    /// and earlier steps are untouched.
    ///
    /// Any redo tail is discarded: its selections address the image being
    /// replaced.
    pub fn regenerate(&mut self, step: HistoryStep) -> Result<(), HistoryError> {
        if self.cursor == 0 {
            return Err(HistoryError::CannotRegenerateOriginal);
        }
        if step.selection_rect.is_none() {
            return Err(HistoryError::MissingSelection);
        }
        self.truncate_after_cursor();
        self.steps[self.cursor] = step;
        tracing::info!(cursor = self.cursor, "regenerated zoom step");
        Ok(())
    }

    /// Step back. Returns `None` when already at the original.
    pub fn undo(&mut self) -> Option<Navigation<'_>> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.navigation())
    }

    /// Step forward. Returns `None` when already at the tip.
    pub fn redo(&mut self) -> Option<Navigation<'_>> {
        if self.cursor + 1 >= self.steps.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.navigation())
    }

    fn navigation(&self) -> Navigation<'_> {
        Navigation {
            step: &self.steps[self.cursor],
            overlay_rect: self
                .steps
                .get(self.cursor + 1)
                .and_then(|next| next.selection_rect),
        }
    }

    pub fn current(&self) -> &HistoryStep {
        &self.steps[self.cursor]
    }

    /// The step before the cursor, i.e. the image the current step was
    /// zoomed out of.
    pub fn previous(&self) -> Option<&HistoryStep> {
        self.cursor.checked_sub(1).map(|i| &self.steps[i])
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false: a history holds at least the original.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.steps.len()
    }

    /// One-based step counter for display: `(current, total)`.
    pub fn position(&self) -> (usize, usize) {
        (self.cursor + 1, self.steps.len())
    }

    /// All steps, including any redo tail.
    pub fn steps(&self) -> &[HistoryStep] {
        &self.steps
    }

    /// Steps `0..=cursor`.
    pub fn active(&self) -> &[HistoryStep] {
        &self.steps[..=self.cursor]
    }

    /// Descriptions of the active steps, oldest first.
    pub fn descriptions(&self) -> Vec<Description> {
        self.active()
            .iter()
            .filter_map(|s| s.description.clone())
            .collect()
    }

    /// Prompts of the active steps that carry a description, oldest first.
    /// A description without a prompt contributes an empty string.
    pub fn prompts(&self) -> Vec<String> {
        self.active()
            .iter()
            .filter_map(|s| s.description.as_ref())
            .map(|d| d.prompt_or_empty().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::Raster;

    fn image(tag: u8) -> RasterHandle {
        Raster::filled(2, 2, [tag, tag, tag]).into_handle()
    }

    fn step(tag: u8) -> HistoryStep {
        HistoryStep::zoomed(
            image(tag),
            Description::new(format!("step {}", tag), Some(format!("prompt {}", tag))),
            Rect::new(tag as f64, 0.0, 1.0, 1.0),
        )
    }

    fn tags(history: &History) -> Vec<u8> {
        history.steps().iter().map(|s| s.image.pixels[0]).collect()
    }

    #[test]
    fn test_new_history_has_original() {
        let h = History::new(image(0));
        assert_eq!(h.len(), 1);
        assert_eq!(h.cursor(), 0);
        assert!(h.current().selection_rect.is_none());
        assert!(!h.can_undo());
        assert!(!h.can_redo());
    }

    #[test]
    fn test_commit_appends_and_moves_cursor() {
        let mut h = History::new(image(0));
        assert_eq!(h.commit(step(1)).unwrap(), 1);
        assert_eq!(h.commit(step(2)).unwrap(), 2);
        assert_eq!(tags(&h), vec![0, 1, 2]);
    }

    #[test]
    fn test_commit_after_undo_discards_redo_tail() {
        // [A, B, C] with cursor at B, commit D -> [A, B, D]
        let mut h = History::new(image(0));
        h.commit(step(1)).unwrap();
        h.commit(step(2)).unwrap();
        h.undo().unwrap();
        assert_eq!(h.cursor(), 1);

        assert_eq!(h.commit(step(3)).unwrap(), 2);
        assert_eq!(tags(&h), vec![0, 1, 3]);
        assert_eq!(h.len(), 3);
    }

    #[test]
    fn test_commit_without_selection_rejected() {
        let mut h = History::new(image(0));
        let bad = HistoryStep::original(image(9));
        assert_eq!(h.commit(bad), Err(HistoryError::MissingSelection));
        assert_eq!(h.len(), 1);
    }

    #[test]
    fn test_undo_redo_with_overlay() {
        let mut h = History::new(image(0));
        h.commit(step(1)).unwrap();
        let r1 = h.current().selection_rect;

        let nav = h.undo().unwrap();
        assert_eq!(nav.step.image.pixels[0], 0);
        assert_eq!(nav.overlay_rect, r1);
        assert_eq!(h.cursor(), 0);

        let nav = h.redo().unwrap();
        assert_eq!(nav.step.image.pixels[0], 1);
        assert_eq!(nav.overlay_rect, None);
        assert_eq!(h.cursor(), 1);
    }

    #[test]
    fn test_undo_at_start_and_redo_at_tip_are_noops() {
        let mut h = History::new(image(0));
        assert!(h.undo().is_none());
        h.commit(step(1)).unwrap();
        assert!(h.redo().is_none());
        assert_eq!(h.cursor(), 1);
        assert_eq!(h.position(), (2, 2));
    }

    #[test]
    fn test_regenerate_replaces_only_current() {
        let mut h = History::new(image(0));
        h.commit(step(1)).unwrap();
        h.commit(step(2)).unwrap();
        h.undo().unwrap();

        h.regenerate(step(7)).unwrap();
        assert_eq!(h.cursor(), 1);
        // Step 2 zoomed into the old step 1, so it goes too
        assert_eq!(tags(&h), vec![0, 7]);
        assert!(!h.can_redo());
    }

    #[test]
    fn test_regenerate_original_rejected() {
        let mut h = History::new(image(0));
        assert_eq!(
            h.regenerate(step(1)),
            Err(HistoryError::CannotRegenerateOriginal)
        );
    }

    #[test]
    fn test_load_resets() {
        let mut h = History::new(image(0));
        h.commit(step(1)).unwrap();
        h.load(image(5));
        assert_eq!(tags(&h), vec![5]);
        assert_eq!(h.cursor(), 0);
    }

    #[test]
    fn test_truncate_after_cursor() {
        let mut h = History::new(image(0));
        h.commit(step(1)).unwrap();
        h.commit(step(2)).unwrap();
        h.undo().unwrap();
        h.undo().unwrap();
        assert_eq!(h.truncate_after_cursor(), 2);
        assert_eq!(h.len(), 1);
        assert_eq!(h.truncate_after_cursor(), 0);
    }

    #[test]
    fn test_active_descriptions_and_prompts() {
        let mut h = History::new(image(0));
        h.commit(step(1)).unwrap();
        h.commit(HistoryStep::zoomed(
            image(2),
            Description::new("no prompt", None),
            Rect::new(0.0, 0.0, 1.0, 1.0),
        ))
        .unwrap();
        h.commit(step(3)).unwrap();
        h.undo().unwrap();

        assert_eq!(h.active().len(), 3);
        assert_eq!(h.descriptions().len(), 2);
        assert_eq!(h.prompts(), vec!["prompt 1".to_string(), String::new()]);
        assert_eq!(h.previous().unwrap().image.pixels[0], 1);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::raster::Raster;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Op {
        Commit,
        Undo,
        Redo,
        Regenerate,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::Commit),
            Just(Op::Undo),
            Just(Op::Redo),
            Just(Op::Regenerate),
        ]
    }

    proptest! {
        /// Property: any sequence of operations keeps the invariants.
        #[test]
        fn prop_invariants_hold(ops in prop::collection::vec(op_strategy(), 0..60)) {
            let mut h = History::new(Raster::filled(1, 1, [0, 0, 0]).into_handle());
            for op in ops {
                let next = HistoryStep::zoomed(
                    Raster::filled(1, 1, [1, 1, 1]).into_handle(),
                    Description::new("x", None),
                    Rect::new(0.0, 0.0, 1.0, 1.0),
                );
                match op {
                    Op::Commit => { h.commit(next).unwrap(); }
                    Op::Undo => { h.undo(); }
                    Op::Redo => { h.redo(); }
                    Op::Regenerate => { let _ = h.regenerate(next); }
                }
                prop_assert!(h.cursor() < h.len());
                if matches!(op, Op::Regenerate) && h.cursor() > 0 {
                    prop_assert_eq!(h.cursor() + 1, h.len());
                }
                prop_assert!(h.steps()[0].selection_rect.is_none());
                prop_assert!(h.steps()[1..].iter().all(|s| s.selection_rect.is_some()));
            }
        }
    }
}
