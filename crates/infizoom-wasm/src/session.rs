//! Zoom session WASM bindings.
//!
//! The describe and enhance services live on the JavaScript side, so a
//! session hands out a job, the host performs both calls, and the job comes
//! back through `complete`:
//!
//! ```typescript
//! const session = new JsZoomSession({ enhance: { final_width: 1024 } });
//! session.load_bytes(bytes);
//! session.stage_fixed_box(event.offsetX, event.offsetY, letterbox);
//!
//! const job = session.begin_fresh();
//! const crop = job.describe_input();
//! const desc = crop ? await describe(crop, job.prior_descriptions()) : undefined;
//! const prompts = job.set_description(desc?.selection_description, desc?.prompt);
//! const enhanced = await enhance(job.enhance_input(), prompts).catch(() => undefined);
//! session.complete(job, enhanced);
//!
//! const reveal = session.reveal(Date.now() >>> 0);
//! // ...animate, then:
//! session.finish_reveal();
//! ```

use crate::geometry::JsLetterbox;
use crate::reveal::JsPixelReveal;
use crate::types::{config_from_js, rect_to_vec, JsRaster};
use infizoom_core::config::{EnhanceConfig, RevealConfig, ZoomExportConfig};
use infizoom_core::enhance::{
    EnhanceMode, EnhancementJob, Outcome, ServiceError, SessionError, ZoomSession,
};
use infizoom_core::geometry::Rect;
use infizoom_core::Description;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Deserialize;
use wasm_bindgen::prelude::*;

/// Marker for services that are invoked by the JavaScript host.
struct HostServices;

/// All tunables, as one optional object from JavaScript.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct SessionConfig {
    enhance: EnhanceConfig,
    reveal: RevealConfig,
    export: ZoomExportConfig,
}

fn to_js(e: SessionError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// An in-flight enhancement, waiting for the host's service answers.
#[wasm_bindgen]
pub struct JsEnhancementJob {
    job: Option<EnhancementJob>,
    description: Option<Description>,
}

#[wasm_bindgen]
impl JsEnhancementJob {
    /// The crop to describe, or `undefined` when the job keeps the current
    /// description (regenerate).
    pub fn describe_input(&self) -> Option<JsRaster> {
        self.job
            .as_ref()
            .and_then(|job| job.describe_input())
            .map(|crop| JsRaster::from_raster(crop.clone()))
    }

    /// Descriptions of the earlier zoom steps, oldest first.
    pub fn prior_descriptions(&self) -> Result<JsValue, JsValue> {
        let prior = self
            .job
            .as_ref()
            .map(|job| job.prior_descriptions())
            .unwrap_or_default();
        serde_wasm_bindgen::to_value(prior).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Record the describe answer and return the prompt history for the
    /// enhance call. Pass `undefined` text when describing failed.
    pub fn set_description(
        &mut self,
        selection_description: Option<String>,
        prompt: Option<String>,
    ) -> Result<Vec<String>, JsValue> {
        let job = self
            .job
            .as_ref()
            .ok_or_else(|| JsValue::from_str("Job already completed"))?;
        let answer = match selection_description {
            Some(text) => Ok(Description::new(text, prompt)),
            None => Err(ServiceError::Failed("describe returned nothing".to_string())),
        };
        let description = job.resolve_description(answer);
        let prompts = job.prompts_for(&description);
        self.description = Some(description);
        Ok(prompts)
    }

    /// The padded crop to send to the enhance service.
    pub fn enhance_input(&self) -> Result<JsRaster, JsValue> {
        self.job
            .as_ref()
            .map(|job| JsRaster::from_raster(job.enhance_input().clone()))
            .ok_or_else(|| JsValue::from_str("Job already completed"))
    }
}

/// A zoom session: history, staging and the enhancement state machine.
#[wasm_bindgen]
pub struct JsZoomSession {
    inner: ZoomSession<HostServices, HostServices>,
    reveal: RevealConfig,
    export: ZoomExportConfig,
}

#[wasm_bindgen]
impl JsZoomSession {
    /// Create a session. `config` may be omitted or partial:
    /// `{ enhance?: {...}, reveal?: {...}, export?: {...} }`.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<JsZoomSession, JsValue> {
        let config: SessionConfig = config_from_js(config)?;
        Ok(Self::from_config(config))
    }

    /// Create a session with default settings.
    pub fn with_defaults() -> JsZoomSession {
        Self::from_config(SessionConfig::default())
    }

    pub fn load(&mut self, image: &JsRaster) -> Result<(), JsValue> {
        self.inner.load(image.to_raster()).map_err(to_js)
    }

    /// Decode and load an uploaded file. On failure the current history is
    /// kept.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<(), JsValue> {
        self.inner.load_bytes(bytes).map_err(to_js)
    }

    /// The image under the history cursor.
    pub fn current_image(&self) -> Option<JsRaster> {
        self.inner
            .current_image()
            .map(|image| JsRaster::from_raster(image.as_ref().clone()))
    }

    #[wasm_bindgen(getter)]
    pub fn cursor(&self) -> usize {
        self.inner.history().map_or(0, |h| h.cursor())
    }

    /// Number of steps, including any redo tail.
    #[wasm_bindgen(getter)]
    pub fn step_count(&self) -> usize {
        self.inner.history().map_or(0, |h| h.len())
    }

    #[wasm_bindgen(getter)]
    pub fn can_undo(&self) -> bool {
        self.inner.history().is_some_and(|h| h.can_undo())
    }

    #[wasm_bindgen(getter)]
    pub fn can_redo(&self) -> bool {
        self.inner.history().is_some_and(|h| h.can_redo())
    }

    #[wasm_bindgen(getter)]
    pub fn is_busy(&self) -> bool {
        self.inner.is_busy()
    }

    /// Stage the fixed box around a canvas click. Returns the selection as
    /// `[x, y, w, h]` in image pixels.
    pub fn stage_fixed_box(
        &mut self,
        click_x: f64,
        click_y: f64,
        letterbox: &JsLetterbox,
    ) -> Result<Vec<f64>, JsValue> {
        self.inner
            .stage_fixed_box(click_x, click_y, letterbox.letterbox())
            .map(|rect| rect_to_vec(&rect))
            .map_err(to_js)
    }

    /// Stage a dragged canvas rectangle. Returns the selection as
    /// `[x, y, w, h]` in image pixels.
    pub fn stage_drag(
        &mut self,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        letterbox: &JsLetterbox,
    ) -> Result<Vec<f64>, JsValue> {
        self.inner
            .stage_drag(Rect::new(x, y, w, h), letterbox.letterbox())
            .map(|rect| rect_to_vec(&rect))
            .map_err(to_js)
    }

    pub fn cancel(&mut self) -> bool {
        self.inner.cancel()
    }

    /// Start enhancing the staged selection.
    pub fn begin_fresh(&mut self) -> Result<JsEnhancementJob, JsValue> {
        self.begin(EnhanceMode::Fresh)
    }

    /// Start regenerating the current step.
    pub fn begin_regenerate(&mut self) -> Result<JsEnhancementJob, JsValue> {
        self.begin(EnhanceMode::Regenerate)
    }

    /// Hand back a job with the enhanced raster, or `undefined` when the
    /// enhance call failed. Returns `"enhanced"` or `"fallback"`.
    pub fn complete(&mut self, job: &mut JsEnhancementJob, enhanced: Option<JsRaster>) -> Result<String, JsValue> {
        let inner = job
            .job
            .take()
            .ok_or_else(|| JsValue::from_str("Job already completed"))?;
        let description = match job.description.take() {
            Some(description) => description,
            None => inner.resolve_description(Err(ServiceError::NoCandidates)),
        };
        let enhanced = enhanced
            .map(|raster| raster.to_raster())
            .ok_or_else(|| ServiceError::Failed("enhance returned nothing".to_string()));

        let result = self
            .inner
            .complete(inner, description, enhanced)
            .map_err(to_js)?;
        Ok(match result.outcome {
            Outcome::Enhanced => "enhanced".to_string(),
            Outcome::Fallback => "fallback".to_string(),
        })
    }

    /// Start the pixel reveal of the completed job.
    pub fn reveal(&self, seed: u32) -> Result<JsPixelReveal, JsValue> {
        let mut rng = SmallRng::seed_from_u64(seed as u64);
        self.inner
            .reveal(&mut rng, &self.reveal)
            .map(JsPixelReveal::from_reveal)
            .map_err(to_js)
    }

    /// Commit the revealed result. Returns the new cursor.
    pub fn finish_reveal(&mut self) -> Result<usize, JsValue> {
        self.inner.finish_reveal().map_err(to_js)
    }

    /// Step back. Returns whether the cursor moved.
    pub fn undo(&mut self) -> Result<bool, JsValue> {
        self.inner.undo().map(|nav| nav.is_some()).map_err(to_js)
    }

    /// Step forward. Returns whether the cursor moved.
    pub fn redo(&mut self) -> Result<bool, JsValue> {
        self.inner.redo().map(|nav| nav.is_some()).map_err(to_js)
    }

    /// The selection that produced the next step, drawn as an overlay on
    /// the current image after an undo.
    pub fn overlay_rect(&self) -> Option<Vec<f64>> {
        let history = self.inner.history()?;
        history
            .steps()
            .get(history.cursor() + 1)
            .and_then(|next| next.selection_rect)
            .map(|rect| rect_to_vec(&rect))
    }

    /// Descriptions of the active steps, oldest first.
    pub fn descriptions(&self) -> Result<JsValue, JsValue> {
        let descriptions = self.inner.history().map(|h| h.descriptions()).unwrap_or_default();
        serde_wasm_bindgen::to_value(&descriptions).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Export the active history as an animated GIF.
    pub fn export_gif(&self) -> Result<Vec<u8>, JsValue> {
        self.inner.export_gif(&self.export).map_err(to_js)
    }
}

impl JsZoomSession {
    fn from_config(config: SessionConfig) -> Self {
        Self {
            inner: ZoomSession::new(HostServices, HostServices, config.enhance),
            reveal: config.reveal,
            export: config.export,
        }
    }

    fn begin(&mut self, mode: EnhanceMode) -> Result<JsEnhancementJob, JsValue> {
        let job = self.inner.begin(mode).map_err(to_js)?;
        Ok(JsEnhancementJob {
            job: Some(job),
            description: None,
        })
    }
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_partial_config() {
        let config = partial_config();
        assert!(JsZoomSession::new(config).is_ok());
    }

    #[wasm_bindgen_test]
    fn test_begin_without_stage_fails() {
        let mut session = JsZoomSession::with_defaults();
        session
            .load(&JsRaster::new(4, 4, vec![0u8; 48]).unwrap())
            .unwrap();
        assert!(session.begin_fresh().is_err());
    }

    #[wasm_bindgen_test]
    fn test_export_needs_two_steps() {
        let mut session = JsZoomSession::with_defaults();
        session
            .load(&JsRaster::new(4, 4, vec![0u8; 48]).unwrap())
            .unwrap();
        assert!(session.export_gif().is_err());
    }

    fn partial_config() -> JsValue {
        #[derive(serde::Serialize)]
        struct Partial {
            enhance: PartialEnhance,
        }
        #[derive(serde::Serialize)]
        struct PartialEnhance {
            final_width: u32,
        }
        serde_wasm_bindgen::to_value(&Partial {
            enhance: PartialEnhance { final_width: 512 },
        })
        .unwrap()
    }
}
