//! A complete zoom session: history, orchestrator and the two services.

use rand::Rng;
use thiserror::Error;

use super::{
    Describer, EnhanceError, EnhanceMode, EnhancementJob, EnhancementResult, Enhancer,
    Orchestrator, Phase, ServiceError,
};
use crate::config::{EnhanceConfig, RevealConfig, ZoomExportConfig};
use crate::export::{export_zoom_gif, ExportError};
use crate::geometry::{fixed_box_at, GeometryError, Letterbox, Rect, Screen, Source};
use crate::history::{History, Navigation};
use crate::raster::{decode_image, DecodeError, Raster, RasterHandle};
use crate::reveal::{PixelReveal, RevealError};
use crate::Description;

/// Errors surfaced by [`ZoomSession`].
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No image loaded")]
    NoImage,

    #[error(transparent)]
    Enhance(#[from] EnhanceError),

    #[error("Failed to load image: {0}")]
    Decode(#[from] DecodeError),

    #[error("Invalid selection: {0}")]
    Geometry(#[from] GeometryError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    #[error("Reveal failed: {0}")]
    Reveal(#[from] RevealError),
}

/// Owns the zoom history and drives enhancements against a describer and
/// an enhancer.
pub struct ZoomSession<D, E> {
    history: Option<History>,
    orchestrator: Orchestrator,
    describer: D,
    enhancer: E,
}

impl<D, E> ZoomSession<D, E> {
    pub fn new(describer: D, enhancer: E, config: EnhanceConfig) -> Self {
        Self {
            history: None,
            orchestrator: Orchestrator::new(config),
            describer,
            enhancer,
        }
    }

    pub fn history(&self) -> Option<&History> {
        self.history.as_ref()
    }

    pub fn phase(&self) -> &Phase {
        self.orchestrator.phase()
    }

    pub fn is_busy(&self) -> bool {
        self.orchestrator.is_busy()
    }

    /// The image under the history cursor.
    pub fn current_image(&self) -> Option<&RasterHandle> {
        self.history.as_ref().map(|h| &h.current().image)
    }

    /// Start over from `image`. Any staged selection is dropped.
    ///
    /// An empty raster or one whose buffer does not match its dimensions is
    /// rejected and the current history is left as it was.
    pub fn load(&mut self, image: Raster) -> Result<(), SessionError> {
        if self.orchestrator.is_busy() {
            return Err(EnhanceError::Busy.into());
        }
        image.check_buffer()?;
        if image.is_empty() {
            return Err(DecodeError::EmptyImage {
                width: image.width,
                height: image.height,
            }
            .into());
        }
        let image = image.into_handle();
        tracing::info!(width = image.width, height = image.height, "image loaded");
        self.orchestrator.cancel();
        match self.history.as_mut() {
            Some(history) => history.load(image),
            None => self.history = Some(History::new(image)),
        }
        Ok(())
    }

    /// Decode uploaded bytes and start over from them. On a decode failure
    /// the current history is left as it was.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<(), SessionError> {
        if self.orchestrator.is_busy() {
            return Err(EnhanceError::Busy.into());
        }
        let image = decode_image(bytes)?;
        self.load(image)
    }

    fn image_size(&self) -> Result<(f64, f64), SessionError> {
        let image = self.current_image().ok_or(SessionError::NoImage)?;
        Ok((image.width as f64, image.height as f64))
    }

    /// Stage a selection already expressed in source pixels.
    pub fn stage(&mut self, selection: Rect<Source>, screen: Rect<Screen>) -> Result<(), SessionError> {
        self.image_size()?;
        self.orchestrator.stage(selection, screen)?;
        Ok(())
    }

    /// Stage the fixed-size box centered on a click at screen coordinates.
    ///
    /// Returns the staged selection in source pixels.
    pub fn stage_fixed_box(
        &mut self,
        click_x: f64,
        click_y: f64,
        letterbox: &Letterbox,
    ) -> Result<Rect<Source>, SessionError> {
        let (img_w, img_h) = self.image_size()?;
        let point = letterbox.to_source(Rect::new(click_x, click_y, 0.0, 0.0), img_w);
        let fraction = self.orchestrator.config().fixed_box_fraction;
        let selection = fixed_box_at(point.x, point.y, fraction, img_w, img_h)?;
        let screen = letterbox.to_screen(selection, img_w);
        self.orchestrator.stage(selection, screen)?;
        Ok(selection)
    }

    /// Stage a free-drawn screen rectangle, clipped to the image.
    ///
    /// Returns the staged selection in source pixels.
    pub fn stage_drag(&mut self, screen: Rect<Screen>, letterbox: &Letterbox) -> Result<Rect<Source>, SessionError> {
        let (img_w, img_h) = self.image_size()?;
        let selection = letterbox
            .to_source(screen, img_w)
            .intersect(&Rect::full(img_w, img_h))
            .non_empty()?;
        self.orchestrator.stage(selection, screen)?;
        Ok(selection)
    }

    /// Drop the staged selection, if any.
    pub fn cancel(&mut self) -> bool {
        self.orchestrator.cancel()
    }

    /// Start a job whose service calls the caller performs itself.
    ///
    /// Hand the job back through [`complete`](Self::complete).
    pub fn begin(&mut self, mode: EnhanceMode) -> Result<EnhancementJob, SessionError> {
        let history = self.history.as_mut().ok_or(SessionError::NoImage)?;
        Ok(self.orchestrator.begin(history, mode)?)
    }

    /// Finish a job started with [`begin`](Self::begin), given the resolved
    /// description and the enhance answer.
    pub fn complete(
        &mut self,
        job: EnhancementJob,
        description: Description,
        enhanced: Result<Raster, ServiceError>,
    ) -> Result<&EnhancementResult, SessionError> {
        let result = job.finish(description, enhanced);
        self.accept(result)
    }

    fn accept(
        &mut self,
        result: Result<EnhancementResult, EnhanceError>,
    ) -> Result<&EnhancementResult, SessionError> {
        match result {
            Ok(result) => Ok(self.orchestrator.complete(result)?),
            Err(e) => {
                self.orchestrator.abort();
                Err(e.into())
            }
        }
    }

    /// Build the pixel reveal for the pending result.
    pub fn reveal<R: Rng>(&self, rng: &mut R, config: &RevealConfig) -> Result<PixelReveal, SessionError> {
        let pending = self
            .orchestrator
            .pending_reveal()
            .ok_or(EnhanceError::NotRevealing)?;
        Ok(PixelReveal::from_config(
            pending.low_preview.clone(),
            pending.final_raster.clone(),
            config,
            rng,
        )?)
    }

    /// Commit the pending result once its reveal has ended. Returns the new
    /// history cursor.
    pub fn finish_reveal(&mut self) -> Result<usize, SessionError> {
        let history = self.history.as_mut().ok_or(SessionError::NoImage)?;
        Ok(self.orchestrator.finish_reveal(history)?)
    }

    /// Step back through the history. Drops any staged selection.
    pub fn undo(&mut self) -> Result<Option<Navigation<'_>>, SessionError> {
        if self.orchestrator.is_busy() {
            return Err(EnhanceError::Busy.into());
        }
        let history = self.history.as_mut().ok_or(SessionError::NoImage)?;
        self.orchestrator.cancel();
        Ok(history.undo())
    }

    /// Step forward through the history. Drops any staged selection.
    pub fn redo(&mut self) -> Result<Option<Navigation<'_>>, SessionError> {
        if self.orchestrator.is_busy() {
            return Err(EnhanceError::Busy.into());
        }
        let history = self.history.as_mut().ok_or(SessionError::NoImage)?;
        self.orchestrator.cancel();
        Ok(history.redo())
    }

    /// Export the active history as an animated zoom GIF.
    pub fn export_gif(&self, config: &ZoomExportConfig) -> Result<Vec<u8>, SessionError> {
        if self.orchestrator.is_busy() {
            return Err(EnhanceError::Busy.into());
        }
        let history = self.history.as_ref().ok_or(SessionError::NoImage)?;
        let bytes = export_zoom_gif(history.active(), config)?;
        tracing::info!(steps = history.cursor() + 1, bytes = bytes.len(), "zoom gif exported");
        Ok(bytes)
    }
}

impl<D: Describer, E: Enhancer> ZoomSession<D, E> {
    /// Enhance the staged selection. The result is held for the reveal and
    /// committed by [`finish_reveal`](Self::finish_reveal).
    pub async fn enhance(&mut self) -> Result<&EnhancementResult, SessionError> {
        self.run_job(EnhanceMode::Fresh).await
    }

    /// Re-run the current step with wider context, keeping its description.
    pub async fn regenerate(&mut self) -> Result<&EnhancementResult, SessionError> {
        self.run_job(EnhanceMode::Regenerate).await
    }

    async fn run_job(&mut self, mode: EnhanceMode) -> Result<&EnhancementResult, SessionError> {
        let job = self.begin(mode)?;
        let result = job.run(&self.describer, &self.enhancer).await;
        self.accept(result)
    }
}
