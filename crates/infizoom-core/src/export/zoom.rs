//! Frame synthesis for the zoom export.

use super::overlay::{draw_dashed_rect, DashStyle};
use super::ExportError;
use crate::compose::{extract_raster, Sampling};
use crate::config::ZoomExportConfig;
use crate::encode::{FrameEncoder, GifFrameEncoder};
use crate::geometry::{ease_in_out_cubic, interpolate_rect, map_into, Rect, Source};
use crate::history::HistoryStep;
use crate::raster::{resize, FilterType};

/// Output size of every frame.
///
/// The height follows the aspect of the first zoom's selection, and every
/// later pair is stretched to the same canvas.
pub fn canvas_size(steps: &[HistoryStep], config: &ZoomExportConfig) -> Result<(u32, u32), ExportError> {
    if steps.len() < 2 {
        return Err(ExportError::TooFewSteps { found: steps.len() });
    }
    let first = steps[1]
        .selection_rect
        .ok_or(ExportError::MissingSelection { index: 1 })?;
    let width = config.width.max(1);
    let height = (width as f64 * first.h / first.w).round().max(1.0) as u32;
    Ok((width, height))
}

/// Number of frames an export of `step_count` steps produces.
pub fn frame_count(step_count: usize, config: &ZoomExportConfig) -> usize {
    step_count.saturating_sub(1) * config.frames_per_pair() as usize
}

/// Render the zoom sequence of `steps` into `encoder`.
///
/// Returns the number of frames pushed. Output is fully deterministic.
pub fn synthesize<E: FrameEncoder>(
    steps: &[HistoryStep],
    config: &ZoomExportConfig,
    encoder: &mut E,
) -> Result<usize, ExportError> {
    let (cw, ch) = canvas_size(steps, config)?;
    let delay = config.frame_delay_ms();
    let zoom_frames = config.zoom_frames();
    let style = DashStyle {
        dash: config.dash_length,
        gap: config.gap_length,
        width: config.line_width,
        color: config.overlay_color,
    };

    let mut pushed = 0;
    for (i, pair) in steps.windows(2).enumerate() {
        let (from, to) = (&pair[0], &pair[1]);
        let target = to
            .selection_rect
            .ok_or(ExportError::MissingSelection { index: i + 1 })?;
        let full = Rect::<Source>::full(from.image.width as f64, from.image.height as f64);

        for f in 0..zoom_frames {
            let t = ease_in_out_cubic(f as f64 / zoom_frames as f64);
            let view = interpolate_rect(&full, &target, t);
            let mut frame = extract_raster(&from.image, &view, cw, ch, Sampling::Smooth)?;
            let outline = map_into(&target, &view, cw as f64, ch as f64);
            draw_dashed_rect(&mut frame, &outline, &style);
            encoder.push_frame(&frame, delay)?;
            pushed += 1;
        }

        let hold = resize(&to.image, cw, ch, FilterType::Bilinear)?;
        for _ in 0..config.hold_frames {
            encoder.push_frame(&hold, delay)?;
            pushed += 1;
        }
    }

    tracing::info!(frames = pushed, width = cw, height = ch, "zoom sequence rendered");
    Ok(pushed)
}

/// Render the zoom sequence of `steps` as an animated GIF.
pub fn export_zoom_gif(steps: &[HistoryStep], config: &ZoomExportConfig) -> Result<Vec<u8>, ExportError> {
    let mut encoder = GifFrameEncoder::new(config.max_colors);
    synthesize(steps, config, &mut encoder)?;
    Ok(encoder.finish()?)
}
