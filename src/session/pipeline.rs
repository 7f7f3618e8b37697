use crate::assets::font::LabelFont;
use crate::config::AnimationConfig;
use crate::effects::label::LabelPainter;
use crate::encode::sink::{AnimationEncoder, CancelToken};
use crate::foundation::core::{Bitmap, Canvas};
use crate::foundation::error::{LoopgifError, LoopgifResult};
use crate::normalize::normalize;
use crate::timeline::{Timeline, assemble};

/// Encoded animation plus a summary of the timeline behind it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Animation {
    pub bytes: Vec<u8>,
    pub canvas: Canvas,
    pub frame_count: usize,
    pub loop_duration_ms: u64,
}

/// Pick the painter a build should use.
///
/// With labels off no font is loaded. Otherwise `font` wins, falling back to the system sans.
pub fn label_painter(
    config: &AnimationConfig,
    font: Option<&LabelFont>,
) -> LoopgifResult<LabelPainter> {
    if !config.show_labels {
        return Ok(LabelPainter::without_font());
    }
    match font {
        Some(font) => LabelPainter::with_font(font),
        None => Ok(LabelPainter::system()),
    }
}

/// Normalize `bitmaps` and stitch them into a looping timeline.
///
/// At least two slides are required; fewer is [`LoopgifError::EmptyInput`].
pub fn render_timeline(
    bitmaps: &[Bitmap],
    names: &[String],
    config: &AnimationConfig,
    labels: &mut LabelPainter,
) -> LoopgifResult<Timeline> {
    if bitmaps.len() < 2 {
        return Err(LoopgifError::empty_input(format!(
            "need at least 2 slides to build, got {}",
            bitmaps.len()
        )));
    }
    config.validate()?;
    let normalized = normalize(bitmaps, config.scale_percent)?;
    assemble(&normalized, names, config, labels)
}

/// Full build: normalize, assemble, encode.
///
/// `cancel` is checked between stages and by the encoder between frames.
#[tracing::instrument(skip_all, fields(slides = bitmaps.len()))]
pub fn build_animation(
    bitmaps: &[Bitmap],
    names: &[String],
    config: &AnimationConfig,
    labels: &mut LabelPainter,
    encoder: &dyn AnimationEncoder,
    cancel: &CancelToken,
) -> LoopgifResult<Animation> {
    let timeline = render_timeline(bitmaps, names, config, labels)?;
    if cancel.is_cancelled() {
        return Err(LoopgifError::EncodingAborted);
    }
    let bytes = encoder.encode(&timeline, config, cancel)?;
    Ok(Animation {
        bytes,
        canvas: timeline.canvas(),
        frame_count: timeline.len(),
        loop_duration_ms: timeline.loop_duration_ms(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/session/pipeline.rs"]
mod tests;
