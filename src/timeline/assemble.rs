use rayon::prelude::*;

use crate::config::AnimationConfig;
use crate::effects::label::LabelPainter;
use crate::effects::transitions::generate;
use crate::foundation::core::Bitmap;
use crate::foundation::error::{LoopgifError, LoopgifResult};
use crate::timeline::model::{Frame, FrameRole, Timeline};

/// Shortest display time of a hold frame.
pub const MIN_HOLD_MS: u32 = 20;

/// Build the looping timeline `slide 0, 0->1, slide 1, 1->2, ..., slide n-1, n-1->0`.
///
/// Each slide contributes one hold frame (a single long frame rather than repeated copies) and
/// the transition into the next slide, one frame per `step_ms`. With labels on, the slide name
/// appears on the hold frame and on the first frame of its outgoing transition only.
///
/// `bitmaps` must already share one size (see [`crate::normalize::normalize`]). An empty input
/// yields an empty timeline.
#[tracing::instrument(skip_all, fields(slides = bitmaps.len(), kind = %config.transition))]
pub fn assemble(
    bitmaps: &[Bitmap],
    names: &[String],
    config: &AnimationConfig,
    labels: &mut LabelPainter,
) -> LoopgifResult<Timeline> {
    let n = bitmaps.len();
    let Some(first) = bitmaps.first() else {
        return Ok(Timeline::empty());
    };
    if let Some(odd) = bitmaps.iter().find(|b| !b.same_size(first)) {
        return Err(LoopgifError::dimension_mismatch(format!(
            "slides must be normalized before assembly: {}x{} vs {}x{}",
            first.width(),
            first.height(),
            odd.width(),
            odd.height()
        )));
    }

    let hold_ms = config.hold_ms().max(MIN_HOLD_MS);
    let transition_ms = config.transition_ms();
    let step_ms = config.step_ms;
    let params = config.transition_params()?;

    // Each pair reads only its two inputs.
    let transitions = (0..n)
        .into_par_iter()
        .map(|i| {
            generate(
                config.transition,
                &bitmaps[i],
                &bitmaps[(i + 1) % n],
                transition_ms,
                step_ms,
                &params,
            )
        })
        .collect::<LoopgifResult<Vec<Vec<Bitmap>>>>()?;

    let mut timeline = Timeline::new(first.canvas());
    for (i, mut frames) in transitions.into_iter().enumerate() {
        let label = label_for(config, names, i);
        let current = match label {
            Some(name) => labels.overlay(&bitmaps[i], name)?,
            None => bitmaps[i].clone(),
        };
        timeline.push(Frame {
            bitmap: current,
            delay_ms: hold_ms,
            role: FrameRole::Hold { slide: i },
        })?;

        if let (Some(name), Some(head)) = (label, frames.first_mut()) {
            *head = labels.overlay(head, name)?;
        }
        let to = (i + 1) % n;
        for (step, bitmap) in frames.into_iter().enumerate() {
            timeline.push(Frame {
                bitmap,
                delay_ms: step_ms,
                role: FrameRole::Transition { from: i, to, step },
            })?;
        }
    }

    tracing::debug!(
        frames = timeline.len(),
        loop_ms = timeline.loop_duration_ms(),
        "assembled timeline"
    );
    Ok(timeline)
}

fn label_for<'a>(config: &AnimationConfig, names: &'a [String], i: usize) -> Option<&'a str> {
    if !config.show_labels {
        return None;
    }
    names.get(i).map(String::as_str).filter(|s| !s.is_empty())
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/assemble.rs"]
mod tests;
