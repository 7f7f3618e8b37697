use std::fmt;
use std::str::FromStr;

use crate::effects::composite::{
    ScaledDraw, blit_shifted, crossfade_into, draw_scaled_over,
};
use crate::foundation::core::{Bitmap, Rgba8Premul};
use crate::foundation::error::{LoopgifError, LoopgifResult};
use crate::foundation::math::round_half_up;

/// Transition played between two consecutive slides.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TransitionKind {
    /// Hard-edged reveal of the next slide.
    #[default]
    Wipe,
    /// Linear alpha blend.
    Crossfade,
    /// Next slide slides in horizontally over the current one.
    Slide,
    /// Subtle scale change combined with a crossfade.
    Zoom,
    /// Fade through a solid color.
    Dip,
}

impl TransitionKind {
    /// Every kind, in lookup-table order.
    pub const ALL: [TransitionKind; 5] = [
        TransitionKind::Wipe,
        TransitionKind::Crossfade,
        TransitionKind::Slide,
        TransitionKind::Zoom,
        TransitionKind::Dip,
    ];

    /// Stable lowercase name used in configs and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            TransitionKind::Wipe => "wipe",
            TransitionKind::Crossfade => "crossfade",
            TransitionKind::Slide => "slide",
            TransitionKind::Zoom => "zoom",
            TransitionKind::Dip => "dip",
        }
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransitionKind {
    type Err = LoopgifError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_transition_kind(s)
    }
}

/// Parse a transition kind name, accepting a few aliases.
pub fn parse_transition_kind(kind: &str) -> LoopgifResult<TransitionKind> {
    let kind = kind.trim().to_ascii_lowercase();
    if kind.is_empty() {
        return Err(LoopgifError::validation("transition kind must be non-empty"));
    }

    match kind.as_str() {
        "wipe" => Ok(TransitionKind::Wipe),
        "crossfade" | "fade" => Ok(TransitionKind::Crossfade),
        "slide" | "push" => Ok(TransitionKind::Slide),
        "zoom" | "zoom_crossfade" | "zoom-crossfade" => Ok(TransitionKind::Zoom),
        "dip" | "dip_to_color" | "dip-to-color" => Ok(TransitionKind::Dip),
        _ => Err(LoopgifError::validation(format!(
            "unknown transition kind '{kind}'"
        ))),
    }
}

/// Edge the wipe reveals the next slide from.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum WipeDir {
    /// Revealed strip grows from the right edge inward.
    #[default]
    RightToLeft,
    /// Revealed strip grows from the left edge inward.
    LeftToRight,
}

/// Edge the next slide enters from during a slide transition.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SlideDir {
    /// Enters from the right edge, moving left.
    #[default]
    FromRight,
    /// Enters from the left edge, moving right.
    FromLeft,
}

/// Per-kind knobs. Kinds ignore the fields that do not concern them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionParams {
    pub wipe_dir: WipeDir,
    pub slide_dir: SlideDir,
    pub dip_color: Rgba8Premul,
}

impl Default for TransitionParams {
    fn default() -> Self {
        Self {
            wipe_dir: WipeDir::default(),
            slide_dir: SlideDir::default(),
            dip_color: Rgba8Premul::white(),
        }
    }
}

/// Number of intervals a transition of `duration_ms` is cut into: `max(2, round(d / step))`.
///
/// The generated sequence has `steps + 1` frames.
pub fn step_count(duration_ms: u32, step_ms: u32) -> LoopgifResult<u32> {
    if step_ms == 0 {
        return Err(LoopgifError::validation("transition step_ms must be > 0"));
    }
    let steps = round_half_up(f64::from(duration_ms) / f64::from(step_ms));
    Ok(steps.max(2) as u32)
}

type Generator = fn(&Bitmap, &Bitmap, u32, &TransitionParams) -> LoopgifResult<Vec<Bitmap>>;

// Indexed by `TransitionKind as usize`; order must follow `TransitionKind::ALL`.
const GENERATORS: [Generator; 5] = [
    wipe_frames,
    crossfade_frames,
    slide_frames,
    zoom_frames,
    dip_frames,
];

/// Generate the frames bridging `a` into `b`.
///
/// Both endpoints are included: the first frame is `a` and the last is `b`.
pub fn generate(
    kind: TransitionKind,
    a: &Bitmap,
    b: &Bitmap,
    duration_ms: u32,
    step_ms: u32,
    params: &TransitionParams,
) -> LoopgifResult<Vec<Bitmap>> {
    if !a.same_size(b) {
        return Err(LoopgifError::dimension_mismatch(format!(
            "transition endpoints differ in size: {}x{} vs {}x{}",
            a.width(),
            a.height(),
            b.width(),
            b.height()
        )));
    }
    let steps = step_count(duration_ms, step_ms)?;
    GENERATORS[kind as usize](a, b, steps, params)
}

fn sample_times(steps: u32) -> impl Iterator<Item = f64> {
    (0..=steps).map(move |i| f64::from(i) / f64::from(steps))
}

/// Reveal `b` column by column over `a`; `round(width * t)` columns are revealed.
pub fn wipe_frames(
    a: &Bitmap,
    b: &Bitmap,
    steps: u32,
    params: &TransitionParams,
) -> LoopgifResult<Vec<Bitmap>> {
    let (w, h) = (a.width(), a.height());
    let row = (w as usize) * 4;

    sample_times(steps)
        .map(|t| {
            let reveal = (round_half_up(f64::from(w) * t).clamp(0, i64::from(w))) as usize;
            let mut out = a.data().to_vec();
            if reveal > 0 {
                let start = match params.wipe_dir {
                    WipeDir::RightToLeft => w as usize - reveal,
                    WipeDir::LeftToRight => 0,
                };
                for y in 0..h as usize {
                    let s = y * row + start * 4;
                    out[s..s + reveal * 4].copy_from_slice(&b.data()[s..s + reveal * 4]);
                }
            }
            Bitmap::from_premul_rgba8(w, h, out)
        })
        .collect()
}

pub fn crossfade_frames(
    a: &Bitmap,
    b: &Bitmap,
    steps: u32,
    _params: &TransitionParams,
) -> LoopgifResult<Vec<Bitmap>> {
    sample_times(steps)
        .map(|t| {
            let mut out = vec![0u8; a.data().len()];
            crossfade_into(&mut out, a.data(), b.data(), t as f32)?;
            Bitmap::from_premul_rgba8(a.width(), a.height(), out)
        })
        .collect()
}

/// Translate `b` horizontally from the entry edge to the origin over a static `a`.
pub fn slide_frames(
    a: &Bitmap,
    b: &Bitmap,
    steps: u32,
    params: &TransitionParams,
) -> LoopgifResult<Vec<Bitmap>> {
    let (w, h) = (a.width(), a.height());
    let wf = f64::from(w);

    sample_times(steps)
        .map(|t| {
            let x = match params.slide_dir {
                SlideDir::FromRight => round_half_up((1.0 - t) * wf),
                SlideDir::FromLeft => round_half_up((t - 1.0) * wf),
            };
            let mut out = a.data().to_vec();
            blit_shifted(&mut out, b.data(), w, h, x)?;
            Bitmap::from_premul_rgba8(w, h, out)
        })
        .collect()
}

/// `a` shrinks from 100% to 98% while fading out; `b` shrinks from 102% to 100% while
/// fading in. Both are centered on a transparent canvas.
pub fn zoom_frames(
    a: &Bitmap,
    b: &Bitmap,
    steps: u32,
    _params: &TransitionParams,
) -> LoopgifResult<Vec<Bitmap>> {
    let (w, h) = (a.width(), a.height());

    sample_times(steps)
        .map(|t| {
            let mut out = vec![0u8; a.data().len()];
            let scale_a = 1.0 - 0.02 * t;
            let scale_b = 1.0 + 0.02 * (1.0 - t);
            draw_scaled_over(&mut out, a.data(), centered(w, h, scale_a, 1.0 - t))?;
            draw_scaled_over(&mut out, b.data(), centered(w, h, scale_b, t))?;
            Bitmap::from_premul_rgba8(w, h, out)
        })
        .collect()
}

fn centered(width: u32, height: u32, scale: f64, opacity: f64) -> ScaledDraw {
    let dw = round_half_up(f64::from(width) * scale).max(1);
    let dh = round_half_up(f64::from(height) * scale).max(1);
    ScaledDraw {
        width,
        height,
        dx: round_half_up((i64::from(width) - dw) as f64 / 2.0),
        dy: round_half_up((i64::from(height) - dh) as f64 / 2.0),
        dw: dw as u32,
        dh: dh as u32,
        opacity: opacity as f32,
    }
}

/// Fade `a` into the dip color over the first half of the steps, then the color into `b`.
///
/// Frame `steps / 2` (floored) is the solid color.
pub fn dip_frames(
    a: &Bitmap,
    b: &Bitmap,
    steps: u32,
    params: &TransitionParams,
) -> LoopgifResult<Vec<Bitmap>> {
    let (w, h) = (a.width(), a.height());
    let solid = Bitmap::solid(w, h, params.dip_color)?;
    let half = steps / 2;

    (0..=steps)
        .map(|i| {
            let (from, to, t) = if i <= half {
                (a, &solid, f64::from(i) / f64::from(half))
            } else {
                (&solid, b, f64::from(i - half) / f64::from(steps - half))
            };
            let mut out = vec![0u8; a.data().len()];
            crossfade_into(&mut out, from.data(), to.data(), t as f32)?;
            Bitmap::from_premul_rgba8(w, h, out)
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/effects/transitions.rs"]
mod tests;
