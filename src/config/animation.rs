use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::effects::transitions::{SlideDir, TransitionKind, TransitionParams, WipeDir};
use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{LoopgifError, LoopgifResult};
use crate::foundation::math::round_half_up;
use crate::normalize::ScalePercent;

/// Shortest transition the assembler will generate.
pub const MIN_TRANSITION_MS: u32 = 100;
/// Default spacing between transition frames (~20 fps).
pub const DEFAULT_STEP_MS: u32 = 50;

/// Everything the user can tune about a build.
///
/// Durations are stored in seconds the way they are entered; the assembler consumes the
/// derived millisecond values.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnimationConfig {
    /// How long each slide rests before its transition starts.
    pub hold_seconds: f64,
    /// Length of every transition. Values below 0.1s are raised to 0.1s.
    pub transition_seconds: f64,
    pub transition: TransitionKind,
    /// Burn slide names into the frames.
    pub show_labels: bool,
    /// Output scale in percent, clamped to `[10, 200]`.
    pub scale_percent: ScalePercent,
    pub wipe_direction: WipeDir,
    pub slide_direction: SlideDir,
    /// Color the `dip` transition fades through (`#rrggbb`, `#rrggbbaa` or a CSS name).
    pub dip_color: String,
    /// Display time of each transition frame.
    pub step_ms: u32,
    /// GIF quantizer speed, 1 (best) to 30 (fastest).
    pub gif_speed: i32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            hold_seconds: 2.0,
            transition_seconds: 0.5,
            transition: TransitionKind::Wipe,
            show_labels: false,
            scale_percent: ScalePercent::default(),
            wipe_direction: WipeDir::default(),
            slide_direction: SlideDir::default(),
            dip_color: "white".to_string(),
            step_ms: DEFAULT_STEP_MS,
            gif_speed: 10,
        }
    }
}

impl AnimationConfig {
    /// Parse a config from a JSON reader. Missing fields take their defaults.
    pub fn from_reader<R: std::io::Read>(r: R) -> LoopgifResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| LoopgifError::validation(format!("parse animation config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> LoopgifResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            LoopgifError::validation(format!("open animation config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn validate(&self) -> LoopgifResult<()> {
        if !self.hold_seconds.is_finite() || self.hold_seconds < 0.0 {
            return Err(LoopgifError::validation(
                "hold_seconds must be finite and >= 0",
            ));
        }
        if !self.transition_seconds.is_finite() || self.transition_seconds < 0.0 {
            return Err(LoopgifError::validation(
                "transition_seconds must be finite and >= 0",
            ));
        }
        if self.step_ms == 0 {
            return Err(LoopgifError::validation("step_ms must be > 0"));
        }
        if !(1..=30).contains(&self.gif_speed) {
            return Err(LoopgifError::validation("gif_speed must be in 1..=30"));
        }
        Rgba8Premul::parse(&self.dip_color)?;
        Ok(())
    }

    /// Hold duration in milliseconds.
    pub fn hold_ms(&self) -> u32 {
        seconds_to_ms(self.hold_seconds)
    }

    /// Transition duration in milliseconds, never below [`MIN_TRANSITION_MS`].
    pub fn transition_ms(&self) -> u32 {
        seconds_to_ms(self.transition_seconds).max(MIN_TRANSITION_MS)
    }

    /// Parameters handed to the transition generators.
    pub fn transition_params(&self) -> LoopgifResult<TransitionParams> {
        Ok(TransitionParams {
            wipe_dir: self.wipe_direction,
            slide_dir: self.slide_direction,
            dip_color: Rgba8Premul::parse(&self.dip_color)?,
        })
    }
}

fn seconds_to_ms(secs: f64) -> u32 {
    if !secs.is_finite() {
        return 0;
    }
    round_half_up(secs * 1000.0).clamp(0, i64::from(u32::MAX)) as u32
}

#[cfg(test)]
#[path = "../../tests/unit/config/animation.rs"]
mod tests;
