use image::imageops::FilterType;

use crate::foundation::core::{Bitmap, Canvas};
use crate::foundation::error::{LoopgifError, LoopgifResult};
use crate::foundation::math::round_half_up;

/// Output scale in percent, clamped to `[10, 200]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct ScalePercent(f64);

impl ScalePercent {
    /// Smallest accepted scale.
    pub const MIN: f64 = 10.0;
    /// Largest accepted scale.
    pub const MAX: f64 = 200.0;

    /// Clamp `percent` into range. Non-finite input falls back to 100%.
    pub fn new(percent: f64) -> Self {
        if !percent.is_finite() {
            return Self(100.0);
        }
        Self(percent.clamp(Self::MIN, Self::MAX))
    }

    /// Scale in percent.
    pub fn percent(self) -> f64 {
        self.0
    }

    /// Scale as a multiplication factor (`1.0` for 100%).
    pub fn factor(self) -> f64 {
        self.0 / 100.0
    }
}

impl Default for ScalePercent {
    fn default() -> Self {
        Self(100.0)
    }
}

impl From<f64> for ScalePercent {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<ScalePercent> for f64 {
    fn from(value: ScalePercent) -> Self {
        value.0
    }
}

/// Canvas size after applying `scale`, rounded to whole pixels with a 1px floor.
pub fn scaled_canvas(canvas: Canvas, scale: ScalePercent) -> Canvas {
    let f = scale.factor();
    let dim = |v: u32| round_half_up(f64::from(v) * f).max(1) as u32;
    Canvas {
        width: dim(canvas.width),
        height: dim(canvas.height),
    }
}

/// Resample `bitmap` to exactly `width x height` (bilinear, aspect ratio not preserved).
pub fn resize(bitmap: &Bitmap, width: u32, height: u32) -> LoopgifResult<Bitmap> {
    Canvas::new(width, height)?;
    if bitmap.width() == width && bitmap.height() == height {
        return Ok(bitmap.clone());
    }

    let src = image::RgbaImage::from_raw(bitmap.width(), bitmap.height(), bitmap.data().to_vec())
        .ok_or_else(|| LoopgifError::validation("bitmap buffer does not match its dimensions"))?;
    // Resampled in premultiplied space.
    let out = image::imageops::resize(&src, width, height, FilterType::Triangle);
    Bitmap::from_premul_rgba8(width, height, out.into_raw())
}

/// Stretch every bitmap to the first one's size, then apply the uniform output scale.
///
/// Bitmaps already at the target size are passed through without copying.
#[tracing::instrument(skip(bitmaps), fields(count = bitmaps.len()))]
pub fn normalize(bitmaps: &[Bitmap], scale: ScalePercent) -> LoopgifResult<Vec<Bitmap>> {
    let first = bitmaps
        .first()
        .ok_or_else(|| LoopgifError::empty_input("no bitmaps to normalize"))?;
    let base = first.canvas();
    let target = scaled_canvas(base, scale);
    tracing::debug!(
        base_w = base.width,
        base_h = base.height,
        out_w = target.width,
        out_h = target.height,
        "normalizing slides"
    );

    bitmaps
        .iter()
        .map(|bmp| {
            let uniform = resize(bmp, base.width, base.height)?;
            resize(&uniform, target.width, target.height)
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/normalize/resize.rs"]
mod tests;
