//! Slide-name badges burned into the top-left corner of a bitmap.

use crate::assets::font::{LabelFont, TextBrushRgba8, TextLayoutEngine};
use crate::effects::composite::over_in_place;
use crate::foundation::core::Bitmap;
use crate::foundation::error::{LoopgifError, LoopgifResult};
use crate::foundation::math::round_half_up;

/// Inset of the badge from the top-left corner, in pixels.
pub const BADGE_INSET: u32 = 4;
/// Smallest badge width, in pixels.
pub const MIN_BADGE_WIDTH: u32 = 12;
/// Smallest font size the fitter will shrink to.
pub const MIN_FONT_PX: u32 = 8;
/// Smallest padding between badge edge and text.
pub const MIN_PADDING: u32 = 2;
/// Shrink passes before the fitter settles.
pub const MAX_FIT_ITERATIONS: usize = 6;

const BADGE_FILL: [u8; 4] = [255, 255, 255, 217];
const TEXT_BRUSH: TextBrushRgba8 = TextBrushRgba8 {
    r: 0x11,
    g: 0x18,
    b: 0x27,
    a: 255,
};

/// Measures the advance width of one line of text at a pixel size.
pub trait TextMeasure {
    fn text_width(&mut self, text: &str, font_px: u32) -> f64;
}

/// Font-free measurer: every char advances `em_ratio * font_px`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedAdvance {
    pub em_ratio: f64,
}

impl Default for FixedAdvance {
    fn default() -> Self {
        Self { em_ratio: 0.6 }
    }
}

impl TextMeasure for FixedAdvance {
    fn text_width(&mut self, text: &str, font_px: u32) -> f64 {
        text.chars().count() as f64 * self.em_ratio * f64::from(font_px)
    }
}

/// Geometry of a fitted label badge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BadgeLayout {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub font_px: u32,
    pub padding: u32,
}

fn padding_for(font_px: u32) -> u32 {
    (round_half_up(f64::from(font_px) * 0.25) as u32).max(MIN_PADDING)
}

/// Fit a one-line badge for `text` on a `width x height` bitmap.
///
/// The badge width is fixed at 5% of the bitmap width; the font shrinks until the measured
/// text fits the inner width or the iteration budget runs out.
pub fn fit_badge(width: u32, height: u32, text: &str, measure: &mut dyn TextMeasure) -> BadgeLayout {
    let badge_w =
        (round_half_up(f64::from(width) * 0.05).max(0) as u32).max(MIN_BADGE_WIDTH);
    let guess = (f64::from(height) * 0.12).min(f64::from(badge_w));
    let mut font_px = (round_half_up(guess).max(0) as u32).max(MIN_FONT_PX);
    let mut padding = padding_for(font_px);

    for _ in 0..MAX_FIT_ITERATIONS {
        let text_w = measure.text_width(text, font_px);
        let inner_w = f64::from(badge_w) - f64::from(padding) * 2.0;
        if !(text_w > inner_w && text_w > 0.0) {
            break;
        }
        let scaled = (f64::from(font_px) * inner_w / text_w).floor();
        let next = if scaled.is_finite() && scaled > f64::from(MIN_FONT_PX) {
            scaled as u32
        } else {
            MIN_FONT_PX
        };
        if next == font_px {
            break;
        }
        font_px = next;
        padding = padding_for(font_px);
    }

    BadgeLayout {
        x: BADGE_INSET,
        y: BADGE_INSET,
        width: badge_w,
        height: font_px + padding * 2,
        font_px,
        padding,
    }
}

/// Burns slide labels into bitmaps.
///
/// With a font, text is shaped by Parley and rasterized by `vello_cpu`. Without one, badges are
/// still fitted (using [`FixedAdvance`]) and drawn, but carry no glyphs.
pub struct LabelPainter {
    text: Option<TextLayoutEngine>,
    fallback: FixedAdvance,
}

impl LabelPainter {
    /// Painter that draws glyphs with `font`.
    pub fn with_font(font: &LabelFont) -> LoopgifResult<Self> {
        Ok(Self {
            text: Some(TextLayoutEngine::new(font)?),
            fallback: FixedAdvance::default(),
        })
    }

    /// Painter that only draws badges, never glyphs.
    pub fn without_font() -> Self {
        Self {
            text: None,
            fallback: FixedAdvance::default(),
        }
    }

    /// Painter using the system's bold sans-serif, or badge-only when none is installed.
    pub fn system() -> Self {
        match LabelFont::system_sans_bold().and_then(|font| Self::with_font(&font)) {
            Ok(painter) => painter,
            Err(err) => {
                tracing::warn!(%err, "no usable label font; labels will be drawn without text");
                Self::without_font()
            }
        }
    }

    /// `true` when glyphs will be drawn.
    pub fn has_font(&self) -> bool {
        self.text.is_some()
    }

    /// Fit a badge for `text` using this painter's measurer.
    pub fn layout(&mut self, width: u32, height: u32, text: &str) -> BadgeLayout {
        match self.text.as_mut() {
            Some(engine) => fit_badge(width, height, text, engine),
            None => fit_badge(width, height, text, &mut self.fallback),
        }
    }

    /// Return `bitmap` with `text` burned in. Blank text returns the input unchanged.
    pub fn overlay(&mut self, bitmap: &Bitmap, text: &str) -> LoopgifResult<Bitmap> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(bitmap.clone());
        }

        let (w, h) = (bitmap.width(), bitmap.height());
        let (w16, h16) = match (u16::try_from(w), u16::try_from(h)) {
            (Ok(w16), Ok(h16)) => (w16, h16),
            _ => {
                return Err(LoopgifError::validation(format!(
                    "label overlay supports bitmaps up to 65535px, got {w}x{h}"
                )));
            }
        };

        let badge = self.layout(w, h, text);
        tracing::trace!(?badge, text, "label badge");

        let mut ctx = vello_cpu::RenderContext::new(w16, h16);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            BADGE_FILL[0],
            BADGE_FILL[1],
            BADGE_FILL[2],
            BADGE_FILL[3],
        ));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            f64::from(badge.x),
            f64::from(badge.y),
            f64::from(badge.x + badge.width),
            f64::from(badge.y + badge.height),
        ));
        if let Some(engine) = self.text.as_mut() {
            let origin = (
                f64::from(badge.x + badge.padding),
                f64::from(badge.y + badge.padding),
            );
            engine.fill_line(&mut ctx, text, badge.font_px as f32, TEXT_BRUSH, origin)?;
        }
        ctx.flush();

        let mut layer = vello_cpu::Pixmap::new(w16, h16);
        ctx.render_to_pixmap(&mut layer);

        let mut out = bitmap.data().to_vec();
        over_in_place(&mut out, layer.data_as_u8_slice(), 1.0)?;
        Bitmap::from_premul_rgba8(w, h, out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/label.rs"]
mod tests;
