use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;

use crate::effects::label::TextMeasure;
use crate::foundation::error::{LoopgifError, LoopgifResult};

/// Raw font file used to shape and draw slide labels.
#[derive(Clone)]
pub struct LabelFont {
    bytes: Arc<Vec<u8>>,
    index: u32,
}

impl std::fmt::Debug for LabelFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelFont")
            .field("len", &self.bytes.len())
            .field("index", &self.index)
            .finish()
    }
}

impl LabelFont {
    /// Wrap TTF/OTF bytes (first face of a collection).
    pub fn from_bytes(bytes: Vec<u8>) -> LoopgifResult<Self> {
        if bytes.is_empty() {
            return Err(LoopgifError::validation("font bytes must be non-empty"));
        }
        Ok(Self {
            bytes: Arc::new(bytes),
            index: 0,
        })
    }

    /// Read a font file from disk.
    pub fn from_path(path: impl AsRef<Path>) -> LoopgifResult<Self> {
        let path = path.as_ref();
        let bytes =
            std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
        Self::from_bytes(bytes)
    }

    /// Pick a bold sans-serif face from the fonts installed on this machine.
    pub fn system_sans_bold() -> LoopgifResult<Self> {
        use usvg::fontdb::{Database, Family, Query, Weight};

        let mut db = Database::new();
        db.load_system_fonts();

        let query = Query {
            families: &[
                Family::SansSerif,
                Family::Name("DejaVu Sans"),
                Family::Name("Liberation Sans"),
                Family::Name("Noto Sans"),
                Family::Name("Helvetica"),
                Family::Name("Arial"),
            ],
            weight: Weight::BOLD,
            ..Default::default()
        };
        let id = db
            .query(&query)
            .or_else(|| db.faces().next().map(|face| face.id))
            .ok_or_else(|| LoopgifError::validation("no system fonts available"))?;

        let (bytes, index) = db
            .with_face_data(id, |data, index| (data.to_vec(), index))
            .ok_or_else(|| LoopgifError::validation("system font data is unreadable"))?;
        tracing::debug!(len = bytes.len(), index, "loaded system label font");

        Ok(Self {
            bytes: Arc::new(bytes),
            index,
        })
    }

    pub(crate) fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub(crate) fn index(&self) -> u32 {
        self.index
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub(crate) struct TextBrushRgba8 {
    /// Red channel.
    pub(crate) r: u8,
    /// Green channel.
    pub(crate) g: u8,
    /// Blue channel.
    pub(crate) b: u8,
    /// Alpha channel.
    pub(crate) a: u8,
}

/// Stateful helper for shaping label text with one registered font.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
    glyph_font: vello_cpu::peniko::FontData,
}

impl TextLayoutEngine {
    /// Register `font` with fresh Parley contexts.
    pub(crate) fn new(font: &LabelFont) -> LoopgifResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font.bytes().to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            LoopgifError::validation("no font families registered from font bytes")
        })?;

        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| LoopgifError::validation("registered font family has no name"))?
            .to_string();

        let glyph_font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(font.bytes().to_vec()),
            font.index(),
        );

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            glyph_font,
        })
    }

    /// Shape and lay out a single unwrapped line.
    pub(crate) fn layout_line(
        &mut self,
        text: &str,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> LoopgifResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(LoopgifError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }

    /// Draw one line of text with its top-left corner at `(x, y)`.
    pub(crate) fn fill_line(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        text: &str,
        size_px: f32,
        brush: TextBrushRgba8,
        origin: (f64, f64),
    ) -> LoopgifResult<()> {
        let layout = self.layout_line(text, size_px, brush)?;
        ctx.set_transform(vello_cpu::kurbo::Affine::translate(origin));

        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };

                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));

                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&self.glyph_font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }

        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        Ok(())
    }
}

impl TextMeasure for TextLayoutEngine {
    fn text_width(&mut self, text: &str, font_px: u32) -> f64 {
        match self.layout_line(text, font_px as f32, TextBrushRgba8::default()) {
            Ok(layout) => f64::from(layout.width()),
            Err(err) => {
                tracing::warn!(%err, "text measurement failed");
                0.0
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/font.rs"]
mod tests;
