use std::sync::Arc;

use crate::foundation::error::{LoopgifError, LoopgifResult};
use crate::foundation::math::{mul_div255_u8, unpremul_u8};

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a validated canvas with non-zero dimensions.
    pub fn new(width: u32, height: u32) -> LoopgifResult<Self> {
        if width == 0 || height == 0 {
            return Err(LoopgifError::validation(format!(
                "canvas must be non-empty, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Number of bytes of a tightly packed RGBA8 buffer of this size.
    pub fn rgba_len(self) -> LoopgifResult<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| LoopgifError::validation("canvas byte size overflow"))
    }
}

/// Screen-space rectangle a slide was captured from.
///
/// Only used as the guide handed to the next capture request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CaptureRect {
    /// Left edge in screen pixels.
    pub left: i32,
    /// Top edge in screen pixels.
    pub top: i32,
    /// Width in screen pixels.
    pub width: u32,
    /// Height in screen pixels.
    pub height: u32,
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Opaque white.
    pub fn white() -> Self {
        Self {
            r: 255,
            g: 255,
            b: 255,
            a: 255,
        }
    }

    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        let a16 = u16::from(a);
        Self {
            r: mul_div255_u8(u16::from(r), a16),
            g: mul_div255_u8(u16::from(g), a16),
            b: mul_div255_u8(u16::from(b), a16),
            a,
        }
    }

    /// Parse `#rrggbb` / `#rrggbbaa` hex notation or a handful of CSS color names.
    pub fn parse(s: &str) -> LoopgifResult<Self> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "white" => return Ok(Self::white()),
            "black" => return Ok(Self::from_straight_rgba(0, 0, 0, 255)),
            "transparent" => return Ok(Self::transparent()),
            _ => {}
        }

        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| LoopgifError::validation(format!("unknown color '{s}'")))?;
        if !matches!(hex.len(), 6 | 8) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(LoopgifError::validation(format!(
                "color '{s}' must be #rrggbb or #rrggbbaa"
            )));
        }
        let channel = |i: usize| -> LoopgifResult<u8> {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|e| LoopgifError::validation(format!("color '{s}': {e}")))
        };
        let a = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::from_straight_rgba(channel(0)?, channel(2)?, channel(4)?, a))
    }

    /// Channels as a `[r, g, b, a]` array.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Immutable premultiplied RGBA8 pixel grid.
///
/// Pixels are shared behind an `Arc`, so cloning a bitmap never copies pixel data. Every
/// transform in the crate produces a new bitmap instead of mutating an existing one.
#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    data: Arc<Vec<u8>>,
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl Bitmap {
    /// Wrap tightly packed premultiplied RGBA8 bytes.
    pub fn from_premul_rgba8(width: u32, height: u32, data: Vec<u8>) -> LoopgifResult<Self> {
        let expected = Canvas::new(width, height)?.rgba_len()?;
        if data.len() != expected {
            return Err(LoopgifError::validation(format!(
                "bitmap {width}x{height} expects {expected} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data: Arc::new(data),
        })
    }

    /// Premultiply and wrap straight-alpha RGBA8 bytes.
    pub fn from_straight_rgba8(width: u32, height: u32, mut data: Vec<u8>) -> LoopgifResult<Self> {
        premultiply_rgba8_in_place(&mut data);
        Self::from_premul_rgba8(width, height, data)
    }

    /// Bitmap filled with a single color.
    pub fn solid(width: u32, height: u32, color: Rgba8Premul) -> LoopgifResult<Self> {
        let len = Canvas::new(width, height)?.rgba_len()?;
        let data = color.to_array().repeat(len / 4);
        Self::from_premul_rgba8(width, height, data)
    }

    /// Fully transparent bitmap.
    pub fn transparent(width: u32, height: u32) -> LoopgifResult<Self> {
        Self::solid(width, height, Rgba8Premul::transparent())
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Dimensions as a [`Canvas`].
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Premultiplied RGBA8 bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Premultiplied pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// `true` when both bitmaps have identical dimensions.
    pub fn same_size(&self, other: &Bitmap) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// `true` when both bitmaps share the same pixel allocation.
    pub fn shares_pixels(&self, other: &Bitmap) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    /// Copy out straight-alpha RGBA8 bytes (for encoders and image writers).
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.as_ref().clone();
        for px in out.chunks_exact_mut(4) {
            let a = px[3];
            px[0] = unpremul_u8(px[0], a);
            px[1] = unpremul_u8(px[1], a);
            px[2] = unpremul_u8(px[2], a);
        }
        out
    }
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = mul_div255_u8(u16::from(px[0]), a);
        px[1] = mul_div255_u8(u16::from(px[1]), a);
        px[2] = mul_div255_u8(u16::from(px[2]), a);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
