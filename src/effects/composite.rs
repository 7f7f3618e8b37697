use crate::foundation::error::{LoopgifError, LoopgifResult};
use crate::foundation::math::{mul_div255_u8, opacity_u16};

pub type PremulRgba8 = [u8; 4];

pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let op = opacity_u16(opacity);
    if op == 0 || src[3] == 0 {
        return dst;
    }

    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

pub fn crossfade(a: PremulRgba8, b: PremulRgba8, t: f32) -> PremulRgba8 {
    let tt = opacity_u16(t);
    let it = 255u16 - tt;

    let mut out = [0u8; 4];
    for i in 0..4 {
        let av = mul_div255(u16::from(a[i]), it);
        let bv = mul_div255(u16::from(b[i]), tt);
        out[i] = add_sat_u8(av, bv);
    }
    out
}

pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> LoopgifResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(LoopgifError::dimension_mismatch(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

pub fn crossfade_into(dst: &mut [u8], a: &[u8], b: &[u8], t: f32) -> LoopgifResult<()> {
    if dst.len() != a.len() || dst.len() != b.len() || !dst.len().is_multiple_of(4) {
        return Err(LoopgifError::dimension_mismatch(
            "crossfade_into expects equal-length rgba8 buffers",
        ));
    }
    for ((d, a), b) in dst
        .chunks_exact_mut(4)
        .zip(a.chunks_exact(4))
        .zip(b.chunks_exact(4))
    {
        let blended = crossfade([a[0], a[1], a[2], a[3]], [b[0], b[1], b[2], b[3]], t);
        d.copy_from_slice(&blended);
    }
    Ok(())
}

/// Copy `src` into `dst` shifted horizontally by `offset_x` pixels.
///
/// Both buffers are `width*height*4`; columns that fall outside the canvas are dropped and
/// uncovered `dst` columns keep their content.
pub fn blit_shifted(
    dst: &mut [u8],
    src: &[u8],
    width: u32,
    height: u32,
    offset_x: i64,
) -> LoopgifResult<()> {
    let expected = rgba_len(width, height)?;
    if dst.len() != expected || src.len() != expected {
        return Err(LoopgifError::dimension_mismatch(
            "blit_shifted expects buffers matching width*height*4",
        ));
    }

    let w = i64::from(width);
    let dst_start = offset_x.clamp(0, w);
    let dst_end = (offset_x + w).clamp(0, w);
    if dst_start >= dst_end {
        return Ok(());
    }
    let src_start = (dst_start - offset_x) as usize;
    let span = (dst_end - dst_start) as usize;
    let row = (width as usize) * 4;

    for y in 0..height as usize {
        let d0 = y * row + (dst_start as usize) * 4;
        let s0 = y * row + src_start * 4;
        dst[d0..d0 + span * 4].copy_from_slice(&src[s0..s0 + span * 4]);
    }
    Ok(())
}

/// Composite `src` scaled into the destination rectangle `(dx, dy, dw, dh)` with bilinear
/// sampling. The rectangle may extend past the canvas; only the visible part is drawn.
pub fn draw_scaled_over(dst: &mut [u8], src: &[u8], params: ScaledDraw) -> LoopgifResult<()> {
    let ScaledDraw {
        width,
        height,
        dx,
        dy,
        dw,
        dh,
        opacity,
    } = params;
    let expected = rgba_len(width, height)?;
    if dst.len() != expected || src.len() != expected {
        return Err(LoopgifError::dimension_mismatch(
            "draw_scaled_over expects buffers matching width*height*4",
        ));
    }
    if dw == 0 || dh == 0 || opacity_u16(opacity) == 0 {
        return Ok(());
    }

    let identity = dx == 0 && dy == 0 && dw == width && dh == height;
    if identity {
        return over_in_place(dst, src, opacity);
    }

    let sx_scale = f64::from(width) / f64::from(dw);
    let sy_scale = f64::from(height) / f64::from(dh);
    let x0 = dx.max(0);
    let y0 = dy.max(0);
    let x1 = (dx + i64::from(dw)).min(i64::from(width));
    let y1 = (dy + i64::from(dh)).min(i64::from(height));

    for y in y0..y1 {
        let sy = ((y - dy) as f64 + 0.5) * sy_scale - 0.5;
        for x in x0..x1 {
            let sx = ((x - dx) as f64 + 0.5) * sx_scale - 0.5;
            let sample = sample_bilinear(src, width, height, sx, sy);
            let idx = ((y as usize) * (width as usize) + (x as usize)) * 4;
            let d = [dst[idx], dst[idx + 1], dst[idx + 2], dst[idx + 3]];
            dst[idx..idx + 4].copy_from_slice(&over(d, sample, opacity));
        }
    }
    Ok(())
}

#[derive(Clone, Copy, Debug)]
pub struct ScaledDraw {
    pub width: u32,
    pub height: u32,
    pub dx: i64,
    pub dy: i64,
    pub dw: u32,
    pub dh: u32,
    pub opacity: f32,
}

fn sample_bilinear(src: &[u8], width: u32, height: u32, sx: f64, sy: f64) -> PremulRgba8 {
    let max_x = f64::from(width - 1);
    let max_y = f64::from(height - 1);
    let sx = sx.clamp(0.0, max_x);
    let sy = sy.clamp(0.0, max_y);

    let x0 = sx.floor() as usize;
    let y0 = sy.floor() as usize;
    let x1 = (x0 + 1).min(width as usize - 1);
    let y1 = (y0 + 1).min(height as usize - 1);
    let fx = sx - x0 as f64;
    let fy = sy - y0 as f64;

    let at = |x: usize, y: usize, c: usize| f64::from(src[(y * width as usize + x) * 4 + c]);
    let mut out = [0u8; 4];
    for (c, o) in out.iter_mut().enumerate() {
        let top = at(x0, y0, c) * (1.0 - fx) + at(x1, y0, c) * fx;
        let bottom = at(x0, y1, c) * (1.0 - fx) + at(x1, y1, c) * fx;
        *o = (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8;
    }
    out
}

fn rgba_len(width: u32, height: u32) -> LoopgifResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| LoopgifError::validation("rgba buffer size overflow"))
}

fn mul_div255(x: u16, y: u16) -> u8 {
    mul_div255_u8(x, y)
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
