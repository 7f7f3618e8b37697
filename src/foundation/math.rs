pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Undo premultiplication of one color channel.
pub(crate) fn unpremul_u8(c: u8, a: u8) -> u8 {
    match a {
        0 => 0,
        255 => c,
        _ => ((u32::from(c) * 255 + u32::from(a) / 2) / u32::from(a)).min(255) as u8,
    }
}

/// Round half toward positive infinity (`0.5 -> 1`, `-0.5 -> 0`).
///
/// Pixel offsets and step counts use this rule everywhere so negative slide offsets and
/// positive ones land on the same grid.
pub(crate) fn round_half_up(x: f64) -> i64 {
    (x + 0.5).floor() as i64
}

/// Opacity in `[0, 1]` quantized to an 8-bit weight.
pub(crate) fn opacity_u16(opacity: f32) -> u16 {
    ((opacity.clamp(0.0, 1.0) * 255.0).round() as i32).clamp(0, 255) as u16
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
