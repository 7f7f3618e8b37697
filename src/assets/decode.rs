use std::path::Path;

use anyhow::Context;

use crate::foundation::core::Bitmap;
use crate::foundation::error::LoopgifResult;

/// Decode PNG/JPEG/etc. bytes into a premultiplied [`Bitmap`].
pub fn decode_bitmap(bytes: &[u8]) -> LoopgifResult<Bitmap> {
    let rgba = image::load_from_memory(bytes)
        .context("decode image from memory")?
        .to_rgba8();
    let (width, height) = rgba.dimensions();
    Bitmap::from_straight_rgba8(width, height, rgba.into_raw())
}

/// Read and decode an image file.
pub fn load_bitmap(path: impl AsRef<Path>) -> LoopgifResult<Bitmap> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    let bitmap = decode_bitmap(&bytes)
        .with_context(|| format!("decode image '{}'", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        width = bitmap.width(),
        height = bitmap.height(),
        "loaded slide bitmap"
    );
    Ok(bitmap)
}

/// Write `bitmap` as a straight-alpha PNG.
pub fn save_png(bitmap: &Bitmap, path: impl AsRef<Path>) -> LoopgifResult<()> {
    let path = path.as_ref();
    image::save_buffer_with_format(
        path,
        &bitmap.to_straight_rgba8(),
        bitmap.width(),
        bitmap.height(),
        image::ExtendedColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
