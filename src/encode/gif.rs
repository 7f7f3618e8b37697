use std::io::Write;

use crate::config::AnimationConfig;
use crate::encode::sink::{
    AnimationEncoder, CancelToken, FrameSink, Repeat, SinkConfig, encode_timeline,
};
use crate::foundation::core::Canvas;
use crate::foundation::error::{LoopgifError, LoopgifResult};
use crate::foundation::math::round_half_up;
use crate::timeline::{Frame, Timeline};

/// Options for [`GifSink`] output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GifSinkOpts {
    /// NeuQuant speed, 1 (best palette) to 30 (fastest).
    pub speed: i32,
}

impl Default for GifSinkOpts {
    fn default() -> Self {
        Self { speed: 10 }
    }
}

/// Sink that writes an animated GIF89a into `W`.
pub struct GifSink<W: Write + Send> {
    opts: GifSinkOpts,
    writer: Option<W>,
    encoder: Option<gif::Encoder<W>>,
    cfg: Option<SinkConfig>,
}

impl GifSink<Vec<u8>> {
    /// Sink that collects the GIF in memory.
    pub fn in_memory(opts: GifSinkOpts) -> Self {
        Self::new(Vec::new(), opts)
    }

    /// Finish the stream and return the encoded bytes.
    pub fn into_bytes(self) -> LoopgifResult<Vec<u8>> {
        self.into_inner()
    }
}

impl<W: Write + Send> GifSink<W> {
    pub fn new(writer: W, opts: GifSinkOpts) -> Self {
        Self {
            opts,
            writer: Some(writer),
            encoder: None,
            cfg: None,
        }
    }

    /// Write the GIF trailer and hand back the writer.
    pub fn into_inner(mut self) -> LoopgifResult<W> {
        if let Some(encoder) = self.encoder.take() {
            return encoder
                .into_inner()
                .map_err(|e| LoopgifError::encoding(format!("finish gif stream: {e}")));
        }
        self.writer
            .take()
            .ok_or_else(|| LoopgifError::encoding("gif sink has no writer"))
    }
}

impl<W: Write + Send> FrameSink for GifSink<W> {
    fn begin(&mut self, cfg: SinkConfig) -> LoopgifResult<()> {
        if !(1..=30).contains(&self.opts.speed) {
            return Err(LoopgifError::validation("gif speed must be in 1..=30"));
        }
        let (w, h) = match (u16::try_from(cfg.width), u16::try_from(cfg.height)) {
            (Ok(w), Ok(h)) if w > 0 && h > 0 => (w, h),
            _ => {
                return Err(LoopgifError::validation(format!(
                    "gif canvas must be 1..=65535 px per side, got {}x{}",
                    cfg.width, cfg.height
                )));
            }
        };
        let writer = self
            .writer
            .take()
            .ok_or_else(|| LoopgifError::encoding("gif sink already started"))?;

        let mut encoder = gif::Encoder::new(writer, w, h, &[])
            .map_err(|e| LoopgifError::encoding(format!("create gif encoder: {e}")))?;
        let repeat = match cfg.repeat {
            Repeat::Infinite => gif::Repeat::Infinite,
            Repeat::Finite(n) => gif::Repeat::Finite(n),
        };
        encoder
            .set_repeat(repeat)
            .map_err(|e| LoopgifError::encoding(format!("set gif repeat: {e}")))?;

        self.encoder = Some(encoder);
        self.cfg = Some(cfg);
        Ok(())
    }

    fn push_frame(&mut self, idx: usize, frame: &Frame) -> LoopgifResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| LoopgifError::encoding("push_frame called before begin"))?;
        let expected = Canvas {
            width: cfg.width,
            height: cfg.height,
        };
        if frame.bitmap.canvas() != expected {
            return Err(LoopgifError::dimension_mismatch(format!(
                "frame {idx} is {}x{} but the gif canvas is {}x{}",
                frame.bitmap.width(),
                frame.bitmap.height(),
                cfg.width,
                cfg.height
            )));
        }
        let encoder = self
            .encoder
            .as_mut()
            .ok_or_else(|| LoopgifError::encoding("gif encoder missing"))?;

        let mut rgba = frame.bitmap.to_straight_rgba8();
        let mut gif_frame = gif::Frame::from_rgba_speed(
            cfg.width as u16,
            cfg.height as u16,
            &mut rgba,
            self.opts.speed,
        );
        gif_frame.delay = delay_centis(frame.delay_ms);

        encoder
            .write_frame(&gif_frame)
            .map_err(|e| LoopgifError::encoding(format!("write gif frame {idx}: {e}")))
    }

    fn end(&mut self) -> LoopgifResult<()> {
        if self.encoder.is_none() {
            return Err(LoopgifError::encoding("end called before begin"));
        }
        Ok(())
    }
}

/// GIF delays are stored in hundredths of a second; players treat values below 2 as "fast".
pub fn delay_centis(delay_ms: u32) -> u16 {
    round_half_up(f64::from(delay_ms) / 10.0).clamp(2, i64::from(u16::MAX)) as u16
}

/// [`AnimationEncoder`] producing an infinitely looping GIF at the config's quantizer speed.
#[derive(Clone, Copy, Debug, Default)]
pub struct GifEncoder;

impl AnimationEncoder for GifEncoder {
    fn encode(
        &self,
        timeline: &Timeline,
        config: &AnimationConfig,
        cancel: &CancelToken,
    ) -> LoopgifResult<Vec<u8>> {
        let mut sink = GifSink::in_memory(GifSinkOpts {
            speed: config.gif_speed,
        });
        encode_timeline(&mut sink, timeline, Repeat::Infinite, cancel)?;
        let bytes = sink.into_bytes()?;
        tracing::info!(bytes = bytes.len(), frames = timeline.len(), "encoded gif");
        Ok(bytes)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
