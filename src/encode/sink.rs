use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::AnimationConfig;
use crate::foundation::error::{LoopgifError, LoopgifResult};
use crate::timeline::{Frame, Timeline};

/// How many times a player should run the loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Repeat {
    #[default]
    Infinite,
    Finite(u16),
}

/// Configuration provided to a [`FrameSink`] before any frame is pushed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    pub repeat: Repeat,
}

/// Sink contract for consuming timeline frames in playback order.
///
/// Every pushed frame matches the `width`/`height` announced in `begin`.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> LoopgifResult<()>;
    /// Push one frame; `idx` increases by one per call starting at 0.
    fn push_frame(&mut self, idx: usize, frame: &Frame) -> LoopgifResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> LoopgifResult<()>;
}

/// Shared flag used to abandon an in-flight encode.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Stream every frame of `timeline` into `sink`.
///
/// The token is checked before each frame; a cancelled encode fails with
/// [`LoopgifError::EncodingAborted`] and `end` is never called.
#[tracing::instrument(skip_all, fields(frames = timeline.len()))]
pub fn encode_timeline(
    sink: &mut dyn FrameSink,
    timeline: &Timeline,
    repeat: Repeat,
    cancel: &CancelToken,
) -> LoopgifResult<()> {
    if timeline.is_empty() {
        return Err(LoopgifError::empty_input("timeline has no frames to encode"));
    }
    let canvas = timeline.canvas();
    sink.begin(SinkConfig {
        width: canvas.width,
        height: canvas.height,
        repeat,
    })?;

    for (idx, frame) in timeline.frames().iter().enumerate() {
        if cancel.is_cancelled() {
            tracing::debug!(idx, "encode cancelled");
            return Err(LoopgifError::EncodingAborted);
        }
        if frame.bitmap.canvas() != canvas {
            return Err(LoopgifError::dimension_mismatch(format!(
                "frame {idx} does not match the {}x{} canvas",
                canvas.width, canvas.height
            )));
        }
        sink.push_frame(idx, frame)?;
    }

    sink.end()
}

/// Boundary that turns a timeline into an encoded byte blob.
pub trait AnimationEncoder: Send + Sync {
    fn encode(
        &self,
        timeline: &Timeline,
        config: &AnimationConfig,
        cancel: &CancelToken,
    ) -> LoopgifResult<Vec<u8>>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(usize, Frame)>,
    finished: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg.clone()
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(usize, Frame)] {
        &self.frames
    }

    /// `true` once `end` has been called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> LoopgifResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: usize, frame: &Frame) -> LoopgifResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> LoopgifResult<()> {
        self.finished = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
