use crate::foundation::core::{Bitmap, Canvas};
use crate::foundation::error::{LoopgifError, LoopgifResult};

/// Where a frame came from in the slide loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrameRole {
    /// A slide at rest.
    Hold { slide: usize },
    /// Step `step` of the transition from slide `from` into slide `to`.
    Transition { from: usize, to: usize, step: usize },
}

/// One displayed image and how long it stays on screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub bitmap: Bitmap,
    pub delay_ms: u32,
    pub role: FrameRole,
}

/// Ordered frames sharing one canvas size. Playback loops back to the first frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Timeline {
    canvas: Canvas,
    frames: Vec<Frame>,
}

impl Timeline {
    /// Empty timeline for the given canvas.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            frames: Vec::new(),
        }
    }

    /// Timeline with no canvas and no frames; produced when there is nothing to build.
    pub fn empty() -> Self {
        Self::new(Canvas {
            width: 0,
            height: 0,
        })
    }

    /// Append a frame; its bitmap must match the timeline canvas.
    pub fn push(&mut self, frame: Frame) -> LoopgifResult<()> {
        if frame.bitmap.canvas() != self.canvas {
            return Err(LoopgifError::dimension_mismatch(format!(
                "frame is {}x{} but timeline canvas is {}x{}",
                frame.bitmap.width(),
                frame.bitmap.height(),
                self.canvas.width,
                self.canvas.height
            )));
        }
        self.frames.push(frame);
        Ok(())
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Sum of all frame delays for one pass through the loop.
    pub fn loop_duration_ms(&self) -> u64 {
        self.frames.iter().map(|f| u64::from(f.delay_ms)).sum()
    }

    /// Number of hold frames (one per slide).
    pub fn hold_count(&self) -> usize {
        self.frames
            .iter()
            .filter(|f| matches!(f.role, FrameRole::Hold { .. }))
            .count()
    }

    /// `(from, to)` slide pairs of every transition, in playback order.
    pub fn transition_pairs(&self) -> Vec<(usize, usize)> {
        self.frames
            .iter()
            .filter_map(|f| match f.role {
                FrameRole::Transition { from, to, step: 0 } => Some((from, to)),
                _ => None,
            })
            .collect()
    }
}
