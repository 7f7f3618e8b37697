//! Frame timelines: hold frames, transition frames and their display durations.

/// Stitches slides and transitions into a looping timeline.
pub mod assemble;
/// Timeline data model.
pub mod model;

pub use assemble::{MIN_HOLD_MS, assemble};
pub use model::{Frame, FrameRole, Timeline};
