//! Slide capture state and background builds.

/// Background build sessions with stale-result discarding.
pub mod build;
/// Slide deck and capture state machine.
pub mod deck;
/// Normalize, assemble and encode in one call.
pub mod pipeline;

pub use build::{BuildArtifact, BuildRequest, BuildSession, BuildStatus};
pub use deck::{
    CaptureOutcome, CaptureRequest, CaptureSource, CapturedRegion, DeckState, ImageFileSource,
    Slide, SlideDeck,
};
pub use pipeline::{Animation, build_animation, label_painter, render_timeline};
