//! loopgif composes captured screen regions ("slides") into a looping animated GIF.
//!
//! A build runs in three stages:
//!
//! - [`normalize`] every slide onto the first slide's canvas, scaled by the output scale
//! - [`assemble`] hold frames and transition frames into a looping [`Timeline`]
//! - encode the timeline through a [`FrameSink`] (usually [`GifSink`])
//!
//! [`SlideDeck`] tracks named slides and their captures; [`BuildSession`] runs builds in the
//! background and keeps only the newest result.
#![forbid(unsafe_code)]

/// Image decoding and label fonts.
pub mod assets;
/// Animation configuration.
pub mod config;
/// Compositing, transitions and labels.
pub mod effects;
/// Encoding sinks.
pub mod encode;
pub mod foundation;
/// Canvas normalization.
pub mod normalize;
/// Slide deck, capture flow and build sessions.
pub mod session;
/// Timeline model and assembly.
pub mod timeline;

pub use crate::assets::{LabelFont, decode_bitmap, load_bitmap, save_png};
pub use crate::config::AnimationConfig;
pub use crate::effects::label::LabelPainter;
pub use crate::effects::transitions::{
    SlideDir, TransitionKind, TransitionParams, WipeDir, generate, step_count,
};
pub use crate::encode::gif::{GifEncoder, GifSink, GifSinkOpts};
pub use crate::encode::sink::{
    AnimationEncoder, CancelToken, FrameSink, InMemorySink, Repeat, SinkConfig, encode_timeline,
};
pub use crate::foundation::core::{Bitmap, Canvas, CaptureRect, Rgba8Premul};
pub use crate::foundation::error::{LoopgifError, LoopgifResult};
pub use crate::normalize::{ScalePercent, normalize};
pub use crate::session::{
    Animation, BuildArtifact, BuildRequest, BuildSession, BuildStatus, CaptureOutcome,
    CaptureRequest, CaptureSource, CapturedRegion, DeckState, ImageFileSource, Slide, SlideDeck,
    build_animation, render_timeline,
};
pub use crate::timeline::{Frame, FrameRole, Timeline, assemble};
