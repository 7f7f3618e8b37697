//! Pixel effects: compositing primitives, slide transitions and label badges.

/// Premultiplied RGBA8 compositing primitives.
pub mod composite;
/// Slide-name badges.
pub mod label;
/// Transition frame generators.
pub mod transitions;
