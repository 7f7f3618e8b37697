//! User-settable animation configuration.

/// Animation timing, transition and output settings.
pub mod animation;

pub use animation::AnimationConfig;
