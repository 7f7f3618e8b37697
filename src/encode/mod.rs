//! Encoding sinks.
//!
//! Sinks consume a finished [`crate::Timeline`] frame by frame and turn it into an artifact.

/// Animated GIF output built on the `gif` crate.
pub mod gif;
/// Generic frame sink trait, cancellation and built-in sinks.
pub mod sink;
