//! Canvas normalization for captured slides.
//!
//! Captures come in whatever size the user selected. Before any transition runs, every bitmap is
//! stretched to the first capture's size and then scaled uniformly by the output scale.

/// Bitmap resampling and the normalization pass.
pub mod resize;

pub use resize::{ScalePercent, normalize, resize, scaled_canvas};
