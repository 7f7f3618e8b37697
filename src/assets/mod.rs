//! Loading slide images and label fonts.

/// Image file decoding and PNG output.
pub mod decode;
/// Label fonts and text shaping.
pub mod font;

pub use decode::{decode_bitmap, load_bitmap, save_png};
pub use font::LabelFont;
