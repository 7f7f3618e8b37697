//! Core value types, errors and pixel math shared by every stage.

pub mod core;
pub mod error;
pub(crate) mod math;
