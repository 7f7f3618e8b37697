/// Convenience result type used across loopgif.
pub type LoopgifResult<T> = Result<T, LoopgifError>;

/// Top-level error taxonomy used by the pipeline APIs.
#[derive(thiserror::Error, Debug)]
pub enum LoopgifError {
    /// Invalid user-provided configuration or arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// Not enough captured slides to build an animation.
    #[error("empty input: {0}")]
    EmptyInput(String),

    /// Bitmaps that must share a canvas size do not.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// The encoder was cancelled before it produced an artifact.
    #[error("encoding aborted")]
    EncodingAborted,

    /// The encoder failed while producing an artifact.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// The capture source could not deliver a bitmap.
    #[error("capture error: {0}")]
    Capture(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LoopgifError {
    /// Build a [`LoopgifError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LoopgifError::EmptyInput`] value.
    pub fn empty_input(msg: impl Into<String>) -> Self {
        Self::EmptyInput(msg.into())
    }

    /// Build a [`LoopgifError::DimensionMismatch`] value.
    pub fn dimension_mismatch(msg: impl Into<String>) -> Self {
        Self::DimensionMismatch(msg.into())
    }

    /// Build a [`LoopgifError::Encoding`] value.
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    /// Build a [`LoopgifError::Capture`] value.
    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture(msg.into())
    }

    /// `true` for errors the user resolves by capturing more slides.
    pub fn is_empty_input(&self) -> bool {
        matches!(self, Self::EmptyInput(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
