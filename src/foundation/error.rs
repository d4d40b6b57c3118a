/// Convenience result type used across stillreel.
pub type ReelResult<T> = Result<T, ReelError>;

/// Top-level error taxonomy used by library APIs.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Invalid user-provided request data or settings.
    #[error("validation error: {0}")]
    Validation(String),

    /// The folder does not hold enough matching stills to build a clip.
    #[error("not enough images: {0}")]
    NotEnoughImages(String),

    /// A still could not be read or does not match the image set.
    #[error("decode error: {0}")]
    Decode(String),

    /// The external encoder could not be started, fed, or finished.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    /// Build a [`ReelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ReelError::NotEnoughImages`] value.
    pub fn not_enough_images(msg: impl Into<String>) -> Self {
        Self::NotEnoughImages(msg.into())
    }

    /// Build a [`ReelError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`ReelError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
