/// Convenience result type used across memeframe.
pub type MemeResult<T> = Result<T, MemeError>;

/// Top-level error taxonomy used by editor and export APIs.
#[derive(thiserror::Error, Debug)]
pub enum MemeError {
    /// Invalid user-provided input (image too small, not an image, bad config).
    #[error("validation error: {0}")]
    Validation(String),

    /// Image generation backend failed or returned nothing usable.
    #[error("generation error: {0}")]
    Generation(String),

    /// Export attempt failed (audio, encoder, negotiation, or a concurrent export).
    #[error("export error: {0}")]
    Export(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MemeError {
    /// Build a [`MemeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`MemeError::Generation`] value.
    pub fn generation(msg: impl Into<String>) -> Self {
        Self::Generation(msg.into())
    }

    /// Build a [`MemeError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Return `true` for errors that abort an export attempt.
    pub fn is_export(&self) -> bool {
        matches!(self, Self::Export(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
