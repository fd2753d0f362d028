/// Convenience result type used across sigpad.
pub type SigpadResult<T> = Result<T, SigpadError>;

/// Top-level error taxonomy used by the drawing model and its helpers.
///
/// Nothing on the asynchronous input path returns these: invalid samples and sizes are absorbed
/// by the worker. They surface from synchronous construction (sizes, configs, bitmaps) and from
/// the blocking snapshot helpers.
#[derive(thiserror::Error, Debug)]
pub enum SigpadError {
    /// Invalid caller-provided data (sizes, configuration, pixel buffers).
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while rasterizing or compositing stroke geometry.
    #[error("render error: {0}")]
    Render(String),

    /// The background worker could not be reached or did not answer in time.
    #[error("worker error: {0}")]
    Worker(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SigpadError {
    /// Build a [`SigpadError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SigpadError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`SigpadError::Worker`] value.
    pub fn worker(msg: impl Into<String>) -> Self {
        Self::Worker(msg.into())
    }

    /// Build a [`SigpadError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
