/// Convenience result type used across choreo.
pub type ChoreoResult<T> = Result<T, ChoreoError>;

/// Error taxonomy for the fallible edges of the engine.
///
/// Transition intents never produce errors; only loading and validating configuration, catalogs
/// and scripts can fail.
#[derive(thiserror::Error, Debug)]
pub enum ChoreoError {
    /// Invalid user-provided data (catalog records, rects, scripts).
    #[error("validation error: {0}")]
    Validation(String),

    /// Timing or viewport configuration that cannot drive a transition.
    #[error("config error: {0}")]
    Config(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ChoreoError {
    /// Build a [`ChoreoError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ChoreoError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`ChoreoError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
