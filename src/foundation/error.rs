/// Convenience result type used across the crate.
pub type StrataResult<T> = Result<T, StrataError>;

/// Crate-wide error type.
///
/// Structural mistakes (duplicate or unknown component names, invalid options) surface as their
/// own variants. Failures raised inside a [`Layer`](crate::Layer) are carried through
/// [`StrataError::Other`] untouched, so the root cause stays visible to the caller.
#[derive(thiserror::Error, Debug)]
pub enum StrataError {
    /// Invalid input or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// A component with this name already exists in the composition.
    #[error("component '{0}' already exists")]
    DuplicateName(String),

    /// No component with this name exists in the composition.
    #[error("component '{0}' does not exist")]
    MissingComponent(String),

    /// A failure while producing pixels.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Scene (de)serialization failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Any other error, typically from an external collaborator.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StrataError {
    /// Build a [`StrataError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StrataError::Evaluation`].
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`StrataError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
