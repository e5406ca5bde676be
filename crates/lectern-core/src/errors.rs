//! Cross-cutting error types for Lectern.
//!
//! Domain-specific errors (`ServiceError`, `SessionError`) live in their
//! respective crates. The CLI converges everything into `anyhow`.

use thiserror::Error;

/// Errors that can be raised while building or resolving domain records.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// Data failed validation (missing field, bad format, broken constraint).
    #[error("Validation error: {0}")]
    Validation(String),
}

impl CoreError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
