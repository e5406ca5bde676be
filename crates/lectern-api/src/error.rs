//! Entity service error types.

use thiserror::Error;

/// Errors surfaced by an [`EntityService`](crate::EntityService).
///
/// These are passed through to the caller unchanged; nothing in Lectern
/// retries or swallows them.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The backend rejected the payload (HTTP 400/422).
    #[error("validation failed: {0}")]
    Validation(String),

    /// The addressed record does not exist (HTTP 404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Missing, expired, or insufficient credentials (HTTP 401/403).
    #[error("authorization failed ({status}): {message}")]
    Auth {
        /// HTTP status code returned by the backend.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// The backend returned a 429 Too Many Requests response.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// Any other non-success status.
    #[error("backend error ({status}): {message}")]
    Unavailable {
        /// HTTP status code returned by the backend.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// HTTP transport error (connect, timeout, TLS, body read).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend answered with a body that does not match the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ServiceError {
    /// Whether the failure is about credentials rather than the request.
    #[must_use]
    pub const fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }

    /// Whether the failure is a transport or server-side problem.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Unavailable { .. } | Self::RateLimited { .. }
        )
    }
}
