//! Session coordination errors.

use std::fmt;

use lectern_api::ServiceError;
use lectern_core::enums::LifecycleState;
use thiserror::Error;

/// Lifecycle command names, used in [`SessionError::InvalidTransition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    End,
    Cancel,
}

impl Command {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
            Self::Cancel => "cancel",
        }
    }

    /// State the command moves a session into.
    #[must_use]
    pub const fn target(self) -> LifecycleState {
        match self {
            Self::Start => LifecycleState::InProgress,
            Self::End => LifecycleState::Completed,
            Self::Cancel => LifecycleState::Cancelled,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by the session controller.
///
/// Everything except [`SessionError::Service`] is decided locally: the
/// backend is never contacted and local state is left untouched.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("cannot {command} a session that is {from}")]
    InvalidTransition {
        from: LifecycleState,
        command: Command,
    },

    #[error("cannot {operation} while the session is {state}")]
    InvalidOperation {
        operation: &'static str,
        state: LifecycleState,
    },

    #[error("another session command is still in progress")]
    OperationInFlight,

    #[error("the session view has been closed")]
    Closed,

    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Stable classification of a [`SessionError`] for display and exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    InvalidTransition,
    InvalidOperation,
    OperationInFlight,
    Closed,
    NotFound,
    Auth,
    Network,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::InvalidTransition => "invalid_transition",
            Self::InvalidOperation => "invalid_operation",
            Self::OperationInFlight => "operation_in_flight",
            Self::Closed => "closed",
            Self::NotFound => "not_found",
            Self::Auth => "auth",
            Self::Network => "network",
        }
    }
}

impl SessionError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::Service(ServiceError::Validation(_)) => ErrorKind::Validation,
            Self::InvalidTransition { .. } => ErrorKind::InvalidTransition,
            Self::InvalidOperation { .. } => ErrorKind::InvalidOperation,
            Self::OperationInFlight => ErrorKind::OperationInFlight,
            Self::Closed => ErrorKind::Closed,
            Self::Service(ServiceError::NotFound(_)) => ErrorKind::NotFound,
            Self::Service(e) if e.is_auth() => ErrorKind::Auth,
            // Transport failures, server errors and malformed bodies alike.
            Self::Service(_) => ErrorKind::Network,
        }
    }

    /// Whether the error was raised without contacting the backend.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        !matches!(self, Self::Service(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn messages_are_distinct_per_kind() {
        let errors = [
            SessionError::validation("cancel reason is required"),
            SessionError::InvalidTransition {
                from: LifecycleState::Completed,
                command: Command::Start,
            },
            SessionError::InvalidOperation {
                operation: "start recording",
                state: LifecycleState::Scheduled,
            },
            SessionError::OperationInFlight,
            SessionError::Closed,
        ];
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        let unique: std::collections::HashSet<&String> = messages.iter().collect();
        assert_eq!(unique.len(), messages.len());
        assert_eq!(messages[1], "cannot start a session that is completed");
        assert!(errors.iter().all(SessionError::is_local));
    }

    #[test]
    fn service_errors_keep_their_shape() {
        let err = SessionError::from(ServiceError::Auth {
            status: 401,
            message: "token expired".into(),
        });
        assert_eq!(err.kind(), ErrorKind::Auth);
        assert_eq!(err.to_string(), "authorization failed (401): token expired");
        assert!(!err.is_local());

        let err = SessionError::from(ServiceError::Unavailable {
            status: 503,
            message: String::new(),
        });
        assert_eq!(err.kind(), ErrorKind::Network);
    }

    #[test]
    fn command_targets() {
        assert_eq!(Command::Start.target(), LifecycleState::InProgress);
        assert_eq!(Command::End.target(), LifecycleState::Completed);
        assert_eq!(Command::Cancel.target(), LifecycleState::Cancelled);
    }
}
