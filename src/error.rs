//! Unified error handling for the worldgate session layer.
//!
//! Every awaitable operation completes with a typed payload or exactly one
//! [`SessionError`]; unknown correlation ids and decode failures are
//! recovered inside the dispatcher and never surface to callers.

use std::fmt;
use thiserror::Error;
use worldgate_proto::{AttributeError, ReasonCode};

/// The three serialized session-establishment steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BootstrapKind {
    /// Universe connect.
    Connect,
    /// Authentication against the universe.
    Login,
    /// World enter.
    Enter,
}

impl fmt::Display for BootstrapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BootstrapKind::Connect => write!(f, "connect"),
            BootstrapKind::Login => write!(f, "login"),
            BootstrapKind::Enter => write!(f, "enter"),
        }
    }
}

/// Errors surfaced by session operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The remote peer answered a solicited operation with a nonzero
    /// reason code.
    #[error("operation rejected by the remote peer: {0}")]
    Rejected(ReasonCode),

    /// A second bootstrap call of the same kind was attempted while one
    /// was outstanding. The native protocol has a single completion slot
    /// per bootstrap kind; overwriting it would lose the first caller's
    /// result.
    #[error("a {0} operation is already in progress")]
    AlreadyInProgress(BootstrapKind),

    /// A callback payload could not be read from the transport handle.
    ///
    /// Never returned from an awaitable operation; carried here so the
    /// dispatcher's decode helpers can use `?`.
    #[error("callback payload could not be decoded: {0}")]
    Decode(#[from] AttributeError),

    /// The session was torn down (disconnect or drop) while the operation
    /// was in flight.
    #[error("session terminated while the operation was in flight")]
    Terminated,

    /// The operation needs configuration the session does not have.
    #[error("session misconfigured: {0}")]
    Misconfigured(&'static str),

    /// A correlation-id collision or double resolution. A programming
    /// defect, not a recoverable runtime condition.
    #[error("session invariant violated: {0}")]
    InvariantViolation(&'static str),
}

impl SessionError {
    /// Map a raw nonzero reason code into the error taxonomy.
    pub fn rejected(raw: i32) -> Self {
        SessionError::Rejected(ReasonCode::from(raw))
    }

    /// Get a static error code string for diagnostics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Rejected(_) => "rejected",
            Self::AlreadyInProgress(_) => "already_in_progress",
            Self::Decode(_) => "decode_failure",
            Self::Terminated => "terminated",
            Self::Misconfigured(_) => "misconfigured",
            Self::InvariantViolation(_) => "invariant_violation",
        }
    }
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Check a synchronous transport result code, mapping nonzero to an error.
pub(crate) fn check_reason(raw: i32) -> SessionResult<()> {
    if raw == 0 {
        Ok(())
    } else {
        Err(SessionError::rejected(raw))
    }
}
