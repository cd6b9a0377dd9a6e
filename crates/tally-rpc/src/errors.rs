//! RPC error codes and error type.
//!
//! Service errors convert into [`RpcError`] at the handler boundary.
//! Infrastructure failures (store, pool) surface as `INTERNAL_ERROR` with a
//! generic message; the detail is logged, not sent to the client.

use tally_accounts::AccountError;
use tally_tasks::TaskError;

use crate::types::RpcErrorBody;

// ── Error code constants ────────────────────────────────────────────

/// Caller identity absent or token invalid/expired.
pub const NOT_SIGNED_IN: &str = "NOT_SIGNED_IN";
/// Operation conflicts with an existing resource or bad credentials.
pub const PERMISSION_DENIED: &str = "PERMISSION_DENIED";
/// Invalid or missing parameters.
pub const INVALID_PARAMS: &str = "INVALID_PARAMS";
/// Method not found in the registry.
pub const METHOD_NOT_FOUND: &str = "METHOD_NOT_FOUND";
/// Unexpected internal error.
pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";

/// RPC error type returned by handlers.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// Caller is not signed in.
    #[error("not signed in")]
    NotSignedIn,

    /// Operation denied.
    #[error("{message}")]
    PermissionDenied {
        /// Human-readable message.
        message: String,
    },

    /// Required parameter missing or wrong type.
    #[error("{message}")]
    InvalidParams {
        /// Description of what is wrong.
        message: String,
    },

    /// Internal server error; message is already sanitized for clients.
    #[error("{message}")]
    Internal {
        /// Generic description.
        message: String,
    },
}

impl RpcError {
    /// Machine-readable error code for this variant.
    pub fn code(&self) -> &str {
        match self {
            Self::NotSignedIn => NOT_SIGNED_IN,
            Self::PermissionDenied { .. } => PERMISSION_DENIED,
            Self::InvalidParams { .. } => INVALID_PARAMS,
            Self::Internal { .. } => INTERNAL_ERROR,
        }
    }

    /// Convert to the wire-format error body.
    pub fn to_error_body(&self) -> RpcErrorBody {
        RpcErrorBody {
            code: self.code().to_owned(),
            message: self.to_string(),
        }
    }

    /// An internal error with the client-safe generic message. The actual
    /// cause must be logged by the caller before constructing this.
    fn internal() -> Self {
        Self::Internal {
            message: "internal error".into(),
        }
    }
}

impl From<TaskError> for RpcError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::NotSignedIn(_) => Self::NotSignedIn,
            TaskError::Validation(message) => Self::InvalidParams { message },
            TaskError::Store(e) => {
                tracing::error!(error = %e, "task store failure");
                Self::internal()
            }
        }
    }
}

impl From<AccountError> for RpcError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::NotSignedIn(_) => Self::NotSignedIn,
            AccountError::PermissionDenied(message) => Self::PermissionDenied { message },
            AccountError::Validation(message) => Self::InvalidParams { message },
            AccountError::Mailer(e) => {
                tracing::error!(error = %e, "verification mail handoff failed");
                Self::internal()
            }
            AccountError::Store(e) => {
                tracing::error!(error = %e, "account store failure");
                Self::internal()
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
