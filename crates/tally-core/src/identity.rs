//! Per-request caller identity.
//!
//! The transport layer authenticates a request (login token → user) and
//! passes the result into every service call as an explicit
//! [`CallerIdentity`] — there is no ambient "current user". Operations that
//! need a signed-in caller call [`CallerIdentity::require`] before touching
//! the store.

use serde::{Deserialize, Serialize};

use crate::ids::UserId;

/// Raised when an operation requires a signed-in caller and none is present.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("not signed in")]
pub struct NotSignedIn;

/// The authenticated user for the current request, or anonymous.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallerIdentity(Option<UserId>);

impl CallerIdentity {
    /// An unauthenticated caller.
    #[must_use]
    pub fn anonymous() -> Self {
        Self(None)
    }

    /// A caller authenticated as `id`.
    #[must_use]
    pub fn user(id: UserId) -> Self {
        Self(Some(id))
    }

    /// The caller's user ID, if signed in.
    #[must_use]
    pub fn user_id(&self) -> Option<&UserId> {
        self.0.as_ref()
    }

    /// Whether the caller is signed in.
    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.0.is_some()
    }

    /// The caller's user ID, or [`NotSignedIn`].
    pub fn require(&self) -> Result<&UserId, NotSignedIn> {
        self.0.as_ref().ok_or(NotSignedIn)
    }
}

impl From<Option<UserId>> for CallerIdentity {
    fn from(id: Option<UserId>) -> Self {
        Self(id)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
