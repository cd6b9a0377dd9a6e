//! Account service error types.

use tally_core::NotSignedIn;
use tally_store::StoreError;

/// Errors that can occur during account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Caller identity absent.
    #[error(transparent)]
    NotSignedIn(#[from] NotSignedIn),

    /// Operation conflicts with an existing resource or bad credentials.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Registration input failed validation.
    #[error("invalid account data: {0}")]
    Validation(String),

    /// Verification mail could not be handed off.
    #[error("mailer error: {0}")]
    Mailer(String),

    /// Underlying store failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_denied_display() {
        let err = AccountError::PermissionDenied("account already exists: a@x.com".into());
        assert_eq!(
            err.to_string(),
            "permission denied: account already exists: a@x.com"
        );
    }

    #[test]
    fn not_signed_in_display() {
        let err = AccountError::from(NotSignedIn);
        assert_eq!(err.to_string(), "not signed in");
    }

    #[test]
    fn store_error_conversion() {
        let err = AccountError::from(StoreError::Sqlite(rusqlite::Error::QueryReturnedNoRows));
        assert!(matches!(err, AccountError::Store(_)));
    }
}
