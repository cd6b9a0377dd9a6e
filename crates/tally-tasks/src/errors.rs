//! Task service error types.

use tally_core::NotSignedIn;
use tally_store::StoreError;

/// Errors that can occur during task operations.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    /// Caller identity absent.
    #[error(transparent)]
    NotSignedIn(#[from] NotSignedIn),

    /// Task draft failed validation.
    #[error("invalid task: {0}")]
    Validation(String),

    /// Underlying store failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_signed_in_display() {
        let err = TaskError::from(NotSignedIn);
        assert_eq!(err.to_string(), "not signed in");
    }

    #[test]
    fn validation_display() {
        let err = TaskError::Validation("text must not be empty".into());
        assert_eq!(err.to_string(), "invalid task: text must not be empty");
    }

    #[test]
    fn store_error_conversion() {
        let err = TaskError::from(StoreError::Sqlite(rusqlite::Error::QueryReturnedNoRows));
        assert!(matches!(err, TaskError::Store(_)));
    }
}
