//! Verification mailer seam.
//!
//! Actual mail delivery lives outside this backend. The service only needs
//! a handoff point, so the mailer is a trait; the default implementation
//! records the side effect in the log stream.

use async_trait::async_trait;
use tracing::info;

use tally_core::UserId;

use crate::errors::AccountError;

/// Hands a verification mail for a freshly registered user to the delivery
/// infrastructure.
#[async_trait]
pub trait VerificationMailer: Send + Sync {
    /// Trigger a verification mail for `user_id` at `email`.
    async fn send_verification(&self, user_id: &UserId, email: &str) -> Result<(), AccountError>;
}

/// Default mailer: records the handoff as a structured log line.
pub struct TracingMailer;

#[async_trait]
impl VerificationMailer for TracingMailer {
    async fn send_verification(&self, user_id: &UserId, email: &str) -> Result<(), AccountError> {
        info!(user_id = %user_id, email, "verification mail queued");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn tracing_mailer_succeeds() {
        let mailer = TracingMailer;
        let result = mailer
            .send_verification(&UserId::from("user_1"), "a@x.com")
            .await;
        assert!(result.is_ok());
    }
}
