//! Account access service.
//!
//! Registration checks for an existing email first and fails with
//! `PermissionDenied` on conflict. Profile update and deletion target the
//! caller's own record only: the record ID comes from the verified
//! identity, never from request input.

use std::sync::Arc;

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use tally_core::{CallerIdentity, UserId};
use tally_store::repositories::UserRepo;

use crate::credentials::Credentials;
use crate::errors::AccountError;
use crate::mailer::VerificationMailer;

/// Input for [`AccountService::register_user`].
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterParams {
    /// Unique credential identifier.
    pub email: String,
    /// Cleartext password; hashed before it reaches the store.
    pub password: String,
    /// Profile first name, stored as a top-level field.
    pub first_name: String,
    /// Profile last name, stored as a top-level field.
    pub last_name: String,
    /// Perform a login after account creation.
    #[serde(default)]
    pub login_immediately: bool,
}

/// Result of [`AccountService::register_user`].
///
/// The shape is the same for both branches of `login_immediately`; the
/// token fields are simply absent when no login was performed.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterOutcome {
    /// The new user's ID.
    pub id: UserId,
    /// Login token, present when `login_immediately` was set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Token expiry (RFC 3339 UTC), present alongside `token`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_expires: Option<String>,
}

/// Result of [`AccountService::login`].
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginOutcome {
    /// The signed-in user's ID.
    pub user_id: UserId,
    /// Login token.
    pub token: String,
    /// Token expiry (RFC 3339 UTC).
    pub token_expires: String,
}

/// Partial profile update; omitted fields are left untouched.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    /// New first name, if supplied.
    pub first_name: Option<String>,
    /// New last name, if supplied.
    pub last_name: Option<String>,
}

/// Account access service.
pub struct AccountService {
    mailer: Arc<dyn VerificationMailer>,
}

impl AccountService {
    /// Create a service with the given verification mailer.
    pub fn new(mailer: Arc<dyn VerificationMailer>) -> Self {
        Self { mailer }
    }

    /// Register a new user.
    ///
    /// Fails with [`AccountError::PermissionDenied`] when a user with the
    /// same email already exists. On success the verification mail is
    /// queued, and when `login_immediately` is set a login is performed and
    /// the token fields are populated.
    pub async fn register_user(
        &self,
        conn: &Connection,
        params: &RegisterParams,
    ) -> Result<RegisterOutcome, AccountError> {
        validate_register(params)?;

        if Credentials::find_user_by_email(conn, &params.email)?.is_some() {
            return Err(AccountError::PermissionDenied(format!(
                "account already exists: {}",
                params.email
            )));
        }

        let user = Credentials::create_user(
            conn,
            &params.email,
            &params.password,
            Some(&params.first_name),
            Some(&params.last_name),
        )?;
        let user_id = UserId::from_string(user.id);
        info!(user_id = %user_id, "user registered");

        self.mailer.send_verification(&user_id, &params.email).await?;

        if params.login_immediately {
            let issued = Credentials::login(conn, &user_id)?;
            return Ok(RegisterOutcome {
                id: user_id,
                token: Some(issued.token),
                token_expires: Some(issued.expires_at),
            });
        }

        // Same shape as the login branch, token fields absent.
        Ok(RegisterOutcome {
            id: user_id,
            token: None,
            token_expires: None,
        })
    }

    /// Verify an email/password pair and issue a login token.
    ///
    /// Unknown email and wrong password fail identically with
    /// [`AccountError::PermissionDenied`].
    pub fn login(
        &self,
        conn: &Connection,
        email: &str,
        password: &str,
    ) -> Result<LoginOutcome, AccountError> {
        let Some(user) = Credentials::verify(conn, email, password)? else {
            return Err(AccountError::PermissionDenied(
                "invalid email or password".into(),
            ));
        };
        let user_id = UserId::from_string(user.id);
        let issued = Credentials::login(conn, &user_id)?;
        debug!(user_id = %user_id, "login token issued");
        Ok(LoginOutcome {
            user_id,
            token: issued.token,
            token_expires: issued.expires_at,
        })
    }

    /// Apply a partial profile update to the caller's own record.
    ///
    /// Returns whether a record was affected.
    pub fn update_profile(
        &self,
        conn: &Connection,
        caller: &CallerIdentity,
        updates: &ProfileUpdate,
    ) -> Result<bool, AccountError> {
        let user_id = caller.require()?;
        let changed = UserRepo::update_profile(
            conn,
            user_id.as_str(),
            updates.first_name.as_deref(),
            updates.last_name.as_deref(),
        )?;
        Ok(changed > 0)
    }

    /// Delete the caller's own account. Returns whether a record was removed.
    pub fn delete_account(
        &self,
        conn: &Connection,
        caller: &CallerIdentity,
    ) -> Result<bool, AccountError> {
        let user_id = caller.require()?;
        let removed = UserRepo::delete(conn, user_id.as_str())?;
        if removed > 0 {
            info!(user_id = %user_id, "account deleted");
        }
        Ok(removed > 0)
    }
}

fn validate_register(params: &RegisterParams) -> Result<(), AccountError> {
    if params.email.trim().is_empty() || !params.email.contains('@') {
        return Err(AccountError::Validation("email is not valid".into()));
    }
    if params.password.is_empty() {
        return Err(AccountError::Validation("password must not be empty".into()));
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
