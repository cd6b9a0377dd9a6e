//! Credential subsystem: password hashing and opaque login tokens.
//!
//! Passwords are stored as `salt$hash` where the hash is iterated salted
//! SHA-256. Login tokens are 32 random bytes, handed to the client once in
//! base64url and persisted only as a SHA-256 hex digest; expiry is checked
//! at resolution time.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{Duration, Utc};
use rand::RngCore;
use rusqlite::Connection;
use sha2::{Digest, Sha256};

use tally_core::{CallerIdentity, UserId};
use tally_store::repositories::{CreateUserOptions, TokenRepo, UserRepo, UserRow};

use crate::errors::AccountError;

/// Iterations applied to the salted password digest.
const PASSWORD_ITERATIONS: u32 = 10_000;

/// Login token lifetime in days.
pub const TOKEN_TTL_DAYS: i64 = 90;

/// A freshly issued login token, returned to the client exactly once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IssuedToken {
    /// Opaque bearer token (base64url).
    pub token: String,
    /// Expiry timestamp (RFC 3339 UTC).
    pub expires_at: String,
}

/// Credential operations — stateless, every method takes `&Connection`.
pub struct Credentials;

impl Credentials {
    /// Look up a user by email.
    pub fn find_user_by_email(conn: &Connection, email: &str) -> Result<Option<UserRow>, AccountError> {
        Ok(UserRepo::get_by_email(conn, email)?)
    }

    /// Create a credential record with a freshly hashed password and the
    /// profile names stored as top-level fields.
    pub fn create_user(
        conn: &Connection,
        email: &str,
        password: &str,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Result<UserRow, AccountError> {
        let password_hash = hash_password(password);
        let user = UserRepo::create(
            conn,
            &CreateUserOptions {
                email,
                password_hash: &password_hash,
                first_name,
                last_name,
            },
        )?;
        Ok(user)
    }

    /// Verify an email/password pair. Returns the user on success, `None`
    /// when the email is unknown or the password does not match.
    pub fn verify(
        conn: &Connection,
        email: &str,
        password: &str,
    ) -> Result<Option<UserRow>, AccountError> {
        let Some(user) = UserRepo::get_by_email(conn, email)? else {
            return Ok(None);
        };
        if verify_password(&user.password_hash, password) {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }

    /// Issue a fresh login token for `user_id`.
    pub fn login(conn: &Connection, user_id: &UserId) -> Result<IssuedToken, AccountError> {
        let token = generate_token();
        let expires_at = (Utc::now() + Duration::days(TOKEN_TTL_DAYS)).to_rfc3339();
        TokenRepo::insert(conn, &hash_token(&token), user_id.as_str(), &expires_at)?;
        Ok(IssuedToken { token, expires_at })
    }

    /// Resolve a bearer token to a caller identity.
    ///
    /// Unknown or expired tokens yield the anonymous identity rather than
    /// an error — identity-requiring operations fail downstream with their
    /// own `NotSignedIn`.
    pub fn resolve_token(conn: &Connection, token: &str) -> Result<CallerIdentity, AccountError> {
        let now = Utc::now().to_rfc3339();
        let user_id = TokenRepo::find_user(conn, &hash_token(token), &now)?;
        Ok(CallerIdentity::from(user_id.map(UserId::from_string)))
    }

    /// Invalidate a single token (logout). Returns whether one was removed.
    pub fn revoke_token(conn: &Connection, token: &str) -> Result<bool, AccountError> {
        Ok(TokenRepo::remove(conn, &hash_token(token))? > 0)
    }
}

/// Hash a password into the stored `salt$hash` form.
pub fn hash_password(password: &str) -> String {
    let mut salt_bytes = [0u8; 16];
    rand::rng().fill_bytes(&mut salt_bytes);
    let salt = URL_SAFE_NO_PAD.encode(salt_bytes);
    let hash = derive(&salt, password);
    format!("{salt}${hash}")
}

/// Check a password against a stored `salt$hash` value.
pub fn verify_password(stored: &str, password: &str) -> bool {
    let Some((salt, hash)) = stored.split_once('$') else {
        return false;
    };
    derive(salt, password) == hash
}

fn derive(salt: &str, password: &str) -> String {
    let mut digest = Sha256::digest(format!("{salt}:{password}").as_bytes());
    for _ in 1..PASSWORD_ITERATIONS {
        digest = Sha256::digest(digest);
    }
    format!("{digest:x}")
}

fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

fn hash_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(unused_results)]
mod tests {
    use super::*;
    use tally_store::run_migrations;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    // ── Password hashing ─────────────────────────────────────────────

    #[test]
    fn hash_and_verify_roundtrip() {
        let stored = hash_password("hunter2hunter2");
        assert!(verify_password(&stored, "hunter2hunter2"));
        assert!(!verify_password(&stored, "wrong"));
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("same-password");
        let b = hash_password("same-password");
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_stored_hash_never_verifies() {
        assert!(!verify_password("no-dollar-sign", "anything"));
    }

    // ── User creation + verify ───────────────────────────────────────

    #[test]
    fn create_and_find_by_email() {
        let conn = setup();
        let user =
            Credentials::create_user(&conn, "a@x.com", "pw", Some("Jane"), Some("Doe")).unwrap();

        let found = Credentials::find_user_by_email(&conn, "a@x.com").unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert_eq!(found.first_name.as_deref(), Some("Jane"));
        assert_ne!(found.password_hash, "pw");
    }

    #[test]
    fn verify_known_user() {
        let conn = setup();
        Credentials::create_user(&conn, "a@x.com", "pw", None, None).unwrap();

        assert!(Credentials::verify(&conn, "a@x.com", "pw").unwrap().is_some());
        assert!(Credentials::verify(&conn, "a@x.com", "nope").unwrap().is_none());
        assert!(Credentials::verify(&conn, "b@x.com", "pw").unwrap().is_none());
    }

    // ── Tokens ───────────────────────────────────────────────────────

    #[test]
    fn login_then_resolve_token() {
        let conn = setup();
        let user = Credentials::create_user(&conn, "a@x.com", "pw", None, None).unwrap();
        let user_id = UserId::from_string(user.id.clone());

        let issued = Credentials::login(&conn, &user_id).unwrap();
        assert!(!issued.token.is_empty());

        let caller = Credentials::resolve_token(&conn, &issued.token).unwrap();
        assert_eq!(caller.user_id().map(UserId::as_str), Some(user.id.as_str()));
    }

    #[test]
    fn garbage_token_resolves_to_anonymous() {
        let conn = setup();
        let caller = Credentials::resolve_token(&conn, "not-a-token").unwrap();
        assert!(!caller.is_signed_in());
    }

    #[test]
    fn expired_token_resolves_to_anonymous() {
        let conn = setup();
        let user = Credentials::create_user(&conn, "a@x.com", "pw", None, None).unwrap();

        TokenRepo::insert(
            &conn,
            &hash_token("stale"),
            &user.id,
            "2020-01-01T00:00:00+00:00",
        )
        .unwrap();

        let caller = Credentials::resolve_token(&conn, "stale").unwrap();
        assert!(!caller.is_signed_in());
    }

    #[test]
    fn token_expiry_is_ninety_days_out() {
        let conn = setup();
        let user = Credentials::create_user(&conn, "a@x.com", "pw", None, None).unwrap();
        let issued = Credentials::login(&conn, &UserId::from_string(user.id)).unwrap();

        let expires = chrono::DateTime::parse_from_rfc3339(&issued.expires_at).unwrap();
        let days = (expires.with_timezone(&Utc) - Utc::now()).num_days();
        assert!((TOKEN_TTL_DAYS - 1..=TOKEN_TTL_DAYS).contains(&days));
    }

    #[test]
    fn revoke_token_invalidates_it() {
        let conn = setup();
        let user = Credentials::create_user(&conn, "a@x.com", "pw", None, None).unwrap();
        let issued = Credentials::login(&conn, &UserId::from_string(user.id)).unwrap();

        assert!(Credentials::revoke_token(&conn, &issued.token).unwrap());
        let caller = Credentials::resolve_token(&conn, &issued.token).unwrap();
        assert!(!caller.is_signed_in());
        assert!(!Credentials::revoke_token(&conn, &issued.token).unwrap());
    }
}
