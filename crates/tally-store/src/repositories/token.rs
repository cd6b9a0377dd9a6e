//! Login token repository.
//!
//! Tokens are stored by hash only; the cleartext token never reaches the
//! store. Expiry is checked at resolution time against the caller-supplied
//! `now`, so the repository itself stays clock-free and testable.

use rusqlite::{Connection, OptionalExtension, params};

use crate::errors::Result;

/// Login token repository — stateless, every method takes `&Connection`.
pub struct TokenRepo;

impl TokenRepo {
    /// Insert a token record for `user_id`.
    pub fn insert(
        conn: &Connection,
        token_hash: &str,
        user_id: &str,
        expires_at: &str,
    ) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();
        let _ = conn.execute(
            "INSERT INTO auth_tokens (token_hash, user_id, expires_at, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![token_hash, user_id, expires_at, now],
        )?;
        Ok(())
    }

    /// Resolve a token hash to its user ID, if the token exists and has not
    /// expired as of `now` (RFC 3339 UTC).
    pub fn find_user(conn: &Connection, token_hash: &str, now: &str) -> Result<Option<String>> {
        let user_id = conn
            .query_row(
                "SELECT user_id FROM auth_tokens WHERE token_hash = ?1 AND expires_at > ?2",
                params![token_hash, now],
                |row| row.get(0),
            )
            .optional()?;
        Ok(user_id)
    }

    /// Delete a single token (logout). Returns the affected count.
    pub fn remove(conn: &Connection, token_hash: &str) -> Result<usize> {
        let changed = conn.execute(
            "DELETE FROM auth_tokens WHERE token_hash = ?1",
            params![token_hash],
        )?;
        Ok(changed)
    }

    /// Delete all tokens that expired at or before `now`. Returns the count.
    pub fn purge_expired(conn: &Connection, now: &str) -> Result<usize> {
        let changed = conn.execute(
            "DELETE FROM auth_tokens WHERE expires_at <= ?1",
            params![now],
        )?;
        Ok(changed)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(unused_results)]
mod tests {
    use super::*;
    use crate::migrations::run_migrations;
    use crate::repositories::user::{CreateUserOptions, UserRepo};

    fn setup() -> (Connection, String) {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        run_migrations(&conn).unwrap();
        let user = UserRepo::create(
            &conn,
            &CreateUserOptions {
                email: "jane@example.com",
                password_hash: "salt$hash",
                first_name: None,
                last_name: None,
            },
        )
        .unwrap();
        (conn, user.id)
    }

    #[test]
    fn insert_and_resolve() {
        let (conn, user_id) = setup();
        TokenRepo::insert(&conn, "th_1", &user_id, "2099-01-01T00:00:00+00:00").unwrap();

        let found = TokenRepo::find_user(&conn, "th_1", "2026-01-01T00:00:00+00:00").unwrap();
        assert_eq!(found.as_deref(), Some(user_id.as_str()));
    }

    #[test]
    fn unknown_token_resolves_to_none() {
        let (conn, _) = setup();
        let found = TokenRepo::find_user(&conn, "th_unknown", "2026-01-01T00:00:00+00:00").unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn expired_token_resolves_to_none() {
        let (conn, user_id) = setup();
        TokenRepo::insert(&conn, "th_1", &user_id, "2026-01-01T00:00:00+00:00").unwrap();

        let found = TokenRepo::find_user(&conn, "th_1", "2026-06-01T00:00:00+00:00").unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn remove_token() {
        let (conn, user_id) = setup();
        TokenRepo::insert(&conn, "th_1", &user_id, "2099-01-01T00:00:00+00:00").unwrap();

        assert_eq!(TokenRepo::remove(&conn, "th_1").unwrap(), 1);
        assert_eq!(TokenRepo::remove(&conn, "th_1").unwrap(), 0);
    }

    #[test]
    fn purge_expired_keeps_live_tokens() {
        let (conn, user_id) = setup();
        TokenRepo::insert(&conn, "th_old", &user_id, "2026-01-01T00:00:00+00:00").unwrap();
        TokenRepo::insert(&conn, "th_live", &user_id, "2099-01-01T00:00:00+00:00").unwrap();

        let purged = TokenRepo::purge_expired(&conn, "2026-06-01T00:00:00+00:00").unwrap();
        assert_eq!(purged, 1);

        let live = TokenRepo::find_user(&conn, "th_live", "2026-06-01T00:00:00+00:00").unwrap();
        assert!(live.is_some());
    }
}
