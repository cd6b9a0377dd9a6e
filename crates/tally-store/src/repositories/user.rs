//! User repository.
//!
//! Profile updates are partial: the SET list is built from the fields
//! actually supplied, so omitted fields are left untouched rather than
//! cleared.

use rusqlite::{Connection, OptionalExtension, params};

use tally_core::UserId;

use crate::errors::Result;

/// A user record as stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserRow {
    /// User ID (`user_<uuidv7>`).
    pub id: String,
    /// Unique credential identifier.
    pub email: String,
    /// Salted password hash (`salt$hash`).
    pub password_hash: String,
    /// Optional profile first name.
    pub first_name: Option<String>,
    /// Optional profile last name.
    pub last_name: Option<String>,
    /// Whether the verification flow has confirmed the email.
    pub email_verified: bool,
    /// Creation timestamp (RFC 3339 UTC).
    pub created_at: String,
}

/// Options for creating a new user.
pub struct CreateUserOptions<'a> {
    /// Unique email address.
    pub email: &'a str,
    /// Pre-hashed password (`salt$hash`).
    pub password_hash: &'a str,
    /// Optional profile first name.
    pub first_name: Option<&'a str>,
    /// Optional profile last name.
    pub last_name: Option<&'a str>,
}

/// User repository — stateless, every method takes `&Connection`.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user record.
    pub fn create(conn: &Connection, opts: &CreateUserOptions<'_>) -> Result<UserRow> {
        let id = UserId::new().into_inner();
        let now = chrono::Utc::now().to_rfc3339();

        let _ = conn.execute(
            "INSERT INTO users (id, email, password_hash, first_name, last_name, email_verified, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6)",
            params![id, opts.email, opts.password_hash, opts.first_name, opts.last_name, now],
        )?;

        Ok(UserRow {
            id,
            email: opts.email.to_owned(),
            password_hash: opts.password_hash.to_owned(),
            first_name: opts.first_name.map(String::from),
            last_name: opts.last_name.map(String::from),
            email_verified: false,
            created_at: now,
        })
    }

    /// Get user by ID.
    pub fn get_by_id(conn: &Connection, user_id: &str) -> Result<Option<UserRow>> {
        let row = conn
            .query_row(
                "SELECT id, email, password_hash, first_name, last_name, email_verified, created_at
                 FROM users WHERE id = ?1",
                params![user_id],
                Self::map_row,
            )
            .optional()?;
        Ok(row)
    }

    /// Get user by email.
    pub fn get_by_email(conn: &Connection, email: &str) -> Result<Option<UserRow>> {
        let row = conn
            .query_row(
                "SELECT id, email, password_hash, first_name, last_name, email_verified, created_at
                 FROM users WHERE email = ?1",
                params![email],
                Self::map_row,
            )
            .optional()?;
        Ok(row)
    }

    /// Apply a partial profile update. Fields passed as `None` are left
    /// untouched. Returns the affected count; an update with no fields
    /// supplied touches nothing and returns 0.
    pub fn update_profile(
        conn: &Connection,
        user_id: &str,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Result<usize> {
        let mut sets = Vec::new();
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(first) = first_name {
            sets.push(format!("first_name = ?{}", param_values.len() + 1));
            param_values.push(Box::new(first.to_owned()));
        }
        if let Some(last) = last_name {
            sets.push(format!("last_name = ?{}", param_values.len() + 1));
            param_values.push(Box::new(last.to_owned()));
        }
        if sets.is_empty() {
            return Ok(0);
        }

        let sql = format!(
            "UPDATE users SET {} WHERE id = ?{}",
            sets.join(", "),
            param_values.len() + 1
        );
        param_values.push(Box::new(user_id.to_owned()));

        let params_refs: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(Box::as_ref).collect();
        let changed = conn.execute(&sql, params_refs.as_slice())?;
        Ok(changed)
    }

    /// Mark the user's email as verified. Returns the affected count.
    pub fn mark_email_verified(conn: &Connection, user_id: &str) -> Result<usize> {
        let changed = conn.execute(
            "UPDATE users SET email_verified = 1 WHERE id = ?1",
            params![user_id],
        )?;
        Ok(changed)
    }

    /// Delete the user record matching `user_id`. Returns the affected count.
    pub fn delete(conn: &Connection, user_id: &str) -> Result<usize> {
        let changed = conn.execute("DELETE FROM users WHERE id = ?1", params![user_id])?;
        Ok(changed)
    }

    fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserRow> {
        Ok(UserRow {
            id: row.get("id")?,
            email: row.get("email")?,
            password_hash: row.get("password_hash")?,
            first_name: row.get("first_name")?,
            last_name: row.get("last_name")?,
            email_verified: row.get("email_verified")?,
            created_at: row.get("created_at")?,
        })
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

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn create_jane(conn: &Connection) -> UserRow {
        UserRepo::create(
            conn,
            &CreateUserOptions {
                email: "jane@example.com",
                password_hash: "salt$hash",
                first_name: Some("Jane"),
                last_name: Some("Doe"),
            },
        )
        .unwrap()
    }

    #[test]
    fn create_user() {
        let conn = setup();
        let user = create_jane(&conn);

        assert!(user.id.starts_with("user_"));
        assert_eq!(user.email, "jane@example.com");
        assert_eq!(user.first_name.as_deref(), Some("Jane"));
        assert!(!user.email_verified);
    }

    #[test]
    fn get_by_id_and_email() {
        let conn = setup();
        let user = create_jane(&conn);

        let by_id = UserRepo::get_by_id(&conn, &user.id).unwrap().unwrap();
        assert_eq!(by_id.email, "jane@example.com");

        let by_email = UserRepo::get_by_email(&conn, "jane@example.com").unwrap().unwrap();
        assert_eq!(by_email.id, user.id);

        assert!(UserRepo::get_by_email(&conn, "nobody@example.com").unwrap().is_none());
    }

    #[test]
    fn duplicate_email_rejected_by_schema() {
        let conn = setup();
        create_jane(&conn);

        let result = UserRepo::create(
            &conn,
            &CreateUserOptions {
                email: "jane@example.com",
                password_hash: "other",
                first_name: None,
                last_name: None,
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn update_profile_partial() {
        let conn = setup();
        let user = create_jane(&conn);

        let changed = UserRepo::update_profile(&conn, &user.id, Some("Janet"), None).unwrap();
        assert_eq!(changed, 1);

        let found = UserRepo::get_by_id(&conn, &user.id).unwrap().unwrap();
        assert_eq!(found.first_name.as_deref(), Some("Janet"));
        assert_eq!(found.last_name.as_deref(), Some("Doe"));
    }

    #[test]
    fn update_profile_both_fields() {
        let conn = setup();
        let user = create_jane(&conn);

        let changed =
            UserRepo::update_profile(&conn, &user.id, Some("Janet"), Some("Smith")).unwrap();
        assert_eq!(changed, 1);

        let found = UserRepo::get_by_id(&conn, &user.id).unwrap().unwrap();
        assert_eq!(found.first_name.as_deref(), Some("Janet"));
        assert_eq!(found.last_name.as_deref(), Some("Smith"));
    }

    #[test]
    fn update_profile_no_fields_is_noop() {
        let conn = setup();
        let user = create_jane(&conn);

        let changed = UserRepo::update_profile(&conn, &user.id, None, None).unwrap();
        assert_eq!(changed, 0);
    }

    #[test]
    fn update_profile_missing_user_affects_nothing() {
        let conn = setup();
        let changed = UserRepo::update_profile(&conn, "user_missing", Some("X"), None).unwrap();
        assert_eq!(changed, 0);
    }

    #[test]
    fn mark_email_verified() {
        let conn = setup();
        let user = create_jane(&conn);

        assert_eq!(UserRepo::mark_email_verified(&conn, &user.id).unwrap(), 1);
        let found = UserRepo::get_by_id(&conn, &user.id).unwrap().unwrap();
        assert!(found.email_verified);
    }

    #[test]
    fn delete_user() {
        let conn = setup();
        let user = create_jane(&conn);

        assert_eq!(UserRepo::delete(&conn, &user.id).unwrap(), 1);
        assert!(UserRepo::get_by_id(&conn, &user.id).unwrap().is_none());
        assert_eq!(UserRepo::delete(&conn, &user.id).unwrap(), 0);
    }
}
