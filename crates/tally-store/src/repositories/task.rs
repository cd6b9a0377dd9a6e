//! Task repository.
//!
//! Ownership is enforced by the statements themselves: update and delete
//! filter on `(id, user_id)` in one atomic statement, so a mismatched owner
//! matches zero rows — there is no separate load-then-check step.

use rusqlite::{Connection, OptionalExtension, params};

use tally_core::TaskId;

use crate::errors::Result;

/// A task record as stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskRow {
    /// Task ID (`task_<uuidv7>`).
    pub id: String,
    /// Owning user; set once at creation, never updated.
    pub user_id: String,
    /// Free-form task text.
    pub text: String,
    /// Completion flag.
    pub checked: bool,
    /// Creation timestamp (RFC 3339 UTC).
    pub created_at: String,
}

/// Task repository — stateless, every method takes `&Connection`.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a new task owned by `user_id` with `checked = false`.
    pub fn create(conn: &Connection, user_id: &str, text: &str) -> Result<TaskRow> {
        let id = TaskId::new().into_inner();
        let now = chrono::Utc::now().to_rfc3339();

        let _ = conn.execute(
            "INSERT INTO tasks (id, user_id, text, checked, created_at)
             VALUES (?1, ?2, ?3, 0, ?4)",
            params![id, user_id, text, now],
        )?;

        Ok(TaskRow {
            id,
            user_id: user_id.to_owned(),
            text: text.to_owned(),
            checked: false,
            created_at: now,
        })
    }

    /// Get the task matching `(id, user_id)`.
    pub fn get_owned(conn: &Connection, task_id: &str, user_id: &str) -> Result<Option<TaskRow>> {
        let row = conn
            .query_row(
                "SELECT id, user_id, text, checked, created_at
                 FROM tasks WHERE id = ?1 AND user_id = ?2",
                params![task_id, user_id],
                Self::map_row,
            )
            .optional()?;
        Ok(row)
    }

    /// List all tasks owned by `user_id`, oldest first.
    pub fn list_by_owner(conn: &Connection, user_id: &str) -> Result<Vec<TaskRow>> {
        let mut stmt = conn.prepare(
            "SELECT id, user_id, text, checked, created_at
             FROM tasks WHERE user_id = ?1 ORDER BY created_at, id",
        )?;
        let rows = stmt
            .query_map(params![user_id], Self::map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Set the checked flag on the task matching `(id, user_id)`.
    ///
    /// Returns the affected count: 1 when the task exists and is owned by
    /// `user_id`, otherwise 0.
    pub fn set_checked(
        conn: &Connection,
        task_id: &str,
        user_id: &str,
        checked: bool,
    ) -> Result<usize> {
        let changed = conn.execute(
            "UPDATE tasks SET checked = ?1 WHERE id = ?2 AND user_id = ?3",
            params![checked, task_id, user_id],
        )?;
        Ok(changed)
    }

    /// Delete the task matching `(id, user_id)`. Returns the affected count.
    pub fn remove(conn: &Connection, task_id: &str, user_id: &str) -> Result<usize> {
        let changed = conn.execute(
            "DELETE FROM tasks WHERE id = ?1 AND user_id = ?2",
            params![task_id, user_id],
        )?;
        Ok(changed)
    }

    fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TaskRow> {
        Ok(TaskRow {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            text: row.get("text")?,
            checked: row.get("checked")?,
            created_at: row.get("created_at")?,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
