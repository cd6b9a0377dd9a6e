//! Task access service.
//!
//! The identity check runs first in every operation; a signed-out caller
//! never reaches the store. For update and remove, the owner is part of the
//! store filter, so "not found" and "not yours" are both reported as an
//! affected count of 0.

use rusqlite::Connection;
use tracing::debug;

use tally_core::{CallerIdentity, TaskId};
use tally_store::repositories::TaskRepo;

use crate::errors::TaskError;
use crate::types::{Task, TaskDraft};

/// Task access service — stateless, all state lives in the store.
pub struct TaskService;

impl TaskService {
    /// List the caller's tasks, oldest first.
    pub fn list_my_tasks(
        conn: &Connection,
        caller: &CallerIdentity,
    ) -> Result<Vec<Task>, TaskError> {
        let user_id = caller.require()?;
        let rows = TaskRepo::list_by_owner(conn, user_id.as_str())?;
        Ok(rows.into_iter().map(Task::from).collect())
    }

    /// Validate the draft and insert a new task owned by the caller.
    ///
    /// The new task starts with `checked = false` and a fresh creation
    /// timestamp. Returns the new task's ID.
    pub fn create_task(
        conn: &Connection,
        caller: &CallerIdentity,
        draft: &TaskDraft,
    ) -> Result<TaskId, TaskError> {
        let user_id = caller.require()?;
        draft.validate()?;

        let row = TaskRepo::create(conn, user_id.as_str(), &draft.text)?;
        debug!(task_id = %row.id, "task created");
        Ok(TaskId::from_string(row.id))
    }

    /// Set the checked flag on the task matching `(task_id, caller)`.
    ///
    /// Returns the affected count: 0 when the task does not exist or belongs
    /// to another user, 1 otherwise. Re-applying the same flag still counts
    /// the row.
    pub fn set_task_checked(
        conn: &Connection,
        caller: &CallerIdentity,
        task_id: &TaskId,
        checked: bool,
    ) -> Result<usize, TaskError> {
        let user_id = caller.require()?;
        let changed = TaskRepo::set_checked(conn, task_id.as_str(), user_id.as_str(), checked)?;
        Ok(changed)
    }

    /// Delete the task matching `(task_id, caller)`. Returns the affected
    /// count, with the same silent-zero semantics as [`Self::set_task_checked`].
    pub fn remove_task(
        conn: &Connection,
        caller: &CallerIdentity,
        task_id: &TaskId,
    ) -> Result<usize, TaskError> {
        let user_id = caller.require()?;
        let removed = TaskRepo::remove(conn, task_id.as_str(), user_id.as_str())?;
        if removed > 0 {
            debug!(task_id = %task_id, "task removed");
        }
        Ok(removed)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
