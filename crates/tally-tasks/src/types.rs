//! Task domain types and draft validation.

use serde::{Deserialize, Serialize};

use tally_core::{TaskId, UserId};
use tally_store::repositories::TaskRow;

use crate::errors::TaskError;

/// Maximum task text length in bytes.
pub const MAX_TEXT_LENGTH: usize = 8_192;

/// A task record, as returned to callers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Task ID.
    pub id: TaskId,
    /// Free-form task text.
    pub text: String,
    /// Owning user; set once at creation, immutable afterward.
    pub user_id: UserId,
    /// Completion flag.
    pub checked: bool,
    /// Creation timestamp (RFC 3339 UTC).
    pub created_at: String,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Self {
            id: TaskId::from_string(row.id),
            text: row.text,
            user_id: UserId::from_string(row.user_id),
            checked: row.checked,
            created_at: row.created_at,
        }
    }
}

/// Caller-supplied fields for a new task, validated before any store write.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    /// Free-form task text.
    pub text: String,
}

impl TaskDraft {
    /// Check the draft's shape: text must be non-blank and within the
    /// length bound. Content beyond that is not interpreted.
    pub fn validate(&self) -> Result<(), TaskError> {
        if self.text.trim().is_empty() {
            return Err(TaskError::Validation("text must not be empty".into()));
        }
        if self.text.len() > MAX_TEXT_LENGTH {
            return Err(TaskError::Validation(format!(
                "text exceeds maximum length ({} > {MAX_TEXT_LENGTH})",
                self.text.len()
            )));
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
