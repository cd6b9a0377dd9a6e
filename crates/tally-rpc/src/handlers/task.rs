//! Task handlers: list, create, setChecked, remove.

use async_trait::async_trait;
use serde_json::{Value, json};

use tally_core::{CallerIdentity, TaskId};
use tally_tasks::{TaskDraft, TaskService};

use crate::context::RpcContext;
use crate::errors::RpcError;
use crate::handlers::{require_bool_param, require_string_param};
use crate::registry::MethodHandler;

/// List the caller's tasks.
pub struct ListTasksHandler;

#[async_trait]
impl MethodHandler for ListTasksHandler {
    async fn handle(
        &self,
        caller: &CallerIdentity,
        _params: Option<Value>,
        ctx: &RpcContext,
    ) -> Result<Value, RpcError> {
        let conn = ctx.conn()?;
        let tasks = TaskService::list_my_tasks(&conn, caller)?;
        Ok(json!({ "tasks": tasks }))
    }
}

/// Create a new task owned by the caller.
pub struct CreateTaskHandler;

#[async_trait]
impl MethodHandler for CreateTaskHandler {
    async fn handle(
        &self,
        caller: &CallerIdentity,
        params: Option<Value>,
        ctx: &RpcContext,
    ) -> Result<Value, RpcError> {
        let text = require_string_param(params.as_ref(), "text")?;
        let conn = ctx.conn()?;
        let task_id = TaskService::create_task(&conn, caller, &TaskDraft { text })?;
        Ok(json!({ "taskId": task_id }))
    }
}

/// Set the checked flag on one of the caller's tasks.
pub struct SetCheckedHandler;

#[async_trait]
impl MethodHandler for SetCheckedHandler {
    async fn handle(
        &self,
        caller: &CallerIdentity,
        params: Option<Value>,
        ctx: &RpcContext,
    ) -> Result<Value, RpcError> {
        let task_id = require_string_param(params.as_ref(), "taskId")?;
        let checked = require_bool_param(params.as_ref(), "checked")?;
        let conn = ctx.conn()?;
        let updated =
            TaskService::set_task_checked(&conn, caller, &TaskId::from_string(task_id), checked)?;
        Ok(json!({ "updated": updated }))
    }
}

/// Remove one of the caller's tasks.
pub struct RemoveTaskHandler;

#[async_trait]
impl MethodHandler for RemoveTaskHandler {
    async fn handle(
        &self,
        caller: &CallerIdentity,
        params: Option<Value>,
        ctx: &RpcContext,
    ) -> Result<Value, RpcError> {
        let task_id = require_string_param(params.as_ref(), "taskId")?;
        let conn = ctx.conn()?;
        let removed = TaskService::remove_task(&conn, caller, &TaskId::from_string(task_id))?;
        Ok(json!({ "removed": removed }))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_helpers::{make_test_context, signed_in};
    use serde_json::json;

    #[tokio::test]
    async fn list_requires_identity() {
        let ctx = make_test_context();
        let err = ListTasksHandler
            .handle(&CallerIdentity::anonymous(), None, &ctx)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "NOT_SIGNED_IN");
    }

    #[tokio::test]
    async fn create_then_list_roundtrip() {
        let ctx = make_test_context();
        let alice = signed_in("user_alice");

        let created = CreateTaskHandler
            .handle(&alice, Some(json!({"text": "buy milk"})), &ctx)
            .await
            .unwrap();
        let task_id = created["taskId"].as_str().unwrap().to_owned();

        let listed = ListTasksHandler.handle(&alice, None, &ctx).await.unwrap();
        let tasks = listed["tasks"].as_array().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0]["id"], task_id.as_str());
        assert_eq!(tasks[0]["text"], "buy milk");
        assert_eq!(tasks[0]["checked"], false);
        assert_eq!(tasks[0]["userId"], "user_alice");
    }

    #[tokio::test]
    async fn create_missing_text_is_invalid_params() {
        let ctx = make_test_context();
        let err = CreateTaskHandler
            .handle(&signed_in("user_alice"), Some(json!({})), &ctx)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_PARAMS");
    }

    #[tokio::test]
    async fn create_blank_text_is_invalid_params() {
        let ctx = make_test_context();
        let err = CreateTaskHandler
            .handle(&signed_in("user_alice"), Some(json!({"text": "  "})), &ctx)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_PARAMS");
    }

    #[tokio::test]
    async fn set_checked_own_task_reports_one() {
        let ctx = make_test_context();
        let alice = signed_in("user_alice");
        let created = CreateTaskHandler
            .handle(&alice, Some(json!({"text": "t"})), &ctx)
            .await
            .unwrap();
        let task_id = created["taskId"].clone();

        let result = SetCheckedHandler
            .handle(&alice, Some(json!({"taskId": task_id, "checked": true})), &ctx)
            .await
            .unwrap();
        assert_eq!(result["updated"], 1);
    }

    #[tokio::test]
    async fn set_checked_foreign_task_reports_zero() {
        let ctx = make_test_context();
        let alice = signed_in("user_alice");
        let created = CreateTaskHandler
            .handle(&alice, Some(json!({"text": "t"})), &ctx)
            .await
            .unwrap();
        let task_id = created["taskId"].clone();

        let result = SetCheckedHandler
            .handle(
                &signed_in("user_bob"),
                Some(json!({"taskId": task_id, "checked": true})),
                &ctx,
            )
            .await
            .unwrap();
        assert_eq!(result["updated"], 0);
    }

    #[tokio::test]
    async fn set_checked_requires_bool() {
        let ctx = make_test_context();
        let err = SetCheckedHandler
            .handle(
                &signed_in("user_alice"),
                Some(json!({"taskId": "task_1", "checked": "yes"})),
                &ctx,
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_PARAMS");
    }

    #[tokio::test]
    async fn remove_own_task_reports_one() {
        let ctx = make_test_context();
        let alice = signed_in("user_alice");
        let created = CreateTaskHandler
            .handle(&alice, Some(json!({"text": "t"})), &ctx)
            .await
            .unwrap();
        let task_id = created["taskId"].clone();

        let result = RemoveTaskHandler
            .handle(&alice, Some(json!({"taskId": task_id})), &ctx)
            .await
            .unwrap();
        assert_eq!(result["removed"], 1);

        let listed = ListTasksHandler.handle(&alice, None, &ctx).await.unwrap();
        assert!(listed["tasks"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn remove_missing_task_reports_zero() {
        let ctx = make_test_context();
        let result = RemoveTaskHandler
            .handle(
                &signed_in("user_alice"),
                Some(json!({"taskId": "task_missing"})),
                &ctx,
            )
            .await
            .unwrap();
        assert_eq!(result["removed"], 0);
    }
}
