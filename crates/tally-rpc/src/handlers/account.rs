//! Account handlers: register, login, updateProfile, delete.

use async_trait::async_trait;
use serde_json::{Value, json};

use tally_accounts::{ProfileUpdate, RegisterParams};
use tally_core::CallerIdentity;

use crate::context::RpcContext;
use crate::errors::RpcError;
use crate::handlers::require_string_param;
use crate::registry::MethodHandler;
use crate::validation::{MAX_PARAM_LENGTH, validate_string_param};

fn to_result_value(value: impl serde::Serialize) -> Result<Value, RpcError> {
    serde_json::to_value(value).map_err(|e| {
        tracing::error!(error = %e, "failed to serialize handler result");
        RpcError::Internal {
            message: "internal error".into(),
        }
    })
}

/// Register a new user account.
pub struct RegisterHandler;

#[async_trait]
impl MethodHandler for RegisterHandler {
    async fn handle(
        &self,
        _caller: &CallerIdentity,
        params: Option<Value>,
        ctx: &RpcContext,
    ) -> Result<Value, RpcError> {
        let params = params.ok_or_else(|| RpcError::InvalidParams {
            message: "Missing parameters".into(),
        })?;
        let register: RegisterParams =
            serde_json::from_value(params).map_err(|e| RpcError::InvalidParams {
                message: format!("Invalid parameters: {e}"),
            })?;
        validate_string_param(&register.email, "email", MAX_PARAM_LENGTH)?;
        validate_string_param(&register.first_name, "firstName", MAX_PARAM_LENGTH)?;
        validate_string_param(&register.last_name, "lastName", MAX_PARAM_LENGTH)?;

        let conn = ctx.conn()?;
        let outcome = ctx.accounts.register_user(&conn, &register).await?;
        to_result_value(outcome)
    }
}

/// Verify credentials and issue a login token.
pub struct LoginHandler;

#[async_trait]
impl MethodHandler for LoginHandler {
    async fn handle(
        &self,
        _caller: &CallerIdentity,
        params: Option<Value>,
        ctx: &RpcContext,
    ) -> Result<Value, RpcError> {
        let email = require_string_param(params.as_ref(), "email")?;
        let password = require_string_param(params.as_ref(), "password")?;

        let conn = ctx.conn()?;
        let outcome = ctx.accounts.login(&conn, &email, &password)?;
        to_result_value(outcome)
    }
}

/// Apply a partial profile update to the caller's own record.
pub struct UpdateProfileHandler;

#[async_trait]
impl MethodHandler for UpdateProfileHandler {
    async fn handle(
        &self,
        caller: &CallerIdentity,
        params: Option<Value>,
        ctx: &RpcContext,
    ) -> Result<Value, RpcError> {
        let updates: ProfileUpdate = match params {
            Some(p) => serde_json::from_value(p).map_err(|e| RpcError::InvalidParams {
                message: format!("Invalid parameters: {e}"),
            })?,
            None => ProfileUpdate::default(),
        };
        if let Some(ref first) = updates.first_name {
            validate_string_param(first, "firstName", MAX_PARAM_LENGTH)?;
        }
        if let Some(ref last) = updates.last_name {
            validate_string_param(last, "lastName", MAX_PARAM_LENGTH)?;
        }

        let conn = ctx.conn()?;
        let updated = ctx.accounts.update_profile(&conn, caller, &updates)?;
        Ok(json!({ "updated": updated }))
    }
}

/// Delete the caller's own account.
pub struct DeleteAccountHandler;

#[async_trait]
impl MethodHandler for DeleteAccountHandler {
    async fn handle(
        &self,
        caller: &CallerIdentity,
        _params: Option<Value>,
        ctx: &RpcContext,
    ) -> Result<Value, RpcError> {
        let conn = ctx.conn()?;
        let removed = ctx.accounts.delete_account(&conn, caller)?;
        Ok(json!({ "removed": removed }))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
