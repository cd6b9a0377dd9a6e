//! RPC handler modules and registration.

pub mod account;
pub mod system;
pub mod task;

use crate::registry::MethodRegistry;

/// Register all RPC handlers with the registry.
pub fn register_all(registry: &mut MethodRegistry) {
    // System
    registry.register("system.ping", system::PingHandler);
    registry.register("system.getInfo", system::GetInfoHandler);

    // Task
    registry.register("task.list", task::ListTasksHandler);
    registry.register("task.create", task::CreateTaskHandler);
    registry.register("task.setChecked", task::SetCheckedHandler);
    registry.register("task.remove", task::RemoveTaskHandler);

    // Account
    registry.register("account.register", account::RegisterHandler);
    registry.register("account.login", account::LoginHandler);
    registry.register("account.updateProfile", account::UpdateProfileHandler);
    registry.register("account.delete", account::DeleteAccountHandler);
}

/// Extract a required parameter from the params object.
pub(crate) fn require_param<'a>(
    params: Option<&'a serde_json::Value>,
    key: &str,
) -> Result<&'a serde_json::Value, crate::errors::RpcError> {
    params
        .and_then(|p| p.get(key))
        .ok_or_else(|| crate::errors::RpcError::InvalidParams {
            message: format!("Missing required parameter: {key}"),
        })
}

/// Extract a required string parameter.
pub(crate) fn require_string_param(
    params: Option<&serde_json::Value>,
    key: &str,
) -> Result<String, crate::errors::RpcError> {
    require_param(params, key)?
        .as_str()
        .map(ToOwned::to_owned)
        .ok_or_else(|| crate::errors::RpcError::InvalidParams {
            message: format!("Parameter '{key}' must be a string"),
        })
}

/// Extract a required boolean parameter.
pub(crate) fn require_bool_param(
    params: Option<&serde_json::Value>,
    key: &str,
) -> Result<bool, crate::errors::RpcError> {
    require_param(params, key)?
        .as_bool()
        .ok_or_else(|| crate::errors::RpcError::InvalidParams {
            message: format!("Parameter '{key}' must be a boolean"),
        })
}

#[cfg(test)]
pub(crate) mod test_helpers {
    use std::sync::Arc;
    use std::time::Instant;

    use tally_accounts::{AccountService, TracingMailer};
    use tally_core::{CallerIdentity, UserId};
    use tally_store::{ConnectionConfig, new_in_memory, run_migrations};

    use crate::context::RpcContext;

    /// Build an `RpcContext` backed by an in-memory store.
    ///
    /// Pool size 1 so every borrow sees the same in-memory database.
    pub fn make_test_context() -> RpcContext {
        let pool = new_in_memory(&ConnectionConfig {
            pool_size: 1,
            ..ConnectionConfig::default()
        })
        .unwrap();
        {
            let conn = pool.get().unwrap();
            let _ = run_migrations(&conn).unwrap();
        }
        RpcContext {
            pool,
            accounts: Arc::new(AccountService::new(Arc::new(TracingMailer))),
            start_time: Instant::now(),
        }
    }

    /// A signed-in caller with a fixed test user ID.
    pub fn signed_in(id: &str) -> CallerIdentity {
        CallerIdentity::user(UserId::from(id))
    }
}
