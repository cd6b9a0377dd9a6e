//! Method registry and async dispatch.
//!
//! Dispatch threads the caller identity into every handler explicitly —
//! a handler never reaches for ambient request state.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use metrics::{counter, histogram};
use serde_json::Value;
use tracing::warn;

use tally_core::CallerIdentity;

use crate::context::RpcContext;
use crate::errors::{self, RpcError};
use crate::types::{RpcRequest, RpcResponse};

/// Trait implemented by every RPC method handler.
#[async_trait]
pub trait MethodHandler: Send + Sync {
    /// Execute the handler for the given caller with params and context.
    async fn handle(
        &self,
        caller: &CallerIdentity,
        params: Option<Value>,
        ctx: &RpcContext,
    ) -> Result<Value, RpcError>;
}

/// Registry mapping method names to handlers.
pub struct MethodRegistry {
    handlers: HashMap<String, Arc<dyn MethodHandler>>,
}

impl MethodRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler for a method name.
    pub fn register(&mut self, method: &str, handler: impl MethodHandler + 'static) {
        let _ = self.handlers.insert(method.to_owned(), Arc::new(handler));
    }

    /// Maximum time a single RPC handler is allowed to run.
    const HANDLER_TIMEOUT: Duration = Duration::from_secs(60);

    /// Dispatch a request to the appropriate handler.
    pub async fn dispatch(
        &self,
        request: RpcRequest,
        caller: &CallerIdentity,
        ctx: &RpcContext,
    ) -> RpcResponse {
        let method = request.method.clone();
        counter!("rpc_requests_total", "method" => method.clone()).increment(1);

        let Some(handler) = self.handlers.get(&method) else {
            counter!("rpc_errors_total", "method" => method.clone(), "error_type" => "method_not_found").increment(1);
            return RpcResponse::error(
                &request.id,
                errors::METHOD_NOT_FOUND,
                format!("Method '{method}' not found"),
            );
        };

        let start = std::time::Instant::now();
        let result = tokio::time::timeout(
            Self::HANDLER_TIMEOUT,
            handler.handle(caller, request.params, ctx),
        )
        .await;

        let response = match result {
            Ok(Ok(result)) => RpcResponse::success(&request.id, result),
            Ok(Err(err)) => {
                counter!("rpc_errors_total", "method" => method.clone(), "error_type" => err.code().to_owned()).increment(1);
                let body = err.to_error_body();
                RpcResponse {
                    id: request.id,
                    success: false,
                    result: None,
                    error: Some(body),
                }
            }
            Err(_elapsed) => {
                counter!("rpc_errors_total", "method" => method.clone(), "error_type" => "timeout").increment(1);
                tracing::error!(method, "RPC handler timed out after {:?}", Self::HANDLER_TIMEOUT);
                RpcResponse::error(
                    &request.id,
                    errors::INTERNAL_ERROR,
                    format!("Handler for '{method}' timed out"),
                )
            }
        };

        let duration = start.elapsed();
        histogram!("rpc_request_duration_seconds", "method" => method.clone())
            .record(duration.as_secs_f64());

        if duration.as_secs() >= 5 {
            warn!(
                method,
                duration_secs = duration.as_secs_f64(),
                "slow RPC request"
            );
        }

        response
    }

    /// List all registered method names (sorted).
    pub fn methods(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check whether a method is registered.
    pub fn has_method(&self, method: &str) -> bool {
        self.handlers.contains_key(method)
    }
}

impl Default for MethodRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
