//! System handlers: ping and server info.

use async_trait::async_trait;
use serde_json::{Value, json};

use tally_core::CallerIdentity;

use crate::context::RpcContext;
use crate::errors::RpcError;
use crate::registry::MethodHandler;

/// Liveness check.
pub struct PingHandler;

#[async_trait]
impl MethodHandler for PingHandler {
    async fn handle(
        &self,
        _caller: &CallerIdentity,
        _params: Option<Value>,
        _ctx: &RpcContext,
    ) -> Result<Value, RpcError> {
        Ok(json!({ "pong": true }))
    }
}

/// Server version and uptime.
pub struct GetInfoHandler;

#[async_trait]
impl MethodHandler for GetInfoHandler {
    async fn handle(
        &self,
        _caller: &CallerIdentity,
        _params: Option<Value>,
        ctx: &RpcContext,
    ) -> Result<Value, RpcError> {
        Ok(json!({
            "version": env!("CARGO_PKG_VERSION"),
            "uptimeSecs": ctx.start_time.elapsed().as_secs(),
        }))
    }
}
