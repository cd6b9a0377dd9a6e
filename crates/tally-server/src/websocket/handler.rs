//! WebSocket message dispatch — parses incoming text as `RpcRequest`,
//! resolves the request's bearer token to a caller identity, and routes
//! through the `MethodRegistry`.

use tracing::{debug, instrument, warn};

use tally_accounts::Credentials;
use tally_core::CallerIdentity;
use tally_rpc::registry::MethodRegistry;
use tally_rpc::types::{RpcRequest, RpcResponse};
use tally_rpc::{RpcContext, RpcError};

/// Result of handling a WebSocket message.
pub struct HandleResult {
    /// Serialized JSON response to send back.
    pub response_json: String,
    /// The RPC method that was called (empty if parse failed).
    pub method: String,
    /// Typed response (for extracting structured data without re-parsing).
    pub response: RpcResponse,
}

/// Handle an incoming WebSocket text message.
///
/// Parses the message as an `RpcRequest`, resolves its `authToken` to a
/// [`CallerIdentity`] (absent or expired tokens resolve to anonymous),
/// dispatches to the registry, and returns the serialized `RpcResponse`
/// along with the method name.
#[instrument(skip_all, fields(method))]
pub async fn handle_message(
    message: &str,
    registry: &MethodRegistry,
    ctx: &RpcContext,
) -> HandleResult {
    let request: RpcRequest = match serde_json::from_str(message) {
        Ok(r) => r,
        Err(e) => {
            warn!("invalid JSON received");
            let resp =
                RpcResponse::error("unknown", "INVALID_PARAMS", format!("Invalid JSON: {e}"));
            return finish(String::new(), resp);
        }
    };

    let method = request.method.clone();
    let id = &request.id;
    let _ = tracing::Span::current().record("method", method.as_str());
    debug!(method, id, "dispatching RPC");

    if !registry.has_method(&method) {
        warn!(method, "unknown RPC method");
    }

    let caller = match resolve_caller(&request, ctx) {
        Ok(caller) => caller,
        Err(err) => {
            let body = err.to_error_body();
            let resp = RpcResponse::error(id, body.code, body.message);
            return finish(method, resp);
        }
    };

    let response = registry.dispatch(request, &caller, ctx).await;
    finish(method, response)
}

/// Resolve the request's bearer token against the token store.
///
/// A request without a token is anonymous. Unknown and expired tokens also
/// resolve to anonymous; only infrastructure failures surface as errors.
fn resolve_caller(request: &RpcRequest, ctx: &RpcContext) -> Result<CallerIdentity, RpcError> {
    let Some(token) = request.auth_token.as_deref() else {
        return Ok(CallerIdentity::anonymous());
    };
    let conn = ctx.conn()?;
    let caller = Credentials::resolve_token(&conn, token)?;
    Ok(caller)
}

fn finish(method: String, response: RpcResponse) -> HandleResult {
    let json = serde_json::to_string(&response).unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to serialize response");
        String::new()
    });
    HandleResult {
        response_json: json,
        method,
        response,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
