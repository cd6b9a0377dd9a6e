//! `TallyServer` — Axum HTTP + WebSocket server.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use axum::Router;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use metrics::counter;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use tally_rpc::{MethodRegistry, RpcContext};

use crate::config::ServerConfig;
use crate::health::{self, HealthResponse};
use crate::metrics::{WS_CONNECTIONS_TOTAL, WS_DISCONNECTIONS_TOTAL};
use crate::shutdown::ShutdownCoordinator;
use crate::websocket::handler::handle_message;

/// Shared state accessible from Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// RPC method registry.
    pub registry: Arc<MethodRegistry>,
    /// RPC dependency context.
    pub rpc: Arc<RpcContext>,
    /// Shutdown coordinator.
    pub shutdown: Arc<ShutdownCoordinator>,
    /// When the server started.
    pub start_time: Instant,
    /// Live WebSocket connection count.
    pub connections: Arc<AtomicUsize>,
    /// Prometheus render handle (absent when metrics are not installed).
    pub metrics: Option<PrometheusHandle>,
    /// Server configuration.
    pub config: ServerConfig,
}

/// The main Tally server.
pub struct TallyServer {
    config: ServerConfig,
    registry: Arc<MethodRegistry>,
    rpc: Arc<RpcContext>,
    shutdown: Arc<ShutdownCoordinator>,
    start_time: Instant,
    connections: Arc<AtomicUsize>,
    metrics: Option<PrometheusHandle>,
}

impl TallyServer {
    /// Create a new server.
    pub fn new(config: ServerConfig, registry: MethodRegistry, rpc: RpcContext) -> Self {
        Self {
            config,
            registry: Arc::new(registry),
            rpc: Arc::new(rpc),
            shutdown: Arc::new(ShutdownCoordinator::new()),
            start_time: Instant::now(),
            connections: Arc::new(AtomicUsize::new(0)),
            metrics: None,
        }
    }

    /// Attach a Prometheus render handle for the `/metrics` endpoint.
    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Build the Axum router with all routes.
    pub fn router(&self) -> Router {
        let state = AppState {
            registry: self.registry.clone(),
            rpc: self.rpc.clone(),
            shutdown: self.shutdown.clone(),
            start_time: self.start_time,
            connections: self.connections.clone(),
            metrics: self.metrics.clone(),
            config: self.config.clone(),
        };

        Router::new()
            .route("/health", get(health_handler))
            .route("/metrics", get(metrics_handler))
            .route("/ws", get(ws_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Bind and serve until the shutdown token fires.
    pub async fn serve(&self) -> std::io::Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        info!(addr = %listener.local_addr()?, "listening");

        let token = self.shutdown.token();
        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move { token.cancelled().await })
            .await
    }

    /// Get the shutdown coordinator.
    pub fn shutdown(&self) -> &Arc<ShutdownCoordinator> {
        &self.shutdown
    }

    /// Get the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get the method registry.
    pub fn registry(&self) -> &Arc<MethodRegistry> {
        &self.registry
    }
}

/// GET /health
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let connections = state.connections.load(Ordering::Relaxed);
    Json(health::health_check(state.start_time, connections))
}

/// GET /metrics
async fn metrics_handler(State(state): State<AppState>) -> Response {
    match state.metrics {
        Some(handle) => (StatusCode::OK, crate::metrics::render(&handle)).into_response(),
        None => (StatusCode::NOT_FOUND, "metrics not enabled").into_response(),
    }
}

/// GET /ws — WebSocket upgrade.
async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    if state.connections.load(Ordering::Relaxed) >= state.config.max_connections {
        warn!("connection limit reached, rejecting upgrade");
        return (StatusCode::SERVICE_UNAVAILABLE, "too many connections").into_response();
    }
    let max_message_size = state.config.max_message_size;
    ws.max_message_size(max_message_size)
        .on_upgrade(move |socket| serve_socket(socket, state))
}

/// Per-connection loop: one RPC request per text frame.
async fn serve_socket(mut socket: WebSocket, state: AppState) {
    counter!(WS_CONNECTIONS_TOTAL).increment(1);
    let _ = state.connections.fetch_add(1, Ordering::Relaxed);
    let token = state.shutdown.token();

    loop {
        tokio::select! {
            () = token.cancelled() => {
                let _ = socket.send(Message::Close(None)).await;
                break;
            }
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        let result =
                            handle_message(text.as_str(), &state.registry, &state.rpc).await;
                        if socket.send(Message::Text(result.response_json.into())).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    // Ping/pong are answered by axum; binary frames are ignored.
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!(error = %e, "websocket receive error");
                        break;
                    }
                }
            }
        }
    }

    let _ = state.connections.fetch_sub(1, Ordering::Relaxed);
    counter!(WS_DISCONNECTIONS_TOTAL).increment(1);
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
