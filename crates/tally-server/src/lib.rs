//! # tally-server
//!
//! Axum HTTP + `WebSocket` server for the Tally backend.
//!
//! - HTTP endpoints: `/health`, `/metrics`
//! - `WebSocket` gateway at `/ws`: one RPC request per text frame, the
//!   bearer token on each request resolved to a caller identity before
//!   dispatch
//! - Graceful shutdown via `tokio::signal` + `CancellationToken`

#![deny(unsafe_code)]

pub mod config;
pub mod health;
pub mod metrics;
pub mod server;
pub mod shutdown;
pub mod websocket;

pub use config::ServerConfig;
pub use server::{AppState, TallyServer};
pub use shutdown::ShutdownCoordinator;
