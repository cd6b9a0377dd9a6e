//! Server configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the Tally server.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind (default `"127.0.0.1"`).
    pub host: String,
    /// Port to bind (default `0` for auto-assign).
    pub port: u16,
    /// Maximum concurrent WebSocket connections.
    pub max_connections: usize,
    /// Max WebSocket message size in bytes.
    pub max_message_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0,
            max_connections: 50,
            max_message_size: 1024 * 1024, // 1 MB
        }
    }
}

impl From<&tally_settings::ServerSettings> for ServerConfig {
    fn from(settings: &tally_settings::ServerSettings) -> Self {
        Self {
            host: settings.host.clone(),
            port: settings.port,
            max_connections: settings.max_connections,
            max_message_size: settings.max_message_size,
        }
    }
}
