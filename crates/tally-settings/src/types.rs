//! Settings types with compiled defaults.

use serde::{Deserialize, Serialize};

/// Root settings object.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TallySettings {
    /// HTTP/WebSocket server settings.
    pub server: ServerSettings,
    /// Record store settings.
    pub store: StoreSettings,
    /// Logging settings.
    pub log: LogSettings,
}

/// Server settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Host to bind.
    pub host: String,
    /// Port to bind (0 for auto-assign).
    pub port: u16,
    /// Maximum concurrent WebSocket connections.
    pub max_connections: usize,
    /// Max WebSocket message size in bytes.
    pub max_message_size: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 7310,
            max_connections: 50,
            max_message_size: 1024 * 1024, // 1 MB
        }
    }
}

/// Record store settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Path to the `SQLite` database file. When unset, the binary falls
    /// back to `~/.tally/tally.db`.
    pub db_path: Option<String>,
    /// Maximum pool size.
    pub pool_size: u32,
    /// Busy timeout in milliseconds.
    pub busy_timeout_ms: u32,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            db_path: None,
            pool_size: 8,
            busy_timeout_ms: 5_000,
        }
    }
}

/// Logging settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Emit JSON log lines instead of human-readable output.
    pub json: bool,
    /// Default filter when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            json: false,
            filter: "info".into(),
        }
    }
}
