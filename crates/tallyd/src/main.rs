//! # tallyd
//!
//! Tally backend daemon — loads settings, opens the record store, registers
//! the RPC surface, and serves HTTP/WebSocket until interrupted.

#![deny(unsafe_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use tally_accounts::{AccountService, TracingMailer};
use tally_core::logging::{self, LogFormat};
use tally_rpc::handlers::register_all;
use tally_rpc::{MethodRegistry, RpcContext};
use tally_server::{ServerConfig, TallyServer};
use tally_settings::{TallySettings, load_settings, load_settings_from_path};
use tally_store::{ConnectionConfig, new_file, run_migrations};

/// Tally backend daemon.
#[derive(Parser, Debug)]
#[command(name = "tallyd", about = "Tally task-tracking backend", version)]
struct Cli {
    /// Host to bind (overrides settings).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides settings; 0 for auto-assign).
    #[arg(long)]
    port: Option<u16>,

    /// Path to the `SQLite` database (overrides settings).
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Path to the settings file (default `~/.tally/settings.json`).
    #[arg(long)]
    settings: Option<PathBuf>,
}

fn default_db_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".tally").join("tally.db")
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    Ok(())
}

fn load(cli: &Cli) -> Result<TallySettings> {
    let settings = match &cli.settings {
        Some(path) => load_settings_from_path(path)?,
        None => load_settings()?,
    };
    Ok(settings)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = load(&cli)?;

    let format = if settings.log.json {
        LogFormat::Json
    } else {
        LogFormat::Text
    };
    logging::init(format, &settings.log.filter);

    // Store
    let db_path = cli
        .db_path
        .clone()
        .or_else(|| settings.store.db_path.as_ref().map(PathBuf::from))
        .unwrap_or_else(default_db_path);
    ensure_parent_dir(&db_path)?;
    let db_path_str = db_path
        .to_str()
        .context("database path is not valid UTF-8")?;
    let pool = new_file(
        db_path_str,
        &ConnectionConfig {
            pool_size: settings.store.pool_size,
            busy_timeout_ms: settings.store.busy_timeout_ms,
        },
    )
    .context("failed to open record store")?;
    {
        let conn = pool.get().context("failed to borrow store connection")?;
        let applied = run_migrations(&conn).context("failed to run migrations")?;
        info!(db_path = %db_path.display(), applied, "record store ready");
    }

    // RPC surface
    let mut registry = MethodRegistry::new();
    register_all(&mut registry);
    let rpc = RpcContext {
        pool,
        accounts: Arc::new(AccountService::new(Arc::new(TracingMailer))),
        start_time: Instant::now(),
    };

    // Server
    let mut config = ServerConfig::from(&settings.server);
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    let metrics = tally_server::metrics::install_recorder();
    let server = TallyServer::new(config, registry, rpc).with_metrics(metrics);

    let shutdown = server.shutdown().clone();
    let _ = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, shutting down");
            shutdown.shutdown();
        }
    });

    server.serve().await.context("server error")?;
    info!("bye");
    Ok(())
}
