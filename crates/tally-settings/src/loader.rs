//! Settings loading.
//!
//! Loading flow:
//! 1. Start with compiled [`TallySettings::default()`]
//! 2. If the settings file exists, merge its values over the defaults
//! 3. Merge `TALLY_*` environment variables (highest priority)
//!
//! Environment variables use `__` as the section separator so that
//! snake_case keys survive, e.g. `TALLY_SERVER__PORT=9000` or
//! `TALLY_STORE__BUSY_TIMEOUT_MS=10000`.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized};
use tracing::debug;

use crate::errors::Result;
use crate::types::TallySettings;

/// Resolve the default settings file path (`~/.tally/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".tally").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<TallySettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, file values are simply skipped. If the file
/// contains invalid JSON, an error is returned.
pub fn load_settings_from_path(path: &Path) -> Result<TallySettings> {
    let mut figment = Figment::from(Serialized::defaults(TallySettings::default()));

    if path.exists() {
        debug!(?path, "loading settings from file");
        figment = figment.merge(Json::file(path));
    } else {
        debug!(?path, "settings file not found, using defaults");
    }

    let settings = figment
        .merge(Env::prefixed("TALLY_").split("__"))
        .extract()?;
    Ok(settings)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
