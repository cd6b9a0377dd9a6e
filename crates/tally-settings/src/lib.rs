//! # tally-settings
//!
//! Layered configuration: compiled defaults, then an optional JSON file,
//! then `TALLY_*` environment variables (highest priority).

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::SettingsError;
pub use loader::{load_settings, load_settings_from_path};
pub use types::{LogSettings, ServerSettings, StoreSettings, TallySettings};
