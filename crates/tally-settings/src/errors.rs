//! Settings error types.

/// Errors that can occur while loading settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// Extraction or file parsing failed.
    #[error("settings error: {0}")]
    Figment(#[from] Box<figment::Error>),
}

impl From<figment::Error> for SettingsError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

/// Convenience type alias for settings results.
pub type Result<T> = std::result::Result<T, SettingsError>;
