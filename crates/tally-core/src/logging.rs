//! Tracing initialization.
//!
//! One call from the binary sets up `tracing-subscriber` with an env-filter
//! (`RUST_LOG` wins over the provided default) and either human-readable or
//! JSON line output.

use tracing_subscriber::EnvFilter;

/// Output format for log lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable single-line output.
    Text,
    /// One JSON object per line.
    Json,
}

/// Install the global tracing subscriber.
///
/// Safe to call more than once; subsequent calls are no-ops (the first
/// subscriber wins). `default_filter` is used when `RUST_LOG` is unset,
/// e.g. `"info,tally_store=debug"`.
pub fn init(format: LogFormat, default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    // Already-initialized is fine (tests, embedded use).
    drop(result);
}
