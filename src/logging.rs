//! `tracing` subscriber installation.
//!
//! `RUST_LOG` takes precedence over the configured filter.

use crate::config::LoggingConfig;
use std::error::Error;
use thiserror::Error;
use tracing_subscriber::{EnvFilter, filter::ParseError, fmt};

/// Errors raised while installing the global subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The configured filter directive does not parse.
    #[error("invalid log filter: {0}")]
    InvalidFilter(#[from] ParseError),
    /// A global subscriber is already installed.
    #[error("failed to install log subscriber: {0}")]
    Install(Box<dyn Error + Send + Sync>),
}

/// Installs the global subscriber described by `config`.
///
/// # Errors
///
/// Returns [`LoggingError::InvalidFilter`] when the configured filter does
/// not parse, or [`LoggingError::Install`] when a subscriber is already
/// installed.
pub fn init(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.filter.trim()))?;
    let builder = fmt().with_env_filter(filter).with_target(true);
    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.with_line_number(true).try_init()
    };
    installed.map_err(LoggingError::Install)
}

/// Installs a debug-level subscriber writing through the test harness.
///
/// Safe to call from every test; only the first call installs.
pub fn init_test() {
    drop(
        fmt()
            .with_env_filter(EnvFilter::new("debug"))
            .with_test_writer()
            .try_init(),
    );
}
