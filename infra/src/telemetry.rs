//! Tracing subscriber setup

use tracing_subscriber::{fmt, EnvFilter};

use vc_shared::config::{LogFormat, LoggingConfig};

use crate::InfrastructureError;

/// Build the filter for a logging configuration
///
/// `RUST_LOG` takes precedence over `config.level` when it is set.
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter, InfrastructureError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.level).map_err(|e| {
            InfrastructureError::Config(format!("Invalid log filter '{}': {}", config.level, e))
        }),
    }
}

/// Install the global `tracing` subscriber
///
/// # Errors
/// `InfrastructureError::Config` if the filter is invalid or a global
/// subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), InfrastructureError> {
    let filter = env_filter(config)?;
    let builder = fmt()
        .with_env_filter(filter)
        .with_file(config.source_location)
        .with_line_number(config.source_location);

    let result = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };

    result.map_err(|e| {
        InfrastructureError::Config(format!("Failed to install tracing subscriber: {}", e))
    })
}
