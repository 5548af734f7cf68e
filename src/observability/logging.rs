//! # Structured Logging
//!
//! Initializes the `tracing-subscriber` stack from [`ObservabilityConfig`]:
//! an env-filter (honoring `RUST_LOG` when set), and either human-readable
//! or JSON output.

use crate::config::ObservabilityConfig;
use crate::errors::{Result, WardenError};
use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured log level so operators
/// can raise verbosity per-module without editing service configuration.
pub fn init_logging(config: &ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| WardenError::config(format!("Invalid log level: {}", e)))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    let result = if config.json_logging {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    // A second init attempt (tests spin the stack up repeatedly) is not an
    // operational failure.
    if let Err(e) = result {
        tracing::debug!(error = %e, "tracing subscriber was already initialized");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_twice_is_not_an_error() {
        let config = ObservabilityConfig::default();
        init_logging(&config).unwrap();
        init_logging(&config).unwrap();
    }

    #[test]
    fn invalid_filter_is_rejected() {
        // RUST_LOG would shadow the configured level.
        std::env::remove_var("RUST_LOG");
        let config =
            ObservabilityConfig { log_level: "foo=bar=baz".to_string(), ..Default::default() };
        assert!(init_logging(&config).is_err());
    }
}
