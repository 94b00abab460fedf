//! Structured logging setup.
//!
//! Installs a global `tracing-subscriber` fmt subscriber configured from
//! [`LoggingConfig`]. Library code only emits events through `tracing`;
//! calling [`init_logging`] is up to the embedding binary or test.

use tracing_subscriber::fmt;

use crate::config::LoggingConfig;
use crate::error::{IdentityError, Result};

/// Install the global subscriber.
///
/// Fails with [`IdentityError::ConfigError`] if a global subscriber is
/// already set; use [`try_init_logging`] when that is expected.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let builder = fmt()
        .with_max_level(config.log_level)
        .with_target(true);

    let installed = if config.json_format {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| IdentityError::ConfigError(format!("Failed to install logger: {e}")))?;
    tracing::info!(app = %config.app_name, level = %config.log_level, "Logging initialized");
    Ok(())
}

/// Like [`init_logging`] but ignores an already-installed subscriber.
///
/// Returns `true` if this call installed it.
pub fn try_init_logging(config: &LoggingConfig) -> bool {
    init_logging(config).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_rejected() {
        let config = LoggingConfig::default();
        // another test in this binary may already have installed one
        let _ = try_init_logging(&config);
        assert!(init_logging(&config).is_err());
        assert!(!try_init_logging(&config));
    }
}
