//! # Configuration Management
//!
//! Centralized configuration for services that issue connection identities.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()` / `from_toml()`
//! - Environment variables via `from_env()`
//! - Direct instantiation with defaults
//!
//! ## Example
//! ```toml
//! [server]
//! ip = "0.0.0.0"
//! port = 9000
//!
//! [allocator]
//! start = 1000000000
//! max_live_ids = 1000000
//!
//! [logging]
//! app_name = "connection-identity"
//! log_level = "info"
//! json_format = false
//! ```

use crate::error::{IdentityError, Result};
use crate::identity::address::{ip_to_u32, Address, LocalAddressResolver};
use crate::identity::allocator::{DEFAULT_MAX_LIVE_IDS, ID_FLOOR};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, Level};

/// Upper bound accepted for `allocator.max_live_ids`.
///
/// Keeps the live set a small fraction of the `u32::MAX - ID_FLOOR` id space
/// so allocation never has to scan far for a free id.
pub const MAX_LIVE_IDS_CEILING: usize = 100_000_000;

/// Top-level configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct IdentityConfig {
    /// Server endpoint advertised in tokens
    #[serde(default)]
    pub server: ServerConfig,

    /// Id allocator settings
    #[serde(default)]
    pub allocator: AllocatorConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl IdentityConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| IdentityError::ConfigError(format!("Failed to read config file: {e}")))?;

        debug!(path = %path.display(), "Loaded identity configuration file");
        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| IdentityError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables on top of the defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Override fields from `CONNECTION_IDENTITY_*` environment variables
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(ip) = std::env::var("CONNECTION_IDENTITY_SERVER_IP") {
            self.server.ip = ip;
        }

        if let Ok(port) = std::env::var("CONNECTION_IDENTITY_SERVER_PORT") {
            self.server.port = port.parse::<u16>().map_err(|e| {
                IdentityError::ConfigError(format!("Invalid CONNECTION_IDENTITY_SERVER_PORT: {e}"))
            })?;
        }

        if let Ok(limit) = std::env::var("CONNECTION_IDENTITY_MAX_LIVE_IDS") {
            self.allocator.max_live_ids = limit.parse::<usize>().map_err(|e| {
                IdentityError::ConfigError(format!("Invalid CONNECTION_IDENTITY_MAX_LIVE_IDS: {e}"))
            })?;
        }

        if let Ok(level) = std::env::var("CONNECTION_IDENTITY_LOG_LEVEL") {
            self.logging.log_level = level.parse::<Level>().map_err(|_| {
                IdentityError::ConfigError(format!("Invalid CONNECTION_IDENTITY_LOG_LEVEL: {level}"))
            })?;
        }

        Ok(())
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| IdentityError::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)
            .map_err(|e| IdentityError::ConfigError(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Resolve the server endpoint, consulting `resolver` for an unspecified ip
    pub fn server_address(&self, resolver: &dyn LocalAddressResolver) -> Result<Address> {
        Address::server(&self.server.ip, self.server.port, resolver)
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        errors.extend(self.server.validate());
        errors.extend(self.allocator.validate());
        errors.extend(self.logging.validate());
        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(IdentityError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

/// Server endpoint configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ServerConfig {
    /// IPv4 address to advertise; empty or "0.0.0.0" asks the resolver
    pub ip: String,

    /// Listening port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: String::from("0.0.0.0"),
            port: 9000,
        }
    }
}

impl ServerConfig {
    /// Whether the ip must be filled in by an outbound-address resolver
    pub fn needs_resolver(&self) -> bool {
        let ip = self.ip.trim();
        ip.is_empty() || ip == "0.0.0.0"
    }

    /// Validate server configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.needs_resolver() && ip_to_u32(self.ip.trim()).is_err() {
            errors.push(format!(
                "Invalid server ip: '{}' (expected dotted quad such as '10.0.0.1')",
                self.ip
            ));
        }

        if self.port == 0 {
            errors.push("Server port must be greater than 0".to_string());
        }

        errors
    }
}

/// Id allocator configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct AllocatorConfig {
    /// Initial counter value; values at or below the floor are clamped
    pub start: u32,

    /// Live id count above which the allocator logs a warning
    pub max_live_ids: usize,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            start: ID_FLOOR,
            max_live_ids: DEFAULT_MAX_LIVE_IDS,
        }
    }
}

impl AllocatorConfig {
    /// Validate allocator configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.max_live_ids == 0 {
            errors.push("Max live ids must be greater than 0".to_string());
        } else if self.max_live_ids > MAX_LIVE_IDS_CEILING {
            errors.push(format!(
                "Max live ids too large: {} (maximum: {MAX_LIVE_IDS_CEILING})",
                self.max_live_ids
            ));
        }

        errors
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Application name for logs
    pub app_name: String,

    /// Log level
    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    /// Whether to use JSON formatting for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("connection-identity"),
            log_level: Level::INFO,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Validate logging configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.app_name.is_empty() {
            errors.push("Application name cannot be empty".to_string());
        } else if self.app_name.len() > 64 {
            errors.push(format!(
                "Application name too long: {} characters (maximum: 64)",
                self.app_name.len()
            ));
        }

        errors
    }
}

/// Helper module for tracing::Level serialization/deserialization
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let level_str = match *level {
            Level::TRACE => "trace",
            Level::DEBUG => "debug",
            Level::INFO => "info",
            Level::WARN => "warn",
            Level::ERROR => "error",
        };
        level_str.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level_str = String::deserialize(deserializer)?;
        Level::from_str(&level_str)
            .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {level_str}")))
    }
}
