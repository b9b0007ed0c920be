//! Service configuration module.
//!
//! This module provides configuration loading for the order-key service from
//! environment variables.
//!
//! # Environment Variables
//!
//! - `ORDERKEY_LISTEN_PORT`: Port to listen on (default: `3000`)
//! - `ORDERKEY_MAX_BATCH_SIZE`: Largest number of keys one request may ask
//!   for (default: `500`)
//!
//! # Invariants
//!
//! - `listen_port` is always a valid port number (1-65535)
//! - `max_batch_size` is at least 1

/// Service configuration.
///
/// # Post-conditions
///
/// - `listen_port` is always in the valid range (1-65535)
/// - `max_batch_size >= 1`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Port to listen on for HTTP requests.
    pub listen_port: u16,
    /// Largest `count` accepted by the append and prepend endpoints.
    pub max_batch_size: usize,
}

/// Error returned when loading configuration fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    InvalidValue { name: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { name, message } => {
                write!(f, "invalid value for {name}: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_port: Self::DEFAULT_PORT,
            max_batch_size: Self::DEFAULT_MAX_BATCH_SIZE,
        }
    }
}

impl ServiceConfig {
    /// Default port for the service.
    pub const DEFAULT_PORT: u16 = 3000;
    /// Default cap on keys per request.
    pub const DEFAULT_MAX_BATCH_SIZE: usize = 500;

    const PORT_VAR: &'static str = "ORDERKEY_LISTEN_PORT";
    const MAX_BATCH_VAR: &'static str = "ORDERKEY_MAX_BATCH_SIZE";

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but not a valid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through a variable lookup function.
    ///
    /// Unset variables fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let listen_port = match lookup(Self::PORT_VAR) {
            Some(value) => Self::parse_listen_port(&value)?,
            None => Self::DEFAULT_PORT,
        };
        let max_batch_size = match lookup(Self::MAX_BATCH_VAR) {
            Some(value) => Self::parse_max_batch_size(&value)?,
            None => Self::DEFAULT_MAX_BATCH_SIZE,
        };
        Ok(Self {
            listen_port,
            max_batch_size,
        })
    }

    fn parse_listen_port(value: &str) -> Result<u16, ConfigError> {
        match value.parse::<u16>() {
            Ok(port) if port > 0 => Ok(port),
            _ => Err(ConfigError::InvalidValue {
                name: Self::PORT_VAR.to_string(),
                message: format!("'{value}' is not a valid port number (must be 1-65535)"),
            }),
        }
    }

    fn parse_max_batch_size(value: &str) -> Result<usize, ConfigError> {
        match value.parse::<usize>() {
            Ok(size) if size > 0 => Ok(size),
            _ => Err(ConfigError::InvalidValue {
                name: Self::MAX_BATCH_VAR.to_string(),
                message: format!("'{value}' is not a positive integer"),
            }),
        }
    }
}
