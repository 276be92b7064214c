// config.rs - Parser defaults and limits

use crate::address::Transport;
use crate::{MAX_BODY_LENGTH, MAX_HEADERS, MAX_HEADER_LENGTH};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Port filled in when an address or URI does not carry one.
pub const DEFAULT_PORT: u16 = 5060;

/// Transport filled in when an address or URI does not name one.
pub const DEFAULT_TRANSPORT: Transport = Transport::Udp;

/// Host used when converting a URI without a host into a socket address.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Largest message accepted by `parse_message`.
pub const MAX_MESSAGE_LENGTH: usize = MAX_HEADER_LENGTH + MAX_BODY_LENGTH;

lazy_static! {
    static ref DEFAULT_CONFIG: ParserConfig = ParserConfig::default();
}

/// Configuration shared by every parser in the crate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Port used when none is given
    pub default_port: u16,

    /// Transport used when none is given
    pub default_transport: Transport,

    /// Host used when a URI has none
    pub default_host: String,

    /// Maximum accepted message size in bytes
    pub max_message_length: usize,

    /// Maximum number of headers in one block
    pub max_headers: usize,

    /// Fail `parse_message` when the blank line before the body is missing
    pub strict_body: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            default_port: DEFAULT_PORT,
            default_transport: DEFAULT_TRANSPORT,
            default_host: DEFAULT_HOST.to_string(),
            max_message_length: MAX_MESSAGE_LENGTH,
            max_headers: MAX_HEADERS,
            strict_body: false,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config value: {0}")]
    Value(String),
}

impl ParserConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: ParserConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_port == 0 {
            return Err(ConfigError::Value("default_port must be positive".to_string()));
        }
        if self.default_host.is_empty() {
            return Err(ConfigError::Value("default_host must not be empty".to_string()));
        }
        if self.max_headers == 0 {
            return Err(ConfigError::Value("max_headers must be positive".to_string()));
        }
        Ok(())
    }

    /// Default port rendered the way it appears on the wire.
    pub fn default_port_str(&self) -> String {
        self.default_port.to_string()
    }
}

/// Process-wide configuration used by the entry points without a `_with` suffix.
pub fn default_config() -> &'static ParserConfig {
    &DEFAULT_CONFIG
}
