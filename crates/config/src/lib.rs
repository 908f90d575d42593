//! Configuration loading and validation for mockauth.
//!
//! The service reads one YAML file describing the listening port, the
//! default token lifetime and claims, and the list of endpoints to mount.
//! Endpoint entries are kept loose on load and validated one by one, so a
//! bad entry is skipped without rejecting the rest of the file.

pub mod endpoint;
pub mod service;
pub mod template;

pub use endpoint::{EndpointConfig, EndpointError, EndpointSpec};
pub use service::ServiceConfig;
pub use template::{DEFAULT_CONFIG_FILE, TEMPLATE, write_template};

use std::path::PathBuf;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("Failed to write config file at {path}: {reason}")]
    WriteError { path: PathBuf, reason: String },

    #[error("Failed to serialize configuration: {0}")]
    SerializeError(String),
}
