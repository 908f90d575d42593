//! The whole configuration file.

use std::path::{Path, PathBuf};

use mockauth_core::{Claims, MAX_TOKEN_EXPIRY_HOURS, is_valid_expiry_hours};
use serde::{Deserialize, Serialize};

use crate::ConfigError;
use crate::endpoint::EndpointConfig;

/// Root of the YAML configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConfig {
    /// Port to listen on; overrides the command line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listening_port: Option<u16>,

    /// Default token lifetime in hours; overrides the command line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_expiry_hours: Option<f64>,

    /// Claims for ISSUE endpoints that do not carry their own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_payload: Option<Claims>,

    #[serde(default)]
    pub endpoints: Vec<EndpointConfig>,
}

impl ServiceConfig {
    /// Read, parse and validate the file at `path`.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config = parse(&content).map_err(|reason| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason,
        })?;
        tracing::debug!(
            path = %path.display(),
            endpoints = config.endpoints.len(),
            "Loaded configuration"
        );

        config.validate()?;
        Ok(config)
    }

    /// Parse and validate configuration text.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let config = parse(content).map_err(|reason| ConfigError::ParseError {
            path: PathBuf::from("<inline>"),
            reason,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::SerializeError(e.to_string()))
    }

    /// Write this configuration to `path`, replacing whatever is there.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_yaml_string()?;
        std::fs::write(path, content).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// File-level checks. Endpoint entries are validated separately.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.listening_port == Some(0) {
            return Err(ConfigError::ValidationError(
                "listeningPort must be between 1 and 65535".into(),
            ));
        }

        if let Some(hours) = self.token_expiry_hours {
            if !is_valid_expiry_hours(hours) {
                return Err(ConfigError::ValidationError(format!(
                    "tokenExpiryHours must be a positive number up to {MAX_TOKEN_EXPIRY_HOURS}, got {hours}"
                )));
            }
        }

        Ok(())
    }

    /// The file's port, else `fallback`.
    pub fn listening_port_or(&self, fallback: u16) -> u16 {
        self.listening_port.unwrap_or(fallback)
    }

    /// The file's default lifetime, else `fallback`.
    pub fn token_expiry_hours_or(&self, fallback: f64) -> f64 {
        self.token_expiry_hours.unwrap_or(fallback)
    }
}

/// An empty or comment-only document is an empty configuration.
fn parse(content: &str) -> Result<ServiceConfig, String> {
    let blank = content
        .lines()
        .map(str::trim)
        .all(|line| line.is_empty() || line.starts_with('#'));
    if blank {
        return Ok(ServiceConfig::default());
    }
    serde_yaml::from_str(content).map_err(|e| e.to_string())
}
