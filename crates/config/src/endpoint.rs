//! One endpoint entry, as written and as validated.

use mockauth_core::{Behavior, Claims, MAX_TOKEN_EXPIRY_HOURS, Method, is_valid_expiry_hours};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An endpoint entry exactly as it appears in the file.
///
/// Every field is optional here; [`EndpointConfig::validate`] decides
/// whether the entry can be mounted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub behavior: Option<String>,

    /// Lifetime of tokens issued here, in hours.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_expiry_hours: Option<f64>,

    /// Use the JSON request body as the token claims.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_post_body_for_jwt_payload: Option<bool>,

    /// Claims to issue when the body is not used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_payload: Option<Value>,
}

/// A validated endpoint, ready to compile.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointSpec {
    pub path: String,
    pub method: Method,
    pub behavior: Behavior,
    pub token_expiry_hours: Option<f64>,
    pub use_post_body_for_jwt_payload: bool,
    pub default_payload: Option<Claims>,
}

/// Why an endpoint entry cannot be mounted.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EndpointError {
    #[error("path not specified")]
    MissingPath,

    #[error("method not specified ({})", Method::ALL.map(Method::as_str).join(", "))]
    MissingMethod,

    #[error("behavior not specified ({})", Behavior::ALL.map(Behavior::as_str).join(", "))]
    MissingBehavior,

    #[error("unknown method `{0}`")]
    UnknownMethod(String),

    #[error("unknown behavior `{0}`")]
    UnknownBehavior(String),

    #[error("invalid path `{path}`: {reason}")]
    InvalidPath { path: String, reason: &'static str },

    #[error("tokenExpiryHours must be a positive number up to {MAX_TOKEN_EXPIRY_HOURS}, got {0}")]
    InvalidExpiry(f64),

    #[error("defaultPayload must be a mapping")]
    InvalidPayload,
}

impl EndpointConfig {
    /// Check the entry and produce its typed form.
    ///
    /// Path, method and behavior are checked for presence first, in that
    /// order, then for content.
    pub fn validate(&self) -> Result<EndpointSpec, EndpointError> {
        let path = self
            .path
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or(EndpointError::MissingPath)?;
        let method = self.method.as_deref().ok_or(EndpointError::MissingMethod)?;
        let behavior = self
            .behavior
            .as_deref()
            .ok_or(EndpointError::MissingBehavior)?;

        let method: Method = method
            .parse()
            .map_err(|_| EndpointError::UnknownMethod(method.to_string()))?;
        let behavior: Behavior = behavior
            .parse()
            .map_err(|_| EndpointError::UnknownBehavior(behavior.to_string()))?;
        check_path(path)?;

        if let Some(hours) = self.token_expiry_hours {
            if !is_valid_expiry_hours(hours) {
                return Err(EndpointError::InvalidExpiry(hours));
            }
        }

        let default_payload = match &self.default_payload {
            None => None,
            Some(Value::Object(claims)) => Some(claims.clone()),
            Some(_) => return Err(EndpointError::InvalidPayload),
        };

        Ok(EndpointSpec {
            path: path.to_string(),
            method,
            behavior,
            token_expiry_hours: self.token_expiry_hours,
            use_post_body_for_jwt_payload: self.use_post_body_for_jwt_payload.unwrap_or(false),
            default_payload,
        })
    }
}

/// Only literal paths are mountable: parameter and wildcard segments would
/// change routing semantics.
fn check_path(path: &str) -> Result<(), EndpointError> {
    let invalid = |reason| {
        Err(EndpointError::InvalidPath {
            path: path.to_string(),
            reason,
        })
    };

    if !path.starts_with('/') {
        return invalid("must start with `/`");
    }
    for segment in path.split('/') {
        if segment.starts_with(':') || segment.starts_with('*') {
            return invalid("parameter and wildcard segments are not supported");
        }
        if segment.contains(['{', '}']) {
            return invalid("braces are not allowed");
        }
    }
    Ok(())
}
