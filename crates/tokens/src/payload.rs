//! Claims construction for freshly issued tokens.

use chrono::Utc;
use mockauth_core::{Claims, MAX_TOKEN_EXPIRY_HOURS};
use serde_json::Value;

use crate::{Result, TokenError};

/// Lifetime used when neither the endpoint nor the service sets one.
pub const DEFAULT_TOKEN_EXPIRY_HOURS: f64 = 2.5;

/// Claims the issuer computes itself. An overlay may still replace them.
pub const RESERVED_CLAIMS: [&str; 2] = ["iat", "exp"];

/// Endpoint value first, then the service-wide value, then the default.
pub fn resolve_expiry_hours(endpoint: Option<f64>, service: Option<f64>) -> f64 {
    endpoint.or(service).unwrap_or(DEFAULT_TOKEN_EXPIRY_HOURS)
}

/// Whole seconds in `hours`, rounded to the nearest second.
///
/// Never less than one second, never more than `MAX_TOKEN_EXPIRY_HOURS`.
pub fn expiry_seconds(hours: f64) -> i64 {
    let seconds = (hours.min(MAX_TOKEN_EXPIRY_HOURS) * 3600.0).round();
    if seconds >= 1.0 { seconds as i64 } else { 1 }
}

pub fn now_epoch_seconds() -> i64 {
    Utc::now().timestamp()
}

/// Claims ready for signing, plus the reserved claims an overlay replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct IssuedPayload {
    pub claims: Claims,
    pub overridden: Vec<String>,
}

/// `iat` and `exp` from the clock, then each overlay applied in order.
///
/// Later overlays win on key collisions. The merge is shallow: a nested
/// object in an overlay replaces the earlier value whole.
pub fn build_payload<'a, I>(issued_at: i64, expiry_hours: f64, overlays: I) -> IssuedPayload
where
    I: IntoIterator<Item = &'a Claims>,
{
    let mut claims = Claims::new();
    claims.insert("iat".into(), Value::from(issued_at));
    claims.insert(
        "exp".into(),
        Value::from(issued_at.saturating_add(expiry_seconds(expiry_hours))),
    );

    let mut overridden = Vec::new();
    for overlay in overlays {
        for (key, value) in overlay {
            if RESERVED_CLAIMS.contains(&key.as_str()) && !overridden.contains(key) {
                overridden.push(key.clone());
            }
            claims.insert(key.clone(), value.clone());
        }
    }

    IssuedPayload { claims, overridden }
}

/// Parse a request body into claims to overlay.
///
/// A blank body overlays nothing. Anything else must be a JSON object.
pub fn parse_overlay(body: &[u8]) -> Result<Option<Claims>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(claims)) => Ok(Some(claims)),
        Ok(other) => Err(TokenError::InvalidPayload(format!(
            "expected an object, found {}",
            json_kind(&other)
        ))),
        Err(e) => Err(TokenError::InvalidPayload(e.to_string())),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
