//! # mockauth core
//!
//! Domain types shared by every mockauth crate: log severities, endpoint
//! methods and behaviors, and the claims map carried inside tokens.
//! This crate has **no framework dependencies**; the log substrate, the
//! token engine and the gateway all depend inward on it.

pub mod endpoint;
pub mod expiry;
pub mod error;
pub mod level;

pub use endpoint::{Behavior, Method};
pub use error::{Error, Result};
pub use expiry::{MAX_TOKEN_EXPIRY_HOURS, is_valid_expiry_hours};
pub use level::LogLevel;

/// The claims map carried inside a token: `iat`, `exp` and any extra claims.
pub type Claims = serde_json::Map<String, serde_json::Value>;
