//! # mockauth tokens
//!
//! The token lifecycle: building claims for a fresh token, signing them
//! with the shared HS256 secret, verifying presented tokens and decoding
//! them without trust.
//!
//! The secret is registered for log redaction the moment a
//! [`SigningSecret`] is built, before any key material exists.

pub mod bearer;
pub mod payload;
pub mod signing;

pub use bearer::bearer_token;
pub use payload::{
    DEFAULT_TOKEN_EXPIRY_HOURS, IssuedPayload, RESERVED_CLAIMS, build_payload, expiry_seconds,
    now_epoch_seconds, parse_overlay, resolve_expiry_hours,
};
pub use signing::{SigningSecret, decode_unverified};

use thiserror::Error;

/// Everything that can go wrong while issuing or reading a token.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Signing secret must not be empty")]
    EmptySecret,

    #[error("Token signature does not match")]
    InvalidSignature,

    #[error("Token has expired")]
    Expired,

    #[error("Malformed token: {0}")]
    Malformed(String),

    #[error("Payload must be a JSON object: {0}")]
    InvalidPayload(String),

    #[error("Failed to sign token: {0}")]
    Signing(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                TokenError::InvalidSignature
            }
            ErrorKind::MissingRequiredClaim(claim) => {
                TokenError::Malformed(format!("missing required claim `{claim}`"))
            }
            _ => TokenError::Malformed(e.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, TokenError>;
