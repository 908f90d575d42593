//! Error types for the mockauth domain.
//!
//! Uses `thiserror` for ergonomic error definitions. Each crate defines its
//! own bounded-context error; this one covers parsing of the shared domain
//! vocabulary.

use thiserror::Error;

/// Errors raised while interpreting domain values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Unknown method '{0}' (expected GET or POST)")]
    UnknownMethod(String),

    #[error(
        "Unknown behavior '{0}' (expected ISSUE, VERIFY, DECODE, RETURN_OK or RETURN_NOT_AUTHENTICATED)"
    )]
    UnknownBehavior(String),

    #[error("Unknown log level '{0}'")]
    UnknownLevel(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;
