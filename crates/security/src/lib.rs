//! Security module for mockauth: the secret registry that every log line
//! passes through.
//!
//! Provides:
//! - **Registration**: secrets are appended as soon as they are known
//!   (the signing key, most importantly) and never removed
//! - **Scrubbing**: literal replacement of every registered secret with a
//!   redaction marker, for plain text and for structured JSON values
//! - **Leakage detection**: check whether a string still carries a secret

pub mod secrets;

pub use secrets::{REDACTION_MARKER, SecretRegistry};
