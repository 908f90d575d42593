//! Append-only registry of plaintext secrets and the scrubber built on it.
//!
//! Scrubbing runs on every log call, so the common cases stay allocation
//! free: an empty registry, or a text that carries none of the secrets,
//! hands the input back borrowed.

use std::borrow::Cow;
use std::sync::{RwLock, RwLockReadGuard};

use serde_json::Value;

/// Placeholder substituted for every scrubbed secret.
pub const REDACTION_MARKER: &str = "[REDACTED]";

/// Ordered, grow-only list of values that must never reach a log sink.
#[derive(Default)]
pub struct SecretRegistry {
    secrets: RwLock<Vec<String>>,
}

impl std::fmt::Debug for SecretRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretRegistry")
            .field("secret_count", &self.len())
            .finish()
    }
}

impl SecretRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a secret. Duplicates are kept.
    ///
    /// Returns `false` (and records nothing) for an empty string, which would
    /// otherwise match between every character.
    pub fn register(&self, secret: impl Into<String>) -> bool {
        let secret = secret.into();
        if secret.is_empty() {
            return false;
        }
        self.secrets
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(secret);
        true
    }

    /// Number of registered secrets, duplicates included.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Replace every registered secret in `text` with [`REDACTION_MARKER`].
    pub fn scrub<'a>(&self, text: &'a str) -> Cow<'a, str> {
        self.scrub_with(text, REDACTION_MARKER)
    }

    /// Replace every registered secret in `text` with `marker`.
    ///
    /// Secrets are applied in registration order.
    pub fn scrub_with<'a>(&self, text: &'a str, marker: &str) -> Cow<'a, str> {
        let secrets = self.read();
        let mut scrubbed = Cow::Borrowed(text);
        for secret in secrets.iter() {
            if scrubbed.contains(secret.as_str()) {
                scrubbed = Cow::Owned(scrubbed.replace(secret.as_str(), marker));
            }
        }
        scrubbed
    }

    /// Scrub every string leaf of a JSON value in place, object keys included.
    ///
    /// The shape of the value is left untouched.
    pub fn scrub_value(&self, value: &mut Value) {
        if self.is_empty() {
            return;
        }
        self.scrub_value_inner(value);
    }

    fn scrub_value_inner(&self, value: &mut Value) {
        match value {
            Value::String(s) => {
                if let Cow::Owned(scrubbed) = self.scrub(s) {
                    *s = scrubbed;
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.scrub_value_inner(item);
                }
            }
            Value::Object(map) => {
                let entries = std::mem::take(map);
                *map = entries
                    .into_iter()
                    .map(|(key, mut item)| {
                        self.scrub_value_inner(&mut item);
                        (self.scrub(&key).into_owned(), item)
                    })
                    .collect();
            }
            // A secret spelled as a number or literal becomes a redacted string.
            Value::Null | Value::Bool(_) | Value::Number(_) => {
                let rendered = value.to_string();
                if let Cow::Owned(scrubbed) = self.scrub(&rendered) {
                    *value = Value::String(scrubbed);
                }
            }
        }
    }

    /// Check whether `text` still carries any registered secret.
    pub fn scan_for_leakage(&self, text: &str) -> bool {
        self.read().iter().any(|s| text.contains(s.as_str()))
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<String>> {
        self.secrets.read().unwrap_or_else(|e| e.into_inner())
    }
}
