//! Log call arguments and their rendering.

use std::borrow::Cow;
use std::fmt;

use mockauth_security::SecretRegistry;
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};

/// One argument of a log call.
///
/// Text is written as-is; structured values are rendered as JSON indented by
/// four spaces. Both kinds are scrubbed before any sink sees them.
#[derive(Debug, Clone, PartialEq)]
pub enum LogArg {
    Text(String),
    Json(Value),
}

impl LogArg {
    /// Capture any serializable value as a structured argument.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => LogArg::Json(value),
            Err(e) => LogArg::Text(format!("<unserializable: {e}>")),
        }
    }

    /// Capture a value through its `Debug` representation.
    pub fn debug<T: fmt::Debug + ?Sized>(value: &T) -> Self {
        LogArg::Text(format!("{value:?}"))
    }

    /// Return the argument with every registered secret replaced.
    pub fn scrubbed(self, secrets: &SecretRegistry) -> Self {
        match self {
            LogArg::Text(text) if secrets.scan_for_leakage(&text) => {
                LogArg::Text(secrets.scrub(&text).into_owned())
            }
            LogArg::Text(text) => LogArg::Text(text),
            LogArg::Json(mut value) => {
                secrets.scrub_value(&mut value);
                LogArg::Json(value)
            }
        }
    }

    pub fn render(&self) -> Cow<'_, str> {
        match self {
            LogArg::Text(text) => Cow::Borrowed(text),
            LogArg::Json(value) => Cow::Owned(pretty_json(value)),
        }
    }
}

impl fmt::Display for LogArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<&str> for LogArg {
    fn from(text: &str) -> Self {
        LogArg::Text(text.to_string())
    }
}

impl From<String> for LogArg {
    fn from(text: String) -> Self {
        LogArg::Text(text)
    }
}

impl From<&String> for LogArg {
    fn from(text: &String) -> Self {
        LogArg::Text(text.clone())
    }
}

impl From<Value> for LogArg {
    fn from(value: Value) -> Self {
        LogArg::Json(value)
    }
}

/// Concatenate rendered arguments into one message.
pub fn render_message(args: &[LogArg]) -> String {
    args.iter().map(LogArg::render).collect()
}

fn pretty_json(value: &Value) -> String {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    match value.serialize(&mut serializer) {
        Ok(()) => String::from_utf8(buf).unwrap_or_else(|_| value.to_string()),
        Err(_) => value.to_string(),
    }
}
