//! Leveled, multi-sink logging for mockauth.
//!
//! Every message goes through the [`SecretRegistry`](mockauth_security::SecretRegistry)
//! owned by the [`Logger`] before any sink sees it. Sinks each carry their own
//! severity window; the logger fans a message out to every sink that accepts
//! its level, concurrently, and a failing sink never silences the others.

pub mod console;
pub mod file;
pub mod fs;
pub mod logger;
pub mod memory;
pub mod message;
pub mod sink;

pub use console::ConsoleSink;
pub use file::{FileSink, FileSinkOptions};
pub use logger::{Logger, LoggerConfig};
pub use memory::{LogRecord, MemorySink};
pub use message::{LogArg, render_message};
pub use sink::{LevelWindow, LogSink};

use std::path::PathBuf;

/// Errors raised by log sinks.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("Failed to create log file at {path}: {reason}")]
    Create { path: PathBuf, reason: String },

    #[error("Not a file: {0}")]
    NotAFile(PathBuf),

    #[error("Failed to write to {sink}: {reason}")]
    Write { sink: String, reason: String },
}
