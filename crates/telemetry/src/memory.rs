//! In-memory sink that keeps every accepted message.
//! Useful for tests and for anything that needs to inspect the log.

use std::sync::Mutex;

use async_trait::async_trait;
use mockauth_core::LogLevel;

use crate::SinkError;
use crate::message::{LogArg, render_message};
use crate::sink::{LevelWindow, LogSink};

/// One message as a sink saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub level: LogLevel,
    pub header: String,
    pub message: String,
}

impl LogRecord {
    /// Header and message as they would appear on one line.
    pub fn line(&self) -> String {
        format!("{}{}", self.header, self.message)
    }
}

#[derive(Debug, Default)]
pub struct MemorySink {
    window: LevelWindow,
    records: Mutex<Vec<LogRecord>>,
}

impl MemorySink {
    /// Memory sink accepting every level.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_window(window: LevelWindow) -> Self {
        Self {
            window,
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Records at exactly `level`.
    pub fn records_at(&self, level: LogLevel) -> Vec<LogRecord> {
        self.records()
            .into_iter()
            .filter(|r| r.level == level)
            .collect()
    }

    /// True when any recorded line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.records().iter().any(|r| r.line().contains(needle))
    }

    pub fn count(&self) -> usize {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[async_trait]
impl LogSink for MemorySink {
    fn name(&self) -> &str {
        "memory"
    }

    fn window(&self) -> LevelWindow {
        self.window
    }

    async fn write(&self, level: LogLevel, header: &str, args: &[LogArg]) -> Result<(), SinkError> {
        let record = LogRecord {
            level,
            header: header.to_string(),
            message: render_message(args),
        };
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_and_filters() {
        let sink = MemorySink::new();
        sink.write(LogLevel::Info, "[I] ", &["one".into()])
            .await
            .unwrap();
        sink.write(LogLevel::Warning, "[W] ", &["two".into()])
            .await
            .unwrap();

        assert_eq!(sink.count(), 2);
        assert_eq!(sink.records_at(LogLevel::Warning).len(), 1);
        assert_eq!(sink.records()[0].line(), "[I] one");
        assert!(sink.contains("two"));
        assert!(!sink.contains("three"));
    }
}
