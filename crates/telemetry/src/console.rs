//! Console sink: WARNING and above to stderr, the rest to stdout.

use std::io::Write;
use std::sync::Mutex;

use async_trait::async_trait;
use mockauth_core::LogLevel;

use crate::SinkError;
use crate::message::{LogArg, render_message};
use crate::sink::{LevelWindow, LogSink};

type Stream = Mutex<Box<dyn Write + Send>>;

/// Writes one line per message to the standard streams.
pub struct ConsoleSink {
    window: LevelWindow,
    out: Stream,
    err: Stream,
}

impl std::fmt::Debug for ConsoleSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleSink")
            .field("window", &self.window)
            .finish()
    }
}

impl ConsoleSink {
    /// Console sink accepting `min` and everything above it.
    pub fn new(min: LogLevel) -> Self {
        Self::with_window(LevelWindow::at_least(min))
    }

    pub fn with_window(window: LevelWindow) -> Self {
        Self::with_writers(
            window,
            Box::new(std::io::stdout()),
            Box::new(std::io::stderr()),
        )
    }

    /// Console sink over arbitrary writers, standing in for stdout and stderr.
    pub fn with_writers(
        window: LevelWindow,
        out: Box<dyn Write + Send>,
        err: Box<dyn Write + Send>,
    ) -> Self {
        Self {
            window,
            out: Mutex::new(out),
            err: Mutex::new(err),
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new(LogLevel::Info)
    }
}

#[async_trait]
impl LogSink for ConsoleSink {
    fn name(&self) -> &str {
        "console"
    }

    fn window(&self) -> LevelWindow {
        self.window
    }

    async fn write(&self, level: LogLevel, header: &str, args: &[LogArg]) -> Result<(), SinkError> {
        let line = format!("{header}{}\n", render_message(args));
        let stream = if level >= LogLevel::Warning {
            &self.err
        } else {
            &self.out
        };

        // Short blocking write; the lock keeps each line whole across tasks.
        let mut writer = stream.lock().unwrap_or_else(|e| e.into_inner());
        writer
            .write_all(line.as_bytes())
            .and_then(|()| writer.flush())
            .map_err(|e| SinkError::Write {
                sink: "console".into(),
                reason: e.to_string(),
            })
    }
}
