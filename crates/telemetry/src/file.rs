//! Append-only log file sink.
//!
//! Each process run gets its own file. When the requested path already holds
//! a file from an earlier run, the new log is created next to it under a
//! timestamped name instead, so nothing is ever overwritten.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use mockauth_core::LogLevel;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::SinkError;
use crate::fs;
use crate::message::{LogArg, render_message};
use crate::sink::{LevelWindow, LogSink};

/// Settings for [`FileSink::create_with`].
#[derive(Debug, Clone, Copy)]
pub struct FileSinkOptions {
    pub window: LevelWindow,
    /// Prefix every line with `[<ISO-8601 timestamp>]  `.
    pub prepend_timestamp: bool,
}

impl Default for FileSinkOptions {
    fn default() -> Self {
        Self {
            window: LevelWindow::all(),
            prepend_timestamp: true,
        }
    }
}

/// Writes one line per message to a file created for this run.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    options: FileSinkOptions,
    file: Mutex<tokio::fs::File>,
}

impl FileSink {
    /// Create the log file with default options.
    pub async fn create(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        Self::create_with(path, FileSinkOptions::default()).await
    }

    /// Create the log file, naming it aside if `path` is already taken.
    ///
    /// Fails when the file cannot be created or is not a regular file
    /// afterwards.
    pub async fn create_with(
        path: impl AsRef<Path>,
        options: FileSinkOptions,
    ) -> Result<Self, SinkError> {
        let requested = path.as_ref();
        let path = if fs::is_file(requested).await {
            aside_path(requested, Utc::now())
        } else {
            requested.to_path_buf()
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| SinkError::Create {
                    path: path.clone(),
                    reason: e.to_string(),
                })?;
        }

        let file = tokio::fs::OpenOptions::new()
            .append(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| SinkError::Create {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        if !fs::is_file(&path).await {
            return Err(SinkError::NotAFile(path));
        }

        Ok(Self {
            path,
            options,
            file: Mutex::new(file),
        })
    }

    /// Where this run's log actually lives.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl LogSink for FileSink {
    fn name(&self) -> &str {
        "logfile"
    }

    fn window(&self) -> LevelWindow {
        self.options.window
    }

    async fn write(&self, _level: LogLevel, header: &str, args: &[LogArg]) -> Result<(), SinkError> {
        let mut line = String::new();
        if self.options.prepend_timestamp {
            line.push('[');
            line.push_str(&iso_timestamp(Utc::now()));
            line.push_str("]  ");
        }
        line.push_str(header);
        line.push_str(&render_message(args));
        line.push('\n');

        let mut file = self.file.lock().await;
        let result = match file.write_all(line.as_bytes()).await {
            Ok(()) => file.flush().await,
            Err(e) => Err(e),
        };
        result.map_err(|e| SinkError::Write {
            sink: self.path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `logs/run.log` → `logs/run__2024-05-01T12_00_00_000Z.log`.
fn aside_path(path: &Path, at: DateTime<Utc>) -> PathBuf {
    let stamp = iso_timestamp(at).replace([':', '.'], "_");
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}__{stamp}.{}", ext.to_string_lossy()),
        None => format!("{stem}__{stamp}"),
    };
    path.with_file_name(name)
}
