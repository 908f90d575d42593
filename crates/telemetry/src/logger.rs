//! The logger: header construction, scrubbing, and sink fan-out.

use std::sync::{Arc, RwLock};

use futures::future::join_all;
use mockauth_core::LogLevel;
use mockauth_security::SecretRegistry;

use crate::console::ConsoleSink;
use crate::message::LogArg;
use crate::sink::LogSink;

/// Source tag of the default configuration.
pub const DEFAULT_SOURCE: &str = "global";

/// The active logging setup: a source tag and the ordered sinks.
#[derive(Clone)]
pub struct LoggerConfig {
    pub source: String,
    pub sinks: Vec<Arc<dyn LogSink>>,
}

impl std::fmt::Debug for LoggerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sinks: Vec<&str> = self.sinks.iter().map(|s| s.name()).collect();
        f.debug_struct("LoggerConfig")
            .field("source", &self.source)
            .field("sinks", &sinks)
            .finish()
    }
}

impl LoggerConfig {
    pub fn new(source: impl Into<String>, sinks: Vec<Arc<dyn LogSink>>) -> Self {
        Self {
            source: source.into(),
            sinks,
        }
    }
}

impl Default for LoggerConfig {
    /// Console at INFO and above, source `global`.
    fn default() -> Self {
        Self::new(DEFAULT_SOURCE, vec![Arc::new(ConsoleSink::default())])
    }
}

/// Leveled logger that scrubs registered secrets before any sink sees a
/// message.
///
/// Created once at startup and shared as `Arc<Logger>`. The configuration
/// can be replaced wholesale; the secret registry is fixed for the logger's
/// life and only grows.
pub struct Logger {
    config: RwLock<Arc<LoggerConfig>>,
    secrets: Arc<SecretRegistry>,
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("config", &self.config())
            .field("secrets", &self.secrets)
            .finish()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(LoggerConfig::default(), Arc::new(SecretRegistry::new()))
    }
}

impl Logger {
    pub fn new(config: LoggerConfig, secrets: Arc<SecretRegistry>) -> Self {
        Self {
            config: RwLock::new(Arc::new(config)),
            secrets,
        }
    }

    /// The redaction registry this logger scrubs against.
    pub fn secrets(&self) -> &Arc<SecretRegistry> {
        &self.secrets
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> Arc<LoggerConfig> {
        self.config
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Replace the whole configuration. Calls already in flight finish
    /// against the configuration they started with.
    pub fn set_config(&self, config: LoggerConfig) {
        *self.config.write().unwrap_or_else(|e| e.into_inner()) = Arc::new(config);
    }

    /// `[LEVEL  ]  [SOURCE ]:  ` for the current source tag.
    pub fn header(&self, level: LogLevel) -> String {
        format_header(level, &self.config().source)
    }

    /// Scrub `args`, then hand them to every sink whose window holds `level`.
    ///
    /// Sinks are driven concurrently. A sink error is reported on the
    /// diagnostic channel and never reaches the caller.
    pub async fn log<I>(&self, level: LogLevel, args: I)
    where
        I: IntoIterator<Item = LogArg>,
    {
        let config = self.config();
        let header = self
            .secrets
            .scrub(&format_header(level, &config.source))
            .into_owned();
        let args: Vec<LogArg> = args
            .into_iter()
            .map(|arg| arg.scrubbed(&self.secrets))
            .collect();

        let header = header.as_str();
        let args = args.as_slice();
        let writes = config
            .sinks
            .iter()
            .filter(|sink| sink.accepts(level))
            .map(|sink| async move {
                if let Err(e) = sink.write(level, header, args).await {
                    let reason = self.secrets.scrub(&e.to_string()).into_owned();
                    tracing::warn!(sink = sink.name(), error = %reason, "Log sink failed");
                }
            });
        join_all(writes).await;
    }

    pub async fn debug<I: IntoIterator<Item = LogArg>>(&self, args: I) {
        self.log(LogLevel::Debug, args).await
    }

    pub async fn verbose<I: IntoIterator<Item = LogArg>>(&self, args: I) {
        self.log(LogLevel::Verbose, args).await
    }

    pub async fn info<I: IntoIterator<Item = LogArg>>(&self, args: I) {
        self.log(LogLevel::Info, args).await
    }

    pub async fn warning<I: IntoIterator<Item = LogArg>>(&self, args: I) {
        self.log(LogLevel::Warning, args).await
    }

    pub async fn error<I: IntoIterator<Item = LogArg>>(&self, args: I) {
        self.log(LogLevel::Error, args).await
    }

    pub async fn critical<I: IntoIterator<Item = LogArg>>(&self, args: I) {
        self.log(LogLevel::Critical, args).await
    }

    pub async fn fatal<I: IntoIterator<Item = LogArg>>(&self, args: I) {
        self.log(LogLevel::Fatal, args).await
    }
}

fn format_header(level: LogLevel, source: &str) -> String {
    format!("[{level:<7}]  [{source:<7}]:  ")
}
