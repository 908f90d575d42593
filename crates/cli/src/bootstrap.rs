//! Startup plumbing: secret resolution, verbosity, logging sinks, and the
//! configuration path.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use mockauth_config::DEFAULT_CONFIG_FILE;
use mockauth_core::{LogLevel, MAX_TOKEN_EXPIRY_HOURS, is_valid_expiry_hours};
use mockauth_telemetry::logger::DEFAULT_SOURCE;
use mockauth_telemetry::{ConsoleSink, FileSink, LogSink, Logger, LoggerConfig, SinkError};

/// Development signing secret used when none is configured.
pub const DEFAULT_TOKEN_SECRET: &str =
    "c1961b41ab86697270ce5060d381cbbce720a756968b3f1817ea93714772a866";

/// The configured secret, or the development one. The flag is `true` when
/// the fallback was used.
pub fn resolve_secret(configured: Option<String>) -> (String, bool) {
    match configured {
        Some(secret) => (secret, false),
        None => (DEFAULT_TOKEN_SECRET.to_string(), true),
    }
}

/// `-V` flags win; without any, `VERBOSITY` from the environment applies.
pub fn effective_verbosity(flags: u8, env: Option<&str>) -> u8 {
    if flags > 0 {
        return flags;
    }
    env.and_then(|v| v.trim().parse().ok()).unwrap_or(0)
}

pub fn parse_positive_hours(value: &str) -> Result<f64, String> {
    let hours: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("`{value}` is not a number"))?;
    if is_valid_expiry_hours(hours) {
        Ok(hours)
    } else {
        Err(format!(
            "expiry must be a positive number of hours up to {MAX_TOKEN_EXPIRY_HOURS}, got {value}"
        ))
    }
}

/// Console at the verbosity's level, plus a fresh log file when requested.
///
/// Replaces the logger's configuration only once every sink exists.
pub async fn init_logging(
    logger: &Logger,
    verbosity: u8,
    log_file: Option<&Path>,
) -> Result<(), SinkError> {
    let mut sinks: Vec<Arc<dyn LogSink>> =
        vec![Arc::new(ConsoleSink::new(LogLevel::from_verbosity(verbosity)))];

    if let Some(path) = log_file {
        let sink = FileSink::create(path).await?;
        tracing::debug!(path = %sink.path().display(), "Log file created");
        sinks.push(Arc::new(sink));
    }

    logger.set_config(LoggerConfig::new(DEFAULT_SOURCE, sinks));
    Ok(())
}

/// The configuration path to use. Without one, `./config.yml` is assumed
/// and a warning says so.
pub async fn config_path(configured: Option<&Path>, logger: &Logger) -> PathBuf {
    if let Some(path) = configured {
        return path.to_path_buf();
    }

    let path = std::path::absolute(DEFAULT_CONFIG_FILE)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
    logger
        .warning([
            "Config file not specified, assuming default:  ".into(),
            path.display().to_string().into(),
        ])
        .await;
    path
}
