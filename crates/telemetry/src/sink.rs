//! The sink trait and severity windows.

use async_trait::async_trait;
use mockauth_core::LogLevel;

use crate::SinkError;
use crate::message::LogArg;

/// Inclusive range of levels a sink accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelWindow {
    pub min: LogLevel,
    pub max: LogLevel,
}

impl LevelWindow {
    pub const fn new(min: LogLevel, max: LogLevel) -> Self {
        Self { min, max }
    }

    /// Everything from `min` up to and including `FATAL`.
    pub const fn at_least(min: LogLevel) -> Self {
        Self::new(min, LogLevel::Fatal)
    }

    /// Every level.
    pub const fn all() -> Self {
        Self::new(LogLevel::Debug, LogLevel::Fatal)
    }

    pub fn contains(&self, level: LogLevel) -> bool {
        self.min <= level && level <= self.max
    }
}

impl Default for LevelWindow {
    fn default() -> Self {
        Self::all()
    }
}

/// A log destination.
///
/// Sinks receive arguments that are already scrubbed. A sink reports its own
/// failures through the returned error; the logger contains them.
#[async_trait]
pub trait LogSink: Send + Sync {
    /// Short name used when reporting sink failures.
    fn name(&self) -> &str;

    fn window(&self) -> LevelWindow;

    fn accepts(&self, level: LogLevel) -> bool {
        self.window().contains(level)
    }

    async fn write(&self, level: LogLevel, header: &str, args: &[LogArg]) -> Result<(), SinkError>;
}
