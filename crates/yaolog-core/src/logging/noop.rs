//! No-op logger implementation

use super::level::LogLevel;
use super::traits::Logger;

/// A logger that does nothing
///
/// Reports every level as disabled, so the interceptor skips message
/// construction entirely.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpLogger;

impl NoOpLogger {
    /// Create a new no-op logger
    pub fn new() -> Self {
        Self
    }
}

impl Logger for NoOpLogger {
    fn name(&self) -> &str {
        "noop"
    }

    fn is_enabled(&self, _level: LogLevel) -> bool {
        false
    }

    fn log(&self, _level: LogLevel, _message: &str) {}
}
