//! Console logger implementation

use std::sync::Arc;

use super::level::LogLevel;
use super::traits::{Logger, SharedLogger};

/// A logger that outputs to the console (stdout/stderr)
#[derive(Debug, Clone)]
pub struct ConsoleLogger {
    name: String,
    prefix: String,
    min_level: LogLevel,
}

impl ConsoleLogger {
    /// Create a console logger with the default prefix
    pub fn new(name: impl Into<String>, min_level: LogLevel) -> Self {
        Self {
            name: name.into(),
            prefix: "[yaolog]".to_string(),
            min_level,
        }
    }

    /// Create a console logger with a custom prefix
    pub fn with_prefix(name: impl Into<String>, prefix: impl Into<String>, min_level: LogLevel) -> Self {
        Self {
            name: name.into(),
            prefix: prefix.into(),
            min_level,
        }
    }

    /// Factory for the logger registry
    pub fn factory(min_level: LogLevel) -> impl Fn(&str) -> SharedLogger + Send + Sync {
        move |name: &str| -> SharedLogger { Arc::new(ConsoleLogger::new(name, min_level)) }
    }
}

impl Logger for ConsoleLogger {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Info => println!("{} {:5} {}: {}", self.prefix, level, self.name, message),
            _ => eprintln!("{} {:5} {}: {}", self.prefix, level, self.name, message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_logger_creation() {
        let logger = ConsoleLogger::new("app::Service", LogLevel::Info);
        assert_eq!(logger.prefix, "[yaolog]");
        assert_eq!(logger.name(), "app::Service");

        let custom = ConsoleLogger::with_prefix("app::Service", "[MyApp]", LogLevel::Debug);
        assert_eq!(custom.prefix, "[MyApp]");
    }

    #[test]
    fn test_console_logger_levels() {
        let logger = ConsoleLogger::new("app", LogLevel::Warn);
        assert!(!logger.is_enabled(LogLevel::Info));
        assert!(logger.is_enabled(LogLevel::Warn));
        assert!(logger.is_enabled(LogLevel::Error));

        // Just verify emitting doesn't panic
        logger.warn("warn message");
        logger.error("error message");
    }
}
