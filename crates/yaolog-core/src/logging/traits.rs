//! Logger trait definition

use std::sync::Arc;

use super::level::LogLevel;

/// Named, level-gated logging sink
///
/// Implementations:
/// - `TracingLogger`: Emits `tracing` events
/// - `ConsoleLogger`: Logs to stdout/stderr
/// - `FileLogger`: Appends to a shared log file
/// - `MemoryLogger`: Records messages for inspection
/// - `NoOpLogger`: Silent logger
///
/// `log` emits unconditionally; callers consult `is_enabled` (usually through
/// the level policy) before building a message.
pub trait Logger: Send + Sync {
    /// Name this logger was created for (normally a type name)
    fn name(&self) -> &str;

    /// Whether the backend accepts messages at `level`
    fn is_enabled(&self, level: LogLevel) -> bool;

    /// Emit a pre-formatted message
    fn log(&self, level: LogLevel, message: &str);

    fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }
}

/// Type alias for an Arc-wrapped logger
pub type SharedLogger = Arc<dyn Logger>;

/// Creates named loggers for the registry
pub trait LoggerFactory: Send + Sync {
    fn create(&self, name: &str) -> SharedLogger;
}

impl<F> LoggerFactory for F
where
    F: Fn(&str) -> SharedLogger + Send + Sync,
{
    fn create(&self, name: &str) -> SharedLogger {
        self(name)
    }
}

/// Extension trait for logging with format arguments
pub trait LoggerExt: Logger {
    /// Log at `level` only when the backend has it enabled
    fn log_fmt(&self, level: LogLevel, args: std::fmt::Arguments<'_>) {
        if self.is_enabled(level) {
            self.log(level, &args.to_string());
        }
    }

    fn debug_fmt(&self, args: std::fmt::Arguments<'_>) {
        self.log_fmt(LogLevel::Debug, args);
    }

    fn info_fmt(&self, args: std::fmt::Arguments<'_>) {
        self.log_fmt(LogLevel::Info, args);
    }

    fn warn_fmt(&self, args: std::fmt::Arguments<'_>) {
        self.log_fmt(LogLevel::Warn, args);
    }

    fn error_fmt(&self, args: std::fmt::Arguments<'_>) {
        self.log_fmt(LogLevel::Error, args);
    }
}

impl<T: Logger + ?Sized> LoggerExt for T {}

/// Convenience macros for logging through a `Logger` value
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)*) => {
        $crate::logging::LoggerExt::debug_fmt(&*$logger, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)*) => {
        $crate::logging::LoggerExt::info_fmt(&*$logger, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)*) => {
        $crate::logging::LoggerExt::warn_fmt(&*$logger, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)*) => {
        $crate::logging::LoggerExt::error_fmt(&*$logger, format_args!($($arg)*))
    };
}
