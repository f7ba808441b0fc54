//! Tracing library adapter implementation

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use super::level::LogLevel;
use super::traits::{Logger, SharedLogger};

/// Logger implementation that delegates to the `tracing` crate
///
/// Every event carries a `logger` field with the name the handle was created
/// for, so subscribers can filter or group per intercepted type. Enablement is
/// answered by the installed subscriber.
#[derive(Debug, Clone)]
pub struct TracingLogger {
    name: String,
}

impl TracingLogger {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Factory for the logger registry
    pub fn factory() -> impl Fn(&str) -> SharedLogger + Send + Sync {
        |name: &str| -> SharedLogger { Arc::new(TracingLogger::new(name)) }
    }
}

impl Logger for TracingLogger {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_enabled(&self, level: LogLevel) -> bool {
        match level {
            LogLevel::Trace => tracing::enabled!(tracing::Level::TRACE),
            LogLevel::Debug => tracing::enabled!(tracing::Level::DEBUG),
            LogLevel::Info => tracing::enabled!(tracing::Level::INFO),
            LogLevel::Warn => tracing::enabled!(tracing::Level::WARN),
            LogLevel::Error => tracing::enabled!(tracing::Level::ERROR),
        }
    }

    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Trace => tracing::trace!(logger = %self.name, "{}", message),
            LogLevel::Debug => tracing::debug!(logger = %self.name, "{}", message),
            LogLevel::Info => tracing::info!(logger = %self.name, "{}", message),
            LogLevel::Warn => tracing::warn!(logger = %self.name, "{}", message),
            LogLevel::Error => tracing::error!(logger = %self.name, "{}", message),
        }
    }
}

/// Install a global `tracing` fmt subscriber
///
/// `filter` uses `EnvFilter` syntax (e.g. `"info,app=debug"`); `RUST_LOG`
/// takes precedence when set. Returns false if a subscriber was already
/// installed.
pub fn init_tracing(filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok()
}
