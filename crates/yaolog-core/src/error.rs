//! Error types for the interception engine

use thiserror::Error;

use crate::config::ConfigError;

/// Errors raised by the engine's own bookkeeping
///
/// None of these ever reach an intercepted call: the orchestrator reports them
/// through the default logger and carries on.
#[derive(Error, Debug)]
pub enum YaologError {
    #[error("Unknown log level: {0:?}")]
    UnknownLevel(String),

    #[error("Unknown type: {0}")]
    UnknownType(String),

    #[error("Could not unwrap proxy {proxy}: {message}")]
    Unwrap { proxy: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("A global interceptor is already installed")]
    AlreadyInstalled,

    #[error("Logging panicked: {0}")]
    Panicked(String),

    #[error("{0}")]
    Other(String),
}

impl YaologError {
    /// Create an unwrap error for the given proxy type
    pub fn unwrap_failed(proxy: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unwrap {
            proxy: proxy.into(),
            message: message.into(),
        }
    }
}

pub type YaologResult<T> = Result<T, YaologError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = YaologError::UnknownLevel("LOUD".to_string());
        assert_eq!(err.to_string(), "Unknown log level: \"LOUD\"");

        let err = YaologError::unwrap_failed("app::Proxy", "detached");
        assert_eq!(err.to_string(), "Could not unwrap proxy app::Proxy: detached");
    }
}
