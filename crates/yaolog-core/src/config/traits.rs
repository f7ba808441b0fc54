//! Configuration provider trait

use thiserror::Error;

use super::model::LoggingConfig;

/// Errors that can occur while loading or saving configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("Failed to serialize configuration: {0}")]
    Serialize(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration source abstraction
///
/// Implementations:
/// - `MemoryConfigProvider`: In-memory, for tests and programmatic setup
/// - `FileConfigProvider`: YAML file (user or workspace level)
pub trait ConfigProvider: Send + Sync {
    /// Load the current logging configuration
    fn load(&self) -> ConfigResult<LoggingConfig>;

    /// Human-readable description of where the configuration comes from
    fn source(&self) -> String;
}
