//! In-memory configuration provider

use parking_lot::RwLock;

use super::model::LoggingConfig;
use super::traits::{ConfigProvider, ConfigResult};

/// In-memory configuration provider
#[derive(Debug, Default)]
pub struct MemoryConfigProvider {
    config: RwLock<LoggingConfig>,
}

impl MemoryConfigProvider {
    /// Create a provider holding the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider holding `config`
    pub fn with_config(config: LoggingConfig) -> Self {
        Self {
            config: RwLock::new(config),
        }
    }

    /// Replace the held configuration
    pub fn set(&self, config: LoggingConfig) {
        *self.config.write() = config;
    }

    /// Modify the held configuration in place
    pub fn update(&self, f: impl FnOnce(&mut LoggingConfig)) {
        f(&mut self.config.write());
    }
}

impl ConfigProvider for MemoryConfigProvider {
    fn load(&self) -> ConfigResult<LoggingConfig> {
        Ok(self.config.read().clone())
    }

    fn source(&self) -> String {
        "memory".to_string()
    }
}
