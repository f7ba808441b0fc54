//! Configuration model and providers
//!
//! Supports multiple configuration sources:
//! - `MemoryConfigProvider`: In-memory, for tests and programmatic setup
//! - `FileConfigProvider`: YAML file-based (user/workspace level)

mod file;
mod memory;
mod model;
mod traits;

pub use file::{ConfigLevel, FileConfigProvider};
pub use memory::MemoryConfigProvider;
pub use model::{CollectionSettings, ExceptionSettings, LoggingConfig, MethodSettings};
pub use traits::{ConfigError, ConfigProvider, ConfigResult};
