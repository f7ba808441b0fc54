//! Logging backends and the per-type logger registry

mod console;
mod file_logger;
mod level;
mod memory;
mod noop;
mod registry;
mod tracing_adapter;
mod traits;

pub use console::ConsoleLogger;
pub use file_logger::{FileLogger, FileSink};
pub use level::LogLevel;
pub use memory::{LogRecord, MemoryLogger, MemorySink};
pub use noop::NoOpLogger;
pub use registry::{LoggerRegistry, Subject, DEFAULT_LOGGER_NAME};
pub use tracing_adapter::{init_tracing, TracingLogger};
pub use traits::{Logger, LoggerExt, LoggerFactory, SharedLogger};
