//! In-memory logger that records every message

use std::sync::Arc;

use parking_lot::Mutex;

use super::level::LogLevel;
use super::traits::{Logger, SharedLogger};

/// A single captured message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Name of the logger that emitted the message
    pub logger: String,
    pub level: LogLevel,
    pub message: String,
}

/// Shared record buffer for `MemoryLogger`s
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<LogRecord>>,
}

impl MemorySink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Create a logger recording into this sink
    pub fn logger(self: &Arc<Self>, name: &str, min_level: LogLevel) -> SharedLogger {
        Arc::new(MemoryLogger {
            name: name.to_string(),
            min_level,
            sink: Arc::clone(self),
        })
    }

    /// Factory for the logger registry
    pub fn factory(sink: &Arc<MemorySink>, min_level: LogLevel) -> impl Fn(&str) -> SharedLogger + Send + Sync {
        let sink = Arc::clone(sink);
        move |name: &str| sink.logger(name, min_level)
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().clone()
    }

    /// Messages only, in emission order
    pub fn messages(&self) -> Vec<String> {
        self.records.lock().iter().map(|r| r.message.clone()).collect()
    }

    /// Records emitted at exactly `level`
    pub fn at_level(&self, level: LogLevel) -> Vec<LogRecord> {
        self.records
            .lock()
            .iter()
            .filter(|r| r.level == level)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }

    fn push(&self, record: LogRecord) {
        self.records.lock().push(record);
    }
}

/// Logger recording into a `MemorySink`
#[derive(Debug)]
pub struct MemoryLogger {
    name: String,
    min_level: LogLevel,
    sink: Arc<MemorySink>,
}

impl Logger for MemoryLogger {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    fn log(&self, level: LogLevel, message: &str) {
        self.sink.push(LogRecord {
            logger: self.name.clone(),
            level,
            message: message.to_string(),
        });
    }
}
