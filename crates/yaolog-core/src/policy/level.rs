//! Application log-level floor

use std::sync::atomic::{AtomicU8, Ordering};

use crate::error::YaologResult;
use crate::logging::{LogLevel, Logger};

/// Process-wide minimum level, below which nothing is logged
///
/// Read on every intercepted call with a single atomic load; written rarely
/// (startup, administrative changes).
#[derive(Debug)]
pub struct LevelFloor {
    rank: AtomicU8,
}

impl Default for LevelFloor {
    fn default() -> Self {
        Self::new(LogLevel::Debug)
    }
}

impl LevelFloor {
    pub fn new(level: LogLevel) -> Self {
        Self {
            rank: AtomicU8::new(level.rank()),
        }
    }

    pub fn get(&self) -> LogLevel {
        LogLevel::from_rank(self.rank.load(Ordering::Acquire))
    }

    pub fn set(&self, level: LogLevel) {
        self.rank.store(level.rank(), Ordering::Release);
    }

    /// Set the floor from a level name
    ///
    /// A blank value leaves the floor untouched and returns `Ok(None)`; an
    /// unknown name leaves it untouched and returns the parse error.
    pub fn set_from_str(&self, value: &str) -> YaologResult<Option<LogLevel>> {
        if value.trim().is_empty() {
            return Ok(None);
        }
        let level: LogLevel = value.parse()?;
        self.set(level);
        Ok(Some(level))
    }

    /// Whether the floor lets `level` through
    pub fn permits(&self, level: LogLevel) -> bool {
        self.get().rank() <= level.rank()
    }
}

/// A level is enabled when both the backend and the floor allow it
pub fn is_level_enabled(logger: &dyn Logger, floor: &LevelFloor, level: LogLevel) -> bool {
    logger.is_enabled(level) && floor.permits(level)
}
