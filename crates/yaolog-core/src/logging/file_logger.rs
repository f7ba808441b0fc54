//! File-backed logger
//!
//! All loggers created from one `FileSink` append to the same file, one line
//! per message. Useful when stderr/stdout isn't visible (daemons, embedded
//! hosts).

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use parking_lot::Mutex;

use super::level::LogLevel;
use super::traits::{Logger, SharedLogger};

/// Shared append-only log file
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileSink {
    /// Open (or create) the log file at `path` for appending
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Arc<Self>> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Arc::new(Self {
            path,
            file: Mutex::new(file),
        }))
    }

    /// Default log file location (`yaolog.log` in the temp dir)
    pub fn default_path() -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push("yaolog.log");
        path
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Truncate the log file
    pub fn clear(&self) -> io::Result<()> {
        let file = File::create(&self.path)?;
        drop(file);
        let fresh = OpenOptions::new().create(true).append(true).open(&self.path)?;
        *self.file.lock() = fresh;
        Ok(())
    }

    /// Factory for the logger registry
    pub fn factory(sink: &Arc<FileSink>, min_level: LogLevel) -> impl Fn(&str) -> SharedLogger + Send + Sync {
        let sink = Arc::clone(sink);
        move |name: &str| -> SharedLogger {
            Arc::new(FileLogger::new(name, Arc::clone(&sink), min_level))
        }
    }

    fn write(&self, level: LogLevel, name: &str, message: &str) {
        let timestamp = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| {
                let secs = d.as_secs();
                let millis = d.subsec_millis();
                let hours = (secs % 86400) / 3600;
                let mins = (secs % 3600) / 60;
                let secs = secs % 60;
                format!("{:02}:{:02}:{:02}.{:03}", hours, mins, secs, millis)
            })
            .unwrap_or_else(|_| "??:??:??.???".to_string());

        let mut file = self.file.lock();
        let _ = writeln!(file, "[{}] [{:5}] [{}] {}", timestamp, level, name, message);
        let _ = file.flush();
    }
}

/// Logger writing to a `FileSink`
#[derive(Debug, Clone)]
pub struct FileLogger {
    name: String,
    sink: Arc<FileSink>,
    min_level: LogLevel,
}

impl FileLogger {
    pub fn new(name: impl Into<String>, sink: Arc<FileSink>, min_level: LogLevel) -> Self {
        Self {
            name: name.into(),
            sink,
            min_level,
        }
    }
}

impl Logger for FileLogger {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    fn log(&self, level: LogLevel, message: &str) {
        self.sink.write(level, &self.name, message);
    }
}
