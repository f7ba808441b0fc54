//! Logging configuration model

use serde::{Deserialize, Serialize};

use crate::value::DEFAULT_COLLECTION_LIMIT;

/// Complete logging configuration
///
/// ```yaml
/// level: INFO
/// profile: prod
/// exception:
///   log_info: [repo::NotFound]
///   log_warn: [http::ClientError]
///   stacktrace_hide: [repo::NotFound]
/// method:
///   duration_log: true
///   info_controller: true
///   info_client: false
/// collection:
///   log_limit: 10
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Application log level floor
    pub level: String,
    /// Environment / profile label, diagnostic only
    pub profile: String,
    pub exception: ExceptionSettings,
    pub method: MethodSettings,
    pub collection: CollectionSettings,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "DEBUG".to_string(),
            profile: "UNSET".to_string(),
            exception: ExceptionSettings::default(),
            method: MethodSettings::default(),
            collection: CollectionSettings::default(),
        }
    }
}

/// Error type names with non-default handling
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExceptionSettings {
    /// Logged at INFO instead of ERROR (e.g. not-found errors)
    pub log_info: Vec<String>,
    /// Logged at WARN instead of ERROR
    pub log_warn: Vec<String>,
    /// Logged as a one-line digest without causes
    pub stacktrace_hide: Vec<String>,
}

/// Per-method narration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MethodSettings {
    /// Log elapsed time of every narrated call
    pub duration_log: bool,
    /// Narrate `*Controller` receivers at INFO
    pub info_controller: bool,
    /// Narrate `*Client` receivers at INFO
    pub info_client: bool,
}

impl Default for MethodSettings {
    fn default() -> Self {
        Self {
            duration_log: true,
            info_controller: true,
            info_client: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionSettings {
    /// Sequences longer than this are logged as a summary
    pub log_limit: usize,
}

impl Default for CollectionSettings {
    fn default() -> Self {
        Self {
            log_limit: DEFAULT_COLLECTION_LIMIT,
        }
    }
}
