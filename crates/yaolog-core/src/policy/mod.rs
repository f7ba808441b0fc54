//! Logging decisions: level floor, error classification, auto-verbosity
//!
//! `LoggingPolicy` is built once from a `LoggingConfig` and read on every
//! intercepted call. Only the level floor changes afterwards.

mod classify;
mod level;
mod verbosity;

use std::sync::Arc;

pub use classify::{Classification, ExceptionPolicy};
pub use level::{is_level_enabled, LevelFloor};
pub use verbosity::{VerbosityPolicy, CLIENT_SUFFIX, CONTROLLER_SUFFIX};

use crate::config::LoggingConfig;
use crate::logging::{LogLevel, Logger};
use crate::sites::SiteRegistry;
use crate::types::TypeRegistry;

/// Resolved, ready-to-query logging policy
#[derive(Debug)]
pub struct LoggingPolicy {
    floor: Arc<LevelFloor>,
    log_duration: bool,
    collection_limit: usize,
    profile: String,
    verbosity: VerbosityPolicy,
    exceptions: ExceptionPolicy,
}

impl LoggingPolicy {
    /// Resolve `config` against the registries
    ///
    /// Configuration anomalies (unparsable level, unknown error type names)
    /// are reported to `diagnostics` and skipped. A summary of the resolved
    /// policy is logged at DEBUG.
    pub fn from_config(
        config: &LoggingConfig,
        types: Arc<TypeRegistry>,
        sites: Arc<SiteRegistry>,
        diagnostics: &dyn Logger,
    ) -> Self {
        let floor = Arc::new(LevelFloor::default());
        if let Err(e) = floor.set_from_str(&config.level) {
            crate::log_error!(diagnostics, "Keeping log level {}: {}", floor.get(), e);
        }

        let exceptions = ExceptionPolicy::from_settings(&config.exception, Arc::clone(&types), diagnostics);
        let verbosity = VerbosityPolicy::new(
            config.method.info_controller,
            config.method.info_client,
            sites,
            types,
        );

        let policy = Self {
            floor,
            log_duration: config.method.duration_log,
            collection_limit: config.collection.log_limit,
            profile: config.profile.clone(),
            verbosity,
            exceptions,
        };
        crate::log_debug!(diagnostics, "{}", policy.summary());
        policy
    }

    /// Policy for the default configuration with empty registries
    pub fn with_defaults(diagnostics: &dyn Logger) -> Self {
        Self::from_config(
            &LoggingConfig::default(),
            Arc::new(TypeRegistry::new()),
            Arc::new(SiteRegistry::new()),
            diagnostics,
        )
    }

    fn summary(&self) -> String {
        format!(
            "Logging policy initialized: profile={}, level={}, duration_log={}, info_controller={}, \
             info_client={}, log_limit={}, log_info={:?}, log_warn={:?}, stacktrace_hide={:?}",
            self.profile,
            self.floor.get(),
            self.log_duration,
            self.verbosity.info_controller(),
            self.verbosity.info_client(),
            self.collection_limit,
            self.exceptions.info_types(),
            self.exceptions.warn_types(),
            self.exceptions.stacktrace_hide_types(),
        )
    }

    pub fn floor(&self) -> &Arc<LevelFloor> {
        &self.floor
    }

    pub fn is_level_enabled(&self, logger: &dyn Logger, level: LogLevel) -> bool {
        is_level_enabled(logger, &self.floor, level)
    }

    pub fn log_duration(&self) -> bool {
        self.log_duration
    }

    pub fn collection_limit(&self) -> usize {
        self.collection_limit
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    pub fn verbosity(&self) -> &VerbosityPolicy {
        &self.verbosity
    }

    pub fn exceptions(&self) -> &ExceptionPolicy {
        &self.exceptions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::MemorySink;

    #[test]
    fn test_from_config() {
        let sink = MemorySink::new();
        let diag = sink.logger("yaolog", LogLevel::Debug);

        let types = TypeRegistry::new();
        types.declare("app::NotFound");

        let mut config = LoggingConfig::default();
        config.level = "warn".into();
        config.profile = "prod".into();
        config.method.duration_log = false;
        config.collection.log_limit = 3;
        config.exception.log_info = vec!["app::NotFound".into(), "app::Nope".into()];

        let policy = LoggingPolicy::from_config(
            &config,
            Arc::new(types),
            Arc::new(SiteRegistry::new()),
            diag.as_ref(),
        );

        assert_eq!(policy.floor().get(), LogLevel::Warn);
        assert!(!policy.log_duration());
        assert_eq!(policy.collection_limit(), 3);
        assert_eq!(policy.profile(), "prod");
        assert_eq!(policy.exceptions().info_types(), &["app::NotFound".to_string()]);

        assert_eq!(sink.at_level(LogLevel::Error).len(), 1);
        let debug = sink.at_level(LogLevel::Debug);
        assert_eq!(debug.len(), 1);
        assert!(debug[0].message.contains("profile=prod"));
        assert!(debug[0].message.contains("level=WARN"));
    }

    #[test]
    fn test_bad_level_keeps_default() {
        let sink = MemorySink::new();
        let diag = sink.logger("yaolog", LogLevel::Debug);
        let mut config = LoggingConfig::default();
        config.level = "LOUD".into();

        let policy = LoggingPolicy::from_config(
            &config,
            Arc::new(TypeRegistry::new()),
            Arc::new(SiteRegistry::new()),
            diag.as_ref(),
        );
        assert_eq!(policy.floor().get(), LogLevel::Debug);
        assert!(sink.at_level(LogLevel::Error)[0].message.contains("LOUD"));
    }

    #[test]
    fn test_shared_floor() {
        let policy = LoggingPolicy::with_defaults(&crate::logging::NoOpLogger::new());
        let sink = MemorySink::new();
        let logger = sink.logger("app", LogLevel::Trace);

        assert!(policy.is_level_enabled(logger.as_ref(), LogLevel::Debug));
        policy.floor().set(LogLevel::Error);
        assert!(!policy.is_level_enabled(logger.as_ref(), LogLevel::Warn));
        assert!(policy.is_level_enabled(logger.as_ref(), LogLevel::Error));
    }
}
