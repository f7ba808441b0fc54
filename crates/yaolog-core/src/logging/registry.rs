//! Per-type logger cache

use std::sync::Arc;

use dashmap::DashMap;

use super::traits::{LoggerFactory, SharedLogger};
use crate::target::Target;
use crate::types::TypeIdentity;

/// Name of the logger used for the engine's own diagnostics and for
/// subject-less calls
pub const DEFAULT_LOGGER_NAME: &str = "yaolog";

/// What a logger is requested for
#[derive(Clone)]
pub enum Subject {
    /// A type: loggers are cached per type name
    Type(TypeIdentity),
    /// An existing handle, returned as-is
    Logger(SharedLogger),
    /// No subject: the default logger
    Default,
}

impl Subject {
    pub fn of<T: ?Sized>() -> Self {
        Subject::Type(TypeIdentity::of::<T>())
    }

    /// Subject for the type of `value`
    pub fn of_val<T: ?Sized>(value: &T) -> Self {
        Subject::Type(TypeIdentity::of_val(value))
    }

    /// Subject for a call receiver, using its runtime type identity
    pub fn of_target(target: &dyn Target) -> Self {
        Subject::Type(target.type_identity())
    }
}

impl std::fmt::Debug for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Subject::Type(ty) => f.debug_tuple("Type").field(ty).finish(),
            Subject::Logger(logger) => f.debug_tuple("Logger").field(&logger.name()).finish(),
            Subject::Default => f.write_str("Default"),
        }
    }
}

impl From<TypeIdentity> for Subject {
    fn from(ty: TypeIdentity) -> Self {
        Subject::Type(ty)
    }
}

impl From<&TypeIdentity> for Subject {
    fn from(ty: &TypeIdentity) -> Self {
        Subject::Type(ty.clone())
    }
}

impl From<&'static str> for Subject {
    fn from(name: &'static str) -> Self {
        Subject::Type(TypeIdentity::named(name))
    }
}

impl From<SharedLogger> for Subject {
    fn from(logger: SharedLogger) -> Self {
        Subject::Logger(logger)
    }
}

impl<T: Into<Subject>> From<Option<T>> for Subject {
    fn from(subject: Option<T>) -> Self {
        subject.map_or(Subject::Default, Into::into)
    }
}

/// Lookup-or-create cache of loggers, one per type name
///
/// Entries live for the lifetime of the registry. Creation goes through the
/// map's entry API, so concurrent first requests for the same name create a
/// single logger.
pub struct LoggerRegistry {
    factory: Box<dyn LoggerFactory>,
    loggers: DashMap<String, SharedLogger>,
    default_logger: SharedLogger,
}

impl LoggerRegistry {
    pub fn new(factory: impl LoggerFactory + 'static) -> Self {
        let default_logger = factory.create(DEFAULT_LOGGER_NAME);
        Self {
            factory: Box::new(factory),
            loggers: DashMap::new(),
            default_logger,
        }
    }

    /// Registry backed by `tracing`
    pub fn tracing() -> Self {
        Self::new(super::TracingLogger::factory())
    }

    pub fn get(&self, subject: impl Into<Subject>) -> SharedLogger {
        match subject.into() {
            Subject::Logger(logger) => logger,
            Subject::Default => Arc::clone(&self.default_logger),
            Subject::Type(ty) => self.named(ty.name()),
        }
    }

    /// Logger for an arbitrary name
    pub fn named(&self, name: &str) -> SharedLogger {
        if let Some(logger) = self.loggers.get(name) {
            return Arc::clone(logger.value());
        }
        let entry = self
            .loggers
            .entry(name.to_string())
            .or_insert_with(|| self.factory.create(name));
        Arc::clone(entry.value())
    }

    /// Logger for the engine's own diagnostics
    pub fn default_logger(&self) -> &SharedLogger {
        &self.default_logger
    }

    /// Number of cached per-type loggers
    pub fn len(&self) -> usize {
        self.loggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loggers.is_empty()
    }
}

impl std::fmt::Debug for LoggerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggerRegistry")
            .field("loggers", &self.loggers.len())
            .field("default_logger", &self.default_logger.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    use crate::logging::{LogLevel, MemorySink, NoOpLogger};

    struct Checkout;

    #[test]
    fn test_subject_resolution() {
        let sink = MemorySink::new();
        let registry = LoggerRegistry::new(MemorySink::factory(&sink, LogLevel::Debug));

        assert_eq!(registry.get(Subject::Default).name(), DEFAULT_LOGGER_NAME);
        assert_eq!(registry.get(None::<&'static str>).name(), DEFAULT_LOGGER_NAME);
        assert!(registry.get(Subject::of::<Checkout>()).name().ends_with("Checkout"));
        assert!(registry.get(Subject::of_val(&Checkout)).name().ends_with("Checkout"));
        assert_eq!(registry.get("app::Billing").name(), "app::Billing");

        let own: SharedLogger = Arc::new(NoOpLogger::new());
        assert!(Arc::ptr_eq(&registry.get(Arc::clone(&own)), &own));
    }

    #[test]
    fn test_same_type_same_logger() {
        let registry = LoggerRegistry::new(|name: &str| -> SharedLogger {
            let _ = name;
            Arc::new(NoOpLogger::new())
        });
        let first = registry.get(Subject::of::<Checkout>());
        let second = registry.get(Subject::of::<Checkout>());
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_concurrent_creation_is_single() {
        let created = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&created);
        let sink = MemorySink::new();
        let registry = Arc::new(LoggerRegistry::new(move |name: &str| {
            if name != DEFAULT_LOGGER_NAME {
                counter.fetch_add(1, Ordering::SeqCst);
            }
            sink.logger(name, LogLevel::Debug)
        }));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || registry.get("app::Hot"))
            })
            .collect();
        let loggers: Vec<SharedLogger> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(created.load(Ordering::SeqCst), 1);
        assert!(loggers.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
    }
}
