//! Around-style interception of calls
//!
//! `Interceptor::around` narrates one call: an entry line with the
//! parameters, an exit line with the return value (or a classified error
//! line), and the elapsed time. What gets logged, and at which level, comes
//! from the `LoggingPolicy`.
//!
//! The logging itself never changes the outcome of the call: a panic raised
//! while building or emitting a message is caught and reported through the
//! default logger.

use std::any::Any;
use std::convert::Infallible;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use crate::call::CallDescriptor;
use crate::config::{ConfigProvider, LoggingConfig};
use crate::error::{YaologError, YaologResult};
use crate::logging::{LogLevel, Logger, LoggerRegistry, SharedLogger, Subject};
use crate::policy::LoggingPolicy;
use crate::safety::{method_duration_message, replace_new_line, throwable_message};
use crate::sites::SiteRegistry;
use crate::target::{resolve_real_target, Target};
use crate::throwable::Throwable;
use crate::types::{TypeIdentity, TypeRegistry};
use crate::value::{reduce, render_list, LogValue, ToLogValue};

/// Placeholder for suppressed parameters and return values
pub const NOT_LOGGED: &str = "{Not logged by design.}";

/// Prefix of the line logged when a call fails
pub const METHOD_EXIT_WITH_ERROR: &str = "Could not ";

/// Narrates intercepted calls according to a `LoggingPolicy`
#[derive(Debug)]
pub struct Interceptor {
    policy: LoggingPolicy,
    loggers: LoggerRegistry,
}

impl Interceptor {
    pub fn new(policy: LoggingPolicy, loggers: LoggerRegistry) -> Self {
        Self { policy, loggers }
    }

    /// Build the policy from `config`, reporting anomalies through the
    /// registry's default logger
    pub fn from_config(
        config: &LoggingConfig,
        types: Arc<TypeRegistry>,
        sites: Arc<SiteRegistry>,
        loggers: LoggerRegistry,
    ) -> Self {
        let policy = LoggingPolicy::from_config(config, types, sites, loggers.default_logger().as_ref());
        Self::new(policy, loggers)
    }

    pub fn from_provider(
        provider: &dyn ConfigProvider,
        types: Arc<TypeRegistry>,
        sites: Arc<SiteRegistry>,
        loggers: LoggerRegistry,
    ) -> YaologResult<Self> {
        let config = provider.load()?;
        crate::log_debug!(loggers.default_logger().as_ref(), "Loaded logging configuration from {}", provider.source());
        Ok(Self::from_config(&config, types, sites, loggers))
    }

    /// Default configuration, empty registries, `tracing` backend
    pub fn with_defaults() -> Self {
        Self::from_config(
            &LoggingConfig::default(),
            Arc::new(TypeRegistry::new()),
            Arc::new(SiteRegistry::new()),
            LoggerRegistry::tracing(),
        )
    }

    pub fn policy(&self) -> &LoggingPolicy {
        &self.policy
    }

    pub fn loggers(&self) -> &LoggerRegistry {
        &self.loggers
    }

    pub fn logger(&self, subject: impl Into<Subject>) -> SharedLogger {
        self.loggers.get(subject)
    }

    pub fn application_log_level(&self) -> LogLevel {
        self.policy.floor().get()
    }

    pub fn set_application_log_level(&self, level: LogLevel) {
        self.policy.floor().set(level);
    }

    /// Set the level floor from its name
    ///
    /// Blank and unknown names leave the floor unchanged; unknown names are
    /// reported through the default logger.
    pub fn set_application_log_level_str(&self, value: &str) {
        let diagnostics = self.loggers.default_logger().as_ref();
        match self.policy.floor().set_from_str(value) {
            Ok(Some(level)) => crate::log_debug!(diagnostics, "Application log level set to {}", level),
            Ok(None) => {}
            Err(e) => crate::log_error!(diagnostics, "Keeping log level {}: {}", self.application_log_level(), e),
        }
    }

    pub fn is_level_enabled(&self, logger: &dyn Logger, level: LogLevel) -> bool {
        self.policy.is_level_enabled(logger, level)
    }

    /// Run `proceed` once, narrating the call described by `call`
    ///
    /// The result of `proceed` is returned unchanged. The duration line is
    /// also emitted when `proceed` panics.
    pub fn around<R, E, F>(&self, call: CallDescriptor<'_>, proceed: F) -> Result<R, E>
    where
        R: ToLogValue,
        E: Throwable,
        F: FnOnce() -> Result<R, E>,
    {
        let narration = self.enter(&call);
        let result = proceed();
        if let Some(narration) = narration.as_ref() {
            self.exit(narration, &result);
        }
        result
    }

    /// `around` for calls that cannot fail
    pub fn around_value<R, F>(&self, call: CallDescriptor<'_>, proceed: F) -> R
    where
        R: ToLogValue,
        F: FnOnce() -> R,
    {
        match self.around(call, || Ok::<R, Infallible>(proceed())) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// `around` for an asynchronous call
    ///
    /// `future` is awaited once, in the caller's task. If the returned future
    /// is dropped before completion the duration line is still emitted.
    pub async fn around_async<R, E, Fut>(&self, call: CallDescriptor<'_>, future: Fut) -> Result<R, E>
    where
        R: ToLogValue,
        E: Throwable,
        Fut: Future<Output = Result<R, E>>,
    {
        let narration = self.enter(&call);
        let result = future.await;
        if let Some(narration) = narration.as_ref() {
            self.exit(narration, &result);
        }
        result
    }

    fn enter<'i>(&'i self, call: &CallDescriptor<'_>) -> Option<Narration<'i>> {
        let mut narration = self.guarded("prepare method entry", || self.prepare(call))??;
        let logged = self.guarded("log method entry", || {
            narration
                .logger
                .log(narration.level, &format!("Method entry: {}", narration.description));
        });
        if logged.is_some() && self.policy.log_duration() {
            narration.start = Some(Instant::now());
        }
        Some(narration)
    }

    fn prepare<'i>(&'i self, call: &CallDescriptor<'_>) -> Option<Narration<'i>> {
        let diagnostics = self.loggers.default_logger();
        let real = resolve_real_target(call.target(), diagnostics.as_ref());
        let real_type = real.type_identity();
        let logger = self.loggers.get(&real_type);

        let verbosity = self.policy.verbosity();
        let info = self.is_level_enabled(logger.as_ref(), LogLevel::Info)
            && verbosity.should_narrate_at_info(call, &real_type);
        let debug = self.is_level_enabled(logger.as_ref(), LogLevel::Debug);
        let level = if info {
            LogLevel::Info
        } else if debug {
            LogLevel::Debug
        } else {
            return None;
        };

        let signature = signature(call, real, &real_type);
        let hide_parameters = verbosity.suppress_parameters(call, &real_type);
        let description = describe(call, &signature, hide_parameters, self.policy.collection_limit());
        Some(Narration {
            interceptor: self,
            logger,
            level,
            signature,
            description,
            hide_return_value: verbosity.suppress_return_value(call, &real_type),
            start: None,
        })
    }

    fn exit<R: ToLogValue, E: Throwable>(&self, narration: &Narration<'_>, result: &Result<R, E>) {
        match result {
            Ok(value) => {
                self.guarded("log method exit", || {
                    let rendered = if narration.hide_return_value {
                        NOT_LOGGED.to_string()
                    } else {
                        reduce(&value.to_log_value(), self.policy.collection_limit()).to_string()
                    };
                    let message = format!("Method exit: {}; return value: {}", narration.signature, rendered);
                    narration.logger.log(narration.level, &replace_new_line(&message));
                });
            }
            Err(err) => {
                self.guarded("log method error", || self.log_failure(narration, err));
            }
        }
    }

    fn log_failure<E: Throwable + ?Sized>(&self, narration: &Narration<'_>, err: &E) {
        let logger = narration.logger.as_ref();
        let classification = self
            .policy
            .exceptions()
            .classify(&err.class_name(), |level| self.is_level_enabled(logger, level));
        let Some(level) = classification.level else {
            return;
        };

        let message = if classification.hide_stack_trace {
            replace_new_line(&format!("{}{}: {}", METHOD_EXIT_WITH_ERROR, narration.description, err))
        } else {
            throwable_message(&format!("{}{}", METHOD_EXIT_WITH_ERROR, narration.description), err)
        };
        logger.log(level, &message);
    }

    /// Run one step of the logging logic, reporting a panic instead of
    /// propagating it
    pub(crate) fn guarded<T>(&self, step: &str, f: impl FnOnce() -> T) -> Option<T> {
        match panic::catch_unwind(AssertUnwindSafe(f)) {
            Ok(value) => Some(value),
            Err(payload) => {
                self.report_fault(step, &YaologError::Panicked(panic_message(payload.as_ref())));
                None
            }
        }
    }

    fn report_fault(&self, step: &str, err: &YaologError) {
        let diagnostics = self.loggers.default_logger();
        let _ = panic::catch_unwind(AssertUnwindSafe(|| {
            diagnostics.error(&throwable_message(&format!("{}{}", METHOD_EXIT_WITH_ERROR, step), err));
        }));
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Method name, qualified with the declaring type when the receiver is a
/// proxy that could not be unwrapped
fn signature(call: &CallDescriptor<'_>, real: &dyn Target, real_type: &TypeIdentity) -> String {
    if real.is_proxy() {
        let declaring = call.declaring_type().unwrap_or(real_type);
        format!("{}::{}", declaring.name(), call.method())
    } else {
        call.method().to_string()
    }
}

/// `<sig>[; parameter names- [..]][; parameters- [..]]`, line-safe
fn describe(call: &CallDescriptor<'_>, signature: &str, hide_parameters: bool, limit: usize) -> String {
    let mut out = String::from(signature);
    if !call.parameter_names().is_empty() {
        out.push_str("; parameter names- [");
        out.push_str(&call.parameter_names().join(", "));
        out.push(']');
    }
    if !call.arguments().is_empty() {
        out.push_str("; parameters- ");
        if hide_parameters {
            out.push_str(NOT_LOGGED);
        } else {
            let reduced: Vec<LogValue> = call
                .arguments()
                .iter()
                .map(|arg| reduce(&arg.to_log_value(), limit))
                .collect();
            out.push_str(&render_list(&reduced));
        }
    }
    replace_new_line(&out)
}

/// State of one narrated call, from entry to the duration line
///
/// Dropping it emits the duration line, which covers normal completion,
/// errors, panics in the call and cancelled futures alike. The line is
/// written under `guarded`, so a backend that panics here (even while the
/// call itself is unwinding) is reported on the default logger and never
/// propagated out of `drop`.
struct Narration<'i> {
    interceptor: &'i Interceptor,
    logger: SharedLogger,
    level: LogLevel,
    signature: String,
    description: String,
    hide_return_value: bool,
    start: Option<Instant>,
}

impl Drop for Narration<'_> {
    fn drop(&mut self) {
        if !self.interceptor.policy.log_duration() {
            return;
        }
        let interceptor = self.interceptor;
        interceptor.guarded("log method duration", || {
            self.logger
                .log(self.level, &method_duration_message(&self.signature, self.start));
        });
    }
}

/// A value whose calls go through an `Interceptor`
///
/// The wrapper is itself a proxy `Target`, so log lines carry the wrapped
/// type's name and logger.
///
/// ```
/// use std::sync::Arc;
/// use yaolog_core::{Intercepted, Interceptor, Target};
///
/// struct InvoiceClient;
/// impl Target for InvoiceClient {}
///
/// impl InvoiceClient {
///     fn total(&self, ids: &[u32]) -> u32 {
///         ids.iter().sum()
///     }
/// }
///
/// let client = Intercepted::new(InvoiceClient, Arc::new(Interceptor::with_defaults()));
/// let ids = [1, 2, 3];
/// let total = client.invoke_value("total", &[("ids", &ids)], |inner| inner.total(&ids));
/// assert_eq!(total, 6);
/// ```
pub struct Intercepted<T> {
    inner: T,
    interceptor: Arc<Interceptor>,
}

impl<T: Target> Intercepted<T> {
    pub fn new(inner: T, interceptor: Arc<Interceptor>) -> Self {
        Self { inner, interceptor }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    pub fn into_inner(self) -> T {
        self.inner
    }

    pub fn interceptor(&self) -> &Arc<Interceptor> {
        &self.interceptor
    }

    fn describe<'a>(&'a self, method: &'a str, params: &[(&'a str, &'a dyn ToLogValue)]) -> CallDescriptor<'a> {
        params
            .iter()
            .fold(CallDescriptor::new(self, method), |call, (name, value)| {
                call.param(*name, *value)
            })
    }

    /// Call `f` on the wrapped value through the interceptor
    pub fn invoke<R, E, F>(&self, method: &str, params: &[(&str, &dyn ToLogValue)], f: F) -> Result<R, E>
    where
        R: ToLogValue,
        E: Throwable,
        F: FnOnce(&T) -> Result<R, E>,
    {
        self.interceptor
            .around(self.describe(method, params), || f(&self.inner))
    }

    pub fn invoke_value<R, F>(&self, method: &str, params: &[(&str, &dyn ToLogValue)], f: F) -> R
    where
        R: ToLogValue,
        F: FnOnce(&T) -> R,
    {
        self.interceptor
            .around_value(self.describe(method, params), || f(&self.inner))
    }

    pub async fn invoke_async<'a, R, E, F, Fut>(
        &'a self,
        method: &'a str,
        params: &[(&'a str, &'a dyn ToLogValue)],
        f: F,
    ) -> Result<R, E>
    where
        R: ToLogValue,
        E: Throwable,
        F: FnOnce(&'a T) -> Fut,
        Fut: Future<Output = Result<R, E>>,
    {
        let call = self.describe(method, params);
        self.interceptor.around_async(call, f(&self.inner)).await
    }
}

impl<T: Target> Target for Intercepted<T> {
    fn type_identity(&self) -> TypeIdentity {
        TypeIdentity::of::<Self>()
    }

    fn is_proxy(&self) -> bool {
        true
    }

    fn advised_target(&self) -> YaologResult<Option<&dyn Target>> {
        Ok(Some(&self.inner))
    }
}

impl<T> std::fmt::Debug for Intercepted<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Intercepted")
            .field("inner", &std::any::type_name::<T>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;
    use std::time::Duration;

    use thiserror::Error;

    use crate::logging::{MemorySink, NoOpLogger, DEFAULT_LOGGER_NAME};
    use crate::safety::NEW_LINE_MARKER;
    use crate::sites::HideLogElements;

    struct UserController;
    impl Target for UserController {}

    impl UserController {
        fn foo(&self, a: i32, b: i32) -> i32 {
            a + b
        }
    }

    struct UserService;
    impl Target for UserService {}

    #[derive(Debug, Error)]
    enum RepoError {
        #[error("user {0} not found")]
        NotFound(u64),
        #[error("query failed")]
        Query(#[source] std::io::Error),
    }

    impl Throwable for RepoError {
        fn class_name(&self) -> Cow<'_, str> {
            match self {
                RepoError::NotFound(_) => "repo::NotFound".into(),
                RepoError::Query(_) => "repo::Query".into(),
            }
        }
    }

    /// Proxy whose target can never be reached
    struct SealedProxy;

    impl Target for SealedProxy {
        fn is_proxy(&self) -> bool {
            true
        }

        fn advised_target(&self) -> YaologResult<Option<&dyn Target>> {
            Err(YaologError::unwrap_failed("SealedProxy", "target source closed"))
        }
    }

    trait UserApi {}

    fn setup(config: LoggingConfig) -> (Arc<MemorySink>, Interceptor) {
        let types = TypeRegistry::new();
        types.extend("repo::NotFound", "repo::Error").extend("repo::Query", "repo::Error");
        let sink = MemorySink::new();
        let interceptor = Interceptor::from_config(
            &config,
            Arc::new(types),
            Arc::new(SiteRegistry::new()),
            LoggerRegistry::new(MemorySink::factory(&sink, LogLevel::Trace)),
        );
        sink.clear();
        (sink, interceptor)
    }

    fn config_at(level: &str) -> LoggingConfig {
        LoggingConfig {
            level: level.to_string(),
            ..LoggingConfig::default()
        }
    }

    #[test]
    fn test_controller_narrated_at_info() {
        let (sink, interceptor) = setup(config_at("INFO"));
        let controller = UserController;
        let (a, b) = (1, 2);

        let result = interceptor.around(crate::call_site!(&controller, foo(a, b)), || {
            Ok::<_, RepoError>(controller.foo(a, b))
        });
        assert_eq!(result.unwrap(), 3);

        let records = sink.records();
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.level == LogLevel::Info));
        assert!(records[0].logger.ends_with("UserController"));
        assert_eq!(
            records[0].message,
            "Method entry: foo; parameter names- [a, b]; parameters- [1, 2]"
        );
        assert_eq!(records[1].message, "Method exit: foo; return value: 3");
        assert!(records[2].message.starts_with("Method duration: foo: "));
        assert!(records[2].message.ends_with(" msec"));
    }

    #[test]
    fn test_plain_receiver_silent_above_debug() {
        let (sink, interceptor) = setup(config_at("INFO"));
        let service = UserService;

        let result = interceptor.around_value(CallDescriptor::new(&service, "count"), || 7u32);
        assert_eq!(result, 7);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_plain_receiver_narrated_at_debug() {
        let (sink, interceptor) = setup(LoggingConfig::default());
        let service = UserService;

        interceptor.around_value(CallDescriptor::new(&service, "count"), || 7u32);
        let records = sink.records();
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.level == LogLevel::Debug));
        assert_eq!(records[0].message, "Method entry: count");
    }

    #[test]
    fn test_no_duration_when_disabled() {
        let mut config = LoggingConfig::default();
        config.method.duration_log = false;
        let (sink, interceptor) = setup(config);
        let service = UserService;

        interceptor.around_value(CallDescriptor::new(&service, "count"), || 7u32);
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn test_hidden_trace_warn_error() {
        let mut config = LoggingConfig::default();
        config.exception.log_warn = vec!["repo::NotFound".into()];
        config.exception.stacktrace_hide = vec!["repo::NotFound".into()];
        let (sink, interceptor) = setup(config);
        let service = UserService;
        let id = 7u64;

        let result: Result<String, RepoError> =
            interceptor.around(crate::call_site!(&service, find(id)), || Err(RepoError::NotFound(id)));
        assert!(matches!(result, Err(RepoError::NotFound(7))));

        let warn = sink.at_level(LogLevel::Warn);
        assert_eq!(warn.len(), 1);
        assert_eq!(
            warn[0].message,
            "Could not find; parameter names- [id]; parameters- [7]: user 7 not found"
        );
        assert!(!warn[0].message.contains(NEW_LINE_MARKER));
        assert!(sink.at_level(LogLevel::Error).is_empty());
        assert!(sink
            .messages()
            .last()
            .unwrap()
            .starts_with("Method duration: find: "));
    }

    #[test]
    fn test_unlisted_error_logged_with_chain() {
        let (sink, interceptor) = setup(LoggingConfig::default());
        let service = UserService;

        let result: Result<(), RepoError> = interceptor.around(CallDescriptor::new(&service, "load"), || {
            Err(RepoError::Query(std::io::Error::new(
                std::io::ErrorKind::Other,
                "connection reset\nby peer",
            )))
        });
        assert!(result.is_err());

        let errors = sink.at_level(LogLevel::Error);
        assert_eq!(errors.len(), 1);
        let message = &errors[0].message;
        assert!(message.starts_with("Could not load | Query: query failed | connection reset"));
        assert!(message.contains("repo::Query: query failed"));
        assert!(message.contains("Caused by: connection reset"));
        assert!(!message.contains('\n'));
    }

    #[test]
    fn test_error_below_floor_is_suppressed() {
        let mut config = config_at("ERROR");
        config.exception.log_info = vec!["repo::Error".into()];
        let (sink, interceptor) = setup(config);
        let controller = UserController;

        let result: Result<(), RepoError> =
            interceptor.around(CallDescriptor::new(&controller, "show"), || Err(RepoError::NotFound(1)));
        assert!(result.is_err());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_large_return_value_reduced() {
        let (sink, interceptor) = setup(LoggingConfig::default());
        let service = UserService;

        interceptor.around_value(CallDescriptor::new(&service, "all"), || (1..=12).collect::<Vec<i32>>());
        assert_eq!(
            sink.messages()[1],
            "Method exit: all; return value: Large entry of 12 items, reduced to first 10 units: \
             [1, 2, 3, 4, 5, 6, 7, 8, 9, 10]"
        );
    }

    #[test]
    fn test_suppressed_elements() {
        let (sink, interceptor) = setup(LoggingConfig::default());
        let service = UserService;
        interceptor.policy().verbosity().sites().hide_method(
            std::any::type_name::<UserService>(),
            "login",
            HideLogElements::new().hide_parameters(true),
        );
        let password = "hunter2";

        interceptor.around_value(crate::call_site!(&service, login(password)), || "token-1");
        let messages = sink.messages();
        assert_eq!(
            messages[0],
            "Method entry: login; parameter names- [password]; parameters- {Not logged by design.}"
        );
        assert_eq!(messages[1], "Method exit: login; return value: {Not logged by design.}");
    }

    #[test]
    fn test_decorator_logs_real_type() {
        let (sink, interceptor) = setup(config_at("INFO"));
        let controller = Intercepted::new(UserController, Arc::new(interceptor));

        let sum = controller.invoke_value("foo", &[("a", &1), ("b", &2)], |inner| inner.foo(1, 2));
        assert_eq!(sum, 3);

        let records = sink.records();
        assert_eq!(records.len(), 3);
        assert!(records[0].logger.ends_with("UserController"));
        assert!(!records[0].logger.contains("Intercepted"));
        assert_eq!(records[1].message, "Method exit: foo; return value: 3");
    }

    #[test]
    fn test_unresolvable_proxy_uses_declaring_signature() {
        let (sink, interceptor) = setup(LoggingConfig::default());
        let proxy = SealedProxy;

        interceptor.around_value(
            CallDescriptor::new(&proxy, "lookup").declared_by(TypeIdentity::named("api::UserApi")),
            || 1u8,
        );

        let unwrap_errors: Vec<_> = sink
            .records()
            .into_iter()
            .filter(|r| r.logger == DEFAULT_LOGGER_NAME)
            .collect();
        assert_eq!(unwrap_errors.len(), crate::target::MAX_PROXY_DEPTH);
        assert!(sink
            .messages()
            .iter()
            .any(|m| m == "Method entry: api::UserApi::lookup"));
    }

    #[test]
    fn test_declaring_type_info_marker() {
        let (sink, interceptor) = setup(config_at("INFO"));
        interceptor
            .policy()
            .verbosity()
            .sites()
            .info_method(std::any::type_name::<dyn UserApi>(), "list");
        let service = UserService;

        interceptor.around_value(
            CallDescriptor::new(&service, "list").declared_by_type::<dyn UserApi>(),
            || 0u8,
        );
        assert_eq!(sink.at_level(LogLevel::Info).len(), 3);
    }

    #[test]
    fn test_duration_logged_when_call_panics() {
        let (sink, interceptor) = setup(LoggingConfig::default());
        let service = UserService;

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            interceptor.around_value(CallDescriptor::new(&service, "explode"), || -> u8 { panic!("boom") })
        }));
        assert!(outcome.is_err());

        let messages = sink.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], "Method entry: explode");
        assert!(messages[1].starts_with("Method duration: explode: "));
    }

    struct PanickingLogger;

    impl Logger for PanickingLogger {
        fn name(&self) -> &str {
            "panicking"
        }

        fn is_enabled(&self, _level: LogLevel) -> bool {
            true
        }

        fn log(&self, _level: LogLevel, _message: &str) {
            panic!("backend unavailable");
        }
    }

    #[test]
    fn test_internal_fault_does_not_change_result() {
        let sink = MemorySink::new();
        let diagnostics = Arc::clone(&sink);
        let loggers = LoggerRegistry::new(move |name: &str| -> SharedLogger {
            if name == DEFAULT_LOGGER_NAME {
                diagnostics.logger(name, LogLevel::Trace)
            } else {
                Arc::new(PanickingLogger)
            }
        });
        let interceptor = Interceptor::from_config(
            &LoggingConfig::default(),
            Arc::new(TypeRegistry::new()),
            Arc::new(SiteRegistry::new()),
            loggers,
        );
        sink.clear();
        let service = UserService;

        let result: Result<u32, RepoError> = interceptor.around(CallDescriptor::new(&service, "count"), || Ok(5));
        assert_eq!(result.unwrap(), 5);

        let faults = sink.at_level(LogLevel::Error);
        assert_eq!(faults.len(), 3);
        assert!(faults[0].message.starts_with("Could not log method entry | "));
        assert!(faults[0].message.contains("backend unavailable"));
        assert!(faults[2].message.starts_with("Could not log method duration"));
    }

    /// Argument that counts how often it is rendered
    struct CountedArg(std::sync::atomic::AtomicUsize);

    impl ToLogValue for CountedArg {
        fn to_log_value(&self) -> LogValue {
            self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            LogValue::Text("counted".into())
        }
    }

    #[test]
    fn test_arguments_not_rendered_when_nothing_logged() {
        let (sink, interceptor) = setup(config_at("ERROR"));
        let service = UserService;
        let arg = CountedArg(Default::default());

        let result = interceptor.around_value(CallDescriptor::new(&service, "count").param("arg", &arg), || 4u8);
        assert_eq!(result, 4);
        assert!(sink.is_empty());
        assert_eq!(arg.0.load(std::sync::atomic::Ordering::SeqCst), 0);

        interceptor.set_application_log_level(LogLevel::Debug);
        sink.clear();
        interceptor.around_value(CallDescriptor::new(&service, "count").param("arg", &arg), || 4u8);
        assert_eq!(arg.0.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert_eq!(
            sink.messages()[0],
            "Method entry: count; parameter names- [arg]; parameters- [counted]"
        );
    }

    struct PanickingArg;

    impl ToLogValue for PanickingArg {
        fn to_log_value(&self) -> LogValue {
            panic!("cannot render argument");
        }
    }

    #[test]
    fn test_argument_fault_does_not_stop_call() {
        let (sink, interceptor) = setup(LoggingConfig::default());
        let service = Intercepted::new(UserService, Arc::new(interceptor));
        let ran = std::cell::Cell::new(false);

        let result = service.invoke_value("count", &[("arg", &PanickingArg)], |_| {
            ran.set(true);
            9u32
        });
        assert_eq!(result, 9);
        assert!(ran.get());

        let faults = sink.at_level(LogLevel::Error);
        assert_eq!(faults.len(), 1);
        assert_eq!(faults[0].logger, DEFAULT_LOGGER_NAME);
        assert!(faults[0].message.starts_with("Could not prepare method entry | "));
        assert!(faults[0].message.contains("cannot render argument"));
    }

    #[test]
    fn test_runtime_level_change() {
        let (sink, interceptor) = setup(LoggingConfig::default());
        let service = UserService;

        interceptor.set_application_log_level_str("warn");
        assert_eq!(interceptor.application_log_level(), LogLevel::Warn);
        sink.clear();
        interceptor.around_value(CallDescriptor::new(&service, "count"), || 1u8);
        assert!(sink.is_empty());

        interceptor.set_application_log_level_str("");
        interceptor.set_application_log_level_str("bogus");
        assert_eq!(interceptor.application_log_level(), LogLevel::Warn);
        let errors = sink.at_level(LogLevel::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("bogus"));

        interceptor.set_application_log_level(LogLevel::Debug);
        sink.clear();
        interceptor.around_value(CallDescriptor::new(&service, "count"), || 1u8);
        assert_eq!(sink.len(), 3);
    }

    #[test]
    fn test_noop_backend_logs_nothing() {
        let interceptor = Interceptor::from_config(
            &LoggingConfig::default(),
            Arc::new(TypeRegistry::new()),
            Arc::new(SiteRegistry::new()),
            LoggerRegistry::new(|_: &str| -> SharedLogger { Arc::new(NoOpLogger::new()) }),
        );
        let controller = UserController;
        let result = interceptor.around_value(CallDescriptor::new(&controller, "foo"), || 2i32);
        assert_eq!(result, 2);
    }

    #[test]
    fn test_from_provider() {
        let provider = crate::config::MemoryConfigProvider::with_config(config_at("ERROR"));
        let interceptor = Interceptor::from_provider(
            &provider,
            Arc::new(TypeRegistry::new()),
            Arc::new(SiteRegistry::new()),
            LoggerRegistry::new(|_: &str| -> SharedLogger { Arc::new(NoOpLogger::new()) }),
        )
        .unwrap();
        assert_eq!(interceptor.application_log_level(), LogLevel::Error);
    }

    #[tokio::test]
    async fn test_async_call() {
        let (sink, interceptor) = setup(config_at("INFO"));
        let controller = UserController;

        let result = interceptor
            .around_async(CallDescriptor::new(&controller, "fetch").arg(&5i32), async {
                tokio::task::yield_now().await;
                Ok::<_, RepoError>(vec![5, 6])
            })
            .await;
        assert_eq!(result.unwrap(), vec![5, 6]);

        let messages = sink.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0], "Method entry: fetch; parameters- [5]");
        assert_eq!(messages[1], "Method exit: fetch; return value: [5, 6]");
    }

    #[tokio::test]
    async fn test_cancelled_future_logs_duration() {
        let (sink, interceptor) = setup(LoggingConfig::default());
        let service = UserService;

        let call = interceptor.around_async(
            CallDescriptor::new(&service, "wait"),
            std::future::pending::<Result<(), RepoError>>(),
        );
        let outcome = tokio::time::timeout(Duration::from_millis(10), call).await;
        assert!(outcome.is_err());

        let messages = sink.messages();
        assert_eq!(messages.len(), 2);
        assert!(messages[1].starts_with("Method duration: wait: "));
    }

    #[tokio::test]
    async fn test_decorator_async() {
        let (sink, interceptor) = setup(LoggingConfig::default());
        let service = Intercepted::new(UserService, Arc::new(interceptor));

        let result: Result<u64, RepoError> = service
            .invoke_async("lookup", &[("id", &9u64)], |_inner| async { Err(RepoError::NotFound(9)) })
            .await;
        assert!(result.is_err());
        assert!(sink
            .at_level(LogLevel::Error)
            .iter()
            .any(|r| r.message.starts_with("Could not lookup; parameter names- [id]; parameters- [9]")));
    }
}
