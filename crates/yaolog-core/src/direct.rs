//! Direct logging calls for code that is not intercepted
//!
//! Everything here goes through an `Interceptor`, so the level floor and the
//! per-type logger cache are shared with intercepted calls. The free
//! functions use the process-wide interceptor (see `install`).
//!
//! ```
//! use yaolog_core::direct;
//! use yaolog_core::logging::Subject;
//!
//! struct Importer;
//!
//! fn import(rows: &[u32]) {
//!     yaolog_core::log_method_entry!(Subject::of::<Importer>(), rows);
//!     direct::info(Subject::of::<Importer>(), format_args!("importing {} rows", rows.len()));
//!     yaolog_core::log_method_exit!(Subject::of::<Importer>(), rows.len());
//! }
//!
//! import(&[1, 2, 3]);
//! ```

use std::error::Error;
use std::fmt::Display;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::error::{YaologError, YaologResult};
use crate::interceptor::{Interceptor, METHOD_EXIT_WITH_ERROR};
use crate::logging::{LogLevel, Subject};
use crate::safety::{replace_new_line, throwable_message};
use crate::throwable::Throwable;
use crate::value::{reduce, render_list, LogValue, ToLogValue};

static GLOBAL: OnceCell<Arc<Interceptor>> = OnceCell::new();

/// Install the process-wide interceptor
///
/// Must happen before the first direct call; afterwards the defaults are
/// already in place and installing fails.
pub fn install(interceptor: Interceptor) -> YaologResult<Arc<Interceptor>> {
    let interceptor = Arc::new(interceptor);
    GLOBAL
        .set(Arc::clone(&interceptor))
        .map_err(|_| YaologError::AlreadyInstalled)?;
    Ok(interceptor)
}

/// The process-wide interceptor, created with defaults on first use
pub fn global() -> &'static Arc<Interceptor> {
    GLOBAL.get_or_init(|| Arc::new(Interceptor::with_defaults()))
}

pub type BoxedCause = Box<dyn Error + Send + Sync + 'static>;

/// An error type that can stand in for another one
pub trait WrapError: Sized {
    fn wrap(message: String, cause: BoxedCause) -> Self;
}

/// General-purpose substitute error carrying the logged message and the
/// original error
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct WrappedError {
    message: String,
    #[source]
    cause: BoxedCause,
}

impl WrappedError {
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The error that was wrapped
    pub fn original(&self) -> &(dyn Error + Send + Sync + 'static) {
        self.cause.as_ref()
    }
}

impl WrapError for WrappedError {
    fn wrap(message: String, cause: BoxedCause) -> Self {
        Self { message, cause }
    }
}

impl Throwable for WrappedError {}

/// Last meaningful segment of a function path from `std::any::type_name`
///
/// Used by the `log_method_*!` macros: `app::Importer::run::f` becomes `run`,
/// closure segments are skipped.
pub fn function_name(path: &'static str) -> &'static str {
    let path = path.strip_suffix("::f").unwrap_or(path);
    path.rsplit("::")
        .find(|segment| *segment != "{{closure}}")
        .unwrap_or(path)
}

/// `<method>[. <group> - [..]]`
fn method_with(method: &str, group: &str, values: &[&dyn ToLogValue], limit: usize) -> String {
    if values.is_empty() {
        return replace_new_line(method);
    }
    let reduced: Vec<LogValue> = values
        .iter()
        .map(|value| reduce(&value.to_log_value(), limit))
        .collect();
    replace_new_line(&format!("{}. {} - {}", method, group, render_list(&reduced)))
}

impl Interceptor {
    fn log_gated(&self, subject: Subject, level: LogLevel, message: impl Display) {
        let logger = self.logger(subject);
        if self.is_level_enabled(logger.as_ref(), level) {
            logger.log(level, &message.to_string());
        }
    }

    pub fn debug(&self, subject: impl Into<Subject>, message: impl Display) {
        self.log_gated(subject.into(), LogLevel::Debug, message);
    }

    pub fn info(&self, subject: impl Into<Subject>, message: impl Display) {
        self.log_gated(subject.into(), LogLevel::Info, message);
    }

    pub fn warn(&self, subject: impl Into<Subject>, message: impl Display) {
        self.log_gated(subject.into(), LogLevel::Warn, message);
    }

    pub fn error(&self, subject: impl Into<Subject>, message: impl Display) {
        self.log_gated(subject.into(), LogLevel::Error, message);
    }

    /// `<logger> Method entry: <method>. parameters - [..]` at DEBUG
    pub fn log_method_entry(&self, subject: impl Into<Subject>, method: &str, parameters: &[&dyn ToLogValue]) {
        let logger = self.logger(subject);
        if self.is_level_enabled(logger.as_ref(), LogLevel::Debug) {
            let limit = self.policy().collection_limit();
            logger.debug(&format!(
                "{} Method entry: {}",
                logger.name(),
                method_with(method, "parameters", parameters, limit)
            ));
        }
    }

    /// `<logger> Method exit: <method>. return value - [..]` at DEBUG
    pub fn log_method_exit(&self, subject: impl Into<Subject>, method: &str, values: &[&dyn ToLogValue]) {
        let logger = self.logger(subject);
        if self.is_level_enabled(logger.as_ref(), LogLevel::Debug) {
            let limit = self.policy().collection_limit();
            logger.debug(&format!(
                "{} Method exit: {}",
                logger.name(),
                method_with(method, "return value", values, limit)
            ));
        }
    }

    /// `Could not <method>. parameters - [..]. <error message>`
    pub fn method_with_exception<E: Display + ?Sized>(
        &self,
        method: &str,
        err: &E,
        parameters: &[&dyn ToLogValue],
    ) -> String {
        let limit = self.policy().collection_limit();
        replace_new_line(&format!(
            "{}{}. {}",
            METHOD_EXIT_WITH_ERROR,
            method_with(method, "parameters", parameters, limit),
            err
        ))
    }

    fn log_method_exception_at<E: Throwable + ?Sized>(
        &self,
        level: LogLevel,
        subject: Subject,
        err: &E,
        method: &str,
        parameters: &[&dyn ToLogValue],
    ) -> String {
        let logger = self.logger(subject);
        if self.is_level_enabled(logger.as_ref(), level) {
            logger.log(level, &throwable_message(logger.name(), err));
        }
        self.method_with_exception(method, err, parameters)
    }

    /// Log `err` with its causes at DEBUG and return a one-line description
    /// of the failed call
    pub fn log_method_exception<E: Throwable + ?Sized>(
        &self,
        subject: impl Into<Subject>,
        err: &E,
        method: &str,
        parameters: &[&dyn ToLogValue],
    ) -> String {
        self.log_method_exception_at(LogLevel::Debug, subject.into(), err, method, parameters)
    }

    /// `log_method_exception` at ERROR
    pub fn error_method_exception<E: Throwable + ?Sized>(
        &self,
        subject: impl Into<Subject>,
        err: &E,
        method: &str,
        parameters: &[&dyn ToLogValue],
    ) -> String {
        self.log_method_exception_at(LogLevel::Error, subject.into(), err, method, parameters)
    }

    /// Log `err` at DEBUG and return it wrapped in `W`
    pub fn log_and_wrap<W, E>(&self, subject: impl Into<Subject>, err: E, method: &str, parameters: &[&dyn ToLogValue]) -> W
    where
        W: WrapError,
        E: Throwable + Send + Sync + 'static,
    {
        let message = self.log_method_exception(subject, &err, method, parameters);
        W::wrap(message, Box::new(err))
    }

    /// Log `err` at ERROR and return it wrapped in `W`
    pub fn error_and_wrap<W, E>(&self, subject: impl Into<Subject>, err: E, method: &str, parameters: &[&dyn ToLogValue]) -> W
    where
        W: WrapError,
        E: Throwable + Send + Sync + 'static,
    {
        let message = self.error_method_exception(subject, &err, method, parameters);
        W::wrap(message, Box::new(err))
    }
}

pub fn debug(subject: impl Into<Subject>, message: impl Display) {
    global().debug(subject, message);
}

pub fn info(subject: impl Into<Subject>, message: impl Display) {
    global().info(subject, message);
}

pub fn warn(subject: impl Into<Subject>, message: impl Display) {
    global().warn(subject, message);
}

pub fn error(subject: impl Into<Subject>, message: impl Display) {
    global().error(subject, message);
}

pub fn log_method_entry(subject: impl Into<Subject>, method: &str, parameters: &[&dyn ToLogValue]) {
    global().log_method_entry(subject, method, parameters);
}

pub fn log_method_exit(subject: impl Into<Subject>, method: &str, values: &[&dyn ToLogValue]) {
    global().log_method_exit(subject, method, values);
}

pub fn log_method_exception<E: Throwable + ?Sized>(
    subject: impl Into<Subject>,
    err: &E,
    method: &str,
    parameters: &[&dyn ToLogValue],
) -> String {
    global().log_method_exception(subject, err, method, parameters)
}

pub fn error_method_exception<E: Throwable + ?Sized>(
    subject: impl Into<Subject>,
    err: &E,
    method: &str,
    parameters: &[&dyn ToLogValue],
) -> String {
    global().error_method_exception(subject, err, method, parameters)
}

pub fn log_and_wrap<W, E>(subject: impl Into<Subject>, err: E, method: &str, parameters: &[&dyn ToLogValue]) -> W
where
    W: WrapError,
    E: Throwable + Send + Sync + 'static,
{
    global().log_and_wrap(subject, err, method, parameters)
}

pub fn error_and_wrap<W, E>(subject: impl Into<Subject>, err: E, method: &str, parameters: &[&dyn ToLogValue]) -> W
where
    W: WrapError,
    E: Throwable + Send + Sync + 'static,
{
    global().error_and_wrap(subject, err, method, parameters)
}

/// Name of the enclosing function
#[macro_export]
macro_rules! function_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        $crate::direct::function_name(type_name_of(f))
    }};
}

/// `direct::log_method_entry` with the enclosing function's name
#[macro_export]
macro_rules! log_method_entry {
    ($subject:expr $(, $value:expr)* $(,)?) => {
        $crate::direct::log_method_entry(
            $subject,
            $crate::function_name!(),
            &[$(&$value as &dyn $crate::ToLogValue),*],
        )
    };
}

/// `direct::log_method_exit` with the enclosing function's name
#[macro_export]
macro_rules! log_method_exit {
    ($subject:expr $(, $value:expr)* $(,)?) => {
        $crate::direct::log_method_exit(
            $subject,
            $crate::function_name!(),
            &[$(&$value as &dyn $crate::ToLogValue),*],
        )
    };
}

/// `direct::log_method_exception` with the enclosing function's name
#[macro_export]
macro_rules! log_method_exception {
    ($subject:expr, $err:expr $(, $value:expr)* $(,)?) => {
        $crate::direct::log_method_exception(
            $subject,
            $err,
            $crate::function_name!(),
            &[$(&$value as &dyn $crate::ToLogValue),*],
        )
    };
}

/// `direct::error_method_exception` with the enclosing function's name
#[macro_export]
macro_rules! error_method_exception {
    ($subject:expr, $err:expr $(, $value:expr)* $(,)?) => {
        $crate::direct::error_method_exception(
            $subject,
            $err,
            $crate::function_name!(),
            &[$(&$value as &dyn $crate::ToLogValue),*],
        )
    };
}
