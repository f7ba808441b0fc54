//! Error type names and error-chain rendering

use std::borrow::Cow;
use std::error::Error;

use crate::types::TypeIdentity;

/// An error the interceptor can classify
///
/// The class name is what the exception lists in the configuration refer to.
/// It defaults to the Rust type name; enums usually override it so each
/// variant can be classified separately:
///
/// ```
/// use std::borrow::Cow;
/// use yaolog_core::Throwable;
///
/// #[derive(Debug, thiserror::Error)]
/// enum RepoError {
///     #[error("user {0} not found")]
///     NotFound(u64),
///     #[error("database unavailable")]
///     Unavailable,
/// }
///
/// impl Throwable for RepoError {
///     fn class_name(&self) -> Cow<'_, str> {
///         match self {
///             RepoError::NotFound(_) => "repo::NotFound".into(),
///             RepoError::Unavailable => "repo::Unavailable".into(),
///         }
///     }
/// }
/// ```
pub trait Throwable: Error {
    fn class_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(std::any::type_name::<Self>())
    }
}

impl Throwable for std::io::Error {
    fn class_name(&self) -> Cow<'_, str> {
        Cow::Borrowed("std::io::Error")
    }
}

impl Throwable for std::fmt::Error {}

impl Throwable for std::convert::Infallible {}

impl Throwable for serde_json::Error {}

impl Throwable for crate::error::YaologError {}

impl Throwable for crate::config::ConfigError {}

/// `<simple class name>: <message>`
pub fn short_message<E: Throwable + ?Sized>(err: &E) -> String {
    let class = TypeIdentity::named(err.class_name().into_owned());
    format!("{}: {}", class.simple_name(), err)
}

/// Message of the innermost error in the `source` chain
pub fn root_cause_message<E: Error + ?Sized>(err: &E) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message = cause.to_string();
        source = cause.source();
    }
    message
}

/// Multi-line rendering of an error and its causes
///
/// First line is `<class>: <message>`, followed by one `Caused by: <message>`
/// line per source.
pub fn render_chain<E: Throwable + ?Sized>(err: &E, line_separator: &str) -> String {
    let mut out = format!("{}: {}", err.class_name(), err);
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(line_separator);
        out.push_str("Caused by: ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}
