//! Loggable values and the verbosity reducer

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// Collection limit used when none is configured
pub const DEFAULT_COLLECTION_LIMIT: usize = 10;

/// A value as it appears in a log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogValue {
    Null,
    Text(String),
    Sequence(Vec<LogValue>),
}

impl LogValue {
    /// Value rendered with its `Debug` impl
    pub fn debug<T: fmt::Debug + ?Sized>(value: &T) -> Self {
        LogValue::Text(format!("{:?}", value))
    }

    /// Value rendered with its `Display` impl
    pub fn display<T: fmt::Display + ?Sized>(value: &T) -> Self {
        LogValue::Text(value.to_string())
    }

    /// Sequence of loggable items
    pub fn seq<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: ToLogValue,
    {
        LogValue::Sequence(items.into_iter().map(|item| item.to_log_value()).collect())
    }

    /// Value taken from its serde representation
    ///
    /// JSON arrays become sequences (and are subject to truncation), strings
    /// are logged unquoted, objects are logged as compact JSON.
    pub fn serialized<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(json) => Self::from_json(json),
            Err(e) => LogValue::Text(format!("<unserializable: {}>", e)),
        }
    }

    fn from_json(json: Value) -> Self {
        match json {
            Value::Null => LogValue::Null,
            Value::String(s) => LogValue::Text(s),
            Value::Array(items) => LogValue::Sequence(items.into_iter().map(Self::from_json).collect()),
            other => LogValue::Text(other.to_string()),
        }
    }

    /// Number of elements when this is a sequence
    pub fn len(&self) -> Option<usize> {
        match self {
            LogValue::Sequence(items) => Some(items.len()),
            _ => None,
        }
    }
}

impl fmt::Display for LogValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogValue::Null => f.write_str("null"),
            LogValue::Text(text) => f.write_str(text),
            LogValue::Sequence(items) => write_sequence(f, items),
        }
    }
}

fn write_sequence(f: &mut fmt::Formatter<'_>, items: &[LogValue]) -> fmt::Result {
    f.write_str("[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    f.write_str("]")
}

/// Render a list of values as `[a, b, c]`
pub fn render_list(values: &[LogValue]) -> String {
    LogValue::Sequence(values.to_vec()).to_string()
}

/// Replace sequences longer than `limit` with a short description
///
/// The description keeps the original element count and the first `limit`
/// elements. Anything else passes through unchanged. Only the top level is
/// reduced.
pub fn reduce(value: &LogValue, limit: usize) -> LogValue {
    match value {
        LogValue::Sequence(items) if items.len() > limit => LogValue::Text(format!(
            "Large entry of {} items, reduced to first {} units: {}",
            items.len(),
            limit,
            render_list(&items[..limit])
        )),
        other => other.clone(),
    }
}

/// Conversion into a `LogValue`
pub trait ToLogValue {
    fn to_log_value(&self) -> LogValue;
}

impl ToLogValue for LogValue {
    fn to_log_value(&self) -> LogValue {
        self.clone()
    }
}

impl<T: ToLogValue + ?Sized> ToLogValue for &T {
    fn to_log_value(&self) -> LogValue {
        (**self).to_log_value()
    }
}

macro_rules! display_log_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ToLogValue for $ty {
                fn to_log_value(&self) -> LogValue {
                    LogValue::Text(self.to_string())
                }
            }
        )*
    };
}

display_log_value!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, str, String,
);

impl ToLogValue for () {
    fn to_log_value(&self) -> LogValue {
        LogValue::Null
    }
}

impl<T: ToLogValue> ToLogValue for Option<T> {
    fn to_log_value(&self) -> LogValue {
        match self {
            Some(value) => value.to_log_value(),
            None => LogValue::Null,
        }
    }
}

impl<T: ToLogValue> ToLogValue for [T] {
    fn to_log_value(&self) -> LogValue {
        LogValue::seq(self.iter())
    }
}

impl<T: ToLogValue, const N: usize> ToLogValue for [T; N] {
    fn to_log_value(&self) -> LogValue {
        LogValue::seq(self.iter())
    }
}

impl<T: ToLogValue> ToLogValue for Vec<T> {
    fn to_log_value(&self) -> LogValue {
        LogValue::seq(self.iter())
    }
}

impl<T: ToLogValue> ToLogValue for VecDeque<T> {
    fn to_log_value(&self) -> LogValue {
        LogValue::seq(self.iter())
    }
}

impl<T: ToLogValue, S> ToLogValue for HashSet<T, S> {
    fn to_log_value(&self) -> LogValue {
        LogValue::seq(self.iter())
    }
}

impl<T: ToLogValue> ToLogValue for BTreeSet<T> {
    fn to_log_value(&self) -> LogValue {
        LogValue::seq(self.iter())
    }
}

impl<T: ToLogValue + ?Sized> ToLogValue for Box<T> {
    fn to_log_value(&self) -> LogValue {
        (**self).to_log_value()
    }
}

impl<T: ToLogValue + ?Sized> ToLogValue for std::sync::Arc<T> {
    fn to_log_value(&self) -> LogValue {
        (**self).to_log_value()
    }
}

impl<K: ToLogValue, V: ToLogValue, S> ToLogValue for HashMap<K, V, S> {
    fn to_log_value(&self) -> LogValue {
        render_map(self.iter())
    }
}

impl<K: ToLogValue, V: ToLogValue> ToLogValue for BTreeMap<K, V> {
    fn to_log_value(&self) -> LogValue {
        render_map(self.iter())
    }
}

// Maps are not sequences: they are rendered whole and never truncated.
fn render_map<'a, K, V, I>(entries: I) -> LogValue
where
    K: ToLogValue + 'a,
    V: ToLogValue + 'a,
    I: Iterator<Item = (&'a K, &'a V)>,
{
    let body = entries
        .map(|(k, v)| format!("{}={}", k.to_log_value(), v.to_log_value()))
        .collect::<Vec<_>>()
        .join(", ");
    LogValue::Text(format!("{{{}}}", body))
}

impl ToLogValue for Value {
    fn to_log_value(&self) -> LogValue {
        LogValue::from_json(self.clone())
    }
}

impl From<&str> for LogValue {
    fn from(value: &str) -> Self {
        LogValue::Text(value.to_string())
    }
}

impl From<String> for LogValue {
    fn from(value: String) -> Self {
        LogValue::Text(value)
    }
}
