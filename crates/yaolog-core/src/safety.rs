//! Log-line safety and related string helpers
//!
//! - Line separators are replaced with U+2028 so a single message can never
//!   forge extra log lines
//! - Error summaries built on the same rule
//! - Partial obfuscation of secrets, in plain strings and in JSON payloads
//! - camelCase to snake_case normalisation of keys
//! - Method duration messages

use std::collections::HashMap;
use std::time::Instant;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::throwable::{render_chain, root_cause_message, short_message, Throwable};

/// Replacement for line separators inside a log message
pub const NEW_LINE_MARKER: &str = "\u{2028}";

/// Platform line separator
#[cfg(windows)]
pub const LINE_SEPARATOR: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_SEPARATOR: &str = "\n";

const OBFUSCATION_OVERLAY: &str = "******";
const SHOW_FIRST_LAST_CHARS: usize = 6;

static JSON_SECRET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""(?i)(password|pwd|ssn|cvc|creditCardNumber|credit_card_number)":"[\w[:punct:]&&[^&]]*?""#)
        .expect("secret pattern is valid")
});
static HIGH_LOW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Z]+)([A-Z][a-z])").expect("camel pattern is valid"));
static LOW_HIGH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z])([A-Z])").expect("camel pattern is valid"));

/// Replace every platform line separator with `NEW_LINE_MARKER`
pub fn replace_new_line(message: &str) -> String {
    message.replace(LINE_SEPARATOR, NEW_LINE_MARKER)
}

/// Inverse of `replace_new_line`, for reading logs back
pub fn restore_new_line(message: &str) -> String {
    message.replace(NEW_LINE_MARKER, LINE_SEPARATOR)
}

/// Single-line summary of an error
///
/// ` | <simple class name>: <message> | <root cause message><marker><class and causes>`, every
/// part line-safe.
pub fn throwable_summary<E: Throwable + ?Sized>(err: &E) -> String {
    format!(
        " | {} | {}{}{}",
        replace_new_line(&short_message(err)),
        replace_new_line(&root_cause_message(err)),
        NEW_LINE_MARKER,
        replace_new_line(&render_chain(err, LINE_SEPARATOR))
    )
}

/// `message` followed by the line-safe summary of `err`
pub fn throwable_message<E: Throwable + ?Sized>(message: &str, err: &E) -> String {
    format!("{}{}", replace_new_line(message), throwable_summary(err))
}

/// Duration message for a method, from an optional start instant
pub fn method_duration_message(method: &str, start: Option<Instant>) -> String {
    match start {
        Some(start) => format!("Method duration: {}: {} msec", method, start.elapsed().as_millis()),
        None => format!("Method duration: {}: unknown. Start time is missing", method),
    }
}

/// Mask the middle of `secret`, leaving `chars_to_show` characters visible
/// at each end
///
/// Secrets too short to keep both ends get the mask appended instead.
pub fn obfuscate(secret: &str, chars_to_show: usize) -> String {
    let chars: Vec<char> = secret.chars().collect();
    let len = chars.len();
    let start = chars_to_show.min(len);
    let end = len.saturating_sub(chars_to_show).max(chars_to_show).min(len);
    let (start, end) = if start > end { (end, start) } else { (start, end) };

    let mut out: String = chars[..start].iter().collect();
    out.push_str(OBFUSCATION_OVERLAY);
    out.extend(&chars[end..]);
    out
}

/// `obfuscate` with the default number of visible characters
pub fn obfuscate_default(secret: &str) -> String {
    obfuscate(secret, SHOW_FIRST_LAST_CHARS)
}

/// Mask the values of well-known secret keys in a JSON string
pub fn obfuscate_in_json(json: &str) -> String {
    JSON_SECRET
        .replace_all(json, format!("\"${{1}}\":\"{}\"", OBFUSCATION_OVERLAY).as_str())
        .into_owned()
}

/// `abcXyz` to `abc_xyz`, `HTTPServer` to `http_server`
pub fn camel_to_snake(input: &str) -> String {
    let step = HIGH_LOW.replace_all(input, "${1}_${2}");
    LOW_HIGH.replace_all(&step, "${1}_${2}").to_lowercase()
}

/// Normalise every key of `map` with `camel_to_snake`
pub fn camel_keys_to_snake<T>(map: HashMap<String, T>) -> HashMap<String, T> {
    map.into_iter().map(|(k, v)| (camel_to_snake(&k), v)).collect()
}
