//! Error classification: which level an error is logged at, and whether its
//! causes are shown

use std::sync::Arc;

use crate::config::ExceptionSettings;
use crate::logging::{LogLevel, Logger};
use crate::types::TypeRegistry;

/// Outcome of classifying an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Level to log at, `None` when no candidate level is enabled
    pub level: Option<LogLevel>,
    /// Log a one-line digest instead of the full error chain
    pub hide_stack_trace: bool,
}

/// Resolved exception lists
#[derive(Debug)]
pub struct ExceptionPolicy {
    types: Arc<TypeRegistry>,
    info: Vec<String>,
    warn: Vec<String>,
    stacktrace_hide: Vec<String>,
}

impl ExceptionPolicy {
    /// Resolve configured names against the type registry
    ///
    /// Blank names are dropped; unknown names are reported to `diagnostics`
    /// and dropped, so a misconfigured entry falls back to ERROR with the full
    /// chain.
    pub fn from_settings(
        settings: &ExceptionSettings,
        types: Arc<TypeRegistry>,
        diagnostics: &dyn Logger,
    ) -> Self {
        let info = resolve_all(&settings.log_info, &types, diagnostics);
        let warn = resolve_all(&settings.log_warn, &types, diagnostics);
        let stacktrace_hide = resolve_all(&settings.stacktrace_hide, &types, diagnostics);
        Self {
            types,
            info,
            warn,
            stacktrace_hide,
        }
    }

    pub fn info_types(&self) -> &[String] {
        &self.info
    }

    pub fn warn_types(&self) -> &[String] {
        &self.warn
    }

    pub fn stacktrace_hide_types(&self) -> &[String] {
        &self.stacktrace_hide
    }

    fn matches(&self, class_name: &str, set: &[String]) -> bool {
        if set.is_empty() {
            return false;
        }
        set.iter().any(|member| self.types.is_assignable(class_name, member))
    }

    /// Pick the level for an error of class `class_name`
    ///
    /// Info list first, then warn list, then ERROR; each candidate only if
    /// `enabled` allows it.
    pub fn classify(&self, class_name: &str, enabled: impl Fn(LogLevel) -> bool) -> Classification {
        let hide_stack_trace = self.matches(class_name, &self.stacktrace_hide);
        let level = if self.matches(class_name, &self.info) && enabled(LogLevel::Info) {
            Some(LogLevel::Info)
        } else if self.matches(class_name, &self.warn) && enabled(LogLevel::Warn) {
            Some(LogLevel::Warn)
        } else if enabled(LogLevel::Error) {
            Some(LogLevel::Error)
        } else {
            None
        };
        Classification {
            level,
            hide_stack_trace,
        }
    }
}

fn resolve_all(names: &[String], types: &TypeRegistry, diagnostics: &dyn Logger) -> Vec<String> {
    names
        .iter()
        .filter(|name| !name.trim().is_empty())
        .filter_map(|name| match types.resolve(name) {
            Ok(resolved) => Some(resolved),
            Err(e) => {
                crate::log_error!(diagnostics, "Skipping exception list entry: {}", e);
                None
            }
        })
        .collect()
}
