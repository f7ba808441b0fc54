//! Per-site markers: INFO promotion and hidden parameters / return values
//!
//! Markers are registered against a type name or a (type, method) pair.
//! Type-level markers are inherited by every subtype known to the
//! `TypeRegistry`.

use std::collections::{HashMap, HashSet};

use parking_lot::RwLock;

use crate::types::{TypeIdentity, TypeRegistry};

/// Suppression of logged call elements
///
/// The defaults mirror a bare marker: hiding the return value and keeping the
/// parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HideLogElements {
    pub hide_return_value: bool,
    pub hide_parameters: bool,
}

impl Default for HideLogElements {
    fn default() -> Self {
        Self {
            hide_return_value: true,
            hide_parameters: false,
        }
    }
}

impl HideLogElements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hide_return_value(mut self, hide: bool) -> Self {
        self.hide_return_value = hide;
        self
    }

    pub fn hide_parameters(mut self, hide: bool) -> Self {
        self.hide_parameters = hide;
        self
    }
}

type MethodKey = (String, String);

fn method_key(type_name: &str, method: &str) -> MethodKey {
    (type_name.to_string(), method.to_string())
}

/// Registration table for per-site markers
#[derive(Debug, Default)]
pub struct SiteRegistry {
    info_types: RwLock<HashSet<String>>,
    info_methods: RwLock<HashSet<MethodKey>>,
    hidden_types: RwLock<HashMap<String, HideLogElements>>,
    hidden_methods: RwLock<HashMap<MethodKey, HideLogElements>>,
}

impl SiteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Narrate every method of `type_name` (and its subtypes) at INFO
    pub fn info_type(&self, type_name: impl Into<String>) -> &Self {
        self.info_types.write().insert(type_name.into());
        self
    }

    /// Narrate one method at INFO
    pub fn info_method(&self, type_name: &str, method: &str) -> &Self {
        self.info_methods.write().insert(method_key(type_name, method));
        self
    }

    /// Hide call elements for every method of `type_name` (and its subtypes)
    pub fn hide_type(&self, type_name: impl Into<String>, hide: HideLogElements) -> &Self {
        self.hidden_types.write().insert(type_name.into(), hide);
        self
    }

    /// Hide call elements for one method
    pub fn hide_method(&self, type_name: &str, method: &str, hide: HideLogElements) -> &Self {
        self.hidden_methods.write().insert(method_key(type_name, method), hide);
        self
    }

    pub fn info_type_of<T: ?Sized>(&self) -> &Self {
        self.info_type(std::any::type_name::<T>())
    }

    pub fn hide_type_of<T: ?Sized>(&self, hide: HideLogElements) -> &Self {
        self.hide_type(std::any::type_name::<T>(), hide)
    }

    /// Whether `type_name` or one of its ancestors carries the INFO marker
    pub fn has_type_info(&self, type_name: &TypeIdentity, types: &TypeRegistry) -> bool {
        let info_types = self.info_types.read();
        if info_types.is_empty() {
            return false;
        }
        types
            .ancestry(type_name.name())
            .iter()
            .any(|t| info_types.contains(t))
    }

    pub fn has_method_info(&self, type_name: &TypeIdentity, method: &str) -> bool {
        self.info_methods
            .read()
            .contains(&method_key(type_name.name(), method))
    }

    /// Nearest type-level suppression for `type_name`, walking ancestors
    pub fn type_hide(&self, type_name: &TypeIdentity, types: &TypeRegistry) -> Option<HideLogElements> {
        let hidden = self.hidden_types.read();
        if hidden.is_empty() {
            return None;
        }
        types
            .ancestry(type_name.name())
            .iter()
            .find_map(|t| hidden.get(t).copied())
    }

    pub fn method_hide(&self, type_name: &TypeIdentity, method: &str) -> Option<HideLogElements> {
        self.hidden_methods
            .read()
            .get(&method_key(type_name.name(), method))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_markers_are_inherited() {
        let types = TypeRegistry::new();
        types.extend("app::AdminService", "app::BaseService");

        let sites = SiteRegistry::new();
        sites
            .info_type("app::BaseService")
            .hide_type("app::BaseService", HideLogElements::new().hide_parameters(true));

        let admin = TypeIdentity::named("app::AdminService");
        assert!(sites.has_type_info(&admin, &types));
        assert_eq!(
            sites.type_hide(&admin, &types),
            Some(HideLogElements {
                hide_return_value: true,
                hide_parameters: true,
            })
        );
        assert!(!sites.has_type_info(&TypeIdentity::named("app::Other"), &types));
    }

    #[test]
    fn test_method_markers_are_exact() {
        let sites = SiteRegistry::new();
        sites
            .info_method("app::Repo", "find")
            .hide_method("app::Repo", "login", HideLogElements::new().hide_return_value(false));

        let repo = TypeIdentity::named("app::Repo");
        assert!(sites.has_method_info(&repo, "find"));
        assert!(!sites.has_method_info(&repo, "save"));
        assert_eq!(
            sites.method_hide(&repo, "login"),
            Some(HideLogElements {
                hide_return_value: false,
                hide_parameters: false,
            })
        );
    }

    #[test]
    fn test_default_marker() {
        let hide = HideLogElements::default();
        assert!(hide.hide_return_value);
        assert!(!hide.hide_parameters);
    }
}
