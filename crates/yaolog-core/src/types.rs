//! Type identities and the explicit type hierarchy
//!
//! Rust has no runtime class hierarchy, so "is this error a subtype of that
//! one" and "does this receiver inherit a marker from its parent" are answered
//! from a registration table filled at startup.

use std::borrow::Cow;
use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::{YaologError, YaologResult};

/// Upper bound on parent links followed when walking ancestry
const MAX_ANCESTRY: usize = 64;

/// Name of a type as seen by the logging engine
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeIdentity {
    name: Cow<'static, str>,
}

impl TypeIdentity {
    /// Identity of `T`, from `std::any::type_name`
    pub fn of<T: ?Sized>() -> Self {
        Self {
            name: Cow::Borrowed(std::any::type_name::<T>()),
        }
    }

    /// Identity of the static type of `value`
    pub fn of_val<T: ?Sized>(_value: &T) -> Self {
        Self::of::<T>()
    }

    /// Identity with an explicit name
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self { name: name.into() }
    }

    /// Fully qualified name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Last path segment without generic arguments
    ///
    /// `app::web::UserController<Db>` becomes `UserController`.
    pub fn simple_name(&self) -> &str {
        let base = match self.name.find('<') {
            Some(idx) => &self.name[..idx],
            None => &self.name,
        };
        base.rsplit("::").next().unwrap_or(base)
    }
}

impl std::fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&'static str> for TypeIdentity {
    fn from(name: &'static str) -> Self {
        Self::named(name)
    }
}

impl From<String> for TypeIdentity {
    fn from(name: String) -> Self {
        Self::named(name)
    }
}

/// Registry of known type names and their parent links
///
/// A type is "assignable to" another when it is the same type or the other one
/// appears in its parent chain.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    parents: RwLock<HashMap<String, Option<String>>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a root type (no parent)
    pub fn declare(&self, name: impl Into<String>) -> &Self {
        self.parents.write().entry(name.into()).or_insert(None);
        self
    }

    /// Register `child` as a subtype of `parent`
    ///
    /// `parent` is declared as a root if it is not known yet. Re-registering a
    /// child replaces its parent.
    pub fn extend(&self, child: impl Into<String>, parent: impl Into<String>) -> &Self {
        let parent = parent.into();
        let mut parents = self.parents.write();
        parents.entry(parent.clone()).or_insert(None);
        parents.insert(child.into(), Some(parent));
        self
    }

    /// Register `T` as a root type
    pub fn declare_type<T: ?Sized>(&self) -> &Self {
        self.declare(std::any::type_name::<T>())
    }

    /// Register `C` as a subtype of `P`
    pub fn extend_type<C: ?Sized, P: ?Sized>(&self) -> &Self {
        self.extend(std::any::type_name::<C>(), std::any::type_name::<P>())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.parents.read().contains_key(name)
    }

    /// Resolve a configured name to a known type
    pub fn resolve(&self, name: &str) -> YaologResult<String> {
        let name = name.trim();
        if self.contains(name) {
            Ok(name.to_string())
        } else {
            Err(YaologError::UnknownType(name.to_string()))
        }
    }

    /// `name` followed by its ancestors, nearest first
    pub fn ancestry(&self, name: &str) -> Vec<String> {
        let parents = self.parents.read();
        let mut chain = vec![name.to_string()];
        let mut current = name;
        while chain.len() <= MAX_ANCESTRY {
            match parents.get(current) {
                Some(Some(parent)) if !chain.contains(parent) => {
                    chain.push(parent.clone());
                    current = parent.as_str();
                }
                _ => break,
            }
        }
        chain
    }

    /// Whether `name` equals `ancestor` or has it in its parent chain
    pub fn is_assignable(&self, name: &str, ancestor: &str) -> bool {
        name == ancestor || self.ancestry(name).iter().any(|t| t == ancestor)
    }
}
