//! Transform registry
//!
//! Maps transform names to functions. The engine reads it during traversal;
//! callers may add their own transforms before handing it over. Once shared,
//! the registry is read-only, so a single instance can back any number of
//! concurrent traversals.

use normalise_value::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::transforms;
use crate::{Result, TransformError};

/// Directive applying a directive set to every element of a sequence.
pub const EACH: &str = "each";

/// Directive descending into a nested mapping.
pub const OBJECT: &str = "object";

/// Names the engine interprets itself; they can never name a transform.
pub const RESERVED_NAMES: [&str; 2] = [EACH, OBJECT];

/// Returns true if `name` is a reserved directive name.
#[must_use]
pub fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}

/// Type alias for a transform function: `(value, options) -> replacement`
pub type TransformFn = Arc<dyn Fn(&Value, &Value) -> Result<Value> + Send + Sync>;

/// Registry of named transforms
#[derive(Clone)]
pub struct Registry {
    transforms: HashMap<String, TransformFn>,
}

impl Registry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            transforms: HashMap::new(),
        }
    }

    /// Create a registry holding the builtin transform set
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for (name, func) in transforms::builtins() {
            registry.insert(name, Arc::new(func));
        }
        registry
    }

    /// Register a transform, replacing any existing one with the same name.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::ReservedName`] for `each` and `object`.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        func: impl Fn(&Value, &Value) -> Result<Value> + Send + Sync + 'static,
    ) -> Result<&mut Self> {
        let name = name.into();
        if is_reserved(&name) {
            return Err(TransformError::ReservedName { name });
        }
        tracing::debug!(transform = %name, "registering transform");
        self.insert(name, Arc::new(func));
        Ok(self)
    }

    fn insert(&mut self, name: impl Into<String>, func: TransformFn) {
        self.transforms.insert(name.into(), func);
    }

    /// Remove a transform, returning it if it was registered
    pub fn unregister(&mut self, name: &str) -> Option<TransformFn> {
        self.transforms.remove(name)
    }

    /// Get a transform by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TransformFn> {
        self.transforms.get(name)
    }

    /// Check if a transform exists
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.transforms.contains_key(name)
    }

    /// Registered names, sorted
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.transforms.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered transforms
    #[must_use]
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// Check if registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Look up `name` and run it on `value`.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::UnknownTransform`] if nothing is registered
    /// under `name`, or whatever the transform itself reports.
    pub fn apply(&self, name: &str, value: &Value, options: &Value) -> Result<Value> {
        let func = self
            .get(name)
            .ok_or_else(|| TransformError::unknown_transform(name))?;
        func(value, options)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("transforms", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry_is_empty() {
        let registry = Registry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_builtin_names() {
        let registry = Registry::builtin();
        assert_eq!(
            registry.names(),
            vec![
                "collapseWhitespace",
                "decodeAsUriComponent",
                "default",
                "replace",
                "split",
                "toBool",
                "toFloat",
                "toInt",
                "toLowerCase",
                "toUpperCase",
                "trim",
                "undefinedIfEmpty",
            ]
        );
    }

    #[test]
    fn test_register_custom_transform() {
        let mut registry = Registry::builtin();
        registry
            .register("reverse", |value: &Value, _: &Value| {
                Ok(match value {
                    Value::String(s) => Value::String(s.chars().rev().collect()),
                    other => other.clone(),
                })
            })
            .unwrap();

        assert!(registry.contains("reverse"));
        let result = registry
            .apply("reverse", &Value::from("abc"), &Value::Undefined)
            .unwrap();
        assert_eq!(result, Value::from("cba"));
    }

    #[test]
    fn test_register_replaces_existing() {
        let mut registry = Registry::builtin();
        let before = registry.len();
        registry
            .register("trim", |_: &Value, _: &Value| Ok(Value::from("custom")))
            .unwrap();

        assert_eq!(registry.len(), before);
        let result = registry
            .apply("trim", &Value::from("  x "), &Value::Undefined)
            .unwrap();
        assert_eq!(result, Value::from("custom"));
    }

    #[test]
    fn test_reserved_names_rejected() {
        let mut registry = Registry::new();
        for name in RESERVED_NAMES {
            let err = registry
                .register(name, |value: &Value, _: &Value| Ok(value.clone()))
                .unwrap_err();
            assert_eq!(
                err,
                TransformError::ReservedName {
                    name: name.to_string()
                }
            );
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn test_apply_unknown_transform() {
        let registry = Registry::builtin();
        let err = registry
            .apply("unknownTransform", &Value::from("hello"), &Value::Undefined)
            .unwrap_err();
        assert_eq!(err, TransformError::unknown_transform("unknownTransform"));
        assert_eq!(
            err.to_string(),
            "Unknown transform 'unknownTransform' specified"
        );
    }

    #[test]
    fn test_unregister() {
        let mut registry = Registry::builtin();
        assert!(registry.unregister("trim").is_some());
        assert!(!registry.contains("trim"));
        assert!(registry.unregister("trim").is_none());
    }

    #[test]
    fn test_registry_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Registry>();
    }
}
