//! Traversal engine
//!
//! Walks a [`Specification`] depth-first in lock-step with a data tree and
//! rewrites the data in place. Only fields named by the specification are
//! visited; everything else is left untouched.

use normalise_transforms::{EACH, OBJECT, Registry, TransformError, TransformFn};
use normalise_value::{Map, Value};
use std::sync::{Arc, OnceLock};
use tracing::{debug, trace};

use crate::config::{NormaliseConfig, ShapePolicy};
use crate::error::{Error, Result};
use crate::path::FieldPath;
use crate::spec::{Directive, EachDirective, Specification, Transform};

/// Process-wide builtin registry, built on first use and never mutated.
fn builtin_registry() -> Arc<Registry> {
    static BUILTIN: OnceLock<Arc<Registry>> = OnceLock::new();
    Arc::clone(BUILTIN.get_or_init(|| Arc::new(Registry::builtin())))
}

/// Applies specifications to data using a transform registry
///
/// The registry is shared behind an [`Arc`]; registering a transform on a
/// normaliser whose registry is shared copies it first, so other normalisers
/// never observe the change.
#[derive(Debug, Clone)]
pub struct Normaliser {
    registry: Arc<Registry>,
    config: NormaliseConfig,
}

impl Normaliser {
    /// Create a normaliser with the builtin transforms and default config
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: builtin_registry(),
            config: NormaliseConfig::default(),
        }
    }

    /// Create a normaliser backed by a custom registry
    pub fn with_registry(registry: impl Into<Arc<Registry>>) -> Self {
        Self {
            registry: registry.into(),
            config: NormaliseConfig::default(),
        }
    }

    /// Replace the configuration
    #[must_use]
    pub fn with_config(mut self, config: NormaliseConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Mutable access to the registry, copying it if it is shared
    pub fn registry_mut(&mut self) -> &mut Registry {
        Arc::make_mut(&mut self.registry)
    }

    #[must_use]
    pub fn config(&self) -> &NormaliseConfig {
        &self.config
    }

    /// Register a custom transform
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::ReservedName`] for `each` and `object`.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        func: impl Fn(&Value, &Value) -> normalise_transforms::Result<Value> + Send + Sync + 'static,
    ) -> std::result::Result<&mut Self, TransformError> {
        self.registry_mut().register(name, func)?;
        Ok(self)
    }

    /// Normalise `data` in place and return it.
    ///
    /// `null` and absent data are left alone. The first error aborts the
    /// traversal; fields rewritten before it keep their new values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownTransform`] for unregistered names,
    /// [`Error::Configuration`] for missing or malformed options,
    /// [`Error::Transform`] for transforms rejecting their input, and
    /// [`Error::TypeMismatch`] for wrongly-shaped data under
    /// [`ShapePolicy::Strict`].
    pub fn normalise<'d>(
        &self,
        data: &'d mut Value,
        spec: &Specification,
    ) -> Result<&'d mut Value> {
        debug!(
            fields = spec.len(),
            shape_policy = ?self.config.shape_policy,
            "normalising"
        );
        let mut traversal = Traversal {
            registry: &self.registry,
            shape_policy: self.config.shape_policy,
            path: FieldPath::new(),
        };
        traversal.walk(data, spec, OBJECT)?;
        Ok(data)
    }
}

impl Default for Normaliser {
    fn default() -> Self {
        Self::new()
    }
}

/// State of a single normalise call: the registry, the policy and the path
/// of the node currently visited.
struct Traversal<'r, 's> {
    registry: &'r Registry,
    shape_policy: ShapePolicy,
    path: FieldPath<'s>,
}

impl<'s> Traversal<'_, 's> {
    /// Apply `spec` to a mapping node reached through `directive`.
    fn walk(
        &mut self,
        node: &mut Value,
        spec: &'s Specification,
        directive: &'static str,
    ) -> Result<()> {
        let map = match node {
            Value::Undefined | Value::Null => return Ok(()),
            Value::Object(map) => map,
            other => return self.mismatch(directive, "object", other),
        };

        for (field, directives) in spec.iter() {
            self.path.push_field(field);
            for directive in directives {
                match directive {
                    Directive::Transform(transform) => self.transform_field(map, field, transform)?,
                    Directive::Each(each) => {
                        if let Some(value) = map.get_mut(field.as_str()) {
                            self.each(value, each)?;
                        }
                    }
                    Directive::Object(nested) => {
                        if let Some(value) = map.get_mut(field.as_str()) {
                            self.walk(value, nested, OBJECT)?;
                        }
                    }
                }
            }
            self.path.pop();
        }
        Ok(())
    }

    /// Replace `map[field]` with the transform's result. An `Undefined`
    /// result removes the field.
    fn transform_field(&mut self, map: &mut Map, field: &str, transform: &Transform) -> Result<()> {
        let absent = Value::Undefined;
        let next = self.apply(map.get(field).unwrap_or(&absent), transform)?;

        if next.is_undefined() {
            map.shift_remove(field);
        } else if let Some(slot) = map.get_mut(field) {
            *slot = next;
        } else {
            map.insert(field.to_string(), next);
        }
        Ok(())
    }

    fn each(&mut self, value: &mut Value, each: &'s EachDirective) -> Result<()> {
        let items = match value {
            Value::Undefined | Value::Null => return Ok(()),
            Value::Array(items) => items,
            other => return self.mismatch(EACH, "array", other),
        };

        for (index, item) in items.iter_mut().enumerate() {
            self.path.push_index(index);
            match each {
                EachDirective::Object(nested) => self.walk(item, nested, EACH)?,
                EachDirective::Transforms(transforms) => {
                    for transform in transforms {
                        *item = self.apply(item, transform)?;
                    }
                }
            }
            self.path.pop();
        }
        Ok(())
    }

    fn apply(&self, value: &Value, transform: &Transform) -> Result<Value> {
        let func: &TransformFn =
            self.registry
                .get(&transform.name)
                .ok_or_else(|| Error::UnknownTransform {
                    path: self.path.to_string(),
                    name: transform.name.clone(),
                })?;

        trace!(path = %self.path, transform = %transform.name, "applying transform");
        func(value, &transform.options)
            .map_err(|e| Error::from_transform(self.path.to_string(), &transform.name, e))
    }

    fn mismatch(
        &self,
        directive: &'static str,
        expected: &'static str,
        found: &Value,
    ) -> Result<()> {
        match self.shape_policy {
            ShapePolicy::Strict => Err(Error::TypeMismatch {
                path: self.path.to_string(),
                directive,
                expected,
                found: found.type_name(),
            }),
            ShapePolicy::Lenient => {
                debug!(
                    path = %self.path,
                    directive,
                    expected,
                    found = found.type_name(),
                    "skipping value of unexpected shape"
                );
                Ok(())
            }
        }
    }
}

/// Normalise `data` in place with the builtin transforms and default config.
///
/// # Errors
///
/// See [`Normaliser::normalise`].
pub fn normalise<'d>(data: &'d mut Value, spec: &Specification) -> Result<&'d mut Value> {
    Normaliser::new().normalise(data, spec)
}

/// Normalise `data` in place with the builtin transforms and `config`.
///
/// # Errors
///
/// See [`Normaliser::normalise`].
pub fn normalise_with<'d>(
    data: &'d mut Value,
    spec: &Specification,
    config: NormaliseConfig,
) -> Result<&'d mut Value> {
    Normaliser::new().with_config(config).normalise(data, spec)
}
