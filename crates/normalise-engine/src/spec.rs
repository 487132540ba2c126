//! Normaliser specification model
//!
//! A [`Specification`] maps field names to [`DirectiveSet`]s; a directive set
//! is the ordered chain of [`Directive`]s applied to one field. Both orders
//! are declaration order and drive execution order.
//!
//! Specifications are usually compiled from a loosely-typed tree:
//!
//! ```text
//! {
//!   name:     { trim: true, undefinedIfEmpty: true },
//!   tags:     { each: { trim: true, toLowerCase: true } },
//!   shipping: { object: { address: { trim: true } } },
//!   items:    { each: { object: { sku: { toUpperCase: true } } } }
//! }
//! ```

use indexmap::IndexMap;
use normalise_transforms::{EACH, OBJECT, Registry};
use normalise_value::Value;
use serde::Deserialize;
use tracing::warn;

use crate::error::{Error, Result};
use crate::path::FieldPath;

/// Named transform with its raw options payload
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Registry name
    pub name: String,

    /// Options as declared; `true` for option-less transforms by convention
    pub options: Value,
}

impl Transform {
    pub fn new(name: impl Into<String>, options: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            options: options.into(),
        }
    }
}

/// Body of an `each` directive
#[derive(Debug, Clone, PartialEq)]
pub enum EachDirective {
    /// Normalise every element as a nested mapping
    Object(Specification),

    /// Run the transforms, in order, on every element
    Transforms(Vec<Transform>),
}

impl EachDirective {
    #[must_use]
    pub fn object(spec: Specification) -> Self {
        Self::Object(spec)
    }

    pub fn transforms(transforms: impl IntoIterator<Item = Transform>) -> Self {
        Self::Transforms(transforms.into_iter().collect())
    }
}

/// One step in a field's directive chain
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// Replace the field with the transform's result
    Transform(Transform),

    /// Apply to each element of a sequence field
    Each(EachDirective),

    /// Descend into a mapping field
    Object(Specification),
}

impl Directive {
    /// Directive name as it appears in a specification.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Directive::Transform(transform) => transform.name.as_str(),
            Directive::Each(_) => EACH,
            Directive::Object(_) => OBJECT,
        }
    }
}

/// Ordered directive chain for a single field
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DirectiveSet {
    directives: Vec<Directive>,
}

impl DirectiveSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a named transform
    #[must_use]
    pub fn transform(mut self, name: impl Into<String>, options: impl Into<Value>) -> Self {
        self.directives
            .push(Directive::Transform(Transform::new(name, options)));
        self
    }

    /// Append an `each` directive
    #[must_use]
    pub fn each(mut self, each: EachDirective) -> Self {
        self.directives.push(Directive::Each(each));
        self
    }

    /// Append an `object` directive
    #[must_use]
    pub fn object(mut self, spec: Specification) -> Self {
        self.directives.push(Directive::Object(spec));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &Directive> {
        self.directives.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.directives.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    fn compile<'v>(value: &'v Value, path: &mut FieldPath<'v>) -> Result<Self> {
        let Value::Object(entries) = value else {
            return Err(Error::invalid_specification(
                path.to_string(),
                format!("directive set must be a mapping, found {}", value.type_name()),
            ));
        };

        let mut directives = Vec::with_capacity(entries.len());
        for (name, options) in entries {
            let directive = match name.as_str() {
                EACH => Directive::Each(EachDirective::compile(options, path)?),
                OBJECT => Directive::Object(Specification::compile(options, path)?),
                _ => Directive::Transform(Transform::new(name.as_str(), options.clone())),
            };
            directives.push(directive);
        }
        Ok(Self { directives })
    }
}

impl<'a> IntoIterator for &'a DirectiveSet {
    type Item = &'a Directive;
    type IntoIter = std::slice::Iter<'a, Directive>;

    fn into_iter(self) -> Self::IntoIter {
        self.directives.iter()
    }
}

impl EachDirective {
    fn compile<'v>(value: &'v Value, path: &mut FieldPath<'v>) -> Result<Self> {
        let Value::Object(entries) = value else {
            return Err(Error::invalid_specification(
                path.to_string(),
                format!("each directive must be a mapping, found {}", value.type_name()),
            ));
        };

        if let Some(nested) = entries.get(OBJECT) {
            if entries.len() > 1 {
                warn!(
                    path = %path,
                    "each directive has an object directive; sibling directives are ignored"
                );
            }
            return Ok(Self::Object(Specification::compile(nested, path)?));
        }

        if entries.contains_key(EACH) {
            return Err(Error::invalid_specification(
                path.to_string(),
                "nested each directive is not supported",
            ));
        }

        let transforms = entries
            .iter()
            .map(|(name, options)| Transform::new(name.as_str(), options.clone()))
            .collect();
        Ok(Self::Transforms(transforms))
    }
}

/// Field name to directive chain, in declaration order
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(try_from = "Value")]
pub struct Specification {
    fields: IndexMap<String, DirectiveSet>,
}

impl Specification {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the directive chain for `name`
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, directives: DirectiveSet) -> Self {
        self.fields.insert(name.into(), directives);
        self
    }

    /// Get the directive chain declared for a field
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DirectiveSet> {
        self.fields.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &DirectiveSet)> {
        self.fields.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Compile a specification tree.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSpecification`] if a specification node or
    /// directive set is not a mapping.
    pub fn from_value(value: &Value) -> Result<Self> {
        Self::compile(value, &mut FieldPath::new())
    }

    fn compile<'v>(value: &'v Value, path: &mut FieldPath<'v>) -> Result<Self> {
        let Value::Object(entries) = value else {
            return Err(Error::invalid_specification(
                path.to_string(),
                format!("specification must be a mapping, found {}", value.type_name()),
            ));
        };

        let mut fields = IndexMap::with_capacity(entries.len());
        for (name, directives) in entries {
            path.push_field(name);
            fields.insert(name.clone(), DirectiveSet::compile(directives, path)?);
            path.pop();
        }
        Ok(Self { fields })
    }

    /// Check that every transform named anywhere in the specification is
    /// registered.
    ///
    /// Normalising resolves names lazily and fails on the first unknown one
    /// after earlier fields were already rewritten; validating up front
    /// rejects the specification before any data is touched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownTransform`] for the first unregistered name.
    pub fn validate(&self, registry: &Registry) -> Result<()> {
        self.validate_at(registry, &mut FieldPath::new())
    }

    fn validate_at<'s>(&'s self, registry: &Registry, path: &mut FieldPath<'s>) -> Result<()> {
        for (name, directives) in &self.fields {
            path.push_field(name);
            for directive in directives {
                match directive {
                    Directive::Transform(transform) => check_registered(registry, transform, path)?,
                    Directive::Each(EachDirective::Transforms(transforms)) => {
                        for transform in transforms {
                            check_registered(registry, transform, path)?;
                        }
                    }
                    Directive::Each(EachDirective::Object(nested)) | Directive::Object(nested) => {
                        nested.validate_at(registry, path)?;
                    }
                }
            }
            path.pop();
        }
        Ok(())
    }
}

fn check_registered(registry: &Registry, transform: &Transform, path: &FieldPath<'_>) -> Result<()> {
    if registry.contains(&transform.name) {
        Ok(())
    } else {
        Err(Error::UnknownTransform {
            path: path.to_string(),
            name: transform.name.clone(),
        })
    }
}

impl TryFrom<&Value> for Specification {
    type Error = Error;

    fn try_from(value: &Value) -> Result<Self> {
        Self::from_value(value)
    }
}

impl TryFrom<Value> for Specification {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(&value)
    }
}

impl TryFrom<serde_json::Value> for Specification {
    type Error = Error;

    fn try_from(value: serde_json::Value) -> Result<Self> {
        Self::from_value(&Value::from(value))
    }
}
