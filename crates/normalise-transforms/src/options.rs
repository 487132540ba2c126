//! Option payloads for transforms that need configuration
//!
//! Specifications carry options as loosely-typed values. Each options-bearing
//! transform converts that payload into one of these structs before touching
//! its input, accepting either a bare shorthand value or a structured object
//! with a documented field:
//!
//! | transform | shorthand | structured |
//! |---|---|---|
//! | `default` | `default: 0` | `default: {value: 0}` |
//! | `split` | `split: ","` | `split: {separator: ","}` |
//! | `replace` | none | `replace: {pattern: "H", newSubStr: "-"}` |
//!
//! A structured object without the documented field counts as a missing
//! option; wrap literal object defaults as `{value: {...}}`.

use normalise_value::Value;
use regex::Regex;

use crate::{Result, TransformError};

/// Read the documented field of a structured payload, or the payload itself.
fn shorthand_or_field<'a>(options: &'a Value, field: &str) -> &'a Value {
    match options {
        Value::Object(_) => options.get(field),
        other => other,
    }
}

/// Options for the `default` transform
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultOptions {
    /// Replacement for null or absent inputs
    pub value: Value,
}

impl DefaultOptions {
    pub const TRANSFORM: &'static str = "default";
    pub const FIELD: &'static str = "value";

    /// Build from `value` or `{value}`.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::MissingOption`] when no value is configured.
    pub fn from_options(options: &Value) -> Result<Self> {
        let value = shorthand_or_field(options, Self::FIELD);
        if value.is_undefined() {
            return Err(TransformError::missing_option(Self::TRANSFORM, Self::FIELD));
        }
        Ok(Self {
            value: value.clone(),
        })
    }
}

/// Options for the `split` transform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitOptions {
    /// Substring separating the parts
    pub separator: String,
}

impl SplitOptions {
    pub const TRANSFORM: &'static str = "split";
    pub const FIELD: &'static str = "separator";

    /// Build from `separator` or `{separator}`.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::MissingOption`] when no separator is configured
    /// and [`TransformError::InvalidOption`] when it is not a string.
    pub fn from_options(options: &Value) -> Result<Self> {
        match shorthand_or_field(options, Self::FIELD) {
            Value::Undefined => Err(TransformError::missing_option(Self::TRANSFORM, Self::FIELD)),
            Value::String(separator) => Ok(Self {
                separator: separator.clone(),
            }),
            other => Err(TransformError::invalid_option(
                Self::TRANSFORM,
                Self::FIELD,
                format!("expected a string, found {}", other.type_name()),
            )),
        }
    }
}

/// Options for the `replace` transform
#[derive(Debug, Clone)]
pub struct ReplaceOptions {
    /// Compiled search pattern; every non-overlapping match is replaced
    pub pattern: Regex,

    /// Replacement text; `$1` / `${name}` refer to capture groups
    pub new_sub_str: String,
}

impl ReplaceOptions {
    pub const TRANSFORM: &'static str = "replace";
    pub const PATTERN_FIELD: &'static str = "pattern";
    pub const REPLACEMENT_FIELD: &'static str = "newSubStr";

    /// Build from `{pattern, newSubStr}`.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::MissingOption`] when either field is absent
    /// and [`TransformError::InvalidOption`] when a field is not a string or
    /// the pattern does not compile.
    pub fn from_options(options: &Value) -> Result<Self> {
        let pattern = Self::string_field(options, Self::PATTERN_FIELD)?;
        let new_sub_str = Self::string_field(options, Self::REPLACEMENT_FIELD)?;

        let pattern = Regex::new(pattern).map_err(|e| {
            TransformError::invalid_option(Self::TRANSFORM, Self::PATTERN_FIELD, e.to_string())
        })?;

        Ok(Self {
            pattern,
            new_sub_str: new_sub_str.to_string(),
        })
    }

    fn string_field<'a>(options: &'a Value, field: &str) -> Result<&'a str> {
        match options.get(field) {
            Value::Undefined => Err(TransformError::missing_option(Self::TRANSFORM, field)),
            Value::String(s) => Ok(s.as_str()),
            other => Err(TransformError::invalid_option(
                Self::TRANSFORM,
                field,
                format!("expected a string, found {}", other.type_name()),
            )),
        }
    }
}
