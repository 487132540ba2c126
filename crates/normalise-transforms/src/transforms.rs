//! Builtin transforms
//!
//! String-only transforms pass every non-string value through unchanged.
//! Options-bearing transforms validate their options before looking at the
//! input, so a misconfigured specification fails regardless of the data.

use normalise_value::Value;
use percent_encoding::percent_decode_str;
use regex::Regex;
use std::sync::OnceLock;

use crate::numeric::{is_whitespace, parse_float, parse_int};
use crate::options::{DefaultOptions, ReplaceOptions, SplitOptions};
use crate::{Result, TransformError};

/// Signature shared by every builtin transform.
pub type BuiltinFn = fn(&Value, &Value) -> Result<Value>;

pub const TRIM: &str = "trim";
pub const TO_UPPER_CASE: &str = "toUpperCase";
pub const TO_LOWER_CASE: &str = "toLowerCase";
pub const COLLAPSE_WHITESPACE: &str = "collapseWhitespace";
pub const UNDEFINED_IF_EMPTY: &str = "undefinedIfEmpty";
pub const REPLACE: &str = ReplaceOptions::TRANSFORM;
pub const TO_FLOAT: &str = "toFloat";
pub const TO_INT: &str = "toInt";
pub const TO_BOOL: &str = "toBool";
pub const DECODE_AS_URI_COMPONENT: &str = "decodeAsUriComponent";
pub const DEFAULT: &str = DefaultOptions::TRANSFORM;
pub const SPLIT: &str = SplitOptions::TRANSFORM;

/// The builtin transform set, keyed by registry name.
#[must_use]
pub fn builtins() -> [(&'static str, BuiltinFn); 12] {
    [
        (TRIM, trim),
        (TO_UPPER_CASE, to_upper_case),
        (TO_LOWER_CASE, to_lower_case),
        (COLLAPSE_WHITESPACE, collapse_whitespace),
        (UNDEFINED_IF_EMPTY, undefined_if_empty),
        (REPLACE, replace),
        (TO_FLOAT, to_float),
        (TO_INT, to_int),
        (TO_BOOL, to_bool),
        (DECODE_AS_URI_COMPONENT, decode_as_uri_component),
        (DEFAULT, default),
        (SPLIT, split),
    ]
}

/// Apply `f` to string values; everything else passes through.
fn map_string(value: &Value, f: impl FnOnce(&str) -> Value) -> Value {
    match value {
        Value::String(s) => f(s),
        other => other.clone(),
    }
}

/// Strip leading and trailing whitespace
///
/// # Errors
///
/// Never fails.
pub fn trim(value: &Value, _options: &Value) -> Result<Value> {
    Ok(map_string(value, |s| Value::from(s.trim_matches(is_whitespace))))
}

/// Convert string to uppercase
///
/// # Errors
///
/// Never fails.
pub fn to_upper_case(value: &Value, _options: &Value) -> Result<Value> {
    Ok(map_string(value, |s| Value::String(s.to_uppercase())))
}

/// Convert string to lowercase
///
/// # Errors
///
/// Never fails.
pub fn to_lower_case(value: &Value, _options: &Value) -> Result<Value> {
    Ok(map_string(value, |s| Value::String(s.to_lowercase())))
}

fn whitespace_run() -> &'static Regex {
    static WHITESPACE_RUN: OnceLock<Regex> = OnceLock::new();
    WHITESPACE_RUN
        .get_or_init(|| Regex::new(r"[\s\x{FEFF}--\x{85}]{2,}").expect("whitespace pattern is valid"))
}

/// Replace every run of two or more whitespace characters with one space
///
/// # Errors
///
/// Never fails.
pub fn collapse_whitespace(value: &Value, _options: &Value) -> Result<Value> {
    Ok(map_string(value, |s| {
        Value::String(whitespace_run().replace_all(s, " ").into_owned())
    }))
}

/// Turn null, absent and zero-length values into `Undefined`
///
/// Strings and sequences expose a length; numbers, booleans and mappings do
/// not and pass through.
///
/// # Errors
///
/// Never fails.
pub fn undefined_if_empty(value: &Value, _options: &Value) -> Result<Value> {
    if value.is_nil() || value.len() == Some(0) {
        Ok(Value::Undefined)
    } else {
        Ok(value.clone())
    }
}

/// Replace every match of `pattern` with `newSubStr`
///
/// # Errors
///
/// Returns a configuration error if `pattern` or `newSubStr` is missing or
/// the pattern is not a valid regular expression.
pub fn replace(value: &Value, options: &Value) -> Result<Value> {
    let options = ReplaceOptions::from_options(options)?;
    Ok(map_string(value, |s| {
        Value::String(
            options
                .pattern
                .replace_all(s, options.new_sub_str.as_str())
                .into_owned(),
        )
    }))
}

/// Parse strings as floating point numbers; `NaN` when nothing parses
///
/// # Errors
///
/// Never fails.
pub fn to_float(value: &Value, _options: &Value) -> Result<Value> {
    Ok(map_string(value, |s| Value::Number(parse_float(s))))
}

/// Parse strings as integers; `NaN` when nothing parses
///
/// # Errors
///
/// Never fails.
pub fn to_int(value: &Value, _options: &Value) -> Result<Value> {
    Ok(map_string(value, |s| Value::Number(parse_int(s))))
}

/// Convert `"true"` / `"false"` in any letter case to booleans
///
/// # Errors
///
/// Never fails.
pub fn to_bool(value: &Value, _options: &Value) -> Result<Value> {
    Ok(match value {
        Value::String(s) if s.eq_ignore_ascii_case("true") => Value::Bool(true),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Value::Bool(false),
        other => other.clone(),
    })
}

/// Percent-decode a URI component
///
/// # Errors
///
/// Returns [`TransformError::Decode`] when a `%` is not followed by two hex
/// digits or the decoded bytes are not UTF-8.
pub fn decode_as_uri_component(value: &Value, _options: &Value) -> Result<Value> {
    let Value::String(input) = value else {
        return Ok(value.clone());
    };

    let bytes = input.as_bytes();
    for (index, byte) in bytes.iter().enumerate() {
        if *byte == b'%' {
            let escape = bytes.get(index + 1..index + 3);
            if !escape.is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit)) {
                return Err(TransformError::decode(
                    DECODE_AS_URI_COMPONENT,
                    input.as_str(),
                    format!("malformed escape sequence at byte {index}"),
                ));
            }
        }
    }

    percent_decode_str(input)
        .decode_utf8()
        .map(|decoded| Value::String(decoded.into_owned()))
        .map_err(|e| {
            TransformError::decode(
                DECODE_AS_URI_COMPONENT,
                input.as_str(),
                format!("decoded bytes are not valid UTF-8: {e}"),
            )
        })
}

/// Replace null or absent values with the configured default
///
/// # Errors
///
/// Returns [`TransformError::MissingOption`] when no default is configured,
/// whatever the input.
pub fn default(value: &Value, options: &Value) -> Result<Value> {
    let options = DefaultOptions::from_options(options)?;
    if value.is_nil() {
        Ok(options.value)
    } else {
        Ok(value.clone())
    }
}

/// Split strings into a sequence of substrings
///
/// An empty separator splits into single characters.
///
/// # Errors
///
/// Returns a configuration error when no string separator is configured,
/// whatever the input.
pub fn split(value: &Value, options: &Value) -> Result<Value> {
    let options = SplitOptions::from_options(options)?;
    Ok(map_string(value, |s| {
        let parts: Vec<Value> = if options.separator.is_empty() {
            s.chars().map(|c| Value::String(c.to_string())).collect()
        } else {
            s.split(options.separator.as_str()).map(Value::from).collect()
        };
        Value::Array(parts)
    }))
}
