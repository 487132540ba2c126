#![deny(warnings)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # normalise-transforms
//!
//! Named transformation registry and the builtin transform set.
//!
//! Every transform has the same shape: it receives the current field value
//! and the raw options payload declared in the specification, and returns a
//! replacement value. Transforms are total over their input values; they only
//! fail when their options are missing or malformed (or, for URI decoding,
//! when the input is not valid percent-encoding).

/// JavaScript-compatible numeric coercion.
pub mod numeric;
/// Typed option payloads built from shorthand or structured options.
pub mod options;
/// Name to function mapping consumed by the traversal engine.
pub mod registry;
/// The builtin transform functions.
pub mod transforms;

pub use options::{DefaultOptions, ReplaceOptions, SplitOptions};
pub use registry::{EACH, OBJECT, RESERVED_NAMES, Registry, TransformFn, is_reserved};

use thiserror::Error;

/// Errors raised while resolving or running a transform
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    #[error("Unknown transform '{name}' specified")]
    UnknownTransform { name: String },

    #[error("'{name}' is a reserved directive name and cannot be registered as a transform")]
    ReservedName { name: String },

    #[error("{option} option not specified for {transform} transform")]
    MissingOption { transform: String, option: String },

    #[error("Invalid {option} option for {transform} transform: {reason}")]
    InvalidOption {
        transform: String,
        option: String,
        reason: String,
    },

    #[error("Cannot decode '{input}' in {transform} transform: {reason}")]
    Decode {
        transform: String,
        input: String,
        reason: String,
    },
}

impl TransformError {
    /// Build an unknown-transform error for the requested name.
    pub fn unknown_transform(name: impl Into<String>) -> Self {
        Self::UnknownTransform { name: name.into() }
    }

    /// Build a missing-option error naming the transform and its option field.
    pub fn missing_option(transform: impl Into<String>, option: impl Into<String>) -> Self {
        Self::MissingOption {
            transform: transform.into(),
            option: option.into(),
        }
    }

    /// Build an invalid-option error with the reason the payload was rejected.
    pub fn invalid_option(
        transform: impl Into<String>,
        option: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidOption {
            transform: transform.into(),
            option: option.into(),
            reason: reason.into(),
        }
    }

    /// Build a decode error for malformed input.
    pub fn decode(
        transform: impl Into<String>,
        input: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Decode {
            transform: transform.into(),
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by missing or malformed transform options.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::MissingOption { .. } | Self::InvalidOption { .. })
    }
}

/// Crate-local result type for transform operations.
pub type Result<T> = std::result::Result<T, TransformError>;
