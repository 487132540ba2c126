#![deny(warnings)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # normalise-engine
//!
//! Declarative, in-place normalisation of nested data.
//!
//! A [`Specification`] names the fields to normalise and, per field, the
//! chain of directives to run in declaration order: named transforms from a
//! [`Registry`], `each` to apply directives to every element of a sequence,
//! and `object` to descend into a nested mapping.
//!
//! ```rust
//! use normalise_engine::{normalise, Specification, Value};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let spec = Specification::try_from(json!({
//!     "name": {"trim": true, "undefinedIfEmpty": true},
//!     "shipping": {"object": {"postcode": {"toUpperCase": true}}},
//! }))?;
//! let mut data = Value::from(json!({"name": "  ", "shipping": {"postcode": "ab1"}}));
//! normalise(&mut data, &spec)?;
//! assert_eq!(data.to_json(), json!({"shipping": {"postcode": "AB1"}}));
//! # Ok(())
//! # }
//! ```
//!
//! The data is mutated, not copied; the returned reference points at the
//! caller's value.

/// Engine configuration and shape policy.
pub mod config;
/// Engine error types.
pub mod error;
/// Field paths used in errors and logs.
pub mod path;
/// The traversal engine.
pub mod normaliser;
/// Specification model and compilation.
pub mod spec;

pub use config::{NormaliseConfig, ShapePolicy};
pub use error::{Error, ErrorKind, Result};
pub use normaliser::{Normaliser, normalise, normalise_with};
pub use spec::{Directive, DirectiveSet, EachDirective, Specification, Transform};

pub use normalise_transforms::{Registry, TransformError, TransformFn};
pub use normalise_value::{Map, Value};
