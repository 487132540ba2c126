#![deny(warnings)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # normalise-value
//!
//! Dynamic data node model for the normalise engine.
//!
//! A [`Value`] is the loosely-typed tree the engine walks and rewrites in
//! place: primitives, ordered sequences and insertion-ordered mappings, plus
//! an explicit [`Value::Undefined`] for "absent" so transforms can tell a
//! missing field apart from an explicit `null`.

/// Conversions between [`Value`] and `serde_json::Value`, and serde impls.
pub mod json;
/// The data node enum and its accessors.
pub mod value;

/// Primary data node type and its ordered map.
pub use value::{Map, Value};

