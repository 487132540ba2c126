//! Engine configuration

use serde::{Deserialize, Serialize};

/// What to do when `each` or `object` meets data of the wrong shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapePolicy {
    /// Fail with a type mismatch (`each` on a non-sequence, `object` on a
    /// non-mapping)
    Strict,

    /// Leave the value untouched and carry on
    Lenient,
}

impl Default for ShapePolicy {
    fn default() -> Self {
        Self::Strict
    }
}

/// Configuration for a [`Normaliser`](crate::Normaliser)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct NormaliseConfig {
    /// Handling of shape mismatches (default: strict)
    pub shape_policy: ShapePolicy,
}

impl NormaliseConfig {
    /// Create a new configuration with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration that skips wrongly-shaped values instead of failing
    #[must_use]
    pub fn lenient() -> Self {
        Self::new().shape_policy(ShapePolicy::Lenient)
    }

    /// Set the shape policy
    #[must_use]
    pub fn shape_policy(mut self, shape_policy: ShapePolicy) -> Self {
        self.shape_policy = shape_policy;
        self
    }
}
