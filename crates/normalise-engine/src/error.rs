//! Engine errors
//!
//! Every error aborts the traversal where it is raised. Fields normalised
//! before that point keep their new values.

use normalise_transforms::TransformError;
use thiserror::Error;

/// Errors that can occur while compiling a specification or normalising data
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Unknown transform '{name}' specified for '{path}'")]
    UnknownTransform { path: String, name: String },

    #[error("Invalid configuration for transform '{transform}' at '{path}': {source}")]
    Configuration {
        path: String,
        transform: String,
        #[source]
        source: TransformError,
    },

    #[error(
        "Type mismatch at '{path}' for '{directive}' directive: expected {expected}, found {found}"
    )]
    TypeMismatch {
        path: String,
        directive: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Transform '{transform}' failed at '{path}': {source}")]
    Transform {
        path: String,
        transform: String,
        #[source]
        source: TransformError,
    },

    #[error("Invalid specification at '{path}': {reason}")]
    InvalidSpecification { path: String, reason: String },
}

/// Coarse classification of [`Error`], for callers that only branch on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnknownTransform,
    Configuration,
    TypeMismatch,
    Transform,
    InvalidSpecification,
}

impl Error {
    /// Wrap a transform failure with the field path and transform name.
    ///
    /// Option problems become [`Error::Configuration`]; an unknown name
    /// reported by a delegating transform becomes [`Error::UnknownTransform`].
    pub fn from_transform(
        path: impl Into<String>,
        transform: impl Into<String>,
        source: TransformError,
    ) -> Self {
        let path = path.into();
        match source {
            TransformError::UnknownTransform { name } => Self::UnknownTransform { path, name },
            source if source.is_configuration() => Self::Configuration {
                path,
                transform: transform.into(),
                source,
            },
            source => Self::Transform {
                path,
                transform: transform.into(),
                source,
            },
        }
    }

    /// Build an invalid-specification error with the offending spec path.
    pub fn invalid_specification(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSpecification {
            path: path.into(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownTransform { .. } => ErrorKind::UnknownTransform,
            Self::Configuration { .. } => ErrorKind::Configuration,
            Self::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Self::Transform { .. } => ErrorKind::Transform,
            Self::InvalidSpecification { .. } => ErrorKind::InvalidSpecification,
        }
    }

    /// Path of the field the error was raised for.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::UnknownTransform { path, .. }
            | Self::Configuration { path, .. }
            | Self::TypeMismatch { path, .. }
            | Self::Transform { path, .. }
            | Self::InvalidSpecification { path, .. } => path,
        }
    }
}

/// Crate-local result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
