//! Error types for model building and mutation.

use thiserror::Error;

/// Result type for model operations.
pub type ReflexResult<T> = Result<T, ReflexError>;

/// Errors raised by [`Model`](crate::Model) operations.
///
/// Unmatched path segments are not an error under the default
/// [`PathPolicy::Permissive`](crate::PathPolicy) policy; resolution simply
/// stays at the deepest matched node.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReflexError {
    #[error("Type mismatch at `{path}`: expected {expected}, got {actual}")]
    TypeMismatch {
        path: String,
        expected: String,
        actual: String,
    },

    #[error("Unresolved segment `{segment}` in path `{path}`")]
    UnresolvedPath { path: String, segment: String },

    #[error("Handle for `{path}` does not address the model storage")]
    DetachedHandle { path: String },

    #[error("Model borrows its record; only detached models yield their value")]
    BorrowedStorage,
}

impl ReflexError {
    pub fn type_mismatch(
        path: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            path: path.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn unresolved_path(path: impl Into<String>, segment: impl Into<String>) -> Self {
        Self::UnresolvedPath {
            path: path.into(),
            segment: segment.into(),
        }
    }

    pub fn detached_handle(path: impl Into<String>) -> Self {
        Self::DetachedHandle { path: path.into() }
    }
}
