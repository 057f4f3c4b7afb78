//! Error types for path traversal.
//!
//! Every variant carries `path`, the dotted prefix consumed up to and
//! including the segment that failed, so the message points at the exact
//! position in the address.

use thiserror::Error;

/// Failures raised while walking or mutating a value tree.
#[non_exhaustive]
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PathError {
    /// An index segment met something other than a list.
    #[error("Expected a list at '{path}', found {found}")]
    NotAnArray { path: String, found: &'static str },

    /// A key segment met something other than a map.
    #[error("Expected a map at '{path}', found {found}")]
    NotAnObject { path: String, found: &'static str },

    /// An index segment carried a negative value.
    #[error("Negative index {index} at '{path}'")]
    NegativeIndex { path: String, index: i64 },

    /// An index segment is larger than the largest supported index.
    #[error("Index segment '{segment}' at '{path}' exceeds the maximum index {max}")]
    IndexOverflow {
        path: String,
        segment: String,
        max: i64,
    },

    /// An index is past the end of the list and auto-creation is disabled.
    #[error("Index {index} out of bounds at '{path}' (length {len})")]
    IndexOutOfBounds {
        path: String,
        index: usize,
        len: usize,
    },

    /// Auto-creation would add more empty slots to a list than allowed.
    #[error("Index {index} at '{path}' would grow the list from length {len} by more than {max} slots")]
    GrowthLimit {
        path: String,
        index: usize,
        len: usize,
        max: usize,
    },

    /// An intermediate list slot holds no value and auto-creation is disabled.
    #[error("Path not found: '{path}'")]
    PathNotFound { path: String },

    /// An intermediate map key is missing and auto-creation is disabled.
    #[error("Property missing: '{path}'")]
    PropertyMissing { path: String },

    /// An intermediate value is null while more segments remain.
    #[error("Cannot descend through null at '{path}'")]
    NullInPath { path: String },

    /// The stored root's kind disagrees with the first path segment.
    #[error("Stored value at '{path}' is {found}, expected {expected} for this path")]
    ShapeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A mutation was requested with no segments to address.
    #[error("Empty path")]
    EmptyPath,
}

impl PathError {
    /// The consumed path prefix at the point of failure.
    pub fn path(&self) -> &str {
        match self {
            PathError::NotAnArray { path, .. }
            | PathError::NotAnObject { path, .. }
            | PathError::NegativeIndex { path, .. }
            | PathError::IndexOverflow { path, .. }
            | PathError::IndexOutOfBounds { path, .. }
            | PathError::GrowthLimit { path, .. }
            | PathError::PathNotFound { path }
            | PathError::PropertyMissing { path }
            | PathError::NullInPath { path }
            | PathError::ShapeMismatch { path, .. } => path,
            PathError::EmptyPath => "",
        }
    }

    /// Check if this error means the addressed slot does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            PathError::PathNotFound { .. }
                | PathError::PropertyMissing { .. }
                | PathError::IndexOutOfBounds { .. }
        )
    }

    /// Check if this error is a container kind conflict.
    pub fn is_type_error(&self) -> bool {
        matches!(
            self,
            PathError::NotAnArray { .. }
                | PathError::NotAnObject { .. }
                | PathError::ShapeMismatch { .. }
        )
    }

    /// Check if this error comes from an unusable index segment.
    pub fn is_index_error(&self) -> bool {
        matches!(
            self,
            PathError::NegativeIndex { .. }
                | PathError::IndexOverflow { .. }
                | PathError::GrowthLimit { .. }
        )
    }

    /// Check if this is a root shape mismatch.
    pub fn is_shape_mismatch(&self) -> bool {
        matches!(self, PathError::ShapeMismatch { .. })
    }
}

impl From<PathError> for crate::Error {
    fn from(err: PathError) -> Self {
        crate::Error::Path(err)
    }
}
