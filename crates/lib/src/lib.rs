//!
//! Pathstore: address-based access to nested values in a string key-value store.
//!
//! Backends such as browser local storage only store strings under flat keys.
//! This library layers structured values and deep addressing on top of them:
//! an address like `"user:1.prefs.theme"` names the storage key `user:1` and
//! the path `prefs.theme` inside the value stored there.
//!
//! ## Core Concepts
//!
//! * **Values (`value::Value`)**: The tree of maps, lists and leaves that gets stored.
//!   Lists may contain empty slots (`Value::Empty`), which are distinct from null.
//! * **Paths (`path::Path`)**: Dotted segment paths. Segments made only of digits are
//!   list indices; everything else is a map key.
//! * **Traversal (`path::traverse`)**: Pure functions that walk, write and delete along
//!   a path, optionally creating missing containers.
//! * **Codecs (`codec::Codec`)**: Convert values to and from stored strings.
//! * **Backends (`backend::Backend`)**: The string key-value store itself.
//! * **Storage (`store::Storage`)**: The façade tying these together. Its methods
//!   never fail; problems are reported to a `diagnostics::DiagnosticSink`.

pub mod backend;
pub mod codec;
pub mod diagnostics;
pub mod path;
pub mod store;
pub mod value;

pub use store::{GetOptions, SetOptions, Storage, StorageConfig};
pub use value::Value;

/// Result type used throughout the Pathstore library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the Pathstore library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Serialization error")]
    Serialize(#[from] serde_json::Error),

    /// Structured path errors from the path module
    #[error(transparent)]
    Path(path::PathError),

    /// Structured backend errors from the backend module
    #[error(transparent)]
    Backend(backend::BackendError),

    /// Structured encoding errors from the codec module
    #[error(transparent)]
    Codec(codec::CodecError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Path(_) => "path",
            Error::Backend(_) => "backend",
            Error::Codec(_) => "codec",
            Error::Serialize(_) => "serialize",
        }
    }

    /// Check if this error indicates the addressed value was not found.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Path(path_err) => path_err.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error comes from walking a path.
    pub fn is_path_error(&self) -> bool {
        matches!(self, Error::Path(_))
    }

    /// Check if this error is a stored value whose kind conflicts with the path.
    pub fn is_type_error(&self) -> bool {
        match self {
            Error::Path(path_err) => path_err.is_type_error(),
            _ => false,
        }
    }

    /// Check if this error is a root value that cannot be addressed by the path.
    pub fn is_shape_mismatch(&self) -> bool {
        match self {
            Error::Path(path_err) => path_err.is_shape_mismatch(),
            _ => false,
        }
    }

    /// Check if this error is about a list index.
    pub fn is_index_error(&self) -> bool {
        match self {
            Error::Path(path_err) => path_err.is_index_error(),
            _ => false,
        }
    }

    /// Check if this error is backend-related.
    pub fn is_backend_error(&self) -> bool {
        matches!(self, Error::Backend(_))
    }

    /// Check if this error is I/O related.
    pub fn is_io_error(&self) -> bool {
        match self {
            Error::Backend(backend_err) => backend_err.is_io_error(),
            _ => false,
        }
    }

    /// Check if this error is an encoding failure.
    pub fn is_codec_error(&self) -> bool {
        matches!(self, Error::Codec(_))
    }
}
