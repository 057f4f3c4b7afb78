//! Error types for storage backends.
//!
//! Every backend failure surfaces as a [`BackendError`]. The façade treats
//! all of them alike: it reports the failure and falls back to a safe value.

use thiserror::Error;

/// Errors that can occur in a storage backend.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum BackendError {
    /// A lock guarding backend state was poisoned by a panicking writer.
    #[error("Backend lock poisoned: {resource}")]
    LockPoisoned {
        /// The guarded resource
        resource: &'static str,
    },

    /// Serialization of persisted state failed.
    #[error("Serialization failed")]
    SerializationFailed {
        #[source]
        source: serde_json::Error,
    },

    /// Deserialization of persisted state failed.
    #[error("Deserialization failed")]
    DeserializationFailed {
        #[source]
        source: serde_json::Error,
    },

    /// File I/O error.
    #[error("File I/O error on {path}")]
    FileIo {
        /// The file being read or written
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The backend refused or could not complete the operation.
    #[error("Backend unavailable for {operation}: {reason}")]
    Unavailable {
        operation: &'static str,
        reason: String,
    },
}

impl BackendError {
    /// Check if this error is related to I/O or persisted state.
    pub fn is_io_error(&self) -> bool {
        matches!(
            self,
            BackendError::FileIo { .. }
                | BackendError::SerializationFailed { .. }
                | BackendError::DeserializationFailed { .. }
        )
    }

    /// Check if this error is a poisoned lock.
    pub fn is_lock_error(&self) -> bool {
        matches!(self, BackendError::LockPoisoned { .. })
    }
}

// Conversion from BackendError to the main Error type
impl From<BackendError> for crate::Error {
    fn from(err: BackendError) -> Self {
        crate::Error::Backend(err)
    }
}
