//! Error types for value encoding.

use thiserror::Error;

/// Failures while encoding a value for storage.
///
/// Decoding has no error type: unrecognized input decodes to text.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum CodecError {
    /// Serializing the value failed.
    #[error("Failed to encode {value_type} value")]
    EncodeFailed {
        value_type: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl From<CodecError> for crate::Error {
    fn from(err: CodecError) -> Self {
        crate::Error::Codec(err)
    }
}
