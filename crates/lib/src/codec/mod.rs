//! Encoding values to and from the strings a backend stores.
//!
//! Two codecs are provided:
//!
//! - [`RichCodec`] wraps the serde representation of [`Value`] in a small
//!   versioned envelope. It preserves everything plain JSON cannot express,
//!   such as [`Value::Empty`] slots and [`Value::Date`] leaves.
//! - [`JsonCodec`] writes plain JSON, readable by anything else sharing the
//!   store.
//!
//! Both pass text values through unencoded, and both decode with the same
//! fallback chain: rich envelope, then plain JSON, then the raw string as
//! [`Value::Text`]. Decoding therefore never fails.

use std::borrow::Cow;

use serde::{Deserialize, Deserializer, Serialize};

use crate::Value;

pub mod errors;

pub use errors::CodecError;

/// Current rich envelope format version.
/// v0 indicates this is an unstable format subject to breaking changes.
const RICH_VERSION: u8 = 0;

/// Converts between [`Value`]s and stored strings.
pub trait Codec: Send + Sync {
    /// Encodes a value for storage. Text values are returned unchanged.
    fn encode(&self, value: &Value) -> Result<String, CodecError>;

    /// Decodes a stored string.
    fn decode(&self, raw: &str) -> Value {
        decode_with_fallback(raw)
    }

    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;
}

/// Codec selection for [`crate::StorageConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecKind {
    #[default]
    Rich,
    Json,
}

impl CodecKind {
    pub fn build(self) -> Box<dyn Codec> {
        match self {
            CodecKind::Rich => Box::new(RichCodec),
            CodecKind::Json => Box::new(JsonCodec),
        }
    }
}

/// Validates the envelope version during deserialization.
fn validate_rich_version<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let version = u8::deserialize(deserializer)?;
    if version != RICH_VERSION {
        return Err(serde::de::Error::custom(format!(
            "unsupported rich encoding version {version}; only version {RICH_VERSION} is supported"
        )));
    }
    Ok(version)
}

/// Stored form of a rich-encoded value.
#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RichEnvelope<V> {
    #[serde(rename = "$rich", deserialize_with = "validate_rich_version")]
    version: u8,
    value: V,
}

/// Lossless codec for every [`Value`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RichCodec;

impl Codec for RichCodec {
    fn encode(&self, value: &Value) -> Result<String, CodecError> {
        if let Value::Text(text) = value {
            return Ok(text.clone());
        }
        // Non-finite floats serialize as null, which the envelope cannot
        // read back, so they are stored as null values instead.
        let value: Cow<'_, Value> = if value.is_finite() {
            Cow::Borrowed(value)
        } else {
            Cow::Owned(value.clone().into_finite())
        };
        let envelope = RichEnvelope {
            version: RICH_VERSION,
            value: value.as_ref(),
        };
        serde_json::to_string(&envelope).map_err(|source| CodecError::EncodeFailed {
            value_type: value.type_name(),
            source,
        })
    }

    fn name(&self) -> &'static str {
        "rich"
    }
}

/// Plain JSON codec.
///
/// Lossy for values JSON cannot represent; see [`Value::to_json`].
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode(&self, value: &Value) -> Result<String, CodecError> {
        if let Value::Text(text) = value {
            return Ok(text.clone());
        }
        serde_json::to_string(&value.to_json()).map_err(|source| CodecError::EncodeFailed {
            value_type: value.type_name(),
            source,
        })
    }

    fn name(&self) -> &'static str {
        "json"
    }
}

/// Decodes `raw`: rich envelope, then plain JSON, then raw text.
pub fn decode_with_fallback(raw: &str) -> Value {
    if let Ok(envelope) = serde_json::from_str::<RichEnvelope<Value>>(raw) {
        return envelope.value;
    }
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(json) => Value::from(json),
        Err(_) => Value::Text(raw.to_string()),
    }
}
