//! Options and configuration for [`Storage`](crate::Storage).

use serde::{Deserialize, Serialize};

use crate::{Error, Result, Value, codec::CodecKind, path::DEFAULT_MAX_GROWTH};

/// Options for a read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetOptions {
    /// Returned instead of nothing when the address holds no value. Its
    /// presence also suppresses traversal errors.
    pub default_value: Option<Value>,
}

impl GetOptions {
    pub fn with_default(value: impl Into<Value>) -> Self {
        Self {
            default_value: Some(value.into()),
        }
    }
}

/// Options for a write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetOptions {
    /// Create missing intermediate containers. `None` uses
    /// [`StorageConfig::create_path`].
    pub create_path: Option<bool>,
}

impl SetOptions {
    /// Options that create missing containers along the path.
    pub fn create_path() -> Self {
        Self {
            create_path: Some(true),
        }
    }
}

/// Storage-wide configuration.
///
/// ```
/// # use pathstore::{StorageConfig, codec::CodecKind};
/// let config = StorageConfig::from_json_str(r#"{"create_path": true, "codec": "json"}"#)?;
/// assert!(config.create_path);
/// assert_eq!(config.codec, CodecKind::Json);
///
/// let defaults = StorageConfig::from_json_str("{}")?;
/// assert_eq!(defaults, StorageConfig::default());
/// assert_eq!(defaults.max_list_growth, pathstore::path::DEFAULT_MAX_GROWTH);
/// # Ok::<(), pathstore::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Default auto-creation policy for writes.
    pub create_path: bool,
    /// Codec used to encode values.
    pub codec: CodecKind,
    /// Most empty slots one auto-created index may add to a list.
    pub max_list_growth: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            create_path: false,
            codec: CodecKind::default(),
            max_list_growth: DEFAULT_MAX_GROWTH,
        }
    }
}

impl StorageConfig {
    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(Error::Serialize)
    }

    pub fn with_create_path(mut self, create_path: bool) -> Self {
        self.create_path = create_path;
        self
    }

    pub fn with_codec(mut self, codec: CodecKind) -> Self {
        self.codec = codec;
        self
    }

    pub fn with_max_list_growth(mut self, max_list_growth: usize) -> Self {
        self.max_list_growth = max_list_growth;
        self
    }
}
