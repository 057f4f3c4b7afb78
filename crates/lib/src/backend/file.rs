//! File-backed backend.
//!
//! Holds the working set in an [`InMemory`] and rewrites the whole store as
//! a JSON document after every mutation. The file carries a format version
//! so incompatible files are rejected instead of misread.

use std::{
    any::Any,
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Deserializer, Serialize};

use super::{Backend, InMemory, errors::BackendError};
use crate::{Error, Result};

/// The current persistence file format version.
/// v0 indicates this is an unstable format subject to breaking changes.
const PERSISTENCE_VERSION: u8 = 0;

/// Helper to check if version is default (0) for serde skip_serializing_if
fn is_v0(v: &u8) -> bool {
    *v == 0
}

/// Validates the persistence version during deserialization.
fn validate_persistence_version<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let version = u8::deserialize(deserializer)?;
    if version != PERSISTENCE_VERSION {
        return Err(serde::de::Error::custom(format!(
            "unsupported persistence version {version}; only version {PERSISTENCE_VERSION} is supported"
        )));
    }
    Ok(version)
}

/// On-disk layout of a [`FileBackend`].
#[derive(Serialize, Deserialize)]
struct PersistedItems {
    #[serde(
        rename = "_v",
        default,
        skip_serializing_if = "is_v0",
        deserialize_with = "validate_persistence_version"
    )]
    version: u8,
    #[serde(default)]
    items: BTreeMap<String, String>,
}

/// A backend persisted to a single JSON file.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    items: InMemory,
}

impl FileBackend {
    /// Opens the store at `path`.
    ///
    /// If the file does not exist, the store starts empty and the file is
    /// created on the first mutation.
    ///
    /// # Errors
    /// I/O failures other than a missing file, and files that are not a
    /// supported persisted store.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let items = match fs::read_to_string(&path) {
            Ok(json) => {
                let persisted: PersistedItems = serde_json::from_str(&json).map_err(
                    |source| -> Error { BackendError::DeserializationFailed { source }.into() },
                )?;
                tracing::debug!(path = %path.display(), keys = persisted.items.len(), "Loaded file store");
                InMemory::from_items(persisted.items)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No store file yet, starting empty");
                InMemory::new()
            }
            Err(source) => {
                return Err(BackendError::FileIo {
                    path: path.display().to_string(),
                    source,
                }
                .into());
            }
        };
        Ok(Self { path, items })
    }

    /// The file this store persists to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, items: &BTreeMap<String, String>) -> Result<()> {
        let persisted = PersistedItems {
            version: PERSISTENCE_VERSION,
            items: items.clone(),
        };
        let json = serde_json::to_string_pretty(&persisted)
            .map_err(|source| -> Error { BackendError::SerializationFailed { source }.into() })?;
        fs::write(&self.path, json).map_err(|source| -> Error {
            BackendError::FileIo {
                path: self.path.display().to_string(),
                source,
            }
            .into()
        })?;
        tracing::trace!(path = %self.path.display(), "Persisted file store");
        Ok(())
    }

    /// Applies `mutate` in memory only once the result is on disk.
    fn update(&self, mutate: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<()> {
        self.items.transact(mutate, |items| self.persist(items))
    }
}

impl Backend for FileBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.items.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.update(|items| {
            items.insert(key.to_string(), value.to_string());
        })
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.update(|items| {
            items.remove(key);
        })
    }

    fn clear(&self) -> Result<()> {
        self.update(BTreeMap::clear)
    }

    fn length(&self) -> Result<usize> {
        self.items.length()
    }

    fn key(&self, index: usize) -> Result<Option<String>> {
        self.items.key(index)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
