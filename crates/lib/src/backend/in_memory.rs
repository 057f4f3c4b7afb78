//! In-memory backend implementation
//!
//! Suitable for testing, for embedding, or as the working set of a
//! persistent backend such as [`FileBackend`](super::FileBackend).

use std::{
    any::Any,
    collections::BTreeMap,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use super::{Backend, errors::BackendError};
use crate::Result;

/// A simple in-memory backend using a `BTreeMap` for storage.
///
/// Keys enumerate in lexicographic order, so `key(i)` is stable for a given
/// set of keys.
#[derive(Debug, Default)]
pub struct InMemory {
    items: RwLock<BTreeMap<String, String>>,
}

impl InMemory {
    /// Creates a new, empty `InMemory` backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend pre-populated with `items`.
    pub fn from_items<I, K, V>(items: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            items: RwLock::new(
                items
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Returns a copy of every stored key and value.
    pub fn snapshot(&self) -> Result<BTreeMap<String, String>> {
        Ok(self.read()?.clone())
    }

    /// Applies `mutate` to a copy of the items and hands the copy to
    /// `commit`. The stored items are replaced only if `commit` succeeds.
    ///
    /// The write lock is held throughout, so commits are serialized.
    pub(super) fn transact(
        &self,
        mutate: impl FnOnce(&mut BTreeMap<String, String>),
        commit: impl FnOnce(&BTreeMap<String, String>) -> Result<()>,
    ) -> Result<()> {
        let mut items = self.write()?;
        let mut next = items.clone();
        mutate(&mut next);
        commit(&next)?;
        *items = next;
        Ok(())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<String, String>>> {
        self.items
            .read()
            .map_err(|_| BackendError::LockPoisoned { resource: "items" }.into())
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<String, String>>> {
        self.items
            .write()
            .map_err(|_| BackendError::LockPoisoned { resource: "items" }.into())
    }
}

impl Backend for InMemory {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.write()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.write()?.remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.write()?.clear();
        Ok(())
    }

    fn length(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    fn key(&self, index: usize) -> Result<Option<String>> {
        Ok(self.read()?.keys().nth(index).cloned())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
