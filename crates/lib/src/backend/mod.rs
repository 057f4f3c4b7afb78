//! Storage backends.
//!
//! The [`Backend`] trait is the contract between the façade and a concrete
//! string key-value store. Backends know nothing about values or paths:
//! they store opaque strings under string keys and can enumerate their keys
//! by position.
//!
//! Two implementations are provided:
//!
//! - [`InMemory`] keeps everything in an ordered map.
//! - [`FileBackend`] keeps the same map and rewrites a JSON file on every
//!   mutation.

use std::any::Any;

use crate::Result;

pub mod errors;
mod file;
mod in_memory;

pub use errors::BackendError;
pub use file::FileBackend;
pub use in_memory::InMemory;

/// A string key-value store.
///
/// All methods take `&self`; implementations use interior mutability and
/// must be `Send` and `Sync` so one backend can be shared by several
/// façades. Every method may fail. There is no cross-call atomicity: a
/// read followed by a write can interleave with another writer.
pub trait Backend: Send + Sync + Any {
    /// Returns the string stored under `key`, or `None` if there is none.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> Result<()>;

    /// Removes every key.
    fn clear(&self) -> Result<()>;

    /// Returns the number of stored keys.
    fn length(&self) -> Result<usize>;

    /// Returns the key at `index` in the backend's enumeration order, or
    /// `None` if `index` is out of range.
    fn key(&self, index: usize) -> Result<Option<String>>;

    /// Returns a reference to the backend as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;
}
