//! The address-based storage façade.
//!
//! [`Storage`] composes a [`Backend`], a [`Codec`] and the path engine.
//! An address is a storage key optionally followed by a dotted path into
//! the value stored under that key:
//!
//! ```
//! use pathstore::{GetOptions, SetOptions, Storage, Value, backend::InMemory};
//! use serde_json::json;
//!
//! let storage = Storage::new(InMemory::new());
//! storage.set("user:1", Value::from(json!({"name": "Alice", "prefs": {"theme": "dark"}})), SetOptions::default());
//!
//! assert_eq!(storage.get("user:1.name"), Some(Value::from("Alice")));
//!
//! storage.set("user:1.prefs.theme", "light", SetOptions::default());
//! assert_eq!(storage.get("user:1.prefs.theme"), Some(Value::from("light")));
//!
//! assert_eq!(storage.get_or("user:1.email", "none"), Value::from("none"));
//! ```
//!
//! Each deep operation loads the whole root value for its key, works on that
//! in-memory copy and, for writes and removals, stores the whole copy back.
//! Nothing coordinates concurrent writers to the same key.
//!
//! # Failure policy
//!
//! `get`, `set`, `remove`, `has`, `clear`, `key` and `length` never fail.
//! Any error underneath them, including backend failures, is reported to the
//! configured [`DiagnosticSink`] and replaced by a safe fallback (`None`,
//! the default value, `false`, `0` or a no-op). The `try_*` methods return
//! the error instead.

use std::{error::Error as _, sync::Arc};

use serde::{Serialize, de::DeserializeOwned};

use crate::{
    Error, Result, Value,
    backend::Backend,
    codec::Codec,
    diagnostics::{Diagnostic, DiagnosticSink, Level, Operation, TracingSink},
    path::{
        PathError, Segment, TraverseOptions, container_for, delete_at, root_matches_segment,
        traverse, write_at_with,
    },
};

mod address;
mod options;

pub use address::Address;
pub use options::{GetOptions, SetOptions, StorageConfig};

/// Address-based access to a string key-value backend.
pub struct Storage {
    backend: Arc<dyn Backend>,
    codec: Box<dyn Codec>,
    diagnostics: Arc<dyn DiagnosticSink>,
    config: StorageConfig,
}

impl Storage {
    /// Creates a storage façade over `backend` with the default configuration.
    pub fn new<B: Backend>(backend: B) -> Self {
        Self::with_config(backend, StorageConfig::default())
    }

    /// Creates a storage façade over `backend` with `config`.
    pub fn with_config<B: Backend>(backend: B, config: StorageConfig) -> Self {
        Self::from_shared(Arc::new(backend), config)
    }

    /// Creates a storage façade over a backend that is shared with others.
    pub fn from_shared(backend: Arc<dyn Backend>, config: StorageConfig) -> Self {
        Self {
            backend,
            codec: config.codec.build(),
            diagnostics: Arc::new(TracingSink),
            config,
        }
    }

    /// Replaces the diagnostic sink.
    pub fn with_diagnostics(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = sink;
        self
    }

    /// Replaces the codec chosen by the configuration.
    pub fn with_codec<C: Codec + 'static>(mut self, codec: C) -> Self {
        self.codec = Box::new(codec);
        self
    }

    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    // ===== Reads =====

    /// Reads the value at `address`, or `None` if there is none.
    pub fn get(&self, address: &str) -> Option<Value> {
        self.get_with(address, GetOptions::default())
    }

    /// Reads the value at `address`, falling back to `default`.
    pub fn get_or(&self, address: &str, default: impl Into<Value>) -> Value {
        let default = default.into();
        self.get_with(address, GetOptions::with_default(default.clone()))
            .unwrap_or(default)
    }

    /// Reads the value at `address` with explicit options.
    pub fn get_with(&self, address: &str, options: GetOptions) -> Option<Value> {
        match self.try_get(address, &options) {
            Ok(found) => found,
            Err(err) => {
                self.report_error(Operation::Get, address, &err);
                options.default_value
            }
        }
    }

    /// Reads the value at `address` and deserializes it into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, address: &str) -> Option<T> {
        let value = self.get(address)?;
        match serde_json::from_value(value.to_json()) {
            Ok(typed) => Some(typed),
            Err(err) => {
                self.report_error(Operation::Get, address, &Error::Serialize(err));
                None
            }
        }
    }

    /// Reads the value at `address`, returning failures.
    ///
    /// A missing storage key, a missing final key and an empty list slot all
    /// yield the default value (or `None`). When a default value is given,
    /// traversal errors also yield it instead of failing.
    ///
    /// # Errors
    /// Backend failures, malformed index segments, a root whose kind does
    /// not fit the first path segment, and (without a default) traversal
    /// errors.
    pub fn try_get(&self, address: &str, options: &GetOptions) -> Result<Option<Value>> {
        let parsed = Address::parse(address);
        let fallback = || options.default_value.clone();

        let Some(raw) = self.backend.get_item(parsed.key())? else {
            return Ok(fallback());
        };
        let mut root = self.codec.decode(&raw);
        let Some(path) = parsed.path() else {
            return Ok(Some(root));
        };

        let segments = match path.segments() {
            Ok(segments) => segments,
            Err(_) if options.default_value.is_some() => return Ok(fallback()),
            Err(err) => return Err(err.into()),
        };
        check_shape(&root, &segments, parsed.key())?;

        let mut traverse_options = TraverseOptions::read();
        if options.default_value.is_some() {
            traverse_options = traverse_options.suppress_errors();
        }
        match traverse(&mut root, &segments, traverse_options)? {
            Some(found) if !found.is_empty_marker() => Ok(Some(std::mem::take(found))),
            _ => Ok(fallback()),
        }
    }

    // ===== Writes =====

    /// Writes `value` at `address`. Returns false if the write was abandoned.
    pub fn set(&self, address: &str, value: impl Into<Value>, options: SetOptions) -> bool {
        match self.try_set(address, value, options) {
            Ok(()) => true,
            Err(err) => {
                self.report_error(Operation::Set, address, &err);
                false
            }
        }
    }

    /// Serializes `value` and writes it at `address`.
    pub fn set_as<T: Serialize>(&self, address: &str, value: &T, options: SetOptions) -> bool {
        match serde_json::to_value(value) {
            Ok(json) => self.set(address, Value::from(json), options),
            Err(err) => {
                self.report_error(Operation::Set, address, &Error::Serialize(err));
                false
            }
        }
    }

    /// Writes `value` at `address`, returning failures.
    ///
    /// A deep write to a key that does not exist yet starts from an empty
    /// list or map, depending on whether the first path segment is an index.
    /// Nothing is stored unless the whole write succeeds.
    ///
    /// # Errors
    /// Backend and codec failures, a root whose kind does not fit the first
    /// path segment, and traversal errors.
    pub fn try_set(&self, address: &str, value: impl Into<Value>, options: SetOptions) -> Result<()> {
        let value = value.into();
        let parsed = Address::parse(address);
        let key = parsed.key();

        let Some(path) = parsed.path() else {
            let encoded = self.codec.encode(&value)?;
            return self.backend.set_item(key, &encoded);
        };

        let segments = path.segments()?;
        let create_path = options.create_path.unwrap_or(self.config.create_path);
        let mut root = match self.backend.get_item(key)? {
            Some(raw) => {
                let root = self.codec.decode(&raw);
                check_shape(&root, &segments, key)?;
                root
            }
            None => container_for(segments.first()),
        };

        let options =
            TraverseOptions::parent(create_path).with_max_growth(self.config.max_list_growth);
        write_at_with(&mut root, &segments, value, options)?;
        let encoded = self.codec.encode(&root)?;
        self.backend.set_item(key, &encoded)
    }

    // ===== Removal =====

    /// Removes the value at `address`. Returns false if the removal failed.
    pub fn remove(&self, address: &str) -> bool {
        match self.try_remove(address) {
            Ok(()) => true,
            Err(err) => {
                self.report_error(Operation::Remove, address, &err);
                false
            }
        }
    }

    /// Removes the value at `address`, returning failures.
    ///
    /// Removing a list element leaves an empty slot; the list keeps its
    /// length. Removing something that is already absent is a no-op.
    ///
    /// # Errors
    /// Backend and codec failures, a root whose kind does not fit the first
    /// path segment, and type conflicts along the path.
    pub fn try_remove(&self, address: &str) -> Result<()> {
        let parsed = Address::parse(address);
        let key = parsed.key();

        let Some(path) = parsed.path() else {
            return self.backend.remove_item(key);
        };

        let Some(raw) = self.backend.get_item(key)? else {
            self.report(
                Level::Warn,
                Operation::Remove,
                address,
                format!("Nothing stored under '{key}'"),
            );
            return Ok(());
        };

        let segments = path.segments()?;
        let mut root = self.codec.decode(&raw);
        check_shape(&root, &segments, key)?;

        match delete_at(&mut root, &segments) {
            Ok(Some(_)) => {
                let encoded = self.codec.encode(&root)?;
                self.backend.set_item(key, &encoded)
            }
            Ok(None) => {
                self.report(Level::Debug, Operation::Remove, address, "Already absent");
                Ok(())
            }
            Err(err) if err.is_not_found() => {
                self.report(Level::Debug, Operation::Remove, address, err.to_string());
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    // ===== Queries and whole-store operations =====

    /// Returns true if `address` holds a value other than null.
    ///
    /// A stored null and a missing value are indistinguishable here.
    pub fn has(&self, address: &str) -> bool {
        let parsed = Address::parse(address);
        if !parsed.is_deep() {
            return match self.backend.get_item(parsed.key()) {
                Ok(found) => found.is_some(),
                Err(err) => {
                    self.report_error(Operation::Has, address, &err);
                    false
                }
            };
        }

        match self.try_get(address, &GetOptions::default()) {
            Ok(found) => found.is_some_and(|value| !value.is_absent()),
            Err(Error::Path(err)) if err.is_not_found() => {
                self.report(Level::Debug, Operation::Has, address, err.to_string());
                false
            }
            Err(err) => {
                self.report_error(Operation::Has, address, &err);
                false
            }
        }
    }

    /// Removes every key from the backend.
    pub fn clear(&self) {
        if let Err(err) = self.backend.clear() {
            self.report_error(Operation::Clear, "", &err);
        }
    }

    /// Returns the storage key at `index`.
    pub fn key(&self, index: usize) -> Option<String> {
        match self.backend.key(index) {
            Ok(key) => key,
            Err(err) => {
                self.report_error(Operation::Key, &index.to_string(), &err);
                None
            }
        }
    }

    /// Returns the number of storage keys.
    pub fn length(&self) -> usize {
        match self.backend.length() {
            Ok(length) => length,
            Err(err) => {
                self.report_error(Operation::Length, "", &err);
                0
            }
        }
    }

    /// Returns every storage key.
    pub fn keys(&self) -> Vec<String> {
        (0..self.length()).filter_map(|index| self.key(index)).collect()
    }

    fn report(&self, level: Level, operation: Operation, address: &str, message: impl Into<String>) {
        self.diagnostics.report(Diagnostic {
            level,
            operation,
            address: address.to_string(),
            message: message.into(),
        });
    }

    fn report_error(&self, operation: Operation, address: &str, err: &Error) {
        let level = if err.is_path_error() {
            Level::Warn
        } else {
            Level::Error
        };
        let message = match err.source() {
            Some(source) => format!("{err}: {source}"),
            None => err.to_string(),
        };
        self.report(level, operation, address, message);
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage")
            .field("codec", &self.codec.name())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Fails with [`PathError::ShapeMismatch`] if `root` cannot be addressed by
/// the first segment.
fn check_shape(root: &Value, segments: &[Segment], key: &str) -> std::result::Result<(), PathError> {
    match segments.first() {
        Some(first) if !root_matches_segment(root, first) => Err(PathError::ShapeMismatch {
            path: key.to_string(),
            expected: if first.is_index() { "list" } else { "map" },
            found: root.type_name(),
        }),
        _ => Ok(()),
    }
}
