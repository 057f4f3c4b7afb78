//! Diagnostic reporting for the storage façade.
//!
//! [`Storage`](crate::Storage) never returns failures from its fail-quiet
//! methods. Instead it reports a [`Diagnostic`] to the [`DiagnosticSink`] it
//! was constructed with. The default sink forwards to `tracing`; tests and
//! embedders can inject their own.

use std::{fmt, sync::Mutex};

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Warn,
    Error,
}

/// The façade operation that produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Get,
    Set,
    Remove,
    Has,
    Clear,
    Key,
    Length,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Get => "get",
            Operation::Set => "set",
            Operation::Remove => "remove",
            Operation::Has => "has",
            Operation::Clear => "clear",
            Operation::Key => "key",
            Operation::Length => "length",
        };
        f.write_str(name)
    }
}

/// One reported event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: Level,
    pub operation: Operation,
    /// The address (or storage key) the operation was called with.
    pub address: String,
    pub message: String,
}

/// Receives diagnostics from the façade.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: Diagnostic) {
        let Diagnostic {
            level,
            operation,
            address,
            message,
        } = diagnostic;
        match level {
            Level::Debug => {
                tracing::debug!(operation = %operation, address = %address, "{message}")
            }
            Level::Warn => tracing::warn!(operation = %operation, address = %address, "{message}"),
            Level::Error => {
                tracing::error!(operation = %operation, address = %address, "{message}")
            }
        }
    }
}

/// Keeps every diagnostic in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<Diagnostic>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything reported so far.
    pub fn records(&self) -> Vec<Diagnostic> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Returns the records at `level` or above.
    pub fn at_least(&self, level: Level) -> Vec<Diagnostic> {
        self.records()
            .into_iter()
            .filter(|d| d.level >= level)
            .collect()
    }

    pub fn clear(&self) {
        match self.records.lock() {
            Ok(mut records) => records.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }
}

impl DiagnosticSink for MemorySink {
    fn report(&self, diagnostic: Diagnostic) {
        match self.records.lock() {
            Ok(mut records) => records.push(diagnostic),
            Err(poisoned) => poisoned.into_inner().push(diagnostic),
        }
    }
}
