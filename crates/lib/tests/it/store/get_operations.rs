//! Read tests: get, get_or, get_with, try_get and has

use pathstore::{
    GetOptions, SetOptions, Value,
    diagnostics::{Level, Operation},
};
use serde_json::json;

use crate::helpers::*;

fn seeded() -> (pathstore::Storage, std::sync::Arc<pathstore::diagnostics::MemorySink>) {
    let (storage, sink) = test_storage_with_sink();
    storage.set(
        "doc",
        Value::from(json!({
            "title": "Notes",
            "tags": ["a", "b"],
            "owner": {"name": "Alice", "email": null},
            "count": 0,
            "flag": false
        })),
        SetOptions::default(),
    );
    (storage, sink)
}

#[test]
fn test_reads_nested_values() {
    let (storage, sink) = seeded();
    assert_value(&storage, "doc.title", "Notes");
    assert_value(&storage, "doc.tags.1", "b");
    assert_value(&storage, "doc.owner.name", "Alice");
    assert_value(&storage, "doc.count", 0);
    assert_value(&storage, "doc.flag", false);
    assert_value(&storage, "doc.tags", Value::from(json!(["a", "b"])));
    assert_quiet(&sink);
}

#[test]
fn test_missing_root_is_absent_without_diagnostics() {
    let (storage, sink) = test_storage_with_sink();
    assert_absent(&storage, "nothing");
    assert_absent(&storage, "nothing.deep.path");
    assert!(sink.records().is_empty());
}

#[test]
fn test_missing_final_key_is_absent() {
    let (storage, sink) = seeded();
    assert_absent(&storage, "doc.subtitle");
    assert_quiet(&sink);
}

#[test]
fn test_default_value_fallback() {
    let (storage, sink) = seeded();
    assert_eq!(storage.get_or("nothing", "D"), Value::from("D"));
    assert_eq!(storage.get_or("nothing.deep", "D"), Value::from("D"));
    assert_eq!(storage.get_or("doc.subtitle", "D"), Value::from("D"));
    assert_eq!(storage.get_or("doc.owner.address.city", "D"), Value::from("D"));
    assert_eq!(storage.get_or("doc.tags.9", "D"), Value::from("D"));
    assert_eq!(storage.get_or("doc.title.0", "D"), Value::from("D"));

    // A present value wins over the default, including falsy values.
    assert_eq!(storage.get_or("doc.count", 5), Value::from(0));
    assert_eq!(storage.get_or("doc.flag", true), Value::from(false));
    assert_quiet(&sink);
}

#[test]
fn test_traversal_error_without_default_is_reported() {
    let (storage, sink) = seeded();
    assert_eq!(storage.get("doc.owner.address.city"), None);

    let problem = assert_reported(&sink, Level::Warn, Operation::Get);
    assert_eq!(problem.address, "doc.owner.address.city");
    assert!(problem.message.contains("owner.address"));
}

#[test]
fn test_try_get_returns_errors() {
    let (storage, _) = seeded();

    let err = storage
        .try_get("doc.tags.9", &GetOptions::default())
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(!err.is_index_error());

    let err = storage
        .try_get("doc.title.x", &GetOptions::default())
        .unwrap_err();
    assert!(err.is_type_error());
    assert_eq!(err.module(), "path");

    let err = storage
        .try_get("doc.0", &GetOptions::with_default("D"))
        .unwrap_err();
    assert!(err.is_shape_mismatch());
}

#[test]
fn test_stored_null() {
    let (storage, _) = seeded();
    assert_eq!(storage.get("doc.owner.email"), Some(Value::Null));
    assert!(!storage.has("doc.owner.email"));

    storage.set("nil", Value::Null, SetOptions::default());
    assert_eq!(storage.get("nil"), Some(Value::Null));
    assert!(storage.has("nil"));
}

#[test]
fn test_has() {
    let (storage, sink) = seeded();
    assert!(storage.has("doc"));
    assert!(storage.has("doc.title"));
    assert!(storage.has("doc.count"));
    assert!(storage.has("doc.tags.0"));
    assert!(!storage.has("doc.tags.5"));
    assert!(!storage.has("doc.owner.address.city"));
    assert!(!storage.has("missing"));
    assert_quiet(&sink);
}

#[test]
fn test_trailing_dot_is_whole_value() {
    let (storage, _) = seeded();
    assert_eq!(storage.get("doc."), storage.get("doc"));
    assert_eq!(storage.get("doc..title"), Some(Value::from("Notes")));
}

#[test]
fn test_get_with_options() {
    let (storage, _) = seeded();
    assert_eq!(
        storage.get_with("doc.missing", GetOptions::with_default(json!({"x": 1}))),
        Some(Value::from(json!({"x": 1})))
    );
    assert_eq!(storage.get_with("doc.missing", GetOptions::default()), None);
}
