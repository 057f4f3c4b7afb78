//! Removal tests: remove and try_remove

use pathstore::{
    SetOptions, Value,
    diagnostics::{Level, Operation},
};
use serde_json::json;

use crate::helpers::*;

#[test]
fn test_remove_whole_value() {
    let storage = test_storage();
    storage.set("k", "v", SetOptions::default());
    assert!(storage.remove("k"));
    assert_absent(&storage, "k");
    assert_eq!(storage.length(), 0);
}

#[test]
fn test_remove_map_key() {
    let (storage, sink) = test_storage_with_sink();
    storage.set("doc", Value::from(json!({"a": 1, "b": {"c": 2}})), SetOptions::default());

    assert!(storage.remove("doc.b.c"));
    assert_eq!(storage.get("doc"), Some(Value::from(json!({"a": 1, "b": {}}))));
    assert_quiet(&sink);
}

#[test]
fn test_list_hole_semantics() {
    let (storage, sink) = test_storage_with_sink();
    storage.set("items", Value::from(json!(["a", "b", "c"])), SetOptions::default());

    assert!(storage.remove("items.1"));
    assert_absent(&storage, "items.1");
    assert_value(&storage, "items.0", "a");
    assert_value(&storage, "items.2", "c");

    let items = storage.get("items").unwrap();
    assert_eq!(items.as_list().map(Vec::len), Some(3));
    assert!(items.as_list().unwrap()[1].is_empty_marker());
    assert_quiet(&sink);
}

#[test]
fn test_remove_is_idempotent() {
    let (storage, sink) = test_storage_with_sink();
    storage.set("doc", Value::from(json!({"a": [1, 2], "b": 1})), SetOptions::default());

    for _ in 0..2 {
        assert!(storage.remove("doc.b"));
        assert!(storage.remove("doc.a.0"));
    }
    let after_once = storage.backend().get_item("doc").unwrap();
    assert!(storage.remove("doc.b"));
    assert_eq!(storage.backend().get_item("doc").unwrap(), after_once);

    assert!(storage.remove("doc.missing.deeper"));
    assert!(storage.remove("doc.a.7"));
    assert_quiet(&sink);
    assert!(!sink.records().is_empty());
}

#[test]
fn test_remove_under_missing_root_warns() {
    let (storage, sink) = test_storage_with_sink();
    assert!(storage.remove("ghost.field"));
    assert_eq!(storage.length(), 0);

    let problem = assert_reported(&sink, Level::Warn, Operation::Remove);
    assert_eq!(problem.address, "ghost.field");
}

#[test]
fn test_remove_aborts_on_type_conflict() {
    let (storage, sink) = test_storage_with_sink();
    storage.set("doc", Value::from(json!({"title": "x"})), SetOptions::default());

    assert!(!storage.remove("doc.title.sub"));
    assert!(!storage.remove("doc.0"));
    assert_value(&storage, "doc.title", "x");
    assert_eq!(sink.at_least(Level::Warn).len(), 2);

    let err = storage.try_remove("doc.0").unwrap_err();
    assert!(err.is_shape_mismatch());
}
