//! Codec tests through the storage façade
//!
//! These check what actually lands in the backend for each codec, and that
//! values written by one side can be read by the other.

use chrono::{TimeZone, Utc};
use pathstore::{
    SetOptions, Storage, StorageConfig, Value,
    backend::InMemory,
    codec::{CodecKind, JsonCodec, RichCodec},
};
use serde_json::json;

use crate::helpers::*;

fn sample_values() -> Vec<Value> {
    vec![
        Value::from("plain text"),
        Value::from(42),
        Value::from(-1.5),
        Value::from(true),
        Value::Null,
        Value::from(json!({"name": "Alice", "tags": ["a", "b"], "meta": {"n": null}})),
        Value::from(json!([1, [2, [3]], {"k": "v"}])),
    ]
}

#[test]
fn test_both_codecs_roundtrip_json_values() {
    for kind in [CodecKind::Rich, CodecKind::Json] {
        let (storage, sink) = test_storage_with_config(StorageConfig::default().with_codec(kind));
        for (i, value) in sample_values().into_iter().enumerate() {
            let key = format!("v{i}");
            assert!(storage.set(&key, value.clone(), SetOptions::default()));
            assert_eq!(storage.get(&key), Some(value), "codec {kind:?}, key {key}");
        }
        assert_quiet(&sink);
    }
}

#[test]
fn test_strings_are_stored_unchanged() {
    let storage = test_storage();
    storage.set("note", "hello world", SetOptions::default());
    assert_eq!(
        storage.backend().get_item("note").unwrap().as_deref(),
        Some("hello world")
    );
}

#[test]
fn test_rich_codec_preserves_dates() {
    let when = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
    let storage = test_storage();
    storage.set("events.0.at", when, SetOptions::create_path());

    let read = storage.get("events.0.at").unwrap();
    assert_eq!(read.as_date(), Some(&when));
}

#[test]
fn test_json_codec_writes_plain_json() {
    let config = StorageConfig::default().with_codec(CodecKind::Json);
    let storage = Storage::with_config(InMemory::new(), config);
    storage.set("cfg.theme", "dark", SetOptions::create_path());

    let raw = storage.backend().get_item("cfg").unwrap().unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed, json!({"theme": "dark"}));
}

#[test]
fn test_foreign_json_is_readable() {
    let backend = InMemory::from_items([("legacy", r#"{"user": {"name": "Bob"}}"#)]);
    let storage = Storage::new(backend);
    assert_eq!(storage.get("legacy.user.name"), Some(Value::from("Bob")));

    // Deep writes rewrite the value in the configured codec.
    storage.set("legacy.user.name", "Carol", SetOptions::default());
    assert_eq!(storage.get("legacy.user.name"), Some(Value::from("Carol")));
}

#[test]
fn test_codec_override() {
    let storage = Storage::new(InMemory::new()).with_codec(JsonCodec);
    storage.set("n", 7, SetOptions::default());
    assert_eq!(storage.backend().get_item("n").unwrap().as_deref(), Some("7"));

    let storage = Storage::new(InMemory::new()).with_codec(RichCodec);
    storage.set("n", 7, SetOptions::default());
    let raw = storage.backend().get_item("n").unwrap().unwrap();
    assert!(raw.contains("$rich"));
}

#[test]
fn test_json_looking_text_decodes_as_json() {
    let storage = test_storage();
    storage.set("n", "123", SetOptions::default());
    assert_eq!(storage.get("n"), Some(Value::Int(123)));
}

#[test]
fn test_non_finite_floats_do_not_corrupt_the_root() {
    for kind in [CodecKind::Rich, CodecKind::Json] {
        let (storage, sink) = test_storage_with_config(StorageConfig::default().with_codec(kind));
        storage.set("doc", Value::from(json!({"name": "Alice"})), SetOptions::default());

        assert!(storage.set("doc.score", f64::NAN, SetOptions::default()));
        assert!(storage.set("doc.limit", f64::NEG_INFINITY, SetOptions::default()));
        assert!(storage.set("ratio", f64::INFINITY, SetOptions::default()));

        assert_value(&storage, "doc.name", "Alice");
        assert_eq!(storage.get("doc.score"), Some(Value::Null), "codec {kind:?}");
        assert_eq!(storage.get("doc.limit"), Some(Value::Null), "codec {kind:?}");
        assert_eq!(storage.get("ratio"), Some(Value::Null), "codec {kind:?}");

        // Later deep writes keep working on the same root.
        assert!(storage.set("doc.score", 9.5, SetOptions::default()));
        assert_value(&storage, "doc.score", 9.5);
        assert_quiet(&sink);
    }
}
