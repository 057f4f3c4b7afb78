//! End-to-end scenarios

use pathstore::{
    SetOptions, Storage, StorageConfig, Value,
    backend::InMemory,
    codec::CodecKind,
    diagnostics::{Level, Operation},
};
use serde_json::json;

use crate::helpers::*;

#[test]
fn test_user_profile_scenario() {
    let (storage, sink) = test_storage_with_sink();

    storage.set(
        "user:1",
        Value::from(json!({"name": "Alice", "prefs": {"theme": "dark"}})),
        SetOptions::default(),
    );
    assert_value(&storage, "user:1.name", "Alice");

    storage.set("user:1.prefs.theme", "light", SetOptions::default());
    assert_value(&storage, "user:1.prefs.theme", "light");

    storage.remove("user:1.prefs.theme");
    assert_value(&storage, "user:1.prefs", Value::map());
    assert_quiet(&sink);
}

#[test]
fn test_type_mismatch_scenario() {
    let (storage, sink) = test_storage_with_sink();
    storage.set("cfg", "a string value", SetOptions::default());

    assert_eq!(storage.get("cfg.nested"), None);
    let problem = assert_reported(&sink, Level::Warn, Operation::Get);
    assert!(problem.message.contains("is text, expected map"));

    assert_eq!(storage.get_or("cfg.nested", "D"), Value::from("D"));
    assert_value(&storage, "cfg", "a string value");
}

#[test]
fn test_path_write_then_read() {
    let storage = test_storage();
    let cases = [
        ("k.a", Value::from(1)),
        ("k.b.c.d", Value::from("deep")),
        ("k.list.2.x", Value::from(true)),
        ("k.list.0", Value::from(json!({"nested": [1, 2]}))),
        ("other.0.0.0", Value::Null),
    ];
    for (address, value) in cases {
        assert!(storage.set(address, value.clone(), SetOptions::create_path()));
        assert_eq!(storage.get(address), Some(value), "address {address}");
    }
}

#[test]
fn test_enumerate_keys() {
    let storage = test_storage();
    storage.set("b", 1, SetOptions::default());
    storage.set("a.x", 1, SetOptions::default());
    storage.set("c.0", 1, SetOptions::create_path());

    assert_eq!(storage.length(), 3);
    assert_eq!(storage.keys(), vec!["a", "b", "c"]);
    assert_eq!(storage.key(1).as_deref(), Some("b"));
    assert_eq!(storage.key(3), None);

    storage.clear();
    assert_eq!(storage.length(), 0);
    assert_absent(&storage, "a.x");
}

#[test]
fn test_configured_create_path() {
    let config = StorageConfig::from_json_str(r#"{"create_path": true, "codec": "json"}"#).unwrap();
    let storage = Storage::with_config(InMemory::new(), config);
    assert_eq!(storage.config().codec, CodecKind::Json);

    assert!(storage.set("app.ui.panels.1.width", 300, SetOptions::default()));
    assert_value(&storage, "app.ui.panels.1.width", 300);

    // The per-call option overrides the configured default.
    let opt_out = SetOptions {
        create_path: Some(false),
    };
    assert!(!storage.set("app.other.deep", 1, opt_out));
}

#[test]
fn test_json_codec_turns_holes_into_nulls() {
    let config = StorageConfig::default().with_codec(CodecKind::Json);
    let storage = Storage::with_config(InMemory::new(), config);
    storage.set("items", Value::from(json!(["a", "b"])), SetOptions::default());
    storage.remove("items.0");

    // Plain JSON cannot hold an empty slot, so it reads back as null.
    assert_eq!(storage.get("items.0"), Some(Value::Null));
    assert!(!storage.has("items.0"));
}
