//! InMemory backend tests

use pathstore::{
    SetOptions, Storage, Value,
    backend::{Backend, InMemory},
};

#[test]
fn test_item_lifecycle() {
    let backend = InMemory::new();
    assert_eq!(backend.length().unwrap(), 0);
    assert_eq!(backend.get_item("missing").unwrap(), None);

    backend.set_item("a", "1").unwrap();
    backend.set_item("b", "2").unwrap();
    backend.set_item("a", "3").unwrap();
    assert_eq!(backend.length().unwrap(), 2);
    assert_eq!(backend.get_item("a").unwrap().as_deref(), Some("3"));

    backend.remove_item("a").unwrap();
    backend.remove_item("a").unwrap();
    assert_eq!(backend.get_item("a").unwrap(), None);
    assert_eq!(backend.length().unwrap(), 1);

    backend.clear().unwrap();
    assert_eq!(backend.length().unwrap(), 0);
}

#[test]
fn test_key_enumeration_is_ordered() {
    let backend = InMemory::from_items([("zeta", "z"), ("alpha", "a"), ("mid", "m")]);
    assert_eq!(backend.key(0).unwrap().as_deref(), Some("alpha"));
    assert_eq!(backend.key(1).unwrap().as_deref(), Some("mid"));
    assert_eq!(backend.key(2).unwrap().as_deref(), Some("zeta"));
    assert_eq!(backend.key(3).unwrap(), None);
}

#[test]
fn test_shared_between_facades() {
    let backend: std::sync::Arc<dyn Backend> = std::sync::Arc::new(InMemory::new());
    let writer = Storage::from_shared(backend.clone(), Default::default());
    let reader = Storage::from_shared(backend.clone(), Default::default());

    writer.set("session.user", "alice", SetOptions::create_path());
    assert_eq!(reader.get("session.user"), Some(Value::from("alice")));
    assert_eq!(backend.length().unwrap(), 1);
}

#[test]
fn test_downcast_through_facade() {
    let storage = Storage::new(InMemory::from_items([("k", "v")]));
    let backend = storage
        .backend()
        .as_any()
        .downcast_ref::<InMemory>()
        .expect("backend should be InMemory");
    assert_eq!(backend.snapshot().unwrap().len(), 1);
}
