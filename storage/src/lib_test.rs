use serde::{Deserialize, Serialize};

use crate::{
    KeyValueStore, MemoryStore, StorageError, load_json, proctoring_events_key, save_json, whiteboard_key,
};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Entry {
    name: String,
    value: i64,
}

#[test]
fn keys_follow_storage_layout() {
    assert_eq!(whiteboard_key("q-17"), "whiteboard_q-17");
    assert_eq!(proctoring_events_key("iv-3"), "proctoring_events_iv-3");
}

#[test]
fn memory_store_set_get_remove() {
    let mut store = MemoryStore::new();
    assert!(store.is_empty());
    store.set("a", "1".to_owned()).unwrap();
    assert_eq!(store.get("a").as_deref(), Some("1"));
    store.set("a", "2".to_owned()).unwrap();
    assert_eq!(store.get("a").as_deref(), Some("2"));
    assert_eq!(store.len(), 1);
    store.remove("a").unwrap();
    assert!(store.get("a").is_none());
    store.remove("missing").unwrap();
}

#[test]
fn load_json_missing_key_is_none() {
    let store = MemoryStore::new();
    let loaded: Option<Vec<Entry>> = load_json(&store, "nothing").unwrap();
    assert!(loaded.is_none());
}

#[test]
fn save_then_load_json() {
    let mut store = MemoryStore::new();
    let entries = vec![Entry { name: "x".into(), value: 3 }];
    save_json(&mut store, "entries", &entries).unwrap();
    let loaded: Option<Vec<Entry>> = load_json(&store, "entries").unwrap();
    assert_eq!(loaded, Some(entries));
}

#[test]
fn load_json_corrupt_value_reports_key() {
    let mut store = MemoryStore::new();
    store.set("whiteboard_q1", "{not json".to_owned()).unwrap();
    let err = load_json::<Vec<Entry>>(&store, "whiteboard_q1").unwrap_err();
    match err {
        StorageError::Corrupt { key, .. } => assert_eq!(key, "whiteboard_q1"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn mut_ref_adapter_writes_through() {
    let mut store = MemoryStore::new();
    {
        let mut borrowed = &mut store;
        save_json(&mut borrowed, "k", &[1, 2, 3]).unwrap();
    }
    assert_eq!(store.get("k").as_deref(), Some("[1,2,3]"));
}

#[test]
fn keys_with_prefix_sorted() {
    let mut store = MemoryStore::new();
    store.set(&whiteboard_key("b"), "[]".into()).unwrap();
    store.set(&whiteboard_key("a"), "[]".into()).unwrap();
    store.set(&proctoring_events_key("a"), "[]".into()).unwrap();
    assert_eq!(store.keys_with_prefix("whiteboard_"), vec!["whiteboard_a", "whiteboard_b"]);
}
