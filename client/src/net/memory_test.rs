use super::*;

use futures::executor::block_on;
use serde_json::json;

#[test]
fn created_rows_start_blank() {
    let store = MemoryStore::new();
    let id = block_on(store.create_document()).expect("create");
    assert_eq!(store.len(), 1);
    assert_eq!(block_on(store.load_document(&id)), Ok(None));
}

#[test]
fn created_ids_are_unique() {
    let store = MemoryStore::new();
    let a = block_on(store.create_document()).expect("create");
    let b = block_on(store.create_document()).expect("create");
    assert_ne!(a, b);
}

#[test]
fn save_then_load_returns_payload() {
    let store = MemoryStore::new();
    let id = block_on(store.create_document()).expect("create");
    let payload = json!({ "version": 1, "objects": [] });
    block_on(store.save_document(&id, payload.clone())).expect("save");
    assert_eq!(block_on(store.load_document(&id)), Ok(Some(payload)));
}

#[test]
fn save_to_unknown_row_is_missing() {
    let store = MemoryStore::new();
    let id = DocumentId::new("nope");
    let result = block_on(store.save_document(&id, json!({})));
    assert_eq!(result, Err(StoreError::Missing(id)));
    assert!(store.is_empty());
}

#[test]
fn load_of_unknown_row_is_none() {
    let store = MemoryStore::new();
    assert_eq!(block_on(store.load_document(&DocumentId::new("nope"))), Ok(None));
}

#[test]
fn offline_store_fails_every_call() {
    let store = MemoryStore::new();
    let id = block_on(store.create_document()).expect("create");
    store.set_offline(true);
    assert!(matches!(block_on(store.create_document()), Err(StoreError::Transport(_))));
    assert!(matches!(block_on(store.load_document(&id)), Err(StoreError::Transport(_))));
    store.set_offline(false);
    assert!(block_on(store.load_document(&id)).is_ok());
}

#[test]
fn save_calls_are_counted_even_when_offline() {
    let store = MemoryStore::new();
    let id = block_on(store.create_document()).expect("create");
    block_on(store.save_document(&id, json!({}))).expect("save");
    store.set_offline(true);
    assert!(block_on(store.save_document(&id, json!({}))).is_err());
    assert_eq!(store.save_calls(), 2);
}
