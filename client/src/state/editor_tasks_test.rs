use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use canvas::doc::Blob;
use futures::executor::block_on;
use futures::future::join;

use super::*;
use crate::net::memory::MemoryStore;
use crate::net::store::{BoxFuture, DocumentId, StoreError};
use crate::state::editor::{LOAD_FAILED, SAVE_FAILED, SAVE_SUCCEEDED, StatusKind};

fn editor_for(store: &MemoryStore) -> Rc<RefCell<EditorController>> {
    let id = block_on(store.create_document()).expect("create");
    let mut controller = EditorController::new();
    controller.navigate(id);
    Rc::new(RefCell::new(controller))
}

/// Pending on the first poll, ready on the second.
struct YieldOnce(bool);

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 {
            return Poll::Ready(());
        }
        self.0 = true;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}

/// Store whose saves stay in flight for one extra poll.
struct SlowSaves<'s>(&'s MemoryStore);

impl DocumentStore for SlowSaves<'_> {
    fn create_document(&self) -> BoxFuture<'_, Result<DocumentId, StoreError>> {
        self.0.create_document()
    }

    fn save_document<'a>(&'a self, id: &'a DocumentId, payload: Blob) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            YieldOnce(false).await;
            self.0.save_document(id, payload).await
        })
    }

    fn load_document<'a>(&'a self, id: &'a DocumentId) -> BoxFuture<'a, Result<Option<Blob>, StoreError>> {
        self.0.load_document(id)
    }
}

fn status_text(handle: &Rc<RefCell<EditorController>>) -> Option<String> {
    handle.borrow().status().map(|s| s.text.clone())
}

#[test]
fn save_writes_payload_and_reports_success() {
    let store = MemoryStore::new();
    let handle = editor_for(&store);
    handle.borrow_mut().add_rectangle();

    let ticket = block_on(save_document(&handle, Ok(&store))).expect("save starts");
    assert!(ticket.is_some());
    assert_eq!(status_text(&handle).as_deref(), Some(SAVE_SUCCEEDED));
    assert!(!handle.borrow().is_saving());

    let id = handle.borrow().document_id().cloned().expect("open document");
    let saved = block_on(store.load_document(&id)).expect("load").expect("payload");
    assert_eq!(saved["objects"].as_array().map(Vec::len), Some(1));
}

#[test]
fn save_failure_reports_error() {
    let store = MemoryStore::new();
    let handle = editor_for(&store);
    handle.borrow_mut().add_rectangle();
    handle.borrow_mut().add_text();
    let before = handle.borrow().surface().scene().clone();
    store.set_offline(true);

    let ticket = block_on(save_document(&handle, Ok(&store))).expect("save starts");
    assert!(ticket.is_none());
    assert_eq!(status_text(&handle).as_deref(), Some(SAVE_FAILED));
    assert!(!handle.borrow().is_saving());
    assert_eq!(handle.borrow().surface().scene(), &before);
}

#[test]
fn save_to_missing_row_reports_error() {
    let store = MemoryStore::new();
    let handle = Rc::new(RefCell::new(EditorController::new()));
    handle.borrow_mut().navigate(DocumentId::new("never-created"));

    block_on(save_document(&handle, Ok(&store))).expect("save starts");
    assert_eq!(handle.borrow().status().map(|s| s.kind), Some(StatusKind::Error));
}

#[test]
fn save_is_rejected_while_another_is_running() {
    let store = MemoryStore::new();
    let handle = editor_for(&store);
    handle.borrow_mut().begin_save().expect("first save");

    let result = block_on(save_document(&handle, Ok(&store)));
    assert_eq!(result, Err(SaveRejected::InProgress));
}

#[test]
fn overlapping_saves_reach_the_store_once() {
    let store = MemoryStore::new();
    let handle = editor_for(&store);
    handle.borrow_mut().add_circle();
    let slow = SlowSaves(&store);

    let (first, second) = block_on(join(save_document(&handle, Ok(&slow)), save_document(&handle, Ok(&slow))));

    assert!(matches!(first, Ok(Some(_))));
    assert_eq!(second, Err(SaveRejected::InProgress));
    assert_eq!(store.save_calls(), 1);
    assert!(!handle.borrow().is_saving());
}

#[test]
fn save_through_unavailable_handle_is_rejected() {
    let store = MemoryStore::new();
    let handle = editor_for(&store);
    let _guard = handle.borrow();
    assert_eq!(block_on(save_document(&handle, Ok(&store))), Err(SaveRejected::NoDocument));
}

#[test]
fn saved_document_loads_into_fresh_session() {
    let store = MemoryStore::new();
    let writer = editor_for(&store);
    writer.borrow_mut().add_circle();
    writer.borrow_mut().add_text();
    block_on(save_document(&writer, Ok(&store))).expect("save");
    let id = writer.borrow().document_id().cloned().expect("id");

    let reader = Rc::new(RefCell::new(EditorController::new()));
    reader.borrow_mut().navigate(id);
    block_on(load_document(&reader, Ok(&store)));

    let reader = reader.borrow();
    assert!(!reader.is_loading());
    assert_eq!(reader.surface().len(), 2);
    assert_eq!(reader.surface().scene(), writer.borrow().surface().scene());
}

#[test]
fn save_right_after_load_writes_the_loaded_payload() {
    let store = MemoryStore::new();
    let writer = editor_for(&store);
    writer.borrow_mut().add_rectangle();
    writer.borrow_mut().toggle_pen();
    writer.borrow_mut().on_pointer_down(canvas::geom::Point::new(10.0, 10.0));
    writer.borrow_mut().on_pointer_up(canvas::geom::Point::new(40.0, 30.0));
    block_on(save_document(&writer, Ok(&store))).expect("save");
    let id = writer.borrow().document_id().cloned().expect("id");
    let stored = block_on(store.load_document(&id)).expect("load").expect("payload");

    let reader = Rc::new(RefCell::new(EditorController::new()));
    reader.borrow_mut().navigate(id);
    block_on(load_document(&reader, Ok(&store)));

    let ticket = reader.borrow_mut().begin_save().expect("save starts");
    assert_eq!(ticket.payload, stored);
}

#[test]
fn load_of_blank_row_starts_empty() {
    let store = MemoryStore::new();
    let handle = editor_for(&store);
    block_on(load_document(&handle, Ok(&store)));
    assert!(handle.borrow().surface().is_empty());
    assert!(handle.borrow().status().is_none());
}

#[test]
fn load_failure_sets_message() {
    let store = MemoryStore::new();
    let handle = editor_for(&store);
    store.set_offline(true);
    block_on(load_document(&handle, Ok(&store)));
    assert_eq!(status_text(&handle).as_deref(), Some(LOAD_FAILED));
    assert!(!handle.borrow().is_loading());
}

#[test]
fn load_without_document_does_nothing() {
    let store = MemoryStore::new();
    let handle = Rc::new(RefCell::new(EditorController::new()));
    block_on(load_document(&handle, Ok(&store)));
    assert!(!handle.borrow().is_loading());
}

#[test]
fn unavailable_store_fails_save_and_load() {
    let store = MemoryStore::new();
    let handle = editor_for(&store);

    block_on(save_document(&handle, Err(StoreError::NotConfigured))).expect("save starts");
    assert_eq!(status_text(&handle).as_deref(), Some(SAVE_FAILED));
    assert!(!handle.borrow().is_saving());

    block_on(load_document(&handle, Err(StoreError::NotConfigured)));
    assert_eq!(status_text(&handle).as_deref(), Some(LOAD_FAILED));
    assert!(!handle.borrow().is_loading());
}
