//! In-memory document store for tests and offline sessions.

#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use canvas::doc::Blob;

use super::store::{BoxFuture, DocumentId, DocumentStore, StoreError};

/// Rows keyed by id; `None` is a row whose payload was never written.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: RwLock<HashMap<DocumentId, Option<Blob>>>,
    offline: AtomicBool,
    save_calls: AtomicUsize,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail with a transport error until turned back on.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::Relaxed);
    }

    /// Number of `save_document` calls received, failed ones included.
    pub fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::Relaxed)
    }

    /// Number of rows, including blank ones.
    pub fn len(&self) -> usize {
        self.rows.read().map_or(0, |rows| rows.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::Relaxed) {
            return Err(StoreError::Transport("store is offline".into()));
        }
        Ok(())
    }
}

fn lock_error(e: impl std::fmt::Display) -> StoreError {
    StoreError::Transport(format!("lock error: {e}"))
}

impl DocumentStore for MemoryStore {
    fn create_document(&self) -> BoxFuture<'_, Result<DocumentId, StoreError>> {
        Box::pin(async move {
            self.check_online()?;
            let id = DocumentId::new(uuid::Uuid::new_v4().to_string());
            self.rows.write().map_err(lock_error)?.insert(id.clone(), None);
            Ok(id)
        })
    }

    fn save_document<'a>(&'a self, id: &'a DocumentId, payload: Blob) -> BoxFuture<'a, Result<(), StoreError>> {
        self.save_calls.fetch_add(1, Ordering::Relaxed);
        Box::pin(async move {
            self.check_online()?;
            let mut rows = self.rows.write().map_err(lock_error)?;
            let row = rows.get_mut(id).ok_or_else(|| StoreError::Missing(id.clone()))?;
            *row = Some(payload);
            Ok(())
        })
    }

    fn load_document<'a>(&'a self, id: &'a DocumentId) -> BoxFuture<'a, Result<Option<Blob>, StoreError>> {
        Box::pin(async move {
            self.check_online()?;
            let rows = self.rows.read().map_err(lock_error)?;
            Ok(rows.get(id).cloned().flatten())
        })
    }
}
