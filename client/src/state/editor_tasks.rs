//! Async halves of the editor's save and load flows.
//!
//! Each task reads what it needs from the controller, awaits the store with
//! no borrow held, then hands the result back through the same handle. A
//! handle whose controller is gone (page unmounted) makes the completion a
//! no-op. An unavailable store is reported like any other store failure.

#[cfg(test)]
#[path = "editor_tasks_test.rs"]
mod editor_tasks_test;

use crate::net::store::{DocumentStore, StoreError};

use super::editor::{ControllerHandle, EditorController, SaveRejected, StatusTicket};

/// Save the open surface. Returns the ticket for clearing the success
/// message, or `None` when the save failed or completed for a stale session.
///
/// # Errors
///
/// Returns [`SaveRejected`] when the save could not start.
pub async fn save_document<H: ControllerHandle>(
    handle: &H,
    store: Result<&dyn DocumentStore, StoreError>,
) -> Result<Option<StatusTicket>, SaveRejected> {
    let ticket = handle
        .with_controller(EditorController::begin_save)
        .ok_or(SaveRejected::NoDocument)??;
    log::info!("saving canvas {}", ticket.document_id);
    let result = match store {
        Ok(store) => store.save_document(&ticket.document_id, ticket.payload).await,
        Err(e) => Err(e),
    };
    Ok(handle.with_controller(|c| c.finish_save(ticket.generation, result)).flatten())
}

/// Load the open document into the surface. Does nothing when no document is
/// open.
pub async fn load_document<H: ControllerHandle>(handle: &H, store: Result<&dyn DocumentStore, StoreError>) {
    let Some(ticket) = handle.with_controller(EditorController::begin_load).flatten() else {
        return;
    };
    log::info!("loading canvas {}", ticket.document_id);
    let result = match store {
        Ok(store) => store.load_document(&ticket.document_id).await,
        Err(e) => Err(e),
    };
    handle.with_controller(|c| c.finish_load(ticket.generation, result));
}
