//! Landing-page state for creating a new canvas.
//!
//! DESIGN
//! ======
//! Creation is a two-step flow so the button can disable itself while the
//! insert is in flight: `begin_create` guards against double clicks and
//! `finish_create` turns the store's answer into either an editor path or a
//! user-facing error.

#[cfg(test)]
#[path = "home_test.rs"]
mod home_test;

use crate::net::store::{DocumentId, StoreError};

pub const CREATE_FAILED: &str = "Failed to create new canvas. Please try again.";

/// Editor route for a document.
pub fn editor_path(id: &DocumentId) -> String {
    format!("/canvas/{id}")
}

/// Landing page state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HomeState {
    pub creating: bool,
    pub error: Option<String>,
}

impl HomeState {
    /// Start a create. `false` if one is already running.
    pub fn begin_create(&mut self) -> bool {
        if self.creating {
            return false;
        }
        self.creating = true;
        self.error = None;
        true
    }

    /// Finish a create. Returns the editor path to navigate to on success.
    pub fn finish_create(&mut self, result: Result<DocumentId, StoreError>) -> Option<String> {
        self.creating = false;
        match result {
            Ok(id) => {
                log::info!("created canvas {id}");
                Some(editor_path(&id))
            }
            Err(e) => {
                log::error!("error creating canvas: {e}");
                self.error = Some(CREATE_FAILED.to_owned());
                None
            }
        }
    }
}
