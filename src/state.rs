//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. The
//! server keeps no documents of its own; it only hands the browser the store
//! settings it was started with.

use std::sync::Arc;

use crate::config::StoreSettings;

#[derive(Clone, Default)]
pub struct AppState {
    /// `None` when the server was started without store settings.
    pub store: Option<Arc<StoreSettings>>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Option<StoreSettings>) -> Self {
        Self { store: store.map(Arc::new) }
    }
}
