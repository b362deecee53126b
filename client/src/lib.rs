//! # client
//!
//! Leptos + WASM frontend for the sketchpad editor.
//!
//! This crate contains the landing and editor pages, the tool panel, the
//! editor controller that coordinates one drawing surface, and the document
//! store client that persists surfaces to the remote `canvases` table. It
//! drives the `canvas` crate through the `CanvasHost` bridge component.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: installs logging and hydrates the server-rendered page.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialized".into());
    }
    leptos::mount::hydrate_body(app::App);
}
