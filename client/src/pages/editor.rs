//! Editor page: tool panel, header and drawing surface for one canvas.
//!
//! ARCHITECTURE
//! ============
//! The page owns the `EditorController` signal for its lifetime and provides
//! it as context. A change of the `canvas_id` route parameter starts a new
//! session on the same controller and loads the document; unmounting tears
//! the session down and removes the window listeners.
//!
//! TRADE-OFFS
//! ==========
//! Save and load completions go through `try_update`, so a completion that
//! lands after unmount is dropped instead of touching a disposed signal.

use leptos::prelude::*;
use leptos_router::hooks::use_params_map;

use crate::components::canvas_host::CanvasHost;
use crate::components::editor_header::EditorHeader;
use crate::components::text_dialog::TextDialog;
use crate::components::tool_panel::{ToolPanel, ToolPanelActions, ToolPanelSignals};
use crate::net::api::connected_store;
use crate::net::store::{DocumentId, DocumentStore, StoreError};
use crate::state::editor::{EditorController, STATUS_CLEAR_MS, StatusTicket};
use crate::state::editor_tasks::{load_document, save_document};

async fn store_handle() -> Result<&'static dyn DocumentStore, StoreError> {
    connected_store().await.map(|s| s as &dyn DocumentStore)
}

#[cfg(feature = "hydrate")]
async fn clear_status_later(editor: RwSignal<EditorController>, ticket: StatusTicket) {
    gloo_timers::future::TimeoutFuture::new(STATUS_CLEAR_MS).await;
    editor.try_update(|c| c.clear_status(ticket));
}

#[cfg(not(feature = "hydrate"))]
async fn clear_status_later(editor: RwSignal<EditorController>, ticket: StatusTicket) {
    log::debug!("no timers outside the browser; clearing status now instead of after {STATUS_CLEAR_MS}ms");
    editor.try_update(|c| c.clear_status(ticket));
}

#[cfg(feature = "hydrate")]
fn fit_to_window(editor: RwSignal<EditorController>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    editor.try_update(|c| c.on_resize(width, height));
}

#[cfg(feature = "hydrate")]
fn install_window_listeners(editor: RwSignal<EditorController>, text_dialog_open: RwSignal<bool>) {
    use crate::util::canvas_input::{key_event_targets_text_entry, key_from_dom};

    fit_to_window(editor);
    let resize = window_event_listener(leptos::ev::resize, move |_| fit_to_window(editor));
    let keydown = window_event_listener(leptos::ev::keydown, move |ev| {
        if text_dialog_open.get_untracked() || key_event_targets_text_entry(&ev) {
            return;
        }
        let key = key_from_dom(&ev.key());
        let outcome = editor.try_update(|c| c.on_key_down(&key));
        if outcome.is_some_and(|o| o.prevent_default) {
            ev.prevent_default();
        }
    });
    on_cleanup(move || {
        resize.remove();
        keydown.remove();
    });
}

#[cfg(not(feature = "hydrate"))]
fn install_window_listeners(_editor: RwSignal<EditorController>, _text_dialog_open: RwSignal<bool>) {}

/// Editor page for `/canvas/:canvas_id`.
#[component]
pub fn EditorPage() -> impl IntoView {
    let editor = RwSignal::new(EditorController::new());
    provide_context(editor);
    let params = use_params_map();
    let last_canvas_id = RwSignal::new(None::<String>);
    let text_dialog_open = RwSignal::new(false);
    let text_dialog_value = RwSignal::new(String::new());

    let canvas_id = move || params.read().get("canvas_id");

    // Start a session whenever the route points at a different canvas.
    Effect::new(move || {
        let next = canvas_id();
        if next == last_canvas_id.get_untracked() {
            return;
        }
        last_canvas_id.set(next.clone());
        let Some(id) = next else {
            return;
        };
        text_dialog_open.set(false);
        editor.update(|c| c.navigate(DocumentId::new(id)));
        leptos::task::spawn_local(async move {
            load_document(&editor, store_handle().await).await;
        });
    });

    install_window_listeners(editor, text_dialog_open);

    on_cleanup(move || {
        editor.try_update(EditorController::teardown);
    });

    let on_save = Callback::new(move |()| {
        leptos::task::spawn_local(async move {
            match save_document(&editor, store_handle().await).await {
                Ok(Some(ticket)) => clear_status_later(editor, ticket).await,
                Ok(None) => {}
                Err(e) => log::warn!("save not started: {e}"),
            }
        });
    });

    let on_edit_text = Callback::new(move |()| {
        let Some(text) = editor.with_untracked(|c| c.selected_text().map(str::to_owned)) else {
            return;
        };
        text_dialog_value.set(text);
        text_dialog_open.set(true);
    });
    let on_text_cancel = Callback::new(move |()| text_dialog_open.set(false));
    let on_text_save = Callback::new(move |()| {
        let text = text_dialog_value.get_untracked();
        editor.update(|c| c.edit_selected_text(&text));
        text_dialog_open.set(false);
    });

    let signals = ToolPanelSignals {
        color: Signal::derive(move || editor.with(|c| c.color().to_owned())),
        pen_active: Signal::derive(move || editor.with(EditorController::is_pen_active)),
        pen_width: Signal::derive(move || editor.with(EditorController::pen_width)),
        font_size: Signal::derive(move || editor.with(EditorController::font_size)),
        font_family: Signal::derive(move || editor.with(|c| c.font_family().to_owned())),
        has_selection: Signal::derive(move || editor.with(EditorController::has_selection)),
        text_selected: Signal::derive(move || editor.with(EditorController::text_selected)),
        saving: Signal::derive(move || editor.with(EditorController::is_saving)),
    };
    let actions = ToolPanelActions {
        add_rectangle: Callback::new(move |()| {
            editor.update(|c| {
                c.add_rectangle();
            });
        }),
        add_circle: Callback::new(move |()| {
            editor.update(|c| {
                c.add_circle();
            });
        }),
        add_text: Callback::new(move |()| {
            editor.update(|c| {
                c.add_text();
            });
        }),
        toggle_pen: Callback::new(move |()| editor.update(EditorController::toggle_pen)),
        delete_selected: Callback::new(move |()| editor.update(EditorController::delete_selected)),
        save: on_save,
        change_color: Callback::new(move |color: String| editor.update(|c| c.change_color(&color))),
        change_font_size: Callback::new(move |size: f64| editor.update(|c| c.change_font_size(size))),
        change_font_family: Callback::new(move |family: String| editor.update(|c| c.change_font_family(&family))),
        change_pen_width: Callback::new(move |width: f64| editor.update(|c| c.change_pen_width(width))),
    };

    view! {
        <div class="editor-page">
            <EditorHeader />
            <div class="editor-page__body">
                <ToolPanel signals=signals actions=actions />
                <main class="editor-page__surface">
                    <CanvasHost on_edit_text=on_edit_text />
                    <Show when=move || editor.with(EditorController::is_loading)>
                        <div class="editor-page__loading">"Loading canvas..."</div>
                    </Show>
                </main>
            </div>
            <Show when=move || text_dialog_open.get()>
                <TextDialog value=text_dialog_value on_cancel=on_text_cancel on_save=on_text_save />
            </Show>
        </div>
    }
}
