//! Top bar of the editor page: back link, canvas id, status message and tips.

use leptos::prelude::*;

use crate::state::editor::{EditorController, StatusKind};

pub const HELP_TEXT: &str =
    "Tip: Use toolbar to add shapes, select objects to move them, drag a corner to resize, press Delete to remove";

/// Header bar for the editor page.
#[component]
pub fn EditorHeader() -> impl IntoView {
    let editor = expect_context::<RwSignal<EditorController>>();

    let canvas_id = move || {
        editor.with(|c| c.document_id().map(ToString::to_string).unwrap_or_default())
    };
    let status = move || editor.with(|c| c.status().cloned());
    let loading = move || editor.with(EditorController::is_loading);

    view! {
        <header class="editor-header">
            <a href="/" class="editor-header__back" title="Back to home">
                "←"
            </a>
            <span class="editor-header__title">"Canvas: " {canvas_id}</span>
            <Show when=loading>
                <span class="editor-header__loading">"Loading..."</span>
            </Show>
            <span class="editor-header__spacer"></span>
            {move || {
                status()
                    .map(|s| {
                        let class = match s.kind {
                            StatusKind::Success => "editor-header__status editor-header__status--success",
                            StatusKind::Error => "editor-header__status editor-header__status--error",
                        };
                        view! { <span class=class>{s.text}</span> }
                    })
            }}
            <span class="editor-header__help">{HELP_TEXT}</span>
        </header>
    }
}
