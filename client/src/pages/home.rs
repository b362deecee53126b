//! Landing page: a single button that creates a blank canvas and opens it.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::net::api::connected_store;
use crate::net::store::DocumentStore;
use crate::state::home::HomeState;

/// Landing page with the "Create New Canvas" button.
#[component]
pub fn HomePage() -> impl IntoView {
    let state = RwSignal::new(HomeState::default());
    let navigate = use_navigate();

    let on_create = move |_| {
        if !state.try_update(HomeState::begin_create).unwrap_or(false) {
            return;
        }
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            let result = match connected_store().await {
                Ok(store) => store.create_document().await,
                Err(e) => Err(e),
            };
            if let Some(path) = state.try_update(|s| s.finish_create(result)).flatten() {
                navigate(&path, NavigateOptions::default());
            }
        });
    };

    let creating = move || state.with(|s| s.creating);
    let error = move || state.with(|s| s.error.clone());

    view! {
        <div class="home-page">
            <div class="home-card">
                <h1 class="home-card__title">"Sketchpad"</h1>
                <p class="home-card__subtitle">
                    "Create a canvas, draw on it, and come back to it later by its link."
                </p>
                <button class="btn btn--primary home-card__create" disabled=creating on:click=on_create>
                    {move || if creating() { "Creating..." } else { "Create New Canvas" }}
                </button>
                {move || error().map(|message| view! { <p class="home-card__error">{message}</p> })}
            </div>
        </div>
    }
}
