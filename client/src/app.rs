//! Root application component with routing and store bootstrap.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    ParamSegment, StaticSegment,
    components::{Route, Router, Routes},
};

use crate::net::api::bootstrap_store;
use crate::pages::{editor::EditorPage, home::HomePage};

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Starts fetching the document store settings as soon as the app hydrates
/// and sets up client-side routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    Effect::new(move || {
        leptos::task::spawn_local(async {
            if let Err(e) = bootstrap_store().await {
                log::error!("failed to configure document store: {e}");
            }
        });
    });

    view! {
        <Stylesheet id="leptos" href="/pkg/sketchpad.css"/>
        <Title text="Sketchpad"/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("") view=HomePage/>
                <Route path=(StaticSegment("canvas"), ParamSegment("canvas_id")) view=EditorPage/>
            </Routes>
        </Router>
    }
}
