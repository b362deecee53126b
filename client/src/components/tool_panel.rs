//! Side panel with shape, pen, text, color, edit and save controls.
//!
//! DESIGN
//! ======
//! The panel renders from read-only signals and reports every interaction
//! through a callback, so it holds no editor state of its own.

use leptos::prelude::*;

use crate::state::editor::{FONT_FAMILIES, FONT_SIZE_MAX, FONT_SIZE_MIN, PEN_WIDTH_MAX, PEN_WIDTH_MIN};
use crate::util::color::color_input_value;

/// Read-only view of the session state the panel displays.
#[derive(Clone, Copy)]
pub struct ToolPanelSignals {
    pub color: Signal<String>,
    pub pen_active: Signal<bool>,
    pub pen_width: Signal<f64>,
    pub font_size: Signal<f64>,
    pub font_family: Signal<String>,
    pub has_selection: Signal<bool>,
    pub text_selected: Signal<bool>,
    pub saving: Signal<bool>,
}

/// Callbacks fired by the panel.
#[derive(Clone, Copy)]
pub struct ToolPanelActions {
    pub add_rectangle: Callback<()>,
    pub add_circle: Callback<()>,
    pub add_text: Callback<()>,
    pub toggle_pen: Callback<()>,
    pub delete_selected: Callback<()>,
    pub save: Callback<()>,
    pub change_color: Callback<String>,
    pub change_font_size: Callback<f64>,
    pub change_font_family: Callback<String>,
    pub change_pen_width: Callback<f64>,
}

fn parse_slider(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Vertical tool panel beside the drawing surface.
#[component]
pub fn ToolPanel(signals: ToolPanelSignals, actions: ToolPanelActions) -> impl IntoView {
    let ToolPanelSignals {
        color,
        pen_active,
        pen_width,
        font_size,
        font_family,
        has_selection,
        text_selected,
        saving,
    } = signals;

    let pen_label = move || if pen_active.get() { "Exit Pen Mode" } else { "Pen Tool" };
    let save_label = move || if saving.get() { "Saving..." } else { "Save" };

    let on_color = move |ev: leptos::ev::Event| actions.change_color.run(event_target_value(&ev));
    let on_pen_width = move |ev: leptos::ev::Event| {
        if let Some(width) = parse_slider(&event_target_value(&ev)) {
            actions.change_pen_width.run(width);
        }
    };
    let on_font_size = move |ev: leptos::ev::Event| {
        if let Some(size) = parse_slider(&event_target_value(&ev)) {
            actions.change_font_size.run(size);
        }
    };
    let on_font_family = move |ev: leptos::ev::Event| actions.change_font_family.run(event_target_value(&ev));

    view! {
        <aside class="tool-panel">
            <section class="tool-panel__section">
                <h3 class="tool-panel__heading">"Tools"</h3>
                <button class="btn tool-panel__btn" on:click=move |_| actions.add_rectangle.run(())>
                    "Rectangle"
                </button>
                <button class="btn tool-panel__btn" on:click=move |_| actions.add_circle.run(())>
                    "Circle"
                </button>
                <button class="btn tool-panel__btn" on:click=move |_| actions.add_text.run(())>
                    "Text"
                </button>
                <button
                    class="btn tool-panel__btn"
                    class:tool-panel__btn--active=move || pen_active.get()
                    on:click=move |_| actions.toggle_pen.run(())
                >
                    {pen_label}
                </button>
            </section>

            <Show when=move || pen_active.get()>
                <section class="tool-panel__section">
                    <h3 class="tool-panel__heading">"Pen Settings"</h3>
                    <label class="tool-panel__label">
                        "Pen Color"
                        <input
                            type="color"
                            class="tool-panel__color"
                            prop:value=move || color_input_value(&color.get(), "#000000")
                            on:input=on_color
                        />
                    </label>
                    <label class="tool-panel__label">
                        {move || format!("Width: {}px", pen_width.get())}
                        <input
                            type="range"
                            min=PEN_WIDTH_MIN
                            max=PEN_WIDTH_MAX
                            prop:value=move || pen_width.get().to_string()
                            on:input=on_pen_width
                        />
                    </label>
                </section>
            </Show>

            <Show when=move || text_selected.get()>
                <section class="tool-panel__section">
                    <h3 class="tool-panel__heading">"Text Settings"</h3>
                    <label class="tool-panel__label">
                        {move || format!("Font Size: {}px", font_size.get())}
                        <input
                            type="range"
                            min=FONT_SIZE_MIN
                            max=FONT_SIZE_MAX
                            prop:value=move || font_size.get().to_string()
                            on:input=on_font_size
                        />
                    </label>
                    <label class="tool-panel__label">
                        "Font Family"
                        <select prop:value=move || font_family.get() on:change=on_font_family>
                            {FONT_FAMILIES
                                .iter()
                                .map(|family| {
                                    let family = *family;
                                    view! {
                                        <option
                                            value=family
                                            selected=move || font_family.get() == family
                                        >
                                            {family}
                                        </option>
                                    }
                                })
                                .collect_view()}
                        </select>
                    </label>
                </section>
            </Show>

            <section class="tool-panel__section">
                <h3 class="tool-panel__heading">"Color"</h3>
                <input
                    type="color"
                    class="tool-panel__color"
                    prop:value=move || color_input_value(&color.get(), "#000000")
                    on:input=on_color
                />
            </section>

            <section class="tool-panel__section">
                <h3 class="tool-panel__heading">"Edit"</h3>
                <button
                    class="btn btn--danger tool-panel__btn"
                    disabled=move || !has_selection.get()
                    on:click=move |_| actions.delete_selected.run(())
                >
                    "Delete Selected"
                </button>
            </section>

            <section class="tool-panel__section">
                <button
                    class="btn btn--primary tool-panel__btn"
                    disabled=move || saving.get()
                    on:click=move |_| actions.save.run(())
                >
                    {save_label}
                </button>
            </section>
        </aside>
    }
}
