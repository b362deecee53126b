//! Modal dialog for editing the selected text object's string.

use leptos::prelude::*;

/// Dialog shown while a text object is being edited.
#[component]
pub fn TextDialog(value: RwSignal<String>, on_cancel: Callback<()>, on_save: Callback<()>) -> impl IntoView {
    let on_keydown = move |ev: leptos::ev::KeyboardEvent| {
        ev.stop_propagation();
        match ev.key().as_str() {
            "Escape" => on_cancel.run(()),
            "Enter" if !ev.shift_key() => {
                ev.prevent_default();
                on_save.run(());
            }
            _ => {}
        }
    };

    view! {
        <div class="dialog-backdrop" on:click=move |_| on_cancel.run(())>
            <div class="dialog dialog--text" on:click=move |ev| ev.stop_propagation()>
                <label class="dialog__label">
                    "Text"
                    <textarea
                        class="dialog__textarea"
                        prop:value=move || value.get()
                        on:input=move |ev| value.set(event_target_value(&ev))
                        on:keydown=on_keydown
                        autofocus=true
                    ></textarea>
                </label>
                <div class="dialog__actions">
                    <button class="btn" on:click=move |_| on_cancel.run(())>
                        "Cancel"
                    </button>
                    <button class="btn btn--primary" on:click=move |_| on_save.run(())>
                        "Save"
                    </button>
                </div>
            </div>
        </div>
    }
}
