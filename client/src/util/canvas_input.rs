//! Canvas input mapping helpers.

#[cfg(test)]
#[path = "canvas_input_test.rs"]
mod canvas_input_test;

use canvas::geom::Point;
use canvas::input::Key;

/// Convert client coordinates to a point relative to the canvas's top-left.
pub fn surface_point(client_x: f64, client_y: f64, rect_left: f64, rect_top: f64) -> Point {
    Point::new(client_x - rect_left, client_y - rect_top)
}

/// Whether a keydown came from a text-entry control and must be left alone.
pub fn is_text_entry_tag(tag_name: &str) -> bool {
    matches!(tag_name.to_ascii_uppercase().as_str(), "INPUT" | "TEXTAREA" | "SELECT")
}

/// Map a DOM `KeyboardEvent.key` value.
pub fn key_from_dom(key: &str) -> Key {
    Key::from(key)
}

#[cfg(feature = "hydrate")]
pub fn pointer_point(ev: &leptos::ev::PointerEvent, canvas: &web_sys::HtmlCanvasElement) -> Point {
    let rect = canvas.get_bounding_client_rect();
    surface_point(f64::from(ev.client_x()), f64::from(ev.client_y()), rect.left(), rect.top())
}

#[cfg(feature = "hydrate")]
pub fn mouse_point(ev: &leptos::ev::MouseEvent, canvas: &web_sys::HtmlCanvasElement) -> Point {
    let rect = canvas.get_bounding_client_rect();
    surface_point(f64::from(ev.client_x()), f64::from(ev.client_y()), rect.left(), rect.top())
}

/// True when the keydown target is an input the user is typing into.
#[cfg(feature = "hydrate")]
pub fn key_event_targets_text_entry(ev: &leptos::ev::KeyboardEvent) -> bool {
    use wasm_bindgen::JsCast;

    ev.target()
        .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
        .is_some_and(|el| is_text_entry_tag(&el.tag_name()))
}
