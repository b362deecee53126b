//! Bridge component between the editor controller and the imperative
//! `canvas::engine::Surface`.
//!
//! ARCHITECTURE
//! ============
//! The controller (held in a `RwSignal` context) owns the surface state. This
//! host owns the browser half: it binds a `Surface` to the `<canvas>` element,
//! forwards pointer input to the controller, and repaints on the next
//! animation frame whenever the controller reports the surface dirty.

use leptos::prelude::*;

use canvas::geom::Point;

use crate::state::editor::EditorController;
#[cfg(feature = "hydrate")]
use crate::util::canvas_input::{mouse_point, pointer_point};

#[cfg(feature = "hydrate")]
use canvas::engine::Surface;
#[cfg(feature = "hydrate")]
use std::cell::RefCell;
#[cfg(feature = "hydrate")]
use std::rc::Rc;
#[cfg(feature = "hydrate")]
use wasm_bindgen::{JsCast, closure::Closure};

#[cfg(feature = "hydrate")]
fn paint_if_dirty(surface: &Rc<RefCell<Option<Surface>>>, editor: RwSignal<EditorController>) {
    let surface = surface.borrow();
    let Some(surface) = surface.as_ref() else {
        return;
    };
    let painted = editor.try_update_untracked(|c| {
        if c.take_render_request() {
            surface.render(c.surface())
        } else {
            Ok(())
        }
    });
    if let Some(Err(e)) = painted {
        log::warn!("canvas render failed: {e:?}");
    }
}

#[cfg(feature = "hydrate")]
fn request_render(
    surface: &Rc<RefCell<Option<Surface>>>,
    editor: RwSignal<EditorController>,
    raf_pending: RwSignal<bool>,
) {
    if raf_pending.get_untracked() {
        return;
    }
    raf_pending.set(true);

    let Some(window) = web_sys::window() else {
        raf_pending.set(false);
        paint_if_dirty(surface, editor);
        return;
    };

    let surface_for_cb = Rc::clone(surface);
    let holder: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let holder_for_cb = Rc::clone(&holder);
    let cb = Closure::wrap(Box::new(move |_ts: f64| {
        raf_pending.set(false);
        paint_if_dirty(&surface_for_cb, editor);
        holder_for_cb.borrow_mut().take();
    }) as Box<dyn FnMut(f64)>);

    if window
        .request_animation_frame(cb.as_ref().unchecked_ref())
        .is_ok()
    {
        *holder.borrow_mut() = Some(cb);
    } else {
        raf_pending.set(false);
        paint_if_dirty(surface, editor);
    }
}

#[cfg(feature = "hydrate")]
fn pointer_at(ev: &leptos::ev::PointerEvent, canvas_ref: NodeRef<leptos::html::Canvas>) -> Option<Point> {
    canvas_ref.get_untracked().map(|canvas| pointer_point(ev, &canvas))
}

#[cfg(not(feature = "hydrate"))]
fn pointer_at(_ev: &leptos::ev::PointerEvent, _canvas_ref: NodeRef<leptos::html::Canvas>) -> Option<Point> {
    None
}

#[cfg(feature = "hydrate")]
fn double_click_at(ev: &leptos::ev::MouseEvent, canvas_ref: NodeRef<leptos::html::Canvas>) -> Option<Point> {
    if ev.button() != 0 {
        return None;
    }
    canvas_ref.get_untracked().map(|canvas| mouse_point(ev, &canvas))
}

#[cfg(not(feature = "hydrate"))]
fn double_click_at(_ev: &leptos::ev::MouseEvent, _canvas_ref: NodeRef<leptos::html::Canvas>) -> Option<Point> {
    None
}

/// Primary-button presses capture the pointer so drags continue off-canvas.
#[cfg(feature = "hydrate")]
fn begin_pointer(ev: &leptos::ev::PointerEvent, canvas_ref: NodeRef<leptos::html::Canvas>) -> Option<Point> {
    if ev.button() != 0 {
        return None;
    }
    ev.prevent_default();
    let canvas = canvas_ref.get_untracked()?;
    if canvas.set_pointer_capture(ev.pointer_id()).is_err() {
        log::debug!("pointer capture unavailable");
    }
    Some(pointer_point(ev, &canvas))
}

#[cfg(not(feature = "hydrate"))]
fn begin_pointer(_ev: &leptos::ev::PointerEvent, _canvas_ref: NodeRef<leptos::html::Canvas>) -> Option<Point> {
    None
}

/// Canvas host component.
///
/// `on_edit_text` fires on a double-click over the selected text object.
#[component]
pub fn CanvasHost(on_edit_text: Callback<()>) -> impl IntoView {
    let editor = expect_context::<RwSignal<EditorController>>();
    let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
    let pointer_active = RwSignal::new(false);
    #[cfg(feature = "hydrate")]
    let raf_pending = RwSignal::new(false);
    #[cfg(feature = "hydrate")]
    let surface = Rc::new(RefCell::new(None::<Surface>));

    #[cfg(feature = "hydrate")]
    {
        let surface = Rc::clone(&surface);
        Effect::new(move || {
            let Some(canvas) = canvas_ref.get() else {
                return;
            };
            if surface.borrow().is_some() {
                return;
            }
            match Surface::new(canvas) {
                Ok(instance) => {
                    *surface.borrow_mut() = Some(instance);
                    editor.update(EditorController::request_render);
                }
                Err(e) => log::error!("failed to bind drawing surface: {e:?}"),
            }
        });
    }

    #[cfg(feature = "hydrate")]
    {
        let surface = Rc::clone(&surface);
        let viewport = Memo::new(move |_| {
            editor.with(|c| (c.surface().viewport_width, c.surface().viewport_height))
        });
        Effect::new(move || {
            let (width, height) = viewport.get();
            let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
            if let Some(surface) = surface.borrow_mut().as_mut() {
                if let Err(e) = surface.set_viewport(width, height, dpr) {
                    log::warn!("failed to size canvas: {e:?}");
                }
            }
            editor.update_untracked(EditorController::request_render);
            request_render(&surface, editor, raf_pending);
        });
    }

    #[cfg(feature = "hydrate")]
    {
        let surface = Rc::clone(&surface);
        Effect::new(move || {
            editor.track();
            request_render(&surface, editor, raf_pending);
        });
    }

    let on_pointer_down = move |ev: leptos::ev::PointerEvent| {
        let Some(point) = begin_pointer(&ev, canvas_ref) else {
            return;
        };
        pointer_active.set(true);
        editor.update(|c| c.on_pointer_down(point));
    };

    let on_pointer_move = move |ev: leptos::ev::PointerEvent| {
        if !pointer_active.get_untracked() {
            return;
        }
        if let Some(point) = pointer_at(&ev, canvas_ref) {
            editor.update(|c| c.on_pointer_move(point));
        }
    };

    let on_pointer_up = move |ev: leptos::ev::PointerEvent| {
        if !pointer_active.get_untracked() {
            return;
        }
        pointer_active.set(false);
        if let Some(point) = pointer_at(&ev, canvas_ref) {
            editor.update(|c| c.on_pointer_up(point));
        }
    };

    let on_double_click = move |ev: leptos::ev::MouseEvent| {
        let Some(point) = double_click_at(&ev, canvas_ref) else {
            return;
        };
        if editor.with_untracked(|c| c.text_at(point)) {
            on_edit_text.run(());
        }
    };

    let cursor_class = move || {
        if editor.with(EditorController::is_pen_active) {
            "canvas-host canvas-host--pen"
        } else {
            "canvas-host"
        }
    };

    view! {
        <canvas
            class=cursor_class
            node_ref=canvas_ref
            on:pointerdown=on_pointer_down
            on:pointermove=on_pointer_move
            on:pointerup=on_pointer_up
            on:pointercancel=on_pointer_up
            on:dblclick=on_double_click
        >
            "Your browser does not support canvas."
        </canvas>
    }
}
