//! Drawing surface for the sketchpad editor.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns one
//! mutable scene of drawable objects (rectangles, circles, text, freehand
//! pen strokes) together with the single active selection, the drawing-mode
//! brush, and the pointer gestures that create and move objects. The host
//! (the Leptos editor) mutates the surface only through [`engine::SurfaceCore`]
//! and observes selection changes through an explicit subscription.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | [`engine::SurfaceCore`] (scene ownership, selection, brush, gestures, subscriptions) and the browser-bound [`engine::Surface`] |
//! | [`doc`] | Scene objects, capability tags, the ordered scene store and its JSON form |
//! | [`geom`] | Points and axis-aligned bounds |
//! | [`input`] | Keys, the pen brush and the gesture state machine |
//! | [`hit`] | Hit-testing against scene objects |
//! | [`render`] | Canvas2D drawing of a `SurfaceCore` |
//! | [`consts`] | Shared numeric constants |

pub mod consts;
pub mod doc;
pub mod engine;
pub mod geom;
pub mod hit;
pub mod input;
pub mod render;
