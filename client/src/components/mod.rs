//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render editor chrome and the drawing surface while reading and
//! writing the editor controller through Leptos context.

pub mod canvas_host;
pub mod editor_header;
pub mod text_dialog;
pub mod tool_panel;
