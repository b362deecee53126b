//! Client-side state for the landing and editor pages.
//!
//! SYSTEM CONTEXT
//! ==============
//! `home` tracks new-canvas creation, `editor` owns the editor session and its
//! surface, and `editor_tasks` runs the async store calls against it.

pub mod editor;
pub mod editor_tasks;
pub mod home;
