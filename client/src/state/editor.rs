//! Editor session state and the controller that coordinates one surface.
//!
//! SYSTEM CONTEXT
//! ==============
//! `EditorController` is the only stateful coordinator on the editor page. It
//! owns the drawing surface for the open document, mirrors the surface's
//! selection into session state through a subscription, applies tool panel
//! intent, and runs the save/load state machines. The async halves of save
//! and load live in `editor_tasks`; this module stays synchronous so it can be
//! tested natively.
//!
//! SESSIONS
//! ========
//! Every `navigate` starts a new session: the previous surface and its
//! subscription are released, the generation counter is bumped, and session
//! values return to their defaults. Completions carry the generation they were
//! started under and are ignored when it is stale.

#[cfg(test)]
#[path = "editor_test.rs"]
mod editor_test;

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;

use canvas::doc::{Blob, Capability, ObjectId, SceneObject, Shape};
use canvas::engine::{SelectionChanged, Subscription, SurfaceCore};
use canvas::geom::Point;
use canvas::input::Key;

use crate::net::store::{DocumentId, StoreError};
use crate::util::color::normalize_hex_color;

/// Session color before the user picks one.
pub const DEFAULT_COLOR: &str = "#3498db";
/// Session font size before the user picks one.
pub const DEFAULT_FONT_SIZE: f64 = 24.0;
/// Session font family before the user picks one.
pub const DEFAULT_FONT_FAMILY: &str = "Arial";
/// Session pen width before the user picks one.
pub const DEFAULT_PEN_WIDTH: f64 = 3.0;

/// Font size slider bounds.
pub const FONT_SIZE_MIN: f64 = 8.0;
pub const FONT_SIZE_MAX: f64 = 120.0;
/// Pen width slider bounds.
pub const PEN_WIDTH_MIN: f64 = 1.0;
pub const PEN_WIDTH_MAX: f64 = 50.0;

/// Width reserved for the tool panel beside the surface.
pub const TOOL_PANEL_WIDTH: f64 = 250.0;

/// Outline color and width of added shapes.
pub const SHAPE_STROKE: &str = "#000000";
pub const SHAPE_STROKE_WIDTH: f64 = 2.0;
/// Placeholder string of a freshly added text object.
pub const TEXT_PLACEHOLDER: &str = "Double-click to edit";

/// How long the save confirmation stays visible.
pub const STATUS_CLEAR_MS: u32 = 3_000;

pub const SAVE_SUCCEEDED: &str = "Canvas saved successfully!";
pub const SAVE_FAILED: &str = "Failed to save. Please try again.";
pub const SAVE_IN_PROGRESS: &str = "Save already in progress";
pub const LOAD_FAILED: &str = "Failed to load canvas. Please refresh the page.";

/// Font families offered by the tool panel.
pub const FONT_FAMILIES: [&str; 9] = [
    "Arial",
    "Helvetica",
    "Times New Roman",
    "Georgia",
    "Courier New",
    "Verdana",
    "Comic Sans MS",
    "Impact",
    "Trebuchet MS",
];

/// Tool mode of the session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ToolMode {
    /// Pointer input selects and moves objects.
    #[default]
    Idle,
    /// Pointer input draws freehand strokes.
    Pen,
}

/// Tone of a status message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

/// Transient message shown in the editor header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    fn success(text: &str) -> Self {
        Self { kind: StatusKind::Success, text: text.to_owned() }
    }

    fn error(text: &str) -> Self {
        Self { kind: StatusKind::Error, text: text.to_owned() }
    }
}

/// Identifies one status message so a delayed clear can't remove a newer one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusTicket {
    serial: u64,
}

/// A save that passed the in-flight guard.
#[derive(Clone, Debug, PartialEq)]
pub struct SaveTicket {
    pub generation: u64,
    pub document_id: DocumentId,
    pub payload: Blob,
}

/// Why a save was not started.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SaveRejected {
    #[error("save already in progress")]
    InProgress,
    #[error("no canvas is open")]
    NoDocument,
    #[error("surface could not be serialized: {0}")]
    Encode(String),
}

/// A load started for one session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadTicket {
    pub generation: u64,
    pub document_id: DocumentId,
}

/// What the page should do with a key event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyOutcome {
    pub prevent_default: bool,
}

/// Editor session state plus the surface it coordinates.
#[derive(Debug)]
pub struct EditorController {
    document_id: Option<DocumentId>,
    generation: u64,
    surface: SurfaceCore,
    subscription: Option<Subscription>,
    tool: ToolMode,
    color: String,
    font_size: f64,
    font_family: String,
    pen_width: f64,
    selection: Option<ObjectId>,
    loading: bool,
    saving: bool,
    status: Option<StatusMessage>,
    status_serial: u64,
}

impl Default for EditorController {
    fn default() -> Self {
        let mut surface = SurfaceCore::new();
        let subscription = Some(surface.subscribe());
        Self {
            document_id: None,
            generation: 0,
            surface,
            subscription,
            tool: ToolMode::Idle,
            color: DEFAULT_COLOR.to_owned(),
            font_size: DEFAULT_FONT_SIZE,
            font_family: DEFAULT_FONT_FAMILY.to_owned(),
            pen_width: DEFAULT_PEN_WIDTH,
            selection: None,
            loading: false,
            saving: false,
            status: None,
            status_serial: 0,
        }
    }
}

impl EditorController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Session lifecycle ---

    /// Start a session for `document_id`, releasing everything the previous
    /// session held. The viewport size carries over.
    pub fn navigate(&mut self, document_id: DocumentId) {
        self.teardown();
        let (width, height) = (self.surface.viewport_width, self.surface.viewport_height);
        let generation = self.generation + 1;
        *self = Self::default();
        self.surface.set_viewport(width, height);
        self.generation = generation;
        self.document_id = Some(document_id);
    }

    /// Release the surface and its subscription. Used on unmount.
    pub fn teardown(&mut self) {
        if let Some(sub) = self.subscription.take() {
            self.surface.unsubscribe(sub);
        }
        self.surface.dispose();
        self.selection = None;
    }

    // --- Queries ---

    #[must_use]
    pub fn document_id(&self) -> Option<&DocumentId> {
        self.document_id.as_ref()
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn surface(&self) -> &SurfaceCore {
        &self.surface
    }

    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    #[must_use]
    pub fn tool(&self) -> ToolMode {
        self.tool
    }

    #[must_use]
    pub fn is_pen_active(&self) -> bool {
        self.tool == ToolMode::Pen
    }

    #[must_use]
    pub fn color(&self) -> &str {
        &self.color
    }

    #[must_use]
    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    #[must_use]
    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    #[must_use]
    pub fn pen_width(&self) -> f64 {
        self.pen_width
    }

    #[must_use]
    pub fn selection(&self) -> Option<ObjectId> {
        self.selection
    }

    /// The selected object, if the selection still resolves.
    #[must_use]
    pub fn selected_object(&self) -> Option<&SceneObject> {
        self.selection.and_then(|id| self.surface.object(&id))
    }

    #[must_use]
    pub fn has_selection(&self) -> bool {
        self.selection.is_some()
    }

    #[must_use]
    pub fn text_selected(&self) -> bool {
        self.selected_object().is_some_and(|o| o.has(Capability::HasFont))
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.saving
    }

    #[must_use]
    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    /// String of the selected text object.
    #[must_use]
    pub fn selected_text(&self) -> Option<&str> {
        match &self.selected_object()?.shape {
            Shape::Text { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Whether `pt` lands on the selected text object.
    #[must_use]
    pub fn text_at(&self, pt: Point) -> bool {
        self.selected_object()
            .is_some_and(|o| o.has(Capability::HasFont) && o.bounds().contains(pt))
    }

    /// Mark the surface dirty, e.g. after the canvas element was resized.
    pub fn request_render(&mut self) {
        self.surface.request_render();
    }

    /// Return and clear the surface's dirty flag.
    pub fn take_render_request(&mut self) -> bool {
        self.surface.take_render_request()
    }

    // --- Adding objects ---

    pub fn add_rectangle(&mut self) -> ObjectId {
        let rect = SceneObject::rect(Point::new(100.0, 100.0), 150.0, 100.0, &self.color, SHAPE_STROKE, SHAPE_STROKE_WIDTH);
        self.add_and_select(rect)
    }

    pub fn add_circle(&mut self) -> ObjectId {
        let circle = SceneObject::circle(Point::new(150.0, 150.0), 60.0, &self.color, SHAPE_STROKE, SHAPE_STROKE_WIDTH);
        self.add_and_select(circle)
    }

    pub fn add_text(&mut self) -> ObjectId {
        let text = SceneObject::text(
            Point::new(100.0, 100.0),
            TEXT_PLACEHOLDER,
            &self.font_family,
            self.font_size,
            &self.color,
        );
        self.add_and_select(text)
    }

    fn add_and_select(&mut self, obj: SceneObject) -> ObjectId {
        let id = self.surface.add(obj);
        self.surface.set_active_selection(Some(id));
        self.sync_selection();
        id
    }

    // --- Tool panel intent ---

    /// Set the session color; recolor a fillable selection and the live pen.
    /// Non-hex input is ignored.
    pub fn change_color(&mut self, color: &str) {
        let Some(color) = normalize_hex_color(color) else {
            log::warn!("ignoring invalid color {color:?}");
            return;
        };
        if let Some(obj) = self.selection.and_then(|id| self.surface.object_mut(&id)) {
            if obj.set_fill(&color) {
                self.surface.request_render();
            }
        }
        if self.is_pen_active() {
            self.surface.brush_mut_or_init().color.clone_from(&color);
        }
        self.color = color;
    }

    pub fn change_font_size(&mut self, size: f64) {
        if !size.is_finite() {
            return;
        }
        let size = size.clamp(FONT_SIZE_MIN, FONT_SIZE_MAX);
        self.font_size = size;
        if let Some(obj) = self.selection.and_then(|id| self.surface.object_mut(&id)) {
            if obj.set_font_size(size) {
                self.surface.request_render();
            }
        }
    }

    pub fn change_font_family(&mut self, family: &str) {
        family.clone_into(&mut self.font_family);
        if let Some(obj) = self.selection.and_then(|id| self.surface.object_mut(&id)) {
            if obj.set_font_family(family) {
                self.surface.request_render();
            }
        }
    }

    pub fn change_pen_width(&mut self, width: f64) {
        if !width.is_finite() {
            return;
        }
        let width = width.clamp(PEN_WIDTH_MIN, PEN_WIDTH_MAX);
        self.pen_width = width;
        if self.is_pen_active() {
            self.surface.brush_mut_or_init().width = width;
        }
    }

    /// Switch between selecting and freehand drawing. Objects are untouched.
    pub fn toggle_pen(&mut self) {
        match self.tool {
            ToolMode::Idle => {
                self.tool = ToolMode::Pen;
                self.surface.set_drawing_mode(true);
                let brush = self.surface.brush_mut_or_init();
                brush.color.clone_from(&self.color);
                brush.width = self.pen_width;
            }
            ToolMode::Pen => {
                self.tool = ToolMode::Idle;
                self.surface.set_drawing_mode(false);
            }
        }
    }

    /// Remove the selected object. No-op without a selection.
    pub fn delete_selected(&mut self) {
        let Some(id) = self.selection else {
            return;
        };
        self.surface.remove(&id);
        self.surface.set_active_selection(None);
        self.sync_selection();
        self.selection = None;
    }

    /// Replace the string of the selected text object.
    pub fn edit_selected_text(&mut self, text: &str) {
        if let Some(obj) = self.selection.and_then(|id| self.surface.object_mut(&id)) {
            if obj.set_text(text) {
                self.surface.request_render();
            }
        }
    }

    // --- Selection mirroring ---

    /// Mirror one selection change into session state.
    pub fn on_selection_changed(&mut self, event: SelectionChanged) {
        self.selection = event.current;
        let fill = self.selected_object().and_then(SceneObject::fill).map(str::to_owned);
        if let Some(fill) = fill {
            self.color = fill;
        }
    }

    /// Apply every pending selection change from the surface.
    pub fn sync_selection(&mut self) {
        let Some(sub) = self.subscription.as_ref() else {
            return;
        };
        for event in self.surface.drain(sub) {
            self.on_selection_changed(event);
        }
    }

    // --- Input ---

    /// Ignored while a load is in flight; the surface is about to be replaced.
    pub fn on_pointer_down(&mut self, pt: Point) {
        if self.loading {
            return;
        }
        self.surface.on_pointer_down(pt);
        self.sync_selection();
    }

    pub fn on_pointer_move(&mut self, pt: Point) {
        self.surface.on_pointer_move(pt);
    }

    pub fn on_pointer_up(&mut self, pt: Point) {
        self.surface.on_pointer_up(pt);
        self.sync_selection();
    }

    /// `Delete`/`Backspace` remove the selection; everything else passes through.
    pub fn on_key_down(&mut self, key: &Key) -> KeyOutcome {
        if !key.is_delete() || self.selection.is_none() {
            return KeyOutcome::default();
        }
        self.delete_selected();
        KeyOutcome { prevent_default: true }
    }

    /// Fit the surface to the window minus the tool panel.
    pub fn on_resize(&mut self, window_width: f64, window_height: f64) {
        self.surface
            .set_viewport((window_width - TOOL_PANEL_WIDTH).max(0.0), window_height.max(0.0));
    }

    // --- Save ---

    /// Start a save: guard against overlap, clear the status, serialize.
    ///
    /// # Errors
    ///
    /// Returns [`SaveRejected`] when a save is already running, no document is
    /// open, or the surface can't be serialized.
    pub fn begin_save(&mut self) -> Result<SaveTicket, SaveRejected> {
        if self.saving {
            log::warn!("{SAVE_IN_PROGRESS}");
            self.set_status(StatusMessage::error(SAVE_IN_PROGRESS));
            return Err(SaveRejected::InProgress);
        }
        let Some(document_id) = self.document_id.clone() else {
            return Err(SaveRejected::NoDocument);
        };
        let payload = match self.surface.serialize() {
            Ok(payload) => payload,
            Err(e) => {
                log::error!("serializing canvas failed: {e}");
                self.set_status(StatusMessage::error(SAVE_FAILED));
                return Err(SaveRejected::Encode(e.to_string()));
            }
        };
        self.saving = true;
        self.status = None;
        Ok(SaveTicket { generation: self.generation, document_id, payload })
    }

    /// Finish a save started under `generation`. Returns a ticket for clearing
    /// the success message later.
    pub fn finish_save(&mut self, generation: u64, result: Result<(), StoreError>) -> Option<StatusTicket> {
        if generation != self.generation {
            log::debug!("ignoring save completion from session {generation}");
            return None;
        }
        self.saving = false;
        match result {
            Ok(()) => Some(self.set_status(StatusMessage::success(SAVE_SUCCEEDED))),
            Err(e) => {
                log::error!("error saving canvas: {e}");
                self.set_status(StatusMessage::error(SAVE_FAILED));
                None
            }
        }
    }

    /// Clear the status message if it is still the one `ticket` refers to.
    pub fn clear_status(&mut self, ticket: StatusTicket) {
        if ticket.serial == self.status_serial {
            self.status = None;
        }
    }

    fn set_status(&mut self, message: StatusMessage) -> StatusTicket {
        self.status_serial += 1;
        self.status = Some(message);
        StatusTicket { serial: self.status_serial }
    }

    // --- Load ---

    /// Mark the session as loading. `None` when no document is open.
    pub fn begin_load(&mut self) -> Option<LoadTicket> {
        let document_id = self.document_id.clone()?;
        self.loading = true;
        Some(LoadTicket { generation: self.generation, document_id })
    }

    /// Apply a load result for `generation`. Stale results are ignored; every
    /// failure leaves a blank, usable surface.
    pub fn finish_load(&mut self, generation: u64, result: Result<Option<Blob>, StoreError>) {
        if generation != self.generation {
            log::debug!("ignoring load completion from session {generation}");
            return;
        }
        self.loading = false;
        match result {
            Ok(Some(blob)) => match self.surface.deserialize(&blob) {
                Ok(()) => {
                    self.sync_selection();
                    log::info!("canvas loaded successfully");
                }
                Err(e) => {
                    log::error!("error loading canvas: {e}");
                    self.set_status(StatusMessage::error(LOAD_FAILED));
                }
            },
            Ok(None) => log::info!("no existing canvas data, starting with blank canvas"),
            Err(e) => {
                log::error!("error loading canvas: {e}");
                self.set_status(StatusMessage::error(LOAD_FAILED));
            }
        }
        self.surface.request_render();
    }
}

/// A place holding the controller that may have been torn down.
pub trait ControllerHandle {
    /// Run `f` against the controller. `None` once the controller is gone.
    fn with_controller<R>(&self, f: impl FnOnce(&mut EditorController) -> R) -> Option<R>;
}

impl ControllerHandle for RwSignal<EditorController> {
    fn with_controller<R>(&self, f: impl FnOnce(&mut EditorController) -> R) -> Option<R> {
        self.try_update(f)
    }
}

impl ControllerHandle for Rc<RefCell<EditorController>> {
    fn with_controller<R>(&self, f: impl FnOnce(&mut EditorController) -> R) -> Option<R> {
        let mut controller = self.try_borrow_mut().ok()?;
        Some(f(&mut controller))
    }
}
