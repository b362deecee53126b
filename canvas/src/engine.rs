use std::collections::VecDeque;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::consts::{DEFAULT_BRUSH_COLOR, DEFAULT_BRUSH_WIDTH, MIN_STROKE_POINTS};
use crate::doc::{Blob, ObjectId, Scene, SceneError, SceneObject};
use crate::geom::Point;
use crate::hit;
use crate::input::{Brush, Gesture};
use crate::render;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Notification that the active selection changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionChanged {
    /// The newly selected object, or `None` when the selection was cleared.
    pub current: Option<ObjectId>,
}

/// Handle for a selection-change subscription.
///
/// Not `Clone`: dropping the subscription via [`SurfaceCore::unsubscribe`]
/// consumes it.
#[derive(Debug, PartialEq, Eq)]
pub struct Subscription {
    id: u64,
}

/// Surface state and logic that doesn't depend on the canvas element.
///
/// Separated from `Surface` so it can be owned by reactive state and tested
/// without WASM/browser dependencies.
#[derive(Debug)]
pub struct SurfaceCore {
    scene: Scene,
    selection: Option<ObjectId>,
    drawing_mode: bool,
    brush: Option<Brush>,
    gesture: Gesture,
    render_requested: bool,
    subscribers: Vec<(u64, VecDeque<SelectionChanged>)>,
    next_subscription: u64,
    pub viewport_width: f64,
    pub viewport_height: f64,
}

impl Default for SurfaceCore {
    fn default() -> Self {
        Self {
            scene: Scene::new(),
            selection: None,
            drawing_mode: false,
            brush: None,
            gesture: Gesture::Idle,
            render_requested: true,
            subscribers: Vec::new(),
            next_subscription: 0,
            viewport_width: 0.0,
            viewport_height: 0.0,
        }
    }
}

impl SurfaceCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the viewport size in CSS pixels.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport_width = width.max(0.0);
        self.viewport_height = height.max(0.0);
        self.render_requested = true;
    }

    // --- Objects ---

    /// Add an object on top of the scene.
    pub fn add(&mut self, obj: SceneObject) -> ObjectId {
        let id = self.scene.insert(obj);
        self.render_requested = true;
        id
    }

    /// Remove an object. Clears the selection if it pointed at the object.
    pub fn remove(&mut self, id: &ObjectId) -> Option<SceneObject> {
        let removed = self.scene.remove(id)?;
        if self.selection.as_ref() == Some(id) {
            self.set_active_selection(None);
        }
        if matches!(
            &self.gesture,
            Gesture::DraggingObject { id: target, .. } | Gesture::Resizing { id: target, .. } if target == id
        ) {
            self.gesture = Gesture::Idle;
        }
        self.render_requested = true;
        Some(removed)
    }

    #[must_use]
    pub fn object(&self, id: &ObjectId) -> Option<&SceneObject> {
        self.scene.get(id)
    }

    /// Mutable access for in-place edits. Callers request a render themselves.
    pub fn object_mut(&mut self, id: &ObjectId) -> Option<&mut SceneObject> {
        self.scene.get_mut(id)
    }

    #[must_use]
    pub fn objects(&self) -> &[SceneObject] {
        self.scene.objects()
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scene.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scene.is_empty()
    }

    // --- Selection ---

    /// The currently selected object, if any.
    #[must_use]
    pub fn active_selection(&self) -> Option<ObjectId> {
        self.selection
    }

    /// Replace the active selection. Ids not in the scene clear it. Every
    /// actual change is queued for all live subscriptions.
    pub fn set_active_selection(&mut self, id: Option<ObjectId>) {
        let next = id.filter(|id| self.scene.get(id).is_some());
        if next == self.selection {
            return;
        }
        self.selection = next;
        self.render_requested = true;
        let event = SelectionChanged { current: next };
        for (_, queue) in &mut self.subscribers {
            queue.push_back(event);
        }
    }

    /// Start observing selection changes.
    pub fn subscribe(&mut self) -> Subscription {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.subscribers.push((id, VecDeque::new()));
        Subscription { id }
    }

    /// Take every pending event for `sub`, oldest first. Empty for a
    /// subscription that is no longer registered.
    pub fn drain(&mut self, sub: &Subscription) -> Vec<SelectionChanged> {
        self.subscribers
            .iter_mut()
            .find(|(id, _)| *id == sub.id)
            .map(|(_, queue)| queue.drain(..).collect())
            .unwrap_or_default()
    }

    /// Stop observing selection changes.
    pub fn unsubscribe(&mut self, sub: Subscription) {
        self.subscribers.retain(|(id, _)| *id != sub.id);
    }

    // --- Serialization ---

    /// Encode the scene.
    ///
    /// # Errors
    ///
    /// Propagates [`SceneError::Encode`].
    pub fn serialize(&self) -> Result<Blob, SceneError> {
        self.scene.to_blob()
    }

    /// Replace the whole scene from a blob and clear the selection. On error
    /// the current scene is left untouched.
    ///
    /// # Errors
    ///
    /// Returns the decode error from [`Scene::from_blob`].
    pub fn deserialize(&mut self, blob: &Blob) -> Result<(), SceneError> {
        let scene = Scene::from_blob(blob)?;
        self.gesture = Gesture::Idle;
        self.set_active_selection(None);
        self.scene = scene;
        self.render_requested = true;
        Ok(())
    }

    // --- Drawing mode ---

    /// Turn freehand drawing on or off. Cancels any gesture in progress.
    pub fn set_drawing_mode(&mut self, on: bool) {
        if self.drawing_mode == on {
            return;
        }
        self.drawing_mode = on;
        self.gesture = Gesture::Idle;
        self.render_requested = true;
    }

    #[must_use]
    pub fn is_drawing_mode(&self) -> bool {
        self.drawing_mode
    }

    #[must_use]
    pub fn brush(&self) -> Option<&Brush> {
        self.brush.as_ref()
    }

    /// The live brush, constructed with defaults on first use.
    pub fn brush_mut_or_init(&mut self) -> &mut Brush {
        self.brush.get_or_insert_with(|| Brush {
            color: DEFAULT_BRUSH_COLOR.to_owned(),
            width: DEFAULT_BRUSH_WIDTH,
        })
    }

    // --- Pointer input ---

    /// Begin a stroke in drawing mode. Otherwise start resizing when `pt` is
    /// on a handle of the selected object, or select the topmost object under
    /// `pt` (clearing the selection on empty space) and start dragging it.
    pub fn on_pointer_down(&mut self, pt: Point) {
        if self.drawing_mode {
            self.gesture = Gesture::Stroking { points: vec![pt] };
            self.render_requested = true;
            return;
        }
        if let Some(resize) = self.resize_from_handle(pt) {
            self.gesture = resize;
            return;
        }
        let hit = hit::hit_test(pt, &self.scene);
        self.set_active_selection(hit);
        self.gesture = match hit {
            Some(id) => Gesture::DraggingObject { id, last: pt },
            None => Gesture::Idle,
        };
    }

    pub fn on_pointer_move(&mut self, pt: Point) {
        match &mut self.gesture {
            Gesture::Idle => {}
            stroke @ Gesture::Stroking { .. } => {
                if stroke.extend_stroke(pt) {
                    self.render_requested = true;
                }
            }
            Gesture::DraggingObject { id, last } => {
                let (dx, dy) = (pt.x - last.x, pt.y - last.y);
                *last = pt;
                let id = *id;
                if let Some(obj) = self.scene.get_mut(&id) {
                    obj.translate(dx, dy);
                    self.render_requested = true;
                }
            }
            Gesture::Resizing { id, anchor, grab } => {
                let corner = Point::new(pt.x + grab.x, pt.y + grab.y);
                let (id, anchor) = (*id, *anchor);
                if let Some(obj) = self.scene.get_mut(&id) {
                    obj.resize_between(anchor, corner);
                    self.render_requested = true;
                }
            }
        }
    }

    fn resize_from_handle(&self, pt: Point) -> Option<Gesture> {
        let id = self.selection?;
        let obj = self.scene.get(&id)?;
        let handle = hit::handle_at(obj, pt)?;
        let b = obj.bounds();
        let corner = handle.corner(&b);
        Some(Gesture::Resizing {
            id,
            anchor: handle.opposite().corner(&b),
            grab: Point::new(corner.x - pt.x, corner.y - pt.y),
        })
    }

    /// Finish the current gesture. A finished stroke with enough points is
    /// added as a freehand path styled by the brush; its id is returned.
    pub fn on_pointer_up(&mut self, pt: Point) -> Option<ObjectId> {
        self.on_pointer_move(pt);
        let Gesture::Stroking { points } = std::mem::take(&mut self.gesture) else {
            return None;
        };
        self.render_requested = true;
        if points.len() < MIN_STROKE_POINTS {
            return None;
        }
        let brush = self.brush_mut_or_init().clone();
        let path = SceneObject::path(&points, &brush.color, brush.width)?;
        Some(self.add(path))
    }

    /// Points of the pen stroke in progress, for preview rendering.
    #[must_use]
    pub fn pending_stroke(&self) -> Option<&[Point]> {
        self.gesture.stroke_points()
    }

    // --- Render scheduling ---

    /// Mark the surface dirty.
    pub fn request_render(&mut self) {
        self.render_requested = true;
    }

    /// Return and clear the dirty flag.
    pub fn take_render_request(&mut self) -> bool {
        std::mem::take(&mut self.render_requested)
    }

    /// Drop every object, subscription, the brush and any gesture.
    pub fn dispose(&mut self) {
        self.subscribers.clear();
        self.scene.clear();
        self.selection = None;
        self.brush = None;
        self.gesture = Gesture::Idle;
        self.drawing_mode = false;
        self.render_requested = true;
    }
}

/// Browser side of the surface. Owns the canvas element and paints a
/// `SurfaceCore` held elsewhere.
pub struct Surface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    dpr: f64,
}

impl Surface {
    /// Bind to a canvas element.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the element has no 2D context.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, ctx, dpr: 1.0 })
    }

    /// Size the backing store to `width`×`height` CSS pixels at `dpr`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the element's style cannot be updated.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn set_viewport(&mut self, width: f64, height: f64, dpr: f64) -> Result<(), JsValue> {
        self.dpr = dpr.max(1.0);
        self.canvas.set_width((width.max(0.0) * self.dpr).round() as u32);
        self.canvas.set_height((height.max(0.0) * self.dpr).round() as u32);
        let style = self.canvas.style();
        style.set_property("width", &format!("{width}px"))?;
        style.set_property("height", &format!("{height}px"))?;
        Ok(())
    }

    /// Draw `core` to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if any `Canvas2D` call fails.
    pub fn render(&self, core: &SurfaceCore) -> Result<(), JsValue> {
        render::draw(&self.ctx, core, self.dpr)
    }
}
