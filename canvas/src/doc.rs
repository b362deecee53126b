//! Document model: scene objects, their capabilities, and the ordered scene.
//!
//! This module defines what is on the surface (`SceneObject`, `Shape`), the
//! explicit capability tags callers use instead of probing attributes
//! (`Capability`), the runtime store that owns all live objects in draw order
//! (`Scene`), and the JSON form the scene is persisted as (`Blob`).
//!
//! Data flows into this layer from the persisted blob (`Scene::from_blob`) and
//! from the surface (adds, removals, in-place edits). The renderer and the
//! hit-tester read `Scene::objects` in order: later objects are drawn on top.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{DEFAULT_BACKGROUND, MIN_RESIZE_PX, SCENE_VERSION, TEXT_LINE_HEIGHT, TEXT_WIDTH_FACTOR};
use crate::geom::{Bounds, Point};

/// Unique identifier for a scene object.
pub type ObjectId = Uuid;

/// Serialized scene payload as stored in the remote document.
pub type Blob = serde_json::Value;

/// Errors raised while encoding or decoding a scene.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("scene payload is malformed: {0}")]
    Malformed(serde_json::Error),
    #[error("scene payload repeats object id {0}")]
    DuplicateId(ObjectId),
    #[error("unsupported scene version {0}")]
    UnsupportedVersion(u32),
    #[error("scene could not be encoded: {0}")]
    Encode(serde_json::Error),
}

/// Capabilities a scene object variant declares up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// The object has a fill color the editor may read and replace.
    HasFill,
    /// The object renders text with an editable font size and family.
    HasFont,
}

/// Type-specific geometry and content of a scene object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    /// Axis-aligned rectangle.
    Rect { width: f64, height: f64 },
    /// Circle; `left`/`top` is the corner of its bounding square.
    Ellipse { radius: f64 },
    /// Single-line editable text.
    Text { text: String, font_family: String, font_size: f64 },
    /// Freehand pen stroke. Points are relative to the object's `left`/`top`.
    Path { points: Vec<Point> },
}

impl Shape {
    /// The static capability set of this variant.
    #[must_use]
    pub fn capabilities(&self) -> &'static [Capability] {
        match self {
            Self::Rect { .. } | Self::Ellipse { .. } => &[Capability::HasFill],
            Self::Text { .. } => &[Capability::HasFill, Capability::HasFont],
            Self::Path { .. } => &[],
        }
    }
}

/// A drawable object as stored in the scene and in the persisted blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    /// Unique identifier, assigned when the object is created.
    pub id: ObjectId,
    /// Left edge of the bounding box.
    pub left: f64,
    /// Top edge of the bounding box.
    pub top: f64,
    /// Fill color as a CSS color string. Only meaningful with [`Capability::HasFill`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    /// Outline (or, for paths, line) color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    /// Outline (or, for paths, line) width.
    #[serde(default)]
    pub stroke_width: f64,
    /// Variant-specific data.
    #[serde(flatten)]
    pub shape: Shape,
}

impl SceneObject {
    /// A filled, outlined rectangle.
    #[must_use]
    pub fn rect(origin: Point, width: f64, height: f64, fill: &str, stroke: &str, stroke_width: f64) -> Self {
        Self::with_shape(origin, Some(fill), Some(stroke), stroke_width, Shape::Rect { width, height })
    }

    /// A filled, outlined circle whose bounding square starts at `origin`.
    #[must_use]
    pub fn circle(origin: Point, radius: f64, fill: &str, stroke: &str, stroke_width: f64) -> Self {
        Self::with_shape(origin, Some(fill), Some(stroke), stroke_width, Shape::Ellipse { radius })
    }

    /// A text object filled with `fill`.
    #[must_use]
    pub fn text(origin: Point, text: &str, font_family: &str, font_size: f64, fill: &str) -> Self {
        Self::with_shape(
            origin,
            Some(fill),
            None,
            0.0,
            Shape::Text { text: text.to_owned(), font_family: font_family.to_owned(), font_size },
        )
    }

    /// A freehand path through absolute `points`. The object's origin is the
    /// top-left of the points' bounds and the points are stored relative to it.
    ///
    /// Returns `None` for an empty point list.
    #[must_use]
    pub fn path(points: &[Point], color: &str, width: f64) -> Option<Self> {
        let bounds = Bounds::from_points(points)?;
        let relative = points
            .iter()
            .map(|p| Point::new(p.x - bounds.x, p.y - bounds.y))
            .collect();
        Some(Self::with_shape(
            Point::new(bounds.x, bounds.y),
            None,
            Some(color),
            width,
            Shape::Path { points: relative },
        ))
    }

    fn with_shape(origin: Point, fill: Option<&str>, stroke: Option<&str>, stroke_width: f64, shape: Shape) -> Self {
        Self {
            id: Uuid::new_v4(),
            left: origin.x,
            top: origin.y,
            fill: fill.map(str::to_owned),
            stroke: stroke.map(str::to_owned),
            stroke_width,
            shape,
        }
    }

    /// Whether this object's variant declares `cap`.
    #[must_use]
    pub fn has(&self, cap: Capability) -> bool {
        self.shape.capabilities().contains(&cap)
    }

    /// The fill color, if the object has the fill capability and a fill set.
    #[must_use]
    pub fn fill(&self) -> Option<&str> {
        if !self.has(Capability::HasFill) {
            return None;
        }
        self.fill.as_deref()
    }

    /// Replace the fill color. Returns `false` (and changes nothing) when the
    /// object has no fill capability.
    pub fn set_fill(&mut self, color: &str) -> bool {
        if !self.has(Capability::HasFill) {
            return false;
        }
        self.fill = Some(color.to_owned());
        true
    }

    /// Font size of a text object.
    #[must_use]
    pub fn font_size(&self) -> Option<f64> {
        match &self.shape {
            Shape::Text { font_size, .. } => Some(*font_size),
            _ => None,
        }
    }

    /// Font family of a text object.
    #[must_use]
    pub fn font_family(&self) -> Option<&str> {
        match &self.shape {
            Shape::Text { font_family, .. } => Some(font_family),
            _ => None,
        }
    }

    /// Set the font size of a text object. Returns `false` for other variants.
    pub fn set_font_size(&mut self, size: f64) -> bool {
        match &mut self.shape {
            Shape::Text { font_size, .. } => {
                *font_size = size;
                true
            }
            _ => false,
        }
    }

    /// Set the font family of a text object. Returns `false` for other variants.
    pub fn set_font_family(&mut self, family: &str) -> bool {
        match &mut self.shape {
            Shape::Text { font_family, .. } => {
                family.clone_into(font_family);
                true
            }
            _ => false,
        }
    }

    /// Replace the string of a text object. Returns `false` for other variants.
    pub fn set_text(&mut self, value: &str) -> bool {
        match &mut self.shape {
            Shape::Text { text, .. } => {
                value.clone_into(text);
                true
            }
            _ => false,
        }
    }

    /// Move the object by a delta.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.left += dx;
        self.top += dy;
    }

    /// Resize so the bounds run from the fixed `anchor` toward `corner`.
    ///
    /// Rectangles take the exact box. Circles stay round using the larger
    /// side, text scales its font size to the box height and paths scale
    /// their points. The anchor corner never moves.
    pub fn resize_between(&mut self, anchor: Point, corner: Point) {
        let w = (corner.x - anchor.x).abs().max(MIN_RESIZE_PX);
        let h = (corner.y - anchor.y).abs().max(MIN_RESIZE_PX);
        let half = self.stroke_width / 2.0;
        let inset = match &mut self.shape {
            Shape::Rect { width, height } => {
                *width = w;
                *height = h;
                0.0
            }
            Shape::Ellipse { radius } => {
                *radius = w.max(h) / 2.0;
                0.0
            }
            Shape::Text { font_size, .. } => {
                *font_size = h / TEXT_LINE_HEIGHT;
                0.0
            }
            Shape::Path { points } => {
                scale_points(points, (w - half * 2.0).max(0.0), (h - half * 2.0).max(0.0));
                half
            }
        };
        let b = self.bounds();
        let left = if corner.x < anchor.x { anchor.x - b.width } else { anchor.x };
        let top = if corner.y < anchor.y { anchor.y - b.height } else { anchor.y };
        self.left = left + inset;
        self.top = top + inset;
    }

    /// Axis-aligned bounds of the object's geometry (strokes excluded, except
    /// for paths where the line width is the geometry).
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        match &self.shape {
            Shape::Rect { width, height } => Bounds::new(self.left, self.top, *width, *height),
            Shape::Ellipse { radius } => Bounds::new(self.left, self.top, radius * 2.0, radius * 2.0),
            Shape::Text { text, font_size, .. } => {
                #[allow(clippy::cast_precision_loss)]
                let chars = text.chars().count().max(1) as f64;
                Bounds::new(self.left, self.top, chars * font_size * TEXT_WIDTH_FACTOR, font_size * TEXT_LINE_HEIGHT)
            }
            Shape::Path { points } => {
                let half = self.stroke_width / 2.0;
                Bounds::from_points(points)
                    .map_or_else(
                        || Bounds::new(self.left, self.top, 0.0, 0.0),
                        |b| Bounds::new(self.left + b.x, self.top + b.y, b.width, b.height),
                    )
                    .inflate(half)
            }
        }
    }
}

/// Rebase `points` to the origin and stretch them to `width`×`height`. A
/// degenerate axis keeps its scale.
fn scale_points(points: &mut [Point], width: f64, height: f64) {
    let Some(b) = Bounds::from_points(points) else {
        return;
    };
    let sx = if b.width > f64::EPSILON { width / b.width } else { 1.0 };
    let sy = if b.height > f64::EPSILON { height / b.height } else { 1.0 };
    for p in points.iter_mut() {
        p.x = (p.x - b.x) * sx;
        p.y = (p.y - b.y) * sy;
    }
}

/// Wire form of a whole scene.
#[derive(Debug, Serialize, Deserialize)]
struct SceneData {
    version: u32,
    #[serde(default = "default_background")]
    background: String,
    #[serde(default)]
    objects: Vec<SceneObject>,
}

fn default_background() -> String {
    DEFAULT_BACKGROUND.to_owned()
}

/// In-memory store of scene objects, kept in draw order.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    objects: Vec<SceneObject>,
    background: String,
}

impl Scene {
    /// Create an empty scene with the default background.
    #[must_use]
    pub fn new() -> Self {
        Self { objects: Vec::new(), background: default_background() }
    }

    /// Insert an object on top of the stack. If an object with the same `id`
    /// already exists it is replaced in place, keeping its stacking position.
    pub fn insert(&mut self, obj: SceneObject) -> ObjectId {
        let id = obj.id;
        if let Some(existing) = self.objects.iter_mut().find(|o| o.id == id) {
            *existing = obj;
        } else {
            self.objects.push(obj);
        }
        id
    }

    /// Remove an object by id, returning it if it was present.
    pub fn remove(&mut self, id: &ObjectId) -> Option<SceneObject> {
        let index = self.objects.iter().position(|o| &o.id == id)?;
        Some(self.objects.remove(index))
    }

    /// Return a reference to an object by id.
    #[must_use]
    pub fn get(&self, id: &ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|o| &o.id == id)
    }

    /// Return a mutable reference to an object by id.
    pub fn get_mut(&mut self, id: &ObjectId) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| &o.id == id)
    }

    /// All objects, bottom first.
    #[must_use]
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    /// Surface background color.
    #[must_use]
    pub fn background(&self) -> &str {
        &self.background
    }

    /// Number of objects currently in the scene.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns `true` if the scene contains no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Remove every object.
    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// Encode the whole scene as a persistable blob.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Encode`] if an object cannot be represented as JSON.
    pub fn to_blob(&self) -> Result<Blob, SceneError> {
        let data = SceneData {
            version: SCENE_VERSION,
            background: self.background.clone(),
            objects: self.objects.clone(),
        };
        serde_json::to_value(data).map_err(SceneError::Encode)
    }

    /// Decode a blob produced by [`Scene::to_blob`].
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Malformed`] when the payload does not match the
    /// scene schema, [`SceneError::DuplicateId`] when two objects share an id
    /// and [`SceneError::UnsupportedVersion`] for unknown versions.
    pub fn from_blob(blob: &Blob) -> Result<Self, SceneError> {
        let data = SceneData::deserialize(blob).map_err(SceneError::Malformed)?;
        if data.version != SCENE_VERSION {
            return Err(SceneError::UnsupportedVersion(data.version));
        }
        let mut seen = HashSet::with_capacity(data.objects.len());
        if let Some(dup) = data.objects.iter().find(|o| !seen.insert(o.id)) {
            return Err(SceneError::DuplicateId(dup.id));
        }
        Ok(Self { objects: data.objects, background: data.background })
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
