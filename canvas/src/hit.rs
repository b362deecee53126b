#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::consts::{HIT_SLOP_PX, SELECTION_MARKER_PX, SELECTION_PADDING_PX};
use crate::doc::{ObjectId, Scene, SceneObject, Shape};
use crate::geom::Point;
use crate::input::Handle;

/// Return the topmost object under `pt`, if any.
///
/// Objects are tested in reverse draw order so the last-drawn object wins.
#[must_use]
pub fn hit_test(pt: Point, scene: &Scene) -> Option<ObjectId> {
    scene
        .objects()
        .iter()
        .rev()
        .find(|obj| object_contains(obj, pt))
        .map(|obj| obj.id)
}

/// Whether `pt` falls on `obj`.
#[must_use]
pub fn object_contains(obj: &SceneObject, pt: Point) -> bool {
    match &obj.shape {
        Shape::Rect { .. } | Shape::Text { .. } => obj.bounds().contains(pt),
        Shape::Ellipse { radius } => {
            let center = Point::new(obj.left + radius, obj.top + radius);
            center.distance(pt) <= *radius + obj.stroke_width / 2.0
        }
        Shape::Path { points } => {
            let reach = obj.stroke_width / 2.0 + HIT_SLOP_PX;
            let origin = Point::new(obj.left, obj.top);
            let abs = |p: &Point| Point::new(origin.x + p.x, origin.y + p.y);
            match points.as_slice() {
                [] => false,
                [only] => abs(only).distance(pt) <= reach,
                _ => points
                    .windows(2)
                    .any(|w| pt.distance_to_segment(abs(&w[0]), abs(&w[1])) <= reach),
            }
        }
    }
}

/// The selection handle of `obj` under `pt`, if any.
///
/// Handles sit on the corners of the padded selection outline; each accepts
/// a square of the marker size plus the hit slop.
#[must_use]
pub fn handle_at(obj: &SceneObject, pt: Point) -> Option<Handle> {
    let outline = obj.bounds().inflate(SELECTION_PADDING_PX);
    let reach = SELECTION_MARKER_PX / 2.0 + HIT_SLOP_PX;
    Handle::ALL.into_iter().find(|h| {
        let c = h.corner(&outline);
        (c.x - pt.x).abs() <= reach && (c.y - pt.y).abs() <= reach
    })
}
