//! Input model: keys, the pen brush, and the gesture state machine.
//!
//! `Brush` is the drawing-mode pen configuration that new strokes take their
//! color and width from. `Gesture` is the pointer interaction being tracked
//! between pointer-down and pointer-up, carrying what the surface needs to
//! grow a stroke, move an object or resize it from a corner handle.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::consts::STROKE_MIN_STEP_PX;
use crate::doc::ObjectId;
use crate::geom::{Bounds, Point};

/// A keyboard key.
///
/// The inner string holds the key name as reported by the browser (e.g. `"Delete"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    /// Whether this key removes the current selection (`Delete` or `Backspace`).
    #[must_use]
    pub fn is_delete(&self) -> bool {
        matches!(self.0.as_str(), "Delete" | "Backspace")
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Pen configuration applied to new freehand strokes.
#[derive(Debug, Clone, PartialEq)]
pub struct Brush {
    /// Stroke color as a CSS color string.
    pub color: String,
    /// Stroke width in pixels.
    pub width: f64,
}

/// Corner handle on the selection outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Handle {
    pub const ALL: [Self; 4] = [Self::TopLeft, Self::TopRight, Self::BottomLeft, Self::BottomRight];

    /// The diagonally opposite handle.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::TopLeft => Self::BottomRight,
            Self::TopRight => Self::BottomLeft,
            Self::BottomLeft => Self::TopRight,
            Self::BottomRight => Self::TopLeft,
        }
    }

    /// Position of this corner on `b`.
    #[must_use]
    pub fn corner(self, b: &Bounds) -> Point {
        match self {
            Self::TopLeft => Point::new(b.x, b.y),
            Self::TopRight => Point::new(b.x + b.width, b.y),
            Self::BottomLeft => Point::new(b.x, b.y + b.height),
            Self::BottomRight => Point::new(b.x + b.width, b.y + b.height),
        }
    }
}

/// Pointer gesture in progress.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Gesture {
    /// No gesture; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Drawing mode is on and the pen is down.
    Stroking {
        /// Absolute points collected so far, in order.
        points: Vec<Point>,
    },
    /// An object is being moved by dragging.
    DraggingObject {
        /// Object being dragged.
        id: ObjectId,
        /// Pointer position at the previous event.
        last: Point,
    },
    /// The selected object is being resized from a corner handle.
    Resizing {
        /// Object being resized.
        id: ObjectId,
        /// Corner that stays fixed, in surface coordinates.
        anchor: Point,
        /// Offset from the pointer to the dragged corner, fixed at pointer-down.
        grab: Point,
    },
}

impl Gesture {
    /// Append `pt` to an active stroke. Points closer than the minimum step to
    /// the previous one are dropped. Returns `true` if the stroke grew.
    pub fn extend_stroke(&mut self, pt: Point) -> bool {
        let Self::Stroking { points } = self else {
            return false;
        };
        if points.last().is_some_and(|last| last.distance(pt) < STROKE_MIN_STEP_PX) {
            return false;
        }
        points.push(pt);
        true
    }

    /// Points of the in-progress stroke, if any.
    #[must_use]
    pub fn stroke_points(&self) -> Option<&[Point]> {
        match self {
            Self::Stroking { points } => Some(points),
            _ => None,
        }
    }
}
