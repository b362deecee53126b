//! Shared numeric constants for the canvas crate.

// ── Scene ───────────────────────────────────────────────────────

/// Version tag written into every serialized scene.
pub const SCENE_VERSION: u32 = 1;

/// Background color of a fresh surface.
pub const DEFAULT_BACKGROUND: &str = "#ffffff";

// ── Text metrics ────────────────────────────────────────────────

/// Average glyph advance as a fraction of the font size. Used to estimate
/// text bounds without a layout engine.
pub const TEXT_WIDTH_FACTOR: f64 = 0.6;

/// Line height as a multiple of the font size.
pub const TEXT_LINE_HEIGHT: f64 = 1.16;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space hit slop in pixels around thin strokes.
pub const HIT_SLOP_PX: f64 = 4.0;

// ── Pen ─────────────────────────────────────────────────────────

/// A pen stroke needs at least this many points to become a path.
pub const MIN_STROKE_POINTS: usize = 2;

/// Pointer moves closer than this to the previous stroke point are dropped.
pub const STROKE_MIN_STEP_PX: f64 = 1.0;

// ── Selection chrome ────────────────────────────────────────────

/// Gap between an object's bounds and its selection outline.
pub const SELECTION_PADDING_PX: f64 = 4.0;

/// Selection outline dash segment length.
pub const SELECTION_DASH_PX: f64 = 4.0;

/// Side length of the square corner markers on the selection outline.
pub const SELECTION_MARKER_PX: f64 = 8.0;

/// Smallest width or height a corner-handle resize can produce.
pub const MIN_RESIZE_PX: f64 = 4.0;

// ── Brush ───────────────────────────────────────────────────────

/// Color of a brush constructed before the host configures it.
pub const DEFAULT_BRUSH_COLOR: &str = "#000000";

/// Width of a brush constructed before the host configures it.
pub const DEFAULT_BRUSH_WIDTH: f64 = 1.0;
