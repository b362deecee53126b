//! Rendering: draws the full surface to a 2D context.
//!
//! This module receives a read-only view of the surface and produces pixels.
//! It does not mutate any surface state.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Surface::render`]) handles the result.

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::consts::{SELECTION_DASH_PX, SELECTION_MARKER_PX, SELECTION_PADDING_PX};
use crate::doc::{SceneObject, Shape};
use crate::engine::SurfaceCore;
use crate::geom::Point;

const SELECTION_COLOR: &str = "#1E90FF";
const FALLBACK_FILL: &str = "#000000";

/// Draw the full surface: background, objects, selection UI, pen preview.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(ctx: &CanvasRenderingContext2d, core: &SurfaceCore, dpr: f64) -> Result<(), JsValue> {
    let (w, h) = (core.viewport_width, core.viewport_height);

    // Layer 1: reset transform and paint background.
    ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, w, h);
    ctx.set_fill_style_str(core.scene().background());
    ctx.fill_rect(0.0, 0.0, w, h);

    // Layer 2: objects in draw order (bottom first).
    for obj in core.objects() {
        draw_object(ctx, obj)?;
    }

    // Layer 3: selection UI.
    if let Some(obj) = core.active_selection().and_then(|id| core.object(&id)) {
        draw_selection(ctx, obj)?;
    }

    // Layer 4: pen stroke in progress.
    if let (Some(points), Some(brush)) = (core.pending_stroke(), core.brush()) {
        ctx.save();
        ctx.set_stroke_style_str(&brush.color);
        ctx.set_line_width(brush.width);
        trace_polyline(ctx, Point::new(0.0, 0.0), points);
        ctx.stroke();
        ctx.restore();
    }

    Ok(())
}

// =============================================================
// Object dispatch
// =============================================================

fn draw_object(ctx: &CanvasRenderingContext2d, obj: &SceneObject) -> Result<(), JsValue> {
    ctx.save();
    let fill = obj.fill().unwrap_or(FALLBACK_FILL);
    match &obj.shape {
        Shape::Rect { width, height } => {
            ctx.set_fill_style_str(fill);
            ctx.fill_rect(obj.left, obj.top, *width, *height);
            if apply_stroke_style(ctx, obj) {
                ctx.stroke_rect(obj.left, obj.top, *width, *height);
            }
        }
        Shape::Ellipse { radius } => {
            ctx.begin_path();
            ctx.arc(obj.left + radius, obj.top + radius, *radius, 0.0, 2.0 * PI)?;
            ctx.set_fill_style_str(fill);
            ctx.fill();
            if apply_stroke_style(ctx, obj) {
                ctx.stroke();
            }
        }
        Shape::Text { text, font_family, font_size } => {
            ctx.set_fill_style_str(fill);
            ctx.set_text_align("left");
            ctx.set_text_baseline("top");
            ctx.set_font(&format!("{font_size}px {font_family}"));
            ctx.fill_text(text, obj.left, obj.top)?;
        }
        Shape::Path { points } => {
            if apply_stroke_style(ctx, obj) {
                ctx.set_line_cap("round");
                ctx.set_line_join("round");
                trace_polyline(ctx, Point::new(obj.left, obj.top), points);
                ctx.stroke();
            }
        }
    }
    ctx.restore();
    Ok(())
}

// =============================================================
// Selection
// =============================================================

fn draw_selection(ctx: &CanvasRenderingContext2d, obj: &SceneObject) -> Result<(), JsValue> {
    let b = obj.bounds().inflate(SELECTION_PADDING_PX);

    ctx.save();
    ctx.set_stroke_style_str(SELECTION_COLOR);
    ctx.set_line_width(1.0);
    let dash_array = js_sys::Array::new();
    dash_array.push(&SELECTION_DASH_PX.into());
    dash_array.push(&SELECTION_DASH_PX.into());
    ctx.set_line_dash(&dash_array)?;
    ctx.stroke_rect(b.x, b.y, b.width, b.height);
    ctx.set_line_dash(&js_sys::Array::new())?;

    // Corner markers.
    let half = SELECTION_MARKER_PX / 2.0;
    ctx.set_fill_style_str("#fff");
    for (x, y) in [(b.x, b.y), (b.x + b.width, b.y), (b.x, b.y + b.height), (b.x + b.width, b.y + b.height)] {
        ctx.fill_rect(x - half, y - half, SELECTION_MARKER_PX, SELECTION_MARKER_PX);
        ctx.stroke_rect(x - half, y - half, SELECTION_MARKER_PX, SELECTION_MARKER_PX);
    }

    ctx.restore();
    Ok(())
}

// =============================================================
// Helpers
// =============================================================

/// Apply stroke color and width. Returns `false` when the object has no
/// visible stroke.
fn apply_stroke_style(ctx: &CanvasRenderingContext2d, obj: &SceneObject) -> bool {
    let Some(stroke) = obj.stroke.as_deref() else {
        return false;
    };
    if obj.stroke_width <= 0.0 {
        return false;
    }
    ctx.set_stroke_style_str(stroke);
    ctx.set_line_width(obj.stroke_width);
    true
}

fn trace_polyline(ctx: &CanvasRenderingContext2d, origin: Point, points: &[Point]) {
    ctx.begin_path();
    for (i, p) in points.iter().enumerate() {
        if i == 0 {
            ctx.move_to(origin.x + p.x, origin.y + p.y);
        } else {
            ctx.line_to(origin.x + p.x, origin.y + p.y);
        }
    }
}
