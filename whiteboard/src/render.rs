//! Rendering: draws the whiteboard scene to a 2D context.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It receives read-only views of the document and UI state and produces
//! pixels. It does not mutate any application state.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine::render`]) handles the result.

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::consts::{BACKGROUND_COLOR, HANDLE_RADIUS_PX};
use crate::doc::{Document, Path, Shape};
use crate::geom::{Bounds, Point};
use crate::hit;
use crate::input::UiState;

/// Selection dash segment length in pixels.
const SELECTION_DASH_PX: f64 = 4.0;

/// Selection outline colour.
const SELECTION_COLOR: &str = "#1E90FF";

/// Gap between a selected path and its selection outline.
const SELECTION_PAD_PX: f64 = 4.0;

/// Draw the full scene: background, paths, in-progress preview, and selection UI.
///
/// `viewport_w` and `viewport_h` are in CSS pixels. `dpr` is the device pixel ratio.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(
    ctx: &CanvasRenderingContext2d,
    doc: &Document,
    ui: &UiState,
    viewport_w: f64,
    viewport_h: f64,
    dpr: f64,
) -> Result<(), JsValue> {
    // Layer 1: clear to the board colour.
    ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
    ctx.set_fill_style_str(BACKGROUND_COLOR);
    ctx.fill_rect(0.0, 0.0, viewport_w, viewport_h);

    // Layer 2: paths in insertion order.
    for path in doc.paths() {
        draw_path(ctx, path)?;
    }

    // Layer 3: shape or stroke being drawn.
    if let Some(preview) = &ui.preview {
        draw_path(ctx, preview)?;
    }

    // Layer 4: selection UI.
    let show_handles = ui.selection.len() == 1;
    for &index in &ui.selection {
        if let Some(path) = doc.get(index) {
            draw_selection(ctx, path, show_handles)?;
        }
    }

    if let Some(m) = ui.marquee {
        draw_marquee(ctx, m)?;
    }

    Ok(())
}

// =============================================================
// Paths
// =============================================================

fn draw_path(ctx: &CanvasRenderingContext2d, path: &Path) -> Result<(), JsValue> {
    ctx.save();
    ctx.set_stroke_style_str(&path.color);
    ctx.set_fill_style_str(&path.color);
    ctx.set_line_width(path.stroke_width);
    ctx.set_line_cap("round");
    ctx.set_line_join("round");

    match &path.shape {
        Shape::Pen { points } => draw_stroke(ctx, points, path.stroke_width)?,
        Shape::Rectangle { x, y, width, height } => ctx.stroke_rect(*x, *y, *width, *height),
        Shape::Circle { x, y, radius } => {
            ctx.begin_path();
            ctx.arc(*x, *y, *radius, 0.0, 2.0 * PI)?;
            ctx.stroke();
        }
        Shape::Triangle { x1, y1, x2, y2, x3, y3 } => {
            ctx.begin_path();
            ctx.move_to(*x1, *y1);
            ctx.line_to(*x2, *y2);
            ctx.line_to(*x3, *y3);
            ctx.close_path();
            ctx.stroke();
        }
        Shape::Arrow { start_x, start_y, end_x, end_y } => {
            let start = Point::new(*start_x, *start_y);
            let end = Point::new(*end_x, *end_y);
            let [left, right] = hit::arrow_head(start, end);
            ctx.begin_path();
            ctx.move_to(start.x, start.y);
            ctx.line_to(end.x, end.y);
            ctx.move_to(left.x, left.y);
            ctx.line_to(end.x, end.y);
            ctx.line_to(right.x, right.y);
            ctx.stroke();
        }
        Shape::Text { x, y, font_size } => {
            ctx.set_font(&format!("{font_size}px sans-serif"));
            ctx.set_text_align("left");
            ctx.set_text_baseline("alphabetic");
            ctx.fill_text(path.text(), *x, *y)?;
        }
    }

    if !matches!(path.shape, Shape::Text { .. }) && !path.text().is_empty() {
        draw_label(ctx, path)?;
    }

    ctx.restore();
    Ok(())
}

fn draw_stroke(ctx: &CanvasRenderingContext2d, points: &[Point], width: f64) -> Result<(), JsValue> {
    match points {
        [] => {}
        // A single click leaves a dot.
        [only] => {
            ctx.begin_path();
            ctx.arc(only.x, only.y, width / 2.0, 0.0, 2.0 * PI)?;
            ctx.fill();
        }
        [first, rest @ ..] => {
            ctx.begin_path();
            ctx.move_to(first.x, first.y);
            for p in rest {
                ctx.line_to(p.x, p.y);
            }
            ctx.stroke();
        }
    }
    Ok(())
}

/// Label centred on the path's bounds.
fn draw_label(ctx: &CanvasRenderingContext2d, path: &Path) -> Result<(), JsValue> {
    let center = hit::path_bounds(path).center();
    ctx.set_font("14px sans-serif");
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.fill_text(path.text(), center.x, center.y)
}

// =============================================================
// Selection UI
// =============================================================

fn draw_selection(ctx: &CanvasRenderingContext2d, path: &Path, show_handles: bool) -> Result<(), JsValue> {
    let b = hit::path_bounds(path).inflate(SELECTION_PAD_PX);

    ctx.save();
    ctx.set_stroke_style_str(SELECTION_COLOR);
    ctx.set_line_width(1.0);
    set_dashed(ctx, true)?;
    ctx.stroke_rect(b.x, b.y, b.width, b.height);
    set_dashed(ctx, false)?;

    if show_handles {
        ctx.set_fill_style_str("#fff");
        for (_, pos) in hit::resize_handles(&path.shape) {
            let side = HANDLE_RADIUS_PX * 2.0;
            ctx.fill_rect(pos.x - HANDLE_RADIUS_PX, pos.y - HANDLE_RADIUS_PX, side, side);
            ctx.stroke_rect(pos.x - HANDLE_RADIUS_PX, pos.y - HANDLE_RADIUS_PX, side, side);
        }
    }

    ctx.restore();
    Ok(())
}

fn draw_marquee(ctx: &CanvasRenderingContext2d, marquee: Bounds) -> Result<(), JsValue> {
    ctx.save();
    set_dashed(ctx, true)?;
    ctx.set_stroke_style_str(SELECTION_COLOR);
    ctx.set_fill_style_str("rgba(30, 144, 255, 0.12)");
    ctx.set_line_width(1.0);
    ctx.fill_rect(marquee.x, marquee.y, marquee.width, marquee.height);
    ctx.stroke_rect(marquee.x, marquee.y, marquee.width, marquee.height);
    set_dashed(ctx, false)?;
    ctx.restore();
    Ok(())
}

fn set_dashed(ctx: &CanvasRenderingContext2d, dashed: bool) -> Result<(), JsValue> {
    let dash_array = js_sys::Array::new();
    if dashed {
        dash_array.push(&SELECTION_DASH_PX.into());
        dash_array.push(&SELECTION_DASH_PX.into());
    }
    ctx.set_line_dash(&dash_array)
}
