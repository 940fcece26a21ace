//! Geometric queries against paths: outline and fill hit-testing, bounds,
//! marquee overlap, and resize handles.
//!
//! Outline hits (`is_point_in_path`) drive click selection; fill hits
//! (`is_point_in_shape`) drive double-click text editing. A click in the
//! middle of a rectangle therefore does not select it, but a double-click
//! there edits its label.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::config::WhiteboardConfig;
use crate::consts::{ARROW_HEAD_ANGLE, ARROW_HEAD_LEN, GLYPH_WIDTH_RATIO};
use crate::doc::{Document, Path, Shape};
use crate::geom::{Bounds, Point, distance_to_segment, point_in_triangle};

/// Anchor position for resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeAnchor {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeAnchor {
    /// CSS cursor shown while hovering or dragging this handle.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::N | Self::S => "ns-resize",
            Self::E | Self::W => "ew-resize",
            Self::Ne | Self::Sw => "nesw-resize",
            Self::Nw | Self::Se => "nwse-resize",
        }
    }

    fn moves_left(self) -> bool {
        matches!(self, Self::W | Self::Nw | Self::Sw)
    }

    fn moves_right(self) -> bool {
        matches!(self, Self::E | Self::Ne | Self::Se)
    }

    fn moves_top(self) -> bool {
        matches!(self, Self::N | Self::Ne | Self::Nw)
    }

    fn moves_bottom(self) -> bool {
        matches!(self, Self::S | Self::Se | Self::Sw)
    }
}

// =============================================================
// Bounds
// =============================================================

/// Estimated box of a text path anchored at baseline-left `x, y`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn text_bounds(x: f64, y: f64, font_size: f64, text: &str) -> Bounds {
    let width = text.chars().count() as f64 * font_size * GLYPH_WIDTH_RATIO;
    Bounds::new(x, y - font_size, width, font_size)
}

/// Axis-aligned bounding box of a path.
#[must_use]
pub fn path_bounds(path: &Path) -> Bounds {
    match &path.shape {
        Shape::Pen { points } => Bounds::enclosing(points.iter().copied()).unwrap_or(Bounds::new(0.0, 0.0, 0.0, 0.0)),
        Shape::Rectangle { x, y, width, height } => {
            Bounds::from_corners(Point::new(*x, *y), Point::new(x + width, y + height))
        }
        Shape::Circle { x, y, radius } => Bounds::new(x - radius, y - radius, radius * 2.0, radius * 2.0),
        Shape::Triangle { .. } => Bounds::enclosing(triangle_vertices(&path.shape)).unwrap_or(Bounds::new(0.0, 0.0, 0.0, 0.0)),
        Shape::Arrow { start_x, start_y, end_x, end_y } => {
            Bounds::from_corners(Point::new(*start_x, *start_y), Point::new(*end_x, *end_y))
        }
        Shape::Text { x, y, font_size } => text_bounds(*x, *y, *font_size, path.text()),
    }
}

/// Whether the path's bounds overlap `rect` (marquee selection).
#[must_use]
pub fn is_path_in_rect(path: &Path, rect: &Bounds) -> bool {
    path_bounds(path).intersects(rect)
}

// =============================================================
// Hit-testing
// =============================================================

/// Whether `p` lies within `tolerance` of the path's outline.
#[must_use]
pub fn is_point_in_path(path: &Path, p: Point, tolerance: f64) -> bool {
    match &path.shape {
        Shape::Pen { points } => match points.as_slice() {
            [] => false,
            [only] => only.distance(p) <= tolerance,
            _ => points
                .windows(2)
                .any(|w| distance_to_segment(p, w[0], w[1]) <= tolerance),
        },
        Shape::Rectangle { .. } | Shape::Triangle { .. } => {
            outline_segments(&path.shape)
                .iter()
                .any(|(a, b)| distance_to_segment(p, *a, *b) <= tolerance)
        }
        Shape::Circle { x, y, radius } => (p.distance(Point::new(*x, *y)) - radius).abs() <= tolerance,
        Shape::Arrow { start_x, start_y, end_x, end_y } => {
            let start = Point::new(*start_x, *start_y);
            let end = Point::new(*end_x, *end_y);
            let [left, right] = arrow_head(start, end);
            [(start, end), (end, left), (end, right)]
                .iter()
                .any(|(a, b)| distance_to_segment(p, *a, *b) <= tolerance)
        }
        Shape::Text { .. } => path_bounds(path).inflate(tolerance).contains(p),
    }
}

/// Whether `p` lies in the filled interior of the path. Pens and arrows have
/// no interior.
#[must_use]
pub fn is_point_in_shape(path: &Path, p: Point) -> bool {
    match &path.shape {
        Shape::Pen { .. } | Shape::Arrow { .. } => false,
        Shape::Rectangle { .. } | Shape::Text { .. } => path_bounds(path).contains(p),
        Shape::Circle { x, y, radius } => p.distance(Point::new(*x, *y)) <= *radius,
        Shape::Triangle { .. } => {
            let [a, b, c] = triangle_vertices(&path.shape);
            point_in_triangle(p, a, b, c)
        }
    }
}

/// Index of the topmost path whose outline is within `tolerance` of `p`.
#[must_use]
pub fn topmost_at(doc: &Document, p: Point, tolerance: f64) -> Option<usize> {
    doc.paths()
        .iter()
        .rposition(|path| is_point_in_path(path, p, tolerance))
}

/// Index of the topmost path whose interior contains `p`.
#[must_use]
pub fn topmost_fill_at(doc: &Document, p: Point) -> Option<usize> {
    doc.paths().iter().rposition(|path| is_point_in_shape(path, p))
}

/// Indices of every path whose bounds overlap `rect`, in draw order.
#[must_use]
pub fn indices_in_rect(doc: &Document, rect: &Bounds) -> Vec<usize> {
    doc.paths()
        .iter()
        .enumerate()
        .filter(|(_, path)| is_path_in_rect(path, rect))
        .map(|(i, _)| i)
        .collect()
}

/// Wing tips of an arrowhead pointing at `end`.
#[must_use]
pub fn arrow_head(start: Point, end: Point) -> [Point; 2] {
    let angle = (end.y - start.y).atan2(end.x - start.x);
    let wing = |a: f64| Point::new(end.x - ARROW_HEAD_LEN * a.cos(), end.y - ARROW_HEAD_LEN * a.sin());
    [wing(angle - ARROW_HEAD_ANGLE), wing(angle + ARROW_HEAD_ANGLE)]
}

fn triangle_vertices(shape: &Shape) -> [Point; 3] {
    match shape {
        Shape::Triangle { x1, y1, x2, y2, x3, y3 } => {
            [Point::new(*x1, *y1), Point::new(*x2, *y2), Point::new(*x3, *y3)]
        }
        _ => [Point::new(0.0, 0.0); 3],
    }
}

fn outline_segments(shape: &Shape) -> Vec<(Point, Point)> {
    match shape {
        Shape::Rectangle { x, y, width, height } => {
            let tl = Point::new(*x, *y);
            let tr = Point::new(x + width, *y);
            let br = Point::new(x + width, y + height);
            let bl = Point::new(*x, y + height);
            vec![(tl, tr), (tr, br), (br, bl), (bl, tl)]
        }
        Shape::Triangle { .. } => {
            let [a, b, c] = triangle_vertices(shape);
            vec![(a, b), (b, c), (c, a)]
        }
        _ => Vec::new(),
    }
}

// =============================================================
// Resize handles
// =============================================================

/// Handle positions for a shape: eight for rectangles, four cardinal handles
/// for circles, none otherwise.
#[must_use]
pub fn resize_handles(shape: &Shape) -> Vec<(ResizeAnchor, Point)> {
    match shape {
        Shape::Rectangle { x, y, width, height } => {
            let (l, t) = (*x, *y);
            let (r, b) = (x + width, y + height);
            let (cx, cy) = (x + width / 2.0, y + height / 2.0);
            vec![
                (ResizeAnchor::Nw, Point::new(l, t)),
                (ResizeAnchor::N, Point::new(cx, t)),
                (ResizeAnchor::Ne, Point::new(r, t)),
                (ResizeAnchor::E, Point::new(r, cy)),
                (ResizeAnchor::Se, Point::new(r, b)),
                (ResizeAnchor::S, Point::new(cx, b)),
                (ResizeAnchor::Sw, Point::new(l, b)),
                (ResizeAnchor::W, Point::new(l, cy)),
            ]
        }
        Shape::Circle { x, y, radius } => vec![
            (ResizeAnchor::N, Point::new(*x, y - radius)),
            (ResizeAnchor::E, Point::new(x + radius, *y)),
            (ResizeAnchor::S, Point::new(*x, y + radius)),
            (ResizeAnchor::W, Point::new(x - radius, *y)),
        ],
        _ => Vec::new(),
    }
}

/// The handle of `shape` under `p`, if any. Handles are squares of half-side
/// `radius`.
#[must_use]
pub fn handle_at(shape: &Shape, p: Point, radius: f64) -> Option<ResizeAnchor> {
    resize_handles(shape)
        .into_iter()
        .find(|(_, h)| (p.x - h.x).abs() <= radius && (p.y - h.y).abs() <= radius)
        .map(|(anchor, _)| anchor)
}

/// Resize `original` by dragging `anchor` to `pointer`.
///
/// Rectangles keep the edges opposite the dragged handle fixed and never
/// shrink below `min_rect_size`. Circles take the pointer's distance from the
/// centre as the new radius, never below `min_circle_radius`. Other shapes
/// are returned unchanged.
#[must_use]
pub fn resize(original: &Shape, anchor: ResizeAnchor, pointer: Point, config: &WhiteboardConfig) -> Shape {
    match original {
        Shape::Rectangle { x, y, width, height } => {
            let min = config.min_rect_size;
            let (mut left, mut top) = (*x, *y);
            let (mut right, mut bottom) = (x + width, y + height);

            if anchor.moves_right() {
                right = pointer.x.max(left + min);
            }
            if anchor.moves_left() {
                left = pointer.x.min(right - min);
            }
            if anchor.moves_bottom() {
                bottom = pointer.y.max(top + min);
            }
            if anchor.moves_top() {
                top = pointer.y.min(bottom - min);
            }

            Shape::Rectangle { x: left, y: top, width: right - left, height: bottom - top }
        }
        Shape::Circle { x, y, .. } => {
            let radius = pointer.distance(Point::new(*x, *y)).max(config.min_circle_radius);
            Shape::Circle { x: *x, y: *y, radius }
        }
        other => other.clone(),
    }
}
