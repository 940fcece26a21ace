//! Shared numeric constants for the whiteboard crate.

// ── Hit-testing ─────────────────────────────────────────────────

/// Distance in pixels within which a point counts as touching an outline.
pub const HIT_TOLERANCE_PX: f64 = 5.0;

/// Half the side of a square resize handle, in pixels.
pub const HANDLE_RADIUS_PX: f64 = 5.0;

// ── Geometry limits ─────────────────────────────────────────────

/// Smallest width or height a rectangle can be resized to.
pub const MIN_RECT_SIZE: f64 = 10.0;

/// Smallest radius a circle can be resized to.
pub const MIN_CIRCLE_RADIUS: f64 = 5.0;

// ── Arrows ──────────────────────────────────────────────────────

/// Arrowhead side length in pixels.
pub const ARROW_HEAD_LEN: f64 = 15.0;

/// Arrowhead half-angle in radians (30°).
pub const ARROW_HEAD_ANGLE: f64 = std::f64::consts::PI / 6.0;

// ── Text ────────────────────────────────────────────────────────

/// Default font size for new text paths.
pub const DEFAULT_FONT_SIZE: f64 = 16.0;

/// Approximate glyph advance as a fraction of the font size, used when no
/// text metrics are available (bounds, hit-testing).
pub const GLYPH_WIDTH_RATIO: f64 = 0.6;

// ── Style ───────────────────────────────────────────────────────

/// Default stroke colour.
pub const DEFAULT_STROKE_COLOR: &str = "#000000";

/// Default stroke width.
pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;

/// Board background; eraser strokes paint in this colour.
pub const BACKGROUND_COLOR: &str = "#FFFFFF";

/// Stroke width of eraser strokes.
pub const ERASER_WIDTH: f64 = 20.0;
