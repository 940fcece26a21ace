//! Tunable whiteboard behaviour. Defaults come from [`crate::consts`]; the
//! host may override them (see `mockview::config::Settings`).

use crate::consts::{DEFAULT_STROKE_COLOR, DEFAULT_STROKE_WIDTH, HIT_TOLERANCE_PX, MIN_CIRCLE_RADIUS, MIN_RECT_SIZE};

#[derive(Debug, Clone, PartialEq)]
pub struct WhiteboardConfig {
    /// Outline hit distance in pixels.
    pub hit_tolerance: f64,
    /// Minimum rectangle width/height when resizing.
    pub min_rect_size: f64,
    /// Minimum circle radius when resizing.
    pub min_circle_radius: f64,
    /// Stroke colour selected when the board opens.
    pub stroke_color: String,
    /// Stroke width selected when the board opens.
    pub stroke_width: f64,
}

impl Default for WhiteboardConfig {
    fn default() -> Self {
        Self {
            hit_tolerance: HIT_TOLERANCE_PX,
            min_rect_size: MIN_RECT_SIZE,
            min_circle_radius: MIN_CIRCLE_RADIUS,
            stroke_color: DEFAULT_STROKE_COLOR.to_owned(),
            stroke_width: DEFAULT_STROKE_WIDTH,
        }
    }
}
