//! Input model: tools, mouse buttons, stroke style, and the gesture state machine.
//!
//! `Tool` captures what a pointer-down means. `InputState` is the gesture
//! tracked between pointer-down and pointer-up, carrying everything needed to
//! compute the next preview or mutation without re-reading the original
//! press.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_FONT_SIZE;
use crate::doc::{Path, Shape};
use crate::geom::{Bounds, Point};
use crate::hit::ResizeAnchor;

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Pointer / selection tool (default).
    #[default]
    Select,
    /// Freehand stroke.
    Pen,
    Rectangle,
    Circle,
    Triangle,
    Arrow,
    /// Click to place text.
    Text,
    /// Freehand stroke painted in the background colour.
    Eraser,
}

impl Tool {
    /// Whether this tool draws a shape by dragging out its extent.
    #[must_use]
    pub fn is_shape(self) -> bool {
        matches!(self, Self::Rectangle | Self::Circle | Self::Triangle | Self::Arrow)
    }

    /// Whether this tool draws a freehand stroke.
    #[must_use]
    pub fn is_stroke(self) -> bool {
        matches!(self, Self::Pen | Self::Eraser)
    }

    /// CSS cursor for the canvas while this tool is active.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::Select => "default",
            Self::Text => "text",
            _ => "crosshair",
        }
    }

    /// Shape spanned by a drag from `anchor` to `current`, for shape tools.
    ///
    /// Rectangles are normalized to a non-negative size. Circles are centred
    /// on the anchor. Triangles are isosceles with the apex at the top centre
    /// of the dragged box.
    #[must_use]
    pub fn drag_shape(self, anchor: Point, current: Point) -> Option<Shape> {
        match self {
            Self::Rectangle => {
                let b = Bounds::from_corners(anchor, current);
                Some(Shape::Rectangle { x: b.x, y: b.y, width: b.width, height: b.height })
            }
            Self::Circle => Some(Shape::Circle { x: anchor.x, y: anchor.y, radius: anchor.distance(current) }),
            Self::Triangle => Some(Shape::Triangle {
                x1: (anchor.x + current.x) / 2.0,
                y1: anchor.y,
                x2: anchor.x,
                y2: current.y,
                x3: current.x,
                y3: current.y,
            }),
            Self::Arrow => Some(Shape::Arrow {
                start_x: anchor.x,
                start_y: anchor.y,
                end_x: current.x,
                end_y: current.y,
            }),
            Self::Select | Self::Pen | Self::Text | Self::Eraser => None,
        }
    }
}

impl FromStr for Tool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "select" => Ok(Self::Select),
            "pen" => Ok(Self::Pen),
            "rectangle" => Ok(Self::Rectangle),
            "circle" => Ok(Self::Circle),
            "triangle" => Ok(Self::Triangle),
            "arrow" => Ok(Self::Arrow),
            "text" => Ok(Self::Text),
            "eraser" => Ok(Self::Eraser),
            other => Err(format!("unknown tool: {other}")),
        }
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` value.
    #[must_use]
    pub fn from_dom(button: i16) -> Self {
        match button {
            1 => Self::Middle,
            2 => Self::Secondary,
            _ => Self::Primary,
        }
    }
}

/// Stroke settings applied to newly drawn paths.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeStyle {
    pub color: String,
    pub width: f64,
    pub font_size: f64,
}

impl StrokeStyle {
    #[must_use]
    pub fn new(color: impl Into<String>, width: f64) -> Self {
        Self { color: color.into(), width, font_size: DEFAULT_FONT_SIZE }
    }

    /// A new path in this style.
    #[must_use]
    pub fn path(&self, shape: Shape) -> Path {
        Path::new(shape, self.color.clone(), self.width)
    }
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone)]
pub struct UiState {
    /// Currently active drawing tool.
    pub tool: Tool,
    pub style: StrokeStyle,
    /// Indices of selected paths. Cleared on every structural change.
    pub selection: BTreeSet<usize>,
    /// Marquee rectangle while a marquee drag is in progress.
    pub marquee: Option<Bounds>,
    /// In-progress shape or stroke, drawn on top of the document.
    pub preview: Option<Path>,
}

/// Gesture tracked between pointer-down and pointer-up.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Dragging out a new shape with a shape tool.
    DrawingShape {
        tool: Tool,
        /// Where the drag started.
        anchor: Point,
    },
    /// Freehand pen or eraser stroke; points accumulate in `UiState::preview`.
    Stroking,
    /// Moving the selected paths.
    DraggingSelection {
        /// Pointer position at press time.
        start: Point,
        /// Selected paths as they were at press time.
        originals: Vec<(usize, Path)>,
    },
    /// Dragging one resize handle of the single selected path.
    Resizing {
        index: usize,
        anchor: ResizeAnchor,
        /// Shape at press time.
        original: Shape,
    },
    /// Rubber-band selection from `anchor`.
    Marquee { anchor: Point },
}
