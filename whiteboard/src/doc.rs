//! Document model: drawn paths and the ordered store that owns them.
//!
//! A [`Path`] is one drawn item: a [`Shape`] (tagged by `type` on the wire)
//! plus its stroke colour, stroke width and optional text. For `text` shapes
//! the text is the content; for every other shape it is a label drawn at the
//! centre of the shape's bounds.
//!
//! [`Document`] is positional: paths are addressed by their index in draw
//! order (last = topmost). It is append-only apart from undo (pop), clear,
//! and in-place edits of existing paths, and persists as one JSON array per
//! question under `whiteboard_<questionId>`.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use storage::{KeyValueStore, StorageError, load_json, save_json, whiteboard_key};
use tracing::{debug, warn};

use crate::geom::Point;

/// Geometry of a drawn path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    /// Freehand stroke through `points` in drawing order.
    Pen { points: Vec<Point> },
    /// Rectangle with top-left corner `x, y`.
    Rectangle { x: f64, y: f64, width: f64, height: f64 },
    /// Circle centred on `x, y`.
    Circle { x: f64, y: f64, radius: f64 },
    Triangle {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x3: f64,
        y3: f64,
    },
    /// Straight arrow with its head at the end point.
    #[serde(rename_all = "camelCase")]
    Arrow {
        start_x: f64,
        start_y: f64,
        end_x: f64,
        end_y: f64,
    },
    /// Text anchored at its baseline-left `x, y`.
    #[serde(rename_all = "camelCase")]
    Text { x: f64, y: f64, font_size: f64 },
}

/// Variant tag of a [`Shape`], without geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Pen,
    Rectangle,
    Circle,
    Triangle,
    Arrow,
    Text,
}

impl Shape {
    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Pen { .. } => ShapeKind::Pen,
            Self::Rectangle { .. } => ShapeKind::Rectangle,
            Self::Circle { .. } => ShapeKind::Circle,
            Self::Triangle { .. } => ShapeKind::Triangle,
            Self::Arrow { .. } => ShapeKind::Arrow,
            Self::Text { .. } => ShapeKind::Text,
        }
    }

    /// Move every defining coordinate by `(dx, dy)`.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        match self {
            Self::Pen { points } => {
                for p in points {
                    p.x += dx;
                    p.y += dy;
                }
            }
            Self::Rectangle { x, y, .. } | Self::Circle { x, y, .. } | Self::Text { x, y, .. } => {
                *x += dx;
                *y += dy;
            }
            Self::Triangle { x1, y1, x2, y2, x3, y3 } => {
                *x1 += dx;
                *y1 += dy;
                *x2 += dx;
                *y2 += dy;
                *x3 += dx;
                *y3 += dy;
            }
            Self::Arrow { start_x, start_y, end_x, end_y } => {
                *start_x += dx;
                *start_y += dy;
                *end_x += dx;
                *end_y += dy;
            }
        }
    }
}

/// One drawn item on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    #[serde(flatten)]
    pub shape: Shape,
    /// Stroke (and text) colour as a CSS colour string.
    pub color: String,
    /// Serialized as `strokeWidth`; `width` belongs to rectangles.
    #[serde(rename = "strokeWidth")]
    pub stroke_width: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Path {
    #[must_use]
    pub fn new(shape: Shape, color: impl Into<String>, stroke_width: f64) -> Self {
        Self { shape, color: color.into(), stroke_width, text: None }
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    /// Text content or label. Empty when absent.
    #[must_use]
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.shape.translate(dx, dy);
    }
}

/// Ordered, index-addressed store of paths for one question's board.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    paths: Vec<Path>,
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_paths(paths: Vec<Path>) -> Self {
        Self { paths }
    }

    /// Load the board for `question_id`. Missing or unreadable data yields an
    /// empty document.
    pub fn load(store: &impl KeyValueStore, question_id: &str) -> Self {
        match load_json::<Vec<Path>>(store, &whiteboard_key(question_id)) {
            Ok(Some(paths)) => {
                debug!(question_id, count = paths.len(), "loaded whiteboard");
                Self { paths }
            }
            Ok(None) => Self::new(),
            Err(e) => {
                warn!(question_id, error = %e, "discarding unreadable whiteboard");
                Self::new()
            }
        }
    }

    /// Persist the full path list for `question_id`.
    ///
    /// # Errors
    ///
    /// Returns the storage error if serialization or the write fails.
    pub fn save(&self, store: &mut impl KeyValueStore, question_id: &str) -> Result<(), StorageError> {
        save_json(store, &whiteboard_key(question_id), &self.paths)
    }

    #[must_use]
    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Path> {
        self.paths.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Path> {
        self.paths.get_mut(index)
    }

    /// Append a path on top of the others, returning its index.
    pub fn push(&mut self, path: Path) -> usize {
        self.paths.push(path);
        self.paths.len() - 1
    }

    /// Remove and return the most recently appended path.
    pub fn pop(&mut self) -> Option<Path> {
        self.paths.pop()
    }

    pub fn clear(&mut self) {
        self.paths.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
