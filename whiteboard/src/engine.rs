use std::collections::BTreeSet;

use storage::{KeyValueStore, LocalStore, StorageError};
use tracing::{debug, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::config::WhiteboardConfig;
use crate::consts::{BACKGROUND_COLOR, ERASER_WIDTH, HANDLE_RADIUS_PX};
use crate::doc::{Document, Path, Shape, ShapeKind};
use crate::geom::{Bounds, Point};
use crate::hit;
use crate::input::{Button, InputState, StrokeStyle, Tool, UiState};
use crate::render;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// What a requested text entry will be applied to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextTarget {
    /// A new text path anchored at this point.
    NewText { at: Point },
    /// The label of an existing non-text path.
    Label { index: usize },
    /// The content of an existing text path.
    Content { index: usize },
}

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A path was appended at `index`.
    PathAdded { index: usize },
    /// Existing paths were edited in place.
    PathsUpdated { indices: Vec<usize> },
    /// Paths were removed (undo, clear) or the document was reloaded.
    DocumentReset,
    SelectionChanged(Vec<usize>),
    /// The host should prompt for text and answer with
    /// [`EngineCore::submit_text`].
    TextRequested { target: TextTarget, current: String },
    SetCursor(String),
    RenderNeeded,
}

/// Core engine state: all logic that does not depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore<S: KeyValueStore> {
    pub doc: Document,
    pub ui: UiState,
    pub input: InputState,
    pub config: WhiteboardConfig,
    question_id: String,
    store: S,
}

impl<S: KeyValueStore> EngineCore<S> {
    /// Open the board for `question_id` with default settings.
    pub fn open(store: S, question_id: impl Into<String>) -> Self {
        Self::open_with_config(store, question_id, WhiteboardConfig::default())
    }

    /// Open the board for `question_id`, loading any saved paths.
    pub fn open_with_config(store: S, question_id: impl Into<String>, config: WhiteboardConfig) -> Self {
        let question_id = question_id.into();
        let doc = Document::load(&store, &question_id);
        let ui = UiState {
            tool: Tool::default(),
            style: StrokeStyle::new(config.stroke_color.clone(), config.stroke_width),
            selection: BTreeSet::new(),
            marquee: None,
            preview: None,
        };
        Self { doc, ui, input: InputState::Idle, config, question_id, store }
    }

    // --- Data inputs ---

    /// Switch to another question's board, reloading it from storage.
    pub fn load_question(&mut self, question_id: impl Into<String>) -> Vec<Action> {
        self.question_id = question_id.into();
        self.doc = Document::load(&self.store, &self.question_id);
        self.reset_gesture();
        let mut actions = self.clear_selection();
        actions.extend([Action::DocumentReset, Action::RenderNeeded]);
        actions
    }

    /// Append a path on top and persist. Returns its index.
    pub fn add_path(&mut self, path: Path) -> usize {
        let index = self.doc.push(path);
        self.persist();
        index
    }

    /// Remove the most recently added path. Selection is cleared.
    pub fn undo(&mut self) -> Vec<Action> {
        if self.doc.pop().is_none() {
            return Vec::new();
        }
        self.persist();
        self.reset_gesture();
        let mut actions = self.clear_selection();
        actions.extend([Action::DocumentReset, Action::RenderNeeded]);
        actions
    }

    /// Remove every path. Selection is cleared.
    pub fn clear(&mut self) -> Vec<Action> {
        self.doc.clear();
        self.persist();
        self.reset_gesture();
        let mut actions = self.clear_selection();
        actions.extend([Action::DocumentReset, Action::RenderNeeded]);
        actions
    }

    // --- Tool / style ---

    /// Set the active tool, abandoning any gesture in progress.
    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        self.ui.tool = tool;
        self.reset_gesture();
        let mut actions = if tool == Tool::Select { Vec::new() } else { self.clear_selection() };
        actions.extend([Action::SetCursor(tool.cursor().to_owned()), Action::RenderNeeded]);
        actions
    }

    pub fn set_color(&mut self, color: impl Into<String>) {
        self.ui.style.color = color.into();
    }

    pub fn set_stroke_width(&mut self, width: f64) {
        self.ui.style.width = width.max(1.0);
    }

    pub fn set_font_size(&mut self, font_size: f64) {
        self.ui.style.font_size = font_size.max(1.0);
    }

    /// Replace the selection, dropping indices outside the document.
    pub fn select(&mut self, indices: impl IntoIterator<Item = usize>) -> Vec<Action> {
        let len = self.doc.len();
        self.ui.selection = indices.into_iter().filter(|&i| i < len).collect();
        vec![Action::SelectionChanged(self.selection()), Action::RenderNeeded]
    }

    // --- Pointer input ---

    pub fn on_pointer_down(&mut self, pt: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        self.reset_gesture();

        match self.ui.tool {
            Tool::Select => self.begin_select(pt),
            Tool::Pen | Tool::Eraser => {
                let (color, width) = if self.ui.tool == Tool::Eraser {
                    (BACKGROUND_COLOR.to_owned(), ERASER_WIDTH)
                } else {
                    (self.ui.style.color.clone(), self.ui.style.width)
                };
                self.ui.preview = Some(Path::new(Shape::Pen { points: vec![pt] }, color, width));
                self.input = InputState::Stroking;
                vec![Action::RenderNeeded]
            }
            Tool::Rectangle | Tool::Circle | Tool::Triangle | Tool::Arrow => {
                self.input = InputState::DrawingShape { tool: self.ui.tool, anchor: pt };
                Vec::new()
            }
            Tool::Text => vec![Action::TextRequested { target: TextTarget::NewText { at: pt }, current: String::new() }],
        }
    }

    pub fn on_pointer_move(&mut self, pt: Point) -> Vec<Action> {
        match &self.input {
            InputState::Idle => return self.hover_cursor(pt),
            InputState::DrawingShape { tool, anchor } => {
                self.ui.preview = tool.drag_shape(*anchor, pt).map(|shape| self.ui.style.path(shape));
            }
            InputState::Stroking => {
                if let Some(Path { shape: Shape::Pen { points }, .. }) = self.ui.preview.as_mut()
                    && points.last() != Some(&pt)
                {
                    points.push(pt);
                }
            }
            InputState::DraggingSelection { start, originals } => {
                let (dx, dy) = (pt.x - start.x, pt.y - start.y);
                for (index, original) in originals {
                    if let Some(path) = self.doc.get_mut(*index) {
                        *path = original.clone();
                        path.translate(dx, dy);
                    }
                }
            }
            InputState::Resizing { index, anchor, original } => {
                let shape = hit::resize(original, *anchor, pt, &self.config);
                if let Some(path) = self.doc.get_mut(*index) {
                    path.shape = shape;
                }
            }
            InputState::Marquee { anchor } => {
                self.ui.marquee = Some(Bounds::from_corners(*anchor, pt));
            }
        }
        vec![Action::RenderNeeded]
    }

    pub fn on_pointer_up(&mut self, pt: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary || matches!(self.input, InputState::Idle) {
            return Vec::new();
        }
        self.on_pointer_move(pt);

        let mut actions = Vec::new();
        match std::mem::take(&mut self.input) {
            InputState::Idle => {}
            InputState::DrawingShape { tool, anchor } => {
                self.ui.preview = None;
                if anchor == pt {
                    debug!(?tool, "discarding zero-size shape");
                } else if let Some(shape) = tool.drag_shape(anchor, pt) {
                    let path = self.ui.style.path(shape);
                    let index = self.add_path(path);
                    actions.push(Action::PathAdded { index });
                }
            }
            InputState::Stroking => {
                if let Some(path) = self.ui.preview.take() {
                    let index = self.add_path(path);
                    actions.push(Action::PathAdded { index });
                }
            }
            InputState::DraggingSelection { start, originals } => {
                if start != pt {
                    self.persist();
                    actions.push(Action::PathsUpdated { indices: originals.iter().map(|(i, _)| *i).collect() });
                }
                actions.push(Action::SetCursor(self.ui.tool.cursor().to_owned()));
            }
            InputState::Resizing { index, original, .. } => {
                if self.doc.get(index).is_some_and(|path| path.shape != original) {
                    self.persist();
                    actions.push(Action::PathsUpdated { indices: vec![index] });
                }
                actions.push(Action::SetCursor(self.ui.tool.cursor().to_owned()));
            }
            InputState::Marquee { anchor } => {
                self.ui.marquee = None;
                // A plain click on empty board only clears the selection.
                if anchor == pt {
                    actions.push(Action::RenderNeeded);
                    return actions;
                }
                let rect = Bounds::from_corners(anchor, pt);
                self.ui.selection = hit::indices_in_rect(&self.doc, &rect).into_iter().collect();
                actions.push(Action::SelectionChanged(self.selection()));
            }
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Double-click: edit the label or content of the topmost filled shape
    /// under `pt`, or place new text on empty board.
    pub fn on_double_click(&mut self, pt: Point) -> Vec<Action> {
        self.reset_gesture();
        let request = match hit::topmost_fill_at(&self.doc, pt) {
            Some(index) => {
                let path = &self.doc.paths()[index];
                let target = if path.kind() == ShapeKind::Text {
                    TextTarget::Content { index }
                } else {
                    TextTarget::Label { index }
                };
                Action::TextRequested { target, current: path.text().to_owned() }
            }
            None => Action::TextRequested { target: TextTarget::NewText { at: pt }, current: String::new() },
        };
        vec![request]
    }

    /// Apply the host's answer to a [`Action::TextRequested`]. `None` means the
    /// prompt was cancelled and leaves the document unchanged. An empty label
    /// removes the label; empty new text or content is ignored.
    pub fn submit_text(&mut self, target: TextTarget, text: Option<String>) -> Vec<Action> {
        let Some(text) = text else {
            return Vec::new();
        };
        let text = text.trim().to_owned();

        match target {
            TextTarget::NewText { at } => {
                if text.is_empty() {
                    return Vec::new();
                }
                let shape = Shape::Text { x: at.x, y: at.y, font_size: self.ui.style.font_size };
                let path = self.ui.style.path(shape).with_text(text);
                let index = self.add_path(path);
                vec![Action::PathAdded { index }, Action::RenderNeeded]
            }
            TextTarget::Label { index } => {
                let Some(path) = self.doc.get_mut(index) else {
                    return Vec::new();
                };
                if path.kind() == ShapeKind::Text {
                    return Vec::new();
                }
                path.text = if text.is_empty() { None } else { Some(text) };
                self.persist();
                vec![Action::PathsUpdated { indices: vec![index] }, Action::RenderNeeded]
            }
            TextTarget::Content { index } => {
                let Some(path) = self.doc.get_mut(index) else {
                    return Vec::new();
                };
                if path.kind() != ShapeKind::Text || text.is_empty() {
                    return Vec::new();
                }
                path.text = Some(text);
                self.persist();
                vec![Action::PathsUpdated { indices: vec![index] }, Action::RenderNeeded]
            }
        }
    }

    // --- Queries ---

    /// Selected indices in ascending order.
    #[must_use]
    pub fn selection(&self) -> Vec<usize> {
        self.ui.selection.iter().copied().collect()
    }

    #[must_use]
    pub fn question_id(&self) -> &str {
        &self.question_id
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    // --- Internals ---

    fn begin_select(&mut self, pt: Point) -> Vec<Action> {
        if let [index] = self.selection()[..]
            && let Some(path) = self.doc.get(index)
            && let Some(anchor) = hit::handle_at(&path.shape, pt, HANDLE_RADIUS_PX)
        {
            self.input = InputState::Resizing { index, anchor, original: path.shape.clone() };
            return vec![Action::SetCursor(anchor.cursor().to_owned())];
        }

        let mut actions = Vec::new();
        if let Some(index) = hit::topmost_at(&self.doc, pt, self.config.hit_tolerance) {
            if !self.ui.selection.contains(&index) {
                self.ui.selection = BTreeSet::from([index]);
                actions.push(Action::SelectionChanged(vec![index]));
            }
            let originals = self
                .ui
                .selection
                .iter()
                .filter_map(|&i| self.doc.get(i).map(|p| (i, p.clone())))
                .collect();
            self.input = InputState::DraggingSelection { start: pt, originals };
            actions.push(Action::SetCursor("move".to_owned()));
        } else {
            actions.extend(self.clear_selection());
            self.input = InputState::Marquee { anchor: pt };
            self.ui.marquee = Some(Bounds::new(pt.x, pt.y, 0.0, 0.0));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    fn hover_cursor(&self, pt: Point) -> Vec<Action> {
        if self.ui.tool != Tool::Select {
            return Vec::new();
        }
        if let [index] = self.selection()[..]
            && let Some(path) = self.doc.get(index)
            && let Some(anchor) = hit::handle_at(&path.shape, pt, HANDLE_RADIUS_PX)
        {
            return vec![Action::SetCursor(anchor.cursor().to_owned())];
        }
        let cursor = if hit::topmost_at(&self.doc, pt, self.config.hit_tolerance).is_some() {
            "move"
        } else {
            "default"
        };
        vec![Action::SetCursor(cursor.to_owned())]
    }

    fn clear_selection(&mut self) -> Vec<Action> {
        if self.ui.selection.is_empty() {
            return Vec::new();
        }
        self.ui.selection.clear();
        vec![Action::SelectionChanged(Vec::new())]
    }

    fn reset_gesture(&mut self) {
        self.input = InputState::Idle;
        self.ui.preview = None;
        self.ui.marquee = None;
    }

    fn persist(&mut self) {
        if let Err(e) = self.doc.save(&mut self.store, &self.question_id) {
            warn!(question_id = %self.question_id, error = %e, "whiteboard save failed");
        }
    }
}

/// The full whiteboard engine. Wraps `EngineCore` and owns the browser canvas
/// element and `localStorage` backend.
pub struct Engine {
    canvas: HtmlCanvasElement,
    pub core: EngineCore<LocalStore>,
    viewport_width: f64,
    viewport_height: f64,
    dpr: f64,
}

impl Engine {
    /// Create an engine bound to `canvas`, showing the board for `question_id`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] when `localStorage` cannot be reached.
    pub fn new(canvas: HtmlCanvasElement, question_id: &str, config: WhiteboardConfig) -> Result<Self, StorageError> {
        let store = LocalStore::new()?;
        let viewport_width = f64::from(canvas.width());
        let viewport_height = f64::from(canvas.height());
        Ok(Self {
            canvas,
            core: EngineCore::open_with_config(store, question_id, config),
            viewport_width,
            viewport_height,
            dpr: 1.0,
        })
    }

    /// Update viewport dimensions (CSS pixels) and device pixel ratio.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.viewport_width = width_css;
        self.viewport_height = height_css;
        self.dpr = dpr;
        self.canvas.set_width((width_css * dpr).round().max(0.0) as u32);
        self.canvas.set_height((height_css * dpr).round().max(0.0) as u32);
        self.render_logged();
    }

    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        let actions = self.core.set_tool(tool);
        self.after(&actions);
        actions
    }

    pub fn on_pointer_down(&mut self, pt: Point, button: Button) -> Vec<Action> {
        let actions = self.core.on_pointer_down(pt, button);
        self.after(&actions);
        actions
    }

    pub fn on_pointer_move(&mut self, pt: Point) -> Vec<Action> {
        let actions = self.core.on_pointer_move(pt);
        self.after(&actions);
        actions
    }

    pub fn on_pointer_up(&mut self, pt: Point, button: Button) -> Vec<Action> {
        let actions = self.core.on_pointer_up(pt, button);
        self.after(&actions);
        actions
    }

    pub fn on_double_click(&mut self, pt: Point) -> Vec<Action> {
        self.core.on_double_click(pt)
    }

    pub fn submit_text(&mut self, target: TextTarget, text: Option<String>) -> Vec<Action> {
        let actions = self.core.submit_text(target, text);
        self.after(&actions);
        actions
    }

    pub fn undo(&mut self) -> Vec<Action> {
        let actions = self.core.undo();
        self.after(&actions);
        actions
    }

    pub fn clear(&mut self) -> Vec<Action> {
        let actions = self.core.clear();
        self.after(&actions);
        actions
    }

    pub fn load_question(&mut self, question_id: &str) -> Vec<Action> {
        let actions = self.core.load_question(question_id);
        self.after(&actions);
        actions
    }

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the 2D context is unavailable or a draw call fails.
    pub fn render(&self) -> Result<(), JsValue> {
        let ctx = self
            .canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(JsValue::from)?;
        render::draw(&ctx, &self.core.doc, &self.core.ui, self.viewport_width, self.viewport_height, self.dpr)
    }

    fn after(&self, actions: &[Action]) {
        if actions.contains(&Action::RenderNeeded) {
            self.render_logged();
        }
        for action in actions {
            if let Action::SetCursor(cursor) = action
                && let Err(e) = self.canvas.style().set_property("cursor", cursor)
            {
                warn!(error = ?e, "failed to set canvas cursor");
            }
        }
    }

    fn render_logged(&self) {
        if let Err(e) = self.render() {
            warn!(error = ?e, "whiteboard render failed");
        }
    }
}
