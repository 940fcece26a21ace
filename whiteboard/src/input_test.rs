#![allow(clippy::float_cmp)]

use super::*;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

// =============================================================
// Tool
// =============================================================

#[test]
fn tool_default_is_select() {
    assert_eq!(Tool::default(), Tool::Select);
}

#[test]
fn tool_from_str_accepts_every_name() {
    for (name, tool) in [
        ("select", Tool::Select),
        ("pen", Tool::Pen),
        ("rectangle", Tool::Rectangle),
        ("circle", Tool::Circle),
        ("triangle", Tool::Triangle),
        ("arrow", Tool::Arrow),
        ("text", Tool::Text),
        ("eraser", Tool::Eraser),
    ] {
        assert_eq!(name.parse::<Tool>(), Ok(tool));
    }
}

#[test]
fn tool_from_str_rejects_unknown() {
    let err = "lasso".parse::<Tool>().unwrap_err();
    assert!(err.contains("lasso"));
}

#[test]
fn tool_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&Tool::Rectangle).unwrap(), "\"rectangle\"");
}

#[test]
fn tool_categories() {
    assert!(Tool::Circle.is_shape());
    assert!(!Tool::Pen.is_shape());
    assert!(Tool::Pen.is_stroke());
    assert!(Tool::Eraser.is_stroke());
    assert!(!Tool::Select.is_stroke());
}

#[test]
fn tool_cursors() {
    assert_eq!(Tool::Select.cursor(), "default");
    assert_eq!(Tool::Text.cursor(), "text");
    assert_eq!(Tool::Pen.cursor(), "crosshair");
}

// =============================================================
// drag_shape
// =============================================================

#[test]
fn drag_rectangle_normalizes_reverse_drag() {
    let shape = Tool::Rectangle.drag_shape(pt(50.0, 40.0), pt(10.0, 20.0)).unwrap();
    assert_eq!(shape, Shape::Rectangle { x: 10.0, y: 20.0, width: 40.0, height: 20.0 });
}

#[test]
fn drag_circle_centres_on_anchor() {
    let shape = Tool::Circle.drag_shape(pt(0.0, 0.0), pt(3.0, 4.0)).unwrap();
    assert_eq!(shape, Shape::Circle { x: 0.0, y: 0.0, radius: 5.0 });
}

#[test]
fn drag_triangle_apex_at_top_centre() {
    let shape = Tool::Triangle.drag_shape(pt(0.0, 0.0), pt(10.0, 20.0)).unwrap();
    assert_eq!(
        shape,
        Shape::Triangle { x1: 5.0, y1: 0.0, x2: 0.0, y2: 20.0, x3: 10.0, y3: 20.0 }
    );
}

#[test]
fn drag_arrow_runs_anchor_to_current() {
    let shape = Tool::Arrow.drag_shape(pt(1.0, 2.0), pt(3.0, 4.0)).unwrap();
    assert_eq!(shape, Shape::Arrow { start_x: 1.0, start_y: 2.0, end_x: 3.0, end_y: 4.0 });
}

#[test]
fn drag_shape_none_for_non_shape_tools() {
    for tool in [Tool::Select, Tool::Pen, Tool::Text, Tool::Eraser] {
        assert!(tool.drag_shape(pt(0.0, 0.0), pt(10.0, 10.0)).is_none());
    }
}

// =============================================================
// Button / StrokeStyle / InputState
// =============================================================

#[test]
fn button_from_dom() {
    assert_eq!(Button::from_dom(0), Button::Primary);
    assert_eq!(Button::from_dom(1), Button::Middle);
    assert_eq!(Button::from_dom(2), Button::Secondary);
    assert_eq!(Button::from_dom(7), Button::Primary);
}

#[test]
fn stroke_style_stamps_new_paths() {
    let style = StrokeStyle::new("#FF0000", 4.0);
    let path = style.path(Shape::Circle { x: 0.0, y: 0.0, radius: 1.0 });
    assert_eq!(path.color, "#FF0000");
    assert_eq!(path.stroke_width, 4.0);
    assert_eq!(style.font_size, DEFAULT_FONT_SIZE);
    assert!(path.text.is_none());
}

#[test]
fn input_state_default_is_idle() {
    assert!(matches!(InputState::default(), InputState::Idle));
}
