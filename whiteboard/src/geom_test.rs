#![allow(clippy::float_cmp)]

use super::*;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

// =============================================================
// Point
// =============================================================

#[test]
fn point_distance_pythagorean() {
    assert_eq!(pt(0.0, 0.0).distance(pt(3.0, 4.0)), 5.0);
}

#[test]
fn point_serializes_as_xy_object() {
    let json = serde_json::to_value(pt(1.5, -2.0)).unwrap();
    assert_eq!(json, serde_json::json!({ "x": 1.5, "y": -2.0 }));
}

// =============================================================
// distance_to_segment
// =============================================================

#[test]
fn segment_distance_perpendicular() {
    assert_eq!(distance_to_segment(pt(5.0, 3.0), pt(0.0, 0.0), pt(10.0, 0.0)), 3.0);
}

#[test]
fn segment_distance_clamps_to_endpoint() {
    assert_eq!(distance_to_segment(pt(13.0, 4.0), pt(0.0, 0.0), pt(10.0, 0.0)), 5.0);
    assert_eq!(distance_to_segment(pt(-3.0, 4.0), pt(0.0, 0.0), pt(10.0, 0.0)), 5.0);
}

#[test]
fn segment_distance_degenerate_segment() {
    assert_eq!(distance_to_segment(pt(3.0, 4.0), pt(0.0, 0.0), pt(0.0, 0.0)), 5.0);
}

// =============================================================
// point_in_triangle
// =============================================================

#[test]
fn triangle_contains_centroid_either_winding() {
    let (a, b, c) = (pt(0.0, 0.0), pt(10.0, 0.0), pt(5.0, 10.0));
    assert!(point_in_triangle(pt(5.0, 3.0), a, b, c));
    assert!(point_in_triangle(pt(5.0, 3.0), a, c, b));
}

#[test]
fn triangle_excludes_outside_point() {
    let (a, b, c) = (pt(0.0, 0.0), pt(10.0, 0.0), pt(5.0, 10.0));
    assert!(!point_in_triangle(pt(0.0, 10.0), a, b, c));
    assert!(!point_in_triangle(pt(5.0, -1.0), a, b, c));
}

// =============================================================
// Bounds
// =============================================================

#[test]
fn bounds_from_corners_normalizes() {
    let b = Bounds::from_corners(pt(50.0, 40.0), pt(10.0, 20.0));
    assert_eq!(b, Bounds::new(10.0, 20.0, 40.0, 20.0));
}

#[test]
fn bounds_enclosing_points() {
    let b = Bounds::enclosing([pt(3.0, 9.0), pt(-1.0, 4.0), pt(7.0, 5.0)]).unwrap();
    assert_eq!(b, Bounds::new(-1.0, 4.0, 8.0, 5.0));
    assert!(Bounds::enclosing(Vec::new()).is_none());
}

#[test]
fn bounds_intersects_is_strict() {
    let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
    assert!(a.intersects(&Bounds::new(5.0, 5.0, 10.0, 10.0)));
    assert!(!a.intersects(&Bounds::new(10.0, 0.0, 5.0, 5.0)));
    assert!(!a.intersects(&Bounds::new(0.0, 10.0, 5.0, 5.0)));
    assert!(!a.intersects(&Bounds::new(20.0, 20.0, 5.0, 5.0)));
}

#[test]
fn bounds_contains_edges_and_center() {
    let b = Bounds::new(0.0, 0.0, 10.0, 10.0);
    assert!(b.contains(pt(0.0, 0.0)));
    assert!(b.contains(pt(10.0, 10.0)));
    assert!(!b.contains(pt(10.1, 5.0)));
    assert_eq!(b.center(), pt(5.0, 5.0));
    assert_eq!(b.inflate(2.0), Bounds::new(-2.0, -2.0, 14.0, 14.0));
}
