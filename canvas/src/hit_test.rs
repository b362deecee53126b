use super::*;

fn scene_with(objects: Vec<SceneObject>) -> Scene {
    let mut scene = Scene::new();
    for obj in objects {
        scene.insert(obj);
    }
    scene
}

fn rect_at(x: f64, y: f64) -> SceneObject {
    SceneObject::rect(Point::new(x, y), 100.0, 50.0, "#fff", "#000", 2.0)
}

// =============================================================
// Per-shape containment
// =============================================================

#[test]
fn rect_contains_inside_and_edge() {
    let r = rect_at(0.0, 0.0);
    assert!(object_contains(&r, Point::new(50.0, 25.0)));
    assert!(object_contains(&r, Point::new(100.0, 50.0)));
    assert!(!object_contains(&r, Point::new(101.0, 25.0)));
}

#[test]
fn circle_uses_radius_not_bounding_square() {
    let c = SceneObject::circle(Point::new(0.0, 0.0), 50.0, "#fff", "#000", 0.0);
    assert!(object_contains(&c, Point::new(50.0, 50.0)));
    assert!(object_contains(&c, Point::new(50.0, 1.0)));
    // Corner of the bounding square lies outside the circle.
    assert!(!object_contains(&c, Point::new(2.0, 2.0)));
}

#[test]
fn text_uses_estimated_bounds() {
    let t = SceneObject::text(Point::new(0.0, 0.0), "abcd", "Arial", 20.0, "#000");
    assert!(object_contains(&t, Point::new(10.0, 10.0)));
    assert!(!object_contains(&t, Point::new(200.0, 10.0)));
}

#[test]
fn path_hits_near_segment_only() {
    let p = SceneObject::path(&[Point::new(0.0, 0.0), Point::new(100.0, 0.0), Point::new(100.0, 100.0)], "#000", 4.0)
        .unwrap();
    assert!(object_contains(&p, Point::new(50.0, 3.0)));
    assert!(object_contains(&p, Point::new(97.0, 50.0)));
    // Inside the bounding box but far from the line.
    assert!(!object_contains(&p, Point::new(30.0, 60.0)));
}

// =============================================================
// Scene hit-testing
// =============================================================

#[test]
fn empty_scene_hits_nothing() {
    assert_eq!(hit_test(Point::new(0.0, 0.0), &Scene::new()), None);
}

#[test]
fn miss_returns_none() {
    let scene = scene_with(vec![rect_at(0.0, 0.0)]);
    assert_eq!(hit_test(Point::new(500.0, 500.0), &scene), None);
}

#[test]
fn topmost_object_wins() {
    let below = rect_at(0.0, 0.0);
    let above = rect_at(50.0, 0.0);
    let above_id = above.id;
    let below_id = below.id;
    let scene = scene_with(vec![below, above]);
    assert_eq!(hit_test(Point::new(75.0, 25.0), &scene), Some(above_id));
    assert_eq!(hit_test(Point::new(10.0, 25.0), &scene), Some(below_id));
}

// =============================================================
// Selection handles
// =============================================================

#[test]
fn corners_of_the_outline_are_handles() {
    let r = rect_at(0.0, 0.0);
    assert_eq!(handle_at(&r, Point::new(0.0, 0.0)), Some(Handle::TopLeft));
    assert_eq!(handle_at(&r, Point::new(104.0, -4.0)), Some(Handle::TopRight));
    assert_eq!(handle_at(&r, Point::new(-2.0, 52.0)), Some(Handle::BottomLeft));
    assert_eq!(handle_at(&r, Point::new(100.0, 50.0)), Some(Handle::BottomRight));
}

#[test]
fn interior_and_far_points_are_not_handles() {
    let r = rect_at(0.0, 0.0);
    assert_eq!(handle_at(&r, Point::new(50.0, 25.0)), None);
    assert_eq!(handle_at(&r, Point::new(120.0, 70.0)), None);
}
