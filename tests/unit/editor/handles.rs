use super::*;

fn rect() -> Rect {
    Rect::new(400.0, 400.0, 600.0, 600.0)
}

#[test]
fn anchors_sit_on_corners_and_midpoints() {
    let r = rect();
    assert_eq!(HandleId::Nw.anchor(r), Point::new(400.0, 400.0));
    assert_eq!(HandleId::Se.anchor(r), Point::new(600.0, 600.0));
    assert_eq!(HandleId::N.anchor(r), Point::new(500.0, 400.0));
    assert_eq!(HandleId::W.anchor(r), Point::new(400.0, 500.0));
}

#[test]
fn handle_boxes_are_inclusive() {
    let r = rect();
    assert_eq!(hit_test_handle(r, Point::new(604.0, 604.0), 8.0), Some(HandleId::Se));
    assert_eq!(hit_test_handle(r, Point::new(604.1, 600.0), 8.0), None);
    assert_eq!(hit_test_handle(r, Point::new(500.0, 396.0), 8.0), Some(HandleId::N));
    assert_eq!(hit_test_handle(r, Point::new(450.0, 450.0), 8.0), None);
}

#[test]
fn body_is_strict_interior() {
    let r = rect();
    assert!(hit_test_body(r, Point::new(500.0, 500.0)));
    assert!(!hit_test_body(r, Point::new(400.0, 500.0)));
    assert!(!hit_test_body(r, Point::new(700.0, 500.0)));
}

#[test]
fn minimum_size_boxes_do_not_overlap() {
    let small = Rect::new(0.0, 0.0, 20.0, 20.0);
    for a in HandleId::ALL {
        for b in HandleId::ALL {
            if a == b {
                continue;
            }
            let overlap = a.hit_box(small, 8.0).intersect(b.hit_box(small, 8.0));
            assert!(overlap.area() <= 0.0, "{a:?} overlaps {b:?}");
        }
    }
}

#[test]
fn corner_follows_dominant_component() {
    let size = Size::new(200.0, 100.0);
    let w = resized_width(HandleId::Se, size, Vec2::new(10.0, 40.0), 2.0, 20.0);
    assert_eq!(w, 280.0);
    let w = resized_width(HandleId::Se, size, Vec2::new(30.0, 5.0), 2.0, 20.0);
    assert_eq!(w, 230.0);
    let w = resized_width(HandleId::Nw, size, Vec2::new(30.0, 5.0), 2.0, 20.0);
    assert_eq!(w, 170.0);
}

#[test]
fn driven_dimension_is_floored() {
    let size = Size::new(200.0, 100.0);
    assert_eq!(
        resized_width(HandleId::E, size, Vec2::new(-500.0, 0.0), 2.0, 20.0),
        20.0
    );
    assert_eq!(
        resized_width(HandleId::N, size, Vec2::new(0.0, 500.0), 2.0, 20.0),
        40.0
    );
}

#[test]
fn pinned_origin_keeps_opposite_side() {
    let old = rect();
    let size = Size::new(300.0, 300.0);
    assert_eq!(pinned_origin(HandleId::Se, old, size), Point::new(400.0, 400.0));
    assert_eq!(pinned_origin(HandleId::Nw, old, size), Point::new(300.0, 300.0));
    assert_eq!(pinned_origin(HandleId::Ne, old, size), Point::new(400.0, 300.0));
    assert_eq!(pinned_origin(HandleId::N, old, size), Point::new(350.0, 300.0));
    assert_eq!(pinned_origin(HandleId::E, old, size), Point::new(400.0, 350.0));
}

#[test]
fn cursors_match_handle_axes() {
    assert_eq!(HandleId::Nw.cursor(), CursorHint::NwseResize);
    assert_eq!(HandleId::Sw.cursor(), CursorHint::NeswResize);
    assert_eq!(HandleId::S.cursor(), CursorHint::NsResize);
    assert_eq!(HandleId::W.cursor(), CursorHint::EwResize);
}
