use super::*;

#[test]
fn page_point_is_offset_and_rescaled() {
    let canvas = Canvas::new(1920, 1080).unwrap();
    let vp = SurfaceViewport {
        left: 100.0,
        top: 50.0,
        displayed_width: 960.0,
        displayed_height: 540.0,
    };
    assert_eq!(
        vp.to_surface_point(canvas, Point::new(100.0, 50.0)),
        Point::ZERO
    );
    assert_eq!(
        vp.to_surface_point(canvas, Point::new(580.0, 320.0)),
        Point::new(960.0, 540.0)
    );
}

#[test]
fn unscaled_viewport_is_identity() {
    let canvas = Canvas::new(640, 480).unwrap();
    let vp = SurfaceViewport::unscaled(canvas);
    let p = Point::new(12.5, 300.0);
    assert_eq!(vp.to_surface_point(canvas, p), p);
}

#[test]
fn collapsed_viewport_does_not_divide_by_zero() {
    let canvas = Canvas::new(640, 480).unwrap();
    let vp = SurfaceViewport {
        left: 10.0,
        top: 10.0,
        displayed_width: 0.0,
        displayed_height: 0.0,
    };
    assert_eq!(
        vp.to_surface_point(canvas, Point::new(20.0, 30.0)),
        Point::new(10.0, 20.0)
    );
}

#[test]
fn touch_uses_first_point_with_pointer_semantics() {
    let canvas = Canvas::new(200, 100).unwrap();
    let vp = SurfaceViewport {
        left: 0.0,
        top: 0.0,
        displayed_width: 100.0,
        displayed_height: 50.0,
    };
    let touches = [Point::new(10.0, 10.0), Point::new(90.0, 40.0)];

    assert_eq!(
        touch_input(TouchPhase::Start, &touches, &vp, canvas),
        Some(PointerInput::Down(Point::new(20.0, 20.0)))
    );
    assert_eq!(
        touch_input(TouchPhase::Move, &touches[1..], &vp, canvas),
        Some(PointerInput::Move(Point::new(180.0, 80.0)))
    );
    assert_eq!(touch_input(TouchPhase::Move, &[], &vp, canvas), None);
    assert_eq!(
        touch_input(TouchPhase::End, &[], &vp, canvas),
        Some(PointerInput::Up)
    );
    assert_eq!(
        touch_input(TouchPhase::Cancel, &[], &vp, canvas),
        Some(PointerInput::Leave)
    );
}
