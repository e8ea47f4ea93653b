use super::*;

#[test]
fn millis_arithmetic_saturates() {
    assert_eq!(Millis(10).after(5), Millis(15));
    assert_eq!(Millis(u64::MAX).after(1), Millis(u64::MAX));
    assert_eq!(Millis(10).since(Millis(4)), 6);
    assert_eq!(Millis(4).since(Millis(10)), 0);
}

#[test]
fn viewport_validation() {
    assert!(Viewport::new(1280.0, 720.0).is_ok());
    assert!(Viewport::new(0.0, 720.0).is_err());
    assert!(Viewport::new(f64::NAN, 720.0).is_err());
}

#[test]
fn lower_middle_rect_matches_fallback_geometry() {
    let vp = Viewport::new(1260.0, 1080.0).unwrap();
    let r = vp.lower_middle_rect(420.0, 504.0, 0.6);
    assert_eq!(r, ViewRect::new(420.0, 648.0, 420.0, 504.0));
}

#[test]
fn centered_at_keeps_size() {
    let r = ViewRect::new(100.0, 100.0, 300.0, 200.0);
    let c = r.centered_at(Point::new(500.0, 400.0));
    assert_eq!(c, ViewRect::new(350.0, 300.0, 300.0, 200.0));
    assert_eq!(c.center(), Point::new(500.0, 400.0));
}

#[test]
fn kurbo_round_trip_normalizes_negative_extent() {
    let r = ViewRect::from_kurbo(Rect::new(50.0, 40.0, 10.0, 0.0));
    assert_eq!(r, ViewRect::new(10.0, 0.0, 40.0, 40.0));
    assert_eq!(ViewRect::from_kurbo(r.to_kurbo()), r);
}

#[test]
fn malformed_rects_are_rejected() {
    assert!(ViewRect::new(0.0, 0.0, -1.0, 5.0).validate().is_err());
    assert!(ViewRect::new(f64::INFINITY, 0.0, 1.0, 5.0).validate().is_err());
    assert!(ViewRect::new(0.0, 0.0, 0.0, 0.0).validate().is_ok());
}

#[test]
fn generation_is_monotonic() {
    let g = Generation::default();
    assert!(g.next() > g);
    assert_eq!(g.next().next(), Generation(2));
}
