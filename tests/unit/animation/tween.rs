use super::*;

fn rect_tween(ease: Ease) -> Tween<ViewRect> {
    Tween {
        from: ViewRect::new(100.0, 100.0, 300.0, 300.0),
        to: ViewRect::new(420.0, 648.0, 420.0, 504.0),
        start: Millis(1000),
        duration_ms: 750,
        ease,
    }
}

#[test]
fn endpoints_are_exact() {
    let t = rect_tween(Ease::Standard);
    assert_eq!(t.sample(Millis(0)), t.from);
    assert_eq!(t.sample(Millis(1000)), t.from);
    assert_eq!(t.sample(Millis(1750)), t.to);
    assert_eq!(t.sample(Millis(9000)), t.to);
    assert_eq!(t.end(), Millis(1750));
}

#[test]
fn linear_midpoint() {
    let t = rect_tween(Ease::Linear);
    let mid = t.sample(Millis(1375));
    assert!(mid.approx_eq(ViewRect::new(260.0, 374.0, 360.0, 402.0), 1e-9));
}

#[test]
fn zero_duration_jumps_at_start() {
    let t = Tween {
        from: 0.0,
        to: 10.0,
        start: Millis(50),
        duration_ms: 0,
        ease: Ease::Linear,
    };
    assert_eq!(t.sample(Millis(49)), 0.0);
    assert_eq!(t.sample(Millis(50)), 10.0);
}

#[test]
fn hold_is_constant() {
    let pose = ClonePose::at(ViewRect::new(1.0, 2.0, 3.0, 4.0));
    let t = Tween::hold(pose, Millis(0));
    assert_eq!(t.sample(Millis(0)), pose);
    assert_eq!(t.sample(Millis(100_000)), pose);
}

#[test]
fn pose_lerp_covers_every_property() {
    let a = ClonePose::at(ViewRect::new(0.0, 0.0, 10.0, 10.0));
    let b = ClonePose {
        rect: ViewRect::new(10.0, 20.0, 30.0, 40.0),
        rotation_deg: 90.0,
        scale: 3.0,
        opacity: 0.0,
        brightness: 0.5,
    };
    let m = ClonePose::lerp(&a, &b, 0.5);
    assert_eq!(m.rect, ViewRect::new(5.0, 10.0, 20.0, 25.0));
    assert_eq!(m.rotation_deg, 45.0);
    assert_eq!(m.scale, 2.0);
    assert_eq!(m.opacity, 0.5);
    assert_eq!(m.brightness, 0.75);
}
