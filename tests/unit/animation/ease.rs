use super::*;

const ALL: [Ease; 9] = [
    Ease::Linear,
    Ease::InQuad,
    Ease::OutQuad,
    Ease::InOutQuad,
    Ease::InCubic,
    Ease::OutCubic,
    Ease::InOutCubic,
    Ease::Standard,
    Ease::Leaf,
];

#[test]
fn endpoints_are_stable() {
    for ease in ALL {
        assert_eq!(ease.apply(0.0), 0.0);
        assert_eq!(ease.apply(1.0), 1.0);
    }
}

#[test]
fn monotonic_spot_check() {
    for ease in ALL {
        let a = ease.apply(0.25);
        let b = ease.apply(0.5);
        let c = ease.apply(0.75);
        assert!(a < b, "{ease:?}");
        assert!(b < c, "{ease:?}");
    }
}

#[test]
fn out_of_range_progress_is_clamped() {
    assert_eq!(Ease::Standard.apply(-3.0), 0.0);
    assert_eq!(Ease::Leaf.apply(7.0), 1.0);
}

#[test]
fn bezier_matches_named_curves() {
    let custom = Ease::Bezier {
        x1: 0.2,
        y1: 0.8,
        x2: 0.2,
        y2: 1.0,
    };
    for t in [0.1, 0.33, 0.5, 0.9] {
        assert!((custom.apply(t) - Ease::Standard.apply(t)).abs() < 1e-9);
    }
}

#[test]
fn linear_bezier_is_identity() {
    let lin = Ease::Bezier {
        x1: 0.25,
        y1: 0.25,
        x2: 0.75,
        y2: 0.75,
    };
    for t in [0.1, 0.4, 0.6, 0.95] {
        assert!((lin.apply(t) - t).abs() < 1e-5);
    }
}

#[test]
fn standard_front_loads_motion() {
    // Most of the distance is covered in the first half.
    assert!(Ease::Standard.apply(0.5) > 0.8);
    assert!(Ease::Leaf.apply(0.5) > 0.5);
}

#[test]
fn bezier_validity() {
    assert!(Ease::Standard.is_valid());
    assert!(
        !Ease::Bezier {
            x1: 1.5,
            y1: 0.0,
            x2: 0.5,
            y2: 1.0
        }
        .is_valid()
    );
}
