use super::*;

#[test]
fn rng_is_deterministic() {
    let mut a = Rng64::new(123);
    let mut b = Rng64::new(123);
    for _ in 0..10 {
        assert_eq!(a.next_u64(), b.next_u64());
    }
}

#[test]
fn streams_diverge() {
    let mut a = Rng64::for_stream(7, 1);
    let mut b = Rng64::for_stream(7, 2);
    assert_ne!(a.next_u64(), b.next_u64());
}

#[test]
fn range_is_bounded() {
    let mut r = Rng64::new(99);
    for _ in 0..1000 {
        let v = r.range(270.0, 450.0);
        assert!((270.0..450.0).contains(&v));
    }
}
