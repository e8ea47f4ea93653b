use super::*;

fn drain(s: &mut Scheduler<&'static str>, until: u64) -> Vec<(u64, &'static str)> {
    let mut out = Vec::new();
    while let Some(f) = s.pop_due(Millis(until)) {
        out.push((f.at.0, f.task));
    }
    s.advance_to(Millis(until));
    out
}

#[test]
fn fires_in_due_then_schedule_order() {
    let mut s = Scheduler::new(16);
    s.schedule(100, "b");
    s.schedule(50, "a");
    s.schedule(100, "c");
    assert_eq!(s.next_due(), Some(Millis(50)));
    assert_eq!(drain(&mut s, 1000), vec![(50, "a"), (100, "b"), (100, "c")]);
    assert_eq!(s.now(), Millis(1000));
}

#[test]
fn pop_stops_at_horizon() {
    let mut s = Scheduler::new(16);
    s.schedule(10, "x");
    s.schedule(30, "y");
    assert_eq!(drain(&mut s, 20), vec![(10, "x")]);
    assert_eq!(s.pending(), 1);
    assert_eq!(drain(&mut s, 30), vec![(30, "y")]);
}

#[test]
fn cancelled_entries_never_fire() {
    let mut s = Scheduler::new(16);
    let a = s.schedule(10, "a");
    s.schedule(20, "b");
    assert!(s.cancel(a));
    assert!(!s.cancel(a));
    assert_eq!(drain(&mut s, 100), vec![(20, "b")]);
}

#[test]
fn cancel_where_filters_payloads() {
    let mut s = Scheduler::new(16);
    s.schedule(10, "old");
    s.schedule(10, "new");
    s.schedule(20, "old");
    assert_eq!(s.cancel_where(|t| *t == "old"), 2);
    assert_eq!(drain(&mut s, 100), vec![(10, "new")]);
}

#[test]
fn frames_land_on_boundaries() {
    let mut s = Scheduler::new(16);
    s.advance_to(Millis(20));
    let id = s.request_frame("f");
    assert_eq!(id.due(), Millis(32));
    s.advance_to(Millis(32));
    // Strictly after now, even when now is a boundary.
    assert_eq!(s.request_frame("g").due(), Millis(48));
}

#[test]
fn zero_delay_from_callback_fires_in_same_drain() {
    let mut s = Scheduler::new(16);
    s.schedule(5, "first");
    let f = s.pop_due(Millis(5)).unwrap();
    assert_eq!(f.kind, WakeKind::Timer);
    s.schedule(0, "chained");
    let g = s.pop_due(Millis(5)).unwrap();
    assert_eq!((g.at, g.task), (Millis(5), "chained"));
}

#[test]
fn clock_is_monotonic() {
    let mut s: Scheduler<()> = Scheduler::new(0);
    assert_eq!(s.frame_interval_ms(), 1);
    s.advance_to(Millis(10));
    s.advance_to(Millis(3));
    assert_eq!(s.now(), Millis(10));
}
