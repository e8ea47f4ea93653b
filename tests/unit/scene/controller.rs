use std::{cell::RefCell, rc::Rc};

use super::*;
use crate::{
    animator::engine::CommandKind,
    runtime::task::Task,
    scene::host::{InMemoryViewport, StaticHost, ViewportSurface},
};

struct Harness {
    controller: SceneController,
    timers: Scheduler<Task>,
    animator: TransitionAnimator,
    host: StaticHost,
    trace: Trace,
    surface: Rc<RefCell<InMemoryViewport>>,
}

impl Harness {
    fn new(host: StaticHost) -> Self {
        let cfg = ChoreoConfig::default();
        let surface = InMemoryViewport::shared(1800.0);
        Self {
            controller: SceneController::new(&cfg, ContentCatalog::builtin(), surface.clone()),
            timers: Scheduler::new(cfg.frame_interval_ms),
            animator: TransitionAnimator::new(&cfg),
            host,
            trace: Trace::default(),
            surface,
        }
    }

    fn with<R>(&mut self, f: impl FnOnce(&mut SceneController, &mut Ports<'_, Task>) -> R) -> R {
        let mut ports = Ports {
            timers: &mut self.timers,
            animator: &mut self.animator,
            host: &mut self.host,
            trace: &mut self.trace,
        };
        let out = f(&mut self.controller, &mut ports);
        self.pump();
        out
    }

    fn pump(&mut self) {
        loop {
            let signals = self.animator.drain_signals();
            if signals.is_empty() {
                return;
            }
            for s in signals {
                let mut ports = Ports {
                    timers: &mut self.timers,
                    animator: &mut self.animator,
                    host: &mut self.host,
                    trace: &mut self.trace,
                };
                self.controller.on_signal(&s, &mut ports);
            }
        }
    }

    fn select(&mut self, id: &str) -> Intent {
        self.with(|c, p| c.select_object(&ObjectId::from(id), None, p))
    }

    fn back(&mut self) -> Intent {
        self.with(|c, p| c.go_back(p))
    }

    fn run_to(&mut self, until: u64) {
        while let Some(fired) = self.timers.pop_due(Millis(until)) {
            match fired.task {
                Task::Animator(t) => self.animator.on_task(t, &mut self.timers),
                Task::Controller(t) => {
                    self.with(|c, p| c.on_task(t, p));
                }
            }
            self.pump();
        }
        self.timers.advance_to(Millis(until));
    }

    fn begin_dest(&self) -> Option<ViewRect> {
        self.animator.descriptor().map(|d| d.dest_rect)
    }
}

#[test]
fn select_sets_guard_and_transient_scene_immediately() {
    let mut h = Harness::new(StaticHost::new());
    assert_eq!(h.select("obj_ps4"), Intent::Started);
    let s = h.controller.state();
    assert_eq!(s.scene, Scene::TransitioningToDetail);
    assert!(s.is_transitioning);
    assert_eq!(s.active_content_key.as_deref(), Some("music"));
    assert_eq!(s.active_object, Some(ObjectId::from("obj_ps4")));
    assert!(h.surface.borrow().transitioning_class());
    assert_eq!(h.host.scene_changes, 1);
    assert!(h.trace.commands(CommandKind::BeginForward).is_empty());
}

#[test]
fn begin_is_issued_after_the_mount_delay() {
    let mut h = Harness::new(StaticHost::new());
    h.select("obj_ps4");
    h.run_to(49);
    assert!(h.animator.descriptor().is_none());
    h.run_to(50);
    assert_eq!(h.trace.commands(CommandKind::BeginForward), vec![Millis(50)]);
}

#[test]
fn repeated_intents_while_transitioning_are_dropped() {
    let mut h = Harness::new(StaticHost::new());
    h.select("obj_ps4");
    assert_eq!(h.select("obj_laptop"), Intent::Ignored(IgnoreReason::Busy));
    assert_eq!(h.back(), Intent::Ignored(IgnoreReason::Busy));
    h.run_to(2000);
    assert_eq!(h.trace.commands(CommandKind::BeginForward).len(), 1);
}

#[test]
fn unknown_object_and_wrong_scene_are_ignored() {
    let mut h = Harness::new(StaticHost::new());
    assert_eq!(
        h.select("obj_lamp"),
        Intent::Ignored(IgnoreReason::UnknownObject {
            object: ObjectId::from("obj_lamp")
        })
    );
    assert_eq!(
        h.back(),
        Intent::Ignored(IgnoreReason::WrongScene { scene: Scene::Home })
    );
    assert!(!h.controller.state().is_transitioning);
    assert_eq!(h.timers.pending(), 0);
}

#[test]
fn placeholder_is_used_as_destination_when_mounted() {
    let placeholder = ViewRect::new(420.0, 648.0, 420.0, 504.0);
    let mut h = Harness::new(StaticHost::new().with_placeholder(DetailLayout::Standard, placeholder));
    h.select("obj_ps4");
    h.run_to(50);
    assert_eq!(h.begin_dest(), Some(placeholder));
}

#[test]
fn missing_placeholder_falls_back_to_the_lower_middle_rect() {
    let mut h = Harness::new(StaticHost::new());
    h.select("obj_ps4");
    h.run_to(50);
    let vp = Viewport::default();
    assert_eq!(
        h.begin_dest(),
        Some(ViewRect::new(vp.width / 2.0 - 210.0, vp.height * 0.6, 420.0, 504.0))
    );
    assert_eq!(h.controller.fallback_rect(), h.begin_dest().unwrap_or_default());
}

#[test]
fn source_defaults_to_the_catalog_placement() {
    let mut h = Harness::new(StaticHost::new());
    h.select("obj_laptop");
    h.run_to(50);
    let expected = ContentCatalog::builtin()
        .by_id("obj_laptop")
        .map(|r| r.placement.resolve(Viewport::default()));
    assert_eq!(h.animator.descriptor().map(|d| d.source_rect), expected);
}

#[test]
fn default_commits_detail_after_the_settle_window() {
    let mut h = Harness::new(StaticHost::new());
    h.select("obj_ps4");
    // Begin at 50, resolves at 100, settles at 850.
    h.run_to(849);
    assert_eq!(h.controller.state().scene, Scene::TransitioningToDetail);
    assert!(h.controller.state().is_transitioning);
    h.run_to(850);
    assert_eq!(h.controller.state().scene, Scene::Detail);
    assert!(!h.controller.state().is_transitioning);
    assert_eq!(h.trace.commands(CommandKind::Release), vec![Millis(850)]);
    assert!(!h.surface.borrow().scroll_locked());
}

#[test]
fn portal_swaps_layout_when_zoom_begins() {
    let mut h = Harness::new(StaticHost::new());
    h.select("obj_laptop");
    h.run_to(649);
    assert_eq!(h.controller.state().detail_layout, DetailLayout::Standard);
    // Begin at 50, centering 600 ms.
    h.run_to(650);
    assert_eq!(h.controller.state().detail_layout, DetailLayout::Immersive);
    assert_eq!(h.controller.state().scene, Scene::TransitioningToImmersive);
    h.run_to(100 + 1600);
    assert_eq!(h.controller.state().scene, Scene::Detail);
    assert_eq!(h.controller.state().detail_layout, DetailLayout::Immersive);
}

#[test]
fn back_from_detail_targets_the_grid_element() {
    let grid = ViewRect::new(10.0, 20.0, 300.0, 300.0);
    let mut h = Harness::new(StaticHost::new().with_grid_rect("obj_ps4", grid));
    h.select("obj_ps4");
    h.run_to(850);
    assert_eq!(h.back(), Intent::Started);
    assert_eq!(h.controller.state().scene, Scene::TransitioningBack);
    assert_eq!(h.begin_dest(), Some(grid));
    assert_eq!(h.animator.descriptor().map(|d| d.source_rect), Some(h.controller.fallback_rect()));

    // Resolves at 900, settles at 1650.
    h.run_to(1649);
    assert!(h.controller.state().is_transitioning);
    h.run_to(1650);
    assert_eq!(h.controller.state(), &SceneState::default());
}

#[test]
fn back_from_spotify_fades_home_in_then_restores_scroll() {
    let mut h = Harness::new(StaticHost::new());
    h.select("obj_headphones");
    // Begin 50, reveal 2950, release 3750.
    h.run_to(3750);
    assert_eq!(h.controller.state().scene, Scene::Spotify);
    assert!(!h.controller.state().is_transitioning);
    h.surface.borrow_mut().scroll_to(300.0);

    assert_eq!(h.back(), Intent::Started);
    assert_eq!(h.trace.commands(CommandKind::BeginReverseOverlay), vec![Millis(3750)]);
    h.run_to(5749);
    assert_eq!(h.controller.state().scene, Scene::Spotify);
    h.run_to(5750);
    assert_eq!(h.controller.state().scene, Scene::Home);
    assert!(h.controller.state().is_transitioning);
    assert_eq!(h.host.home_fades, vec![Millis(5750)]);

    h.run_to(6950);
    assert!(!h.controller.state().is_transitioning);
    assert_eq!(h.surface.borrow().scroll_offset(), 0.0);
    assert!(h.animator.frame(Millis(6950)).overlay.is_none());
}

#[test]
fn teardown_makes_pending_controller_work_inert() {
    let mut h = Harness::new(StaticHost::new());
    h.select("obj_ps4");
    h.run_to(60);
    h.with(|c, p| c.teardown(p));
    assert!(!h.surface.borrow().transitioning_class());
    assert_eq!(h.controller.state(), &SceneState::default());
    let (at, last) = h.trace.scenes().last().expect("teardown commits a scene");
    assert_eq!(at, Millis(60));
    assert_eq!(last, &SceneState::default());

    h.run_to(5000);
    assert_eq!(h.controller.state(), &SceneState::default());
    assert!(h.trace.commands(CommandKind::Release).is_empty());
}

#[test]
fn teardown_of_a_steady_scene_keeps_it() {
    let mut h = Harness::new(StaticHost::new());
    h.select("obj_ps4");
    h.run_to(850);
    let changes = h.host.scene_changes;
    h.with(|c, p| c.teardown(p));
    assert_eq!(h.controller.state().scene, Scene::Detail);
    assert!(!h.controller.state().is_transitioning);
    assert_eq!(h.host.scene_changes, changes);
}

#[test]
fn malformed_grid_rect_falls_back_to_the_catalog_placement() {
    let broken = ViewRect::new(f64::NAN, 20.0, 300.0, 300.0);
    let mut h = Harness::new(StaticHost::new().with_grid_rect("obj_ps4", broken));
    let expected = ContentCatalog::builtin()
        .by_id("obj_ps4")
        .map(|r| r.placement.resolve(Viewport::default()));
    h.select("obj_ps4");
    h.run_to(50);
    assert_eq!(h.animator.descriptor().map(|d| d.source_rect), expected);
    h.run_to(850);
    assert_eq!(h.back(), Intent::Started);
    assert_eq!(h.begin_dest(), expected);
}
