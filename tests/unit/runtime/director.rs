use super::*;
use crate::{
    animator::engine::CommandKind,
    scene::{host::ViewportSurface, state::Scene},
};

fn session() -> (Director, Rc<RefCell<InMemoryViewport>>) {
    Director::in_memory(
        ChoreoConfig::default(),
        ContentCatalog::builtin(),
        StaticHost::from_catalog(&ContentCatalog::builtin(), Default::default()),
        1800.0,
    )
    .expect("director")
}

#[test]
fn invalid_config_is_rejected() {
    let mut cfg = ChoreoConfig::default();
    cfg.timing.leaf.rotation_min_deg = 500.0;
    let err = Director::in_memory(cfg, ContentCatalog::builtin(), StaticHost::new(), 900.0)
        .err()
        .expect("error");
    assert!(err.to_string().starts_with("config error:"));
}

#[test]
fn advance_moves_the_clock_even_when_idle() {
    let (mut d, _vp) = session();
    d.advance_by(250);
    assert_eq!(d.now(), Millis(250));
    d.advance_to(Millis(100));
    assert_eq!(d.now(), Millis(250));
}

#[test]
fn teardown_mid_transition_cancels_everything_and_restores_the_surface() {
    let (mut d, vp) = session();
    assert!(d.select_object("obj_headphones", None).is_started());
    d.advance_by(1500);
    assert!(vp.borrow().transitioning_class());
    assert!(vp.borrow().scroll_height() > 1800.0);

    d.teardown();
    assert_eq!(d.pending(), 0);
    assert!(d.is_torn_down());
    assert_eq!(d.state().scene, Scene::Home);
    assert!(!d.state().is_transitioning);
    assert_eq!(d.state().active_content_key, None);
    let (_, last) = d.trace().scenes().last().expect("scene trace");
    assert!(!last.is_transitioning);
    let frame = d.render();
    assert!(frame.animator.clone.is_none());
    assert!(frame.animator.overlay.is_none());
    assert!(!frame.viewport.transitioning_class);
    assert!(!frame.viewport.scroll_locked);
    assert_eq!(frame.viewport.scroll_height, 1800.0);
    assert_eq!(frame.viewport.scroll_offset, 0.0);

    let events = d.trace().len();
    d.advance_by(10_000);
    assert_eq!(d.trace().len(), events);
    assert_eq!(
        d.select_object("obj_ps4", None),
        Intent::Ignored(IgnoreReason::TornDown)
    );
}

#[test]
fn drop_restores_the_surface() {
    let vp = {
        let (mut d, vp) = session();
        d.select_object("obj_ps4", None);
        d.advance_by(100);
        assert!(vp.borrow().scroll_locked());
        vp
    };
    assert!(!vp.borrow().scroll_locked());
    assert!(!vp.borrow().transitioning_class());
}

#[test]
fn run_until_idle_reaches_the_steady_scene() {
    let (mut d, _vp) = session();
    d.select_object("obj_business_cards", None);
    assert!(d.run_until_idle(10_000));
    assert_eq!(d.state().scene, Scene::Detail);
    assert!(!d.state().is_transitioning);
    assert_eq!(d.trace().commands(CommandKind::Release).len(), 1);
}
