use super::*;

fn state(scene: Scene, layout: DetailLayout) -> SceneState {
    SceneState {
        scene,
        detail_layout: layout,
        ..SceneState::default()
    }
}

#[test]
fn default_state_is_idle_home() {
    let s = SceneState::default();
    assert_eq!(s.scene, Scene::Home);
    assert!(!s.is_transitioning);
    assert_eq!(s.active_content_key, None);
    assert!(s.is_shown(SceneRoot::Home));
}

#[test]
fn only_three_scenes_are_steady() {
    let steady: Vec<Scene> = [
        Scene::Home,
        Scene::TransitioningToDetail,
        Scene::Detail,
        Scene::TransitioningBack,
        Scene::TransitioningToImmersive,
        Scene::TransitioningToSpotify,
        Scene::Spotify,
        Scene::TransitioningWipe,
    ]
    .into_iter()
    .filter(|s| s.is_steady())
    .collect();
    assert_eq!(steady, vec![Scene::Home, Scene::Detail, Scene::Spotify]);
}

#[test]
fn forward_transition_mounts_both_scenes() {
    let layers = state(Scene::TransitioningToDetail, DetailLayout::Standard).visible_layers();
    assert_eq!(
        layers,
        vec![
            SceneLayer::new(SceneRoot::Home, LayerModifier::Inert),
            SceneLayer::new(SceneRoot::Detail, LayerModifier::Active),
        ]
    );
}

#[test]
fn back_transition_marks_detail_outgoing() {
    let s = state(Scene::TransitioningBack, DetailLayout::Standard);
    assert!(
        s.visible_layers()
            .contains(&SceneLayer::new(SceneRoot::Detail, LayerModifier::TransitioningOut))
    );
    assert!(!s.is_shown(SceneRoot::Home));
}

#[test]
fn detail_modifier_follows_layout() {
    assert_eq!(
        state(Scene::Detail, DetailLayout::Immersive).visible_layers(),
        vec![SceneLayer::new(SceneRoot::Detail, LayerModifier::Immersive)]
    );
    assert_eq!(
        state(Scene::Detail, DetailLayout::FullPanel).visible_layers(),
        vec![SceneLayer::new(SceneRoot::Detail, LayerModifier::WipeReveal)]
    );
}

#[test]
fn immersive_layout_appears_once_swapped() {
    let before = state(Scene::TransitioningToImmersive, DetailLayout::Standard);
    let after = state(Scene::TransitioningToImmersive, DetailLayout::Immersive);
    assert_eq!(before.visible_layers()[1].modifier, LayerModifier::Inert);
    assert_eq!(after.visible_layers()[1].modifier, LayerModifier::Immersive);
}

#[test]
fn spotify_is_not_shown_while_falling() {
    let s = state(Scene::TransitioningToSpotify, DetailLayout::Standard);
    assert!(!s.is_shown(SceneRoot::Spotify));
    assert!(state(Scene::Spotify, DetailLayout::Standard).is_shown(SceneRoot::Spotify));
}
