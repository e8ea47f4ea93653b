use super::*;

#[test]
fn forward_dispatches_on_role() {
    assert_eq!(
        select_variant(ObjectRole::Content, Direction::Forward),
        Variant::Default
    );
    assert_eq!(
        select_variant(ObjectRole::Audio, Direction::Forward),
        Variant::LeafFall
    );
    assert_eq!(
        select_variant(ObjectRole::Immersive, Direction::Forward),
        Variant::ImmersivePortal
    );
    assert_eq!(
        select_variant(ObjectRole::CardStack, Direction::Forward),
        Variant::Wipe
    );
}

#[test]
fn back_is_always_default() {
    for role in [
        ObjectRole::Content,
        ObjectRole::Audio,
        ObjectRole::Immersive,
        ObjectRole::CardStack,
    ] {
        assert_eq!(select_variant(role, Direction::Back), Variant::Default);
    }
}

#[test]
fn every_variant_starts_at_source_without_repeats() {
    for v in [
        Variant::Default,
        Variant::LeafFall,
        Variant::ImmersivePortal,
        Variant::Wipe,
    ] {
        let stages = v.stages();
        assert_eq!(stages[0], Stage::AtSource);
        for (i, s) in stages.iter().enumerate() {
            assert_eq!(v.stage_index(*s), Some(i));
        }
    }
    assert_eq!(Variant::Default.stage_index(Stage::Swiping), None);
}
