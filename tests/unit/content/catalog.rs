use super::*;

#[test]
fn builtin_catalog_has_one_object_per_role_family() {
    let cat = ContentCatalog::builtin();
    assert_eq!(cat.len(), 4);
    assert_eq!(cat.by_id("obj_headphones").unwrap().role, ObjectRole::Audio);
    assert_eq!(cat.by_id("obj_laptop").unwrap().role, ObjectRole::Immersive);
    assert_eq!(
        cat.by_id("obj_business_cards").unwrap().role,
        ObjectRole::CardStack
    );
    assert_eq!(cat.by_id("obj_ps4").unwrap().role, ObjectRole::Content);
    assert!(cat.by_id("obj_missing").is_none());
}

#[test]
fn content_key_lookup_returns_first_in_grid_order() {
    let cat = ContentCatalog::builtin();
    assert_eq!(
        cat.by_content_key("music").unwrap().id,
        ObjectId::from("obj_headphones")
    );
    assert!(cat.by_content_key("nope").is_none());
}

#[test]
fn json_catalog_defaults_role_and_images() {
    let cat = ContentCatalog::from_json_str(
        r#"{ "objects": [
            { "id": "a", "label": "A", "content_key": "work",
              "placement": { "left": 0.5, "top": 0.25, "width": 200, "height": 100 } }
        ] }"#,
    )
    .unwrap();
    let rec = cat.by_id("a").unwrap();
    assert_eq!(rec.role, ObjectRole::Content);
    assert_eq!(rec.images.preferred(), None);
    let vp = Viewport::new(1000.0, 800.0).unwrap();
    assert_eq!(
        rec.placement.resolve(vp),
        ViewRect::new(500.0, 200.0, 200.0, 100.0)
    );
}

#[test]
fn duplicate_ids_are_rejected() {
    let err = ContentCatalog::from_json_str(
        r#"{ "objects": [
            { "id": "a", "label": "A", "content_key": "k",
              "placement": { "left": 0, "top": 0, "width": 1, "height": 1 } },
            { "id": "a", "label": "B", "content_key": "k",
              "placement": { "left": 0, "top": 0, "width": 1, "height": 1 } }
        ] }"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("duplicate"));
}

#[test]
fn empty_content_key_is_rejected() {
    let def = CatalogDef {
        objects: vec![ContentRecord {
            id: ObjectId::from("a"),
            label: "A".to_owned(),
            content_key: " ".to_owned(),
            images: ImageRefs::default(),
            role: ObjectRole::Content,
            placement: Placement {
                left: 0.0,
                top: 0.0,
                width: 1.0,
                height: 1.0,
            },
        }],
    };
    assert!(ContentCatalog::from_def(def).is_err());
}

#[test]
fn malformed_json_maps_to_serde_error() {
    let err = ContentCatalog::from_json_str("{ not json").unwrap_err();
    assert!(matches!(err, ChoreoError::Serde(_)));
}

#[test]
fn preferred_image_falls_back_to_open() {
    let refs = ImageRefs {
        closed: None,
        open: Some("/o.png".to_owned()),
    };
    assert_eq!(refs.preferred(), Some("/o.png"));
}
