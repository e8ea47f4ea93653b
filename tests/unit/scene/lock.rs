use super::*;
use crate::scene::host::{InMemoryViewport, ViewportSurface};

#[test]
fn lock_sets_flags_and_restores_on_drop() {
    let vp = InMemoryViewport::shared(2000.0);
    let shared: SharedViewport = vp.clone();
    {
        let _lock = ViewportLock::acquire(&shared);
        assert!(vp.borrow().transitioning_class());
        assert!(vp.borrow().scroll_locked());
    }
    assert!(!vp.borrow().transitioning_class());
    assert!(!vp.borrow().scroll_locked());
}

#[test]
fn scroll_extension_restores_height_and_offset() {
    let vp = InMemoryViewport::shared(2000.0);
    vp.borrow_mut().scroll_to(120.0);
    let shared: SharedViewport = vp.clone();

    let ext = ScrollExtension::acquire(&shared, 900.0);
    assert_eq!(vp.borrow().scroll_height(), 2900.0);
    assert_eq!(ext.original_height(), 2000.0);
    assert_eq!(ext.original_offset(), 120.0);

    vp.borrow_mut().scroll_to(1020.0);
    drop(ext);
    let snap = vp.borrow().snapshot();
    assert_eq!(snap.scroll_height, 2000.0);
    assert_eq!(snap.scroll_offset, 120.0);
}

#[test]
fn guards_restore_in_any_drop_order() {
    let vp = InMemoryViewport::shared(1500.0);
    let shared: SharedViewport = vp.clone();
    let before = vp.borrow().snapshot();

    let lock = ViewportLock::acquire(&shared);
    let ext = ScrollExtension::acquire(&shared, 900.0);
    drop(lock);
    drop(ext);

    assert_eq!(vp.borrow().snapshot(), before);
}
