use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

use crate::{
    content::catalog::{ContentCatalog, ObjectId},
    foundation::core::{Millis, ViewRect, Viewport},
    scene::state::{DetailLayout, SceneState},
};

/// Measurement and notification surface of the mounted scenes.
///
/// Every query may come back empty; callers substitute a fallback and never fail.
pub trait SceneHost {
    /// Rect of the detail hero placeholder for `layout`, when mounted and measurable.
    fn placeholder_rect(&self, layout: DetailLayout) -> Option<ViewRect>;
    /// Rect of the home grid element for `id`.
    fn grid_rect(&self, id: &ObjectId) -> Option<ViewRect>;
    /// Home scene became visible again after the reverse overlay.
    fn home_fade_in(&mut self, at: Millis);
    /// Called after every scene state replacement.
    fn scene_changed(&mut self, state: &SceneState, at: Millis);
}

/// Map-backed host for scripted sessions and tests.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StaticHost {
    /// Measured detail placeholders per layout.
    pub placeholders: BTreeMap<DetailLayout, ViewRect>,
    /// Measured grid element per object.
    pub grid: BTreeMap<ObjectId, ViewRect>,
    /// Instants `home_fade_in` was called at.
    #[serde(skip)]
    pub home_fades: Vec<Millis>,
    /// Number of scene state replacements observed.
    #[serde(skip)]
    pub scene_changes: usize,
}

impl StaticHost {
    /// Host with nothing mounted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Host whose grid rects are the catalog placements resolved against `viewport`.
    pub fn from_catalog(catalog: &ContentCatalog, viewport: Viewport) -> Self {
        let grid = catalog
            .iter()
            .map(|rec| (rec.id.clone(), rec.placement.resolve(viewport)))
            .collect();
        Self {
            grid,
            ..Self::default()
        }
    }

    /// Mount a placeholder for `layout` at `rect`.
    pub fn with_placeholder(mut self, layout: DetailLayout, rect: ViewRect) -> Self {
        self.placeholders.insert(layout, rect);
        self
    }

    /// Place the grid element for `id` at `rect`.
    pub fn with_grid_rect(mut self, id: impl Into<ObjectId>, rect: ViewRect) -> Self {
        self.grid.insert(id.into(), rect);
        self
    }

    /// Unmount the placeholder for `layout`.
    pub fn without_placeholder(mut self, layout: DetailLayout) -> Self {
        self.placeholders.remove(&layout);
        self
    }
}

impl SceneHost for StaticHost {
    fn placeholder_rect(&self, layout: DetailLayout) -> Option<ViewRect> {
        self.placeholders.get(&layout).copied()
    }

    fn grid_rect(&self, id: &ObjectId) -> Option<ViewRect> {
        self.grid.get(id).copied()
    }

    fn home_fade_in(&mut self, at: Millis) {
        self.home_fades.push(at);
    }

    fn scene_changed(&mut self, _state: &SceneState, _at: Millis) {
        self.scene_changes += 1;
    }
}

/// Document-level state the engine mutates around a transition.
pub trait ViewportSurface {
    /// Toggle the "transition in progress" container flag.
    fn set_transitioning_class(&mut self, on: bool);
    /// Return `true` while the container flag is set.
    fn transitioning_class(&self) -> bool;
    /// Lock or unlock user scrolling.
    fn set_scroll_locked(&mut self, locked: bool);
    /// Return `true` while user scrolling is locked.
    fn scroll_locked(&self) -> bool;
    /// Scrollable document height.
    fn scroll_height(&self) -> f64;
    /// Resize the scrollable document.
    fn set_scroll_height(&mut self, height: f64);
    /// Current scroll offset.
    fn scroll_offset(&self) -> f64;
    /// Scroll to `offset`.
    fn scroll_to(&mut self, offset: f64);

    /// Copy of the current flags and scroll.
    fn snapshot(&self) -> ViewportSnapshot {
        ViewportSnapshot {
            transitioning_class: self.transitioning_class(),
            scroll_locked: self.scroll_locked(),
            scroll_height: self.scroll_height(),
            scroll_offset: self.scroll_offset(),
        }
    }
}

/// Single-threaded shared handle; guards keep one to restore on drop.
pub type SharedViewport = Rc<RefCell<dyn ViewportSurface>>;

/// Point-in-time copy of a [`ViewportSurface`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ViewportSnapshot {
    /// Container flag.
    pub transitioning_class: bool,
    /// Scroll lock.
    pub scroll_locked: bool,
    /// Scrollable document height.
    pub scroll_height: f64,
    /// Scroll offset.
    pub scroll_offset: f64,
}

/// In-memory surface for tests and scripted sessions.
#[derive(Clone, Debug, PartialEq)]
pub struct InMemoryViewport {
    state: ViewportSnapshot,
    /// Every offset passed to `scroll_to`, in order.
    pub scroll_log: Vec<f64>,
}

impl InMemoryViewport {
    /// Surface with a document of `scroll_height` scrolled to the top.
    pub fn new(scroll_height: f64) -> Self {
        Self {
            state: ViewportSnapshot {
                transitioning_class: false,
                scroll_locked: false,
                scroll_height,
                scroll_offset: 0.0,
            },
            scroll_log: Vec::new(),
        }
    }

    /// Shared handle for a fresh surface.
    pub fn shared(scroll_height: f64) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new(scroll_height)))
    }
}

impl ViewportSurface for InMemoryViewport {
    fn set_transitioning_class(&mut self, on: bool) {
        self.state.transitioning_class = on;
    }

    fn transitioning_class(&self) -> bool {
        self.state.transitioning_class
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        self.state.scroll_locked = locked;
    }

    fn scroll_locked(&self) -> bool {
        self.state.scroll_locked
    }

    fn scroll_height(&self) -> f64 {
        self.state.scroll_height
    }

    fn set_scroll_height(&mut self, height: f64) {
        self.state.scroll_height = height;
    }

    fn scroll_offset(&self) -> f64 {
        self.state.scroll_offset
    }

    fn scroll_to(&mut self, offset: f64) {
        self.state.scroll_offset = offset;
        self.scroll_log.push(offset);
    }

    fn snapshot(&self) -> ViewportSnapshot {
        self.state
    }
}
