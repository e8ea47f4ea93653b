use crate::content::catalog::ObjectId;

/// Logical scene. Home, Detail and Spotify are steady; every other value is transient.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scene {
    /// The object grid.
    #[default]
    Home,
    /// Clone moving toward the standard detail layout.
    TransitioningToDetail,
    /// Detail content is showing.
    Detail,
    /// Clone moving back onto the grid.
    TransitioningBack,
    /// Portal zoom into the immersive layout.
    TransitioningToImmersive,
    /// Leaf fall toward the visualizer.
    TransitioningToSpotify,
    /// The audio visualizer scene.
    Spotify,
    /// Card stack wipe into the full-panel layout.
    TransitioningWipe,
}

impl Scene {
    /// Return `true` for Home, Detail and Spotify.
    pub fn is_steady(self) -> bool {
        matches!(self, Self::Home | Self::Detail | Self::Spotify)
    }
}

/// Layout the detail scene is mounted with.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DetailLayout {
    /// Hero placeholder next to the text column.
    #[default]
    Standard,
    /// Edge-to-edge layout entered through the portal zoom.
    Immersive,
    /// Full-viewport panel revealed by the wipe.
    FullPanel,
}

/// Mountable scene roots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneRoot {
    /// Object grid root.
    Home,
    /// Detail root.
    Detail,
    /// Visualizer root.
    Spotify,
}

/// Presentation modifier of a mounted root.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerModifier {
    /// Visible and interactive.
    Active,
    /// Mounted underneath a transition, not interactive.
    Inert,
    /// Fading out while the clone returns to the grid.
    TransitioningOut,
    /// Revealed underneath the wipe panel.
    WipeReveal,
    /// Detail mounted in the immersive layout.
    Immersive,
}

/// One mounted root.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SceneLayer {
    /// Root mounted.
    pub root: SceneRoot,
    /// How it is presented.
    pub modifier: LayerModifier,
}

impl SceneLayer {
    fn new(root: SceneRoot, modifier: LayerModifier) -> Self {
        Self { root, modifier }
    }
}

/// Controller-owned scene state. Replaced as a whole on every change.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneState {
    /// Current logical scene.
    pub scene: Scene,
    /// Key of the open detail content; `None` on Home and Spotify.
    pub active_content_key: Option<String>,
    /// Object the open content was selected from. Several objects may share a content key.
    pub active_object: Option<ObjectId>,
    /// No new transition may start while set.
    pub is_transitioning: bool,
    /// Layout detail is mounted with.
    pub detail_layout: DetailLayout,
}

impl SceneState {
    /// Roots mounted for the current scene, bottom to top.
    pub fn visible_layers(&self) -> Vec<SceneLayer> {
        use LayerModifier as M;
        use SceneRoot as R;

        let detail_steady = match self.detail_layout {
            DetailLayout::Standard => M::Active,
            DetailLayout::Immersive => M::Immersive,
            DetailLayout::FullPanel => M::WipeReveal,
        };
        match self.scene {
            Scene::Home => vec![SceneLayer::new(R::Home, M::Active)],
            Scene::Detail => vec![SceneLayer::new(R::Detail, detail_steady)],
            Scene::Spotify => vec![SceneLayer::new(R::Spotify, M::Active)],
            Scene::TransitioningToDetail => vec![
                SceneLayer::new(R::Home, M::Inert),
                SceneLayer::new(R::Detail, M::Active),
            ],
            Scene::TransitioningBack => vec![
                SceneLayer::new(R::Home, M::Inert),
                SceneLayer::new(R::Detail, M::TransitioningOut),
            ],
            Scene::TransitioningToImmersive => {
                let detail = if self.detail_layout == DetailLayout::Immersive {
                    M::Immersive
                } else {
                    M::Inert
                };
                vec![
                    SceneLayer::new(R::Home, M::Inert),
                    SceneLayer::new(R::Detail, detail),
                ]
            }
            Scene::TransitioningWipe => vec![
                SceneLayer::new(R::Home, M::Inert),
                SceneLayer::new(R::Detail, M::WipeReveal),
            ],
            Scene::TransitioningToSpotify => vec![
                SceneLayer::new(R::Home, M::Inert),
                SceneLayer::new(R::Spotify, M::Inert),
            ],
        }
    }

    /// Return `true` when `root` is mounted with [`LayerModifier::Active`].
    pub fn is_shown(&self, root: SceneRoot) -> bool {
        self.visible_layers()
            .iter()
            .any(|l| l.root == root && l.modifier == LayerModifier::Active)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/state.rs"]
mod tests;
