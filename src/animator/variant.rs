use crate::content::catalog::ObjectRole;

/// Travel direction of a clone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Grid to destination scene.
    Forward,
    /// Destination scene back onto the grid.
    Back,
}

/// Choreography pattern run for one clone lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Straight eased move from source rect to destination rect.
    Default,
    /// Center, then fall off the bottom of the viewport under an opaque overlay.
    LeafFall,
    /// Center, then zoom through the clone into the immersive layout.
    ImmersivePortal,
    /// Exit right, then sweep a full-viewport panel in from the right edge.
    Wipe,
}

/// One step of a variant's stage machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Mounted on the source rect, tilted.
    AtSource,
    /// Default move onto the destination rect.
    AnimatingToDest,
    /// Move to the viewport center at source size.
    Centering,
    /// Leaf fall below the viewport while rotating and darkening.
    Falling,
    /// Zoom through the viewport from the center.
    PortalZoom,
    /// Slide off the right edge, tilted and fading.
    ExitRight,
    /// Recolor into a full panel parked off the right edge.
    PrepareFullPanel,
    /// Sweep the full panel across the viewport.
    Swiping,
}

impl Variant {
    /// Ordered stages. Index 0 is always [`Stage::AtSource`]; a clone only ever moves to the next
    /// index.
    pub fn stages(self) -> &'static [Stage] {
        match self {
            Self::Default => &[Stage::AtSource, Stage::AnimatingToDest],
            Self::LeafFall => &[Stage::AtSource, Stage::Centering, Stage::Falling],
            Self::ImmersivePortal => &[Stage::AtSource, Stage::Centering, Stage::PortalZoom],
            Self::Wipe => &[
                Stage::AtSource,
                Stage::ExitRight,
                Stage::PrepareFullPanel,
                Stage::Swiping,
            ],
        }
    }

    /// Position of `stage` within this variant, if it belongs to it.
    pub fn stage_index(self, stage: Stage) -> Option<usize> {
        self.stages().iter().position(|s| *s == stage)
    }
}

/// Variant policy: forward transitions dispatch on the object's role; every back transition is a
/// plain move.
pub fn select_variant(role: ObjectRole, direction: Direction) -> Variant {
    match direction {
        Direction::Back => Variant::Default,
        Direction::Forward => match role {
            ObjectRole::Content => Variant::Default,
            ObjectRole::Audio => Variant::LeafFall,
            ObjectRole::Immersive => Variant::ImmersivePortal,
            ObjectRole::CardStack => Variant::Wipe,
        },
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animator/variant.rs"]
mod tests;
