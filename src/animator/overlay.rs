use crate::{
    animation::{ease::Ease, tween::Tween},
    foundation::core::Millis,
};

/// Why the full-viewport cover is showing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayMode {
    /// Fading in behind a falling clone.
    Forward,
    /// Fading in over the visualizer on the way back home.
    Reverse,
    /// Fading out to reveal whatever is underneath.
    FadeOut,
}

/// Rendered state of the overlay at one instant.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OverlayFrame {
    /// Forward cover or reverse fade.
    pub mode: OverlayMode,
    /// Current opacity in `[0, 1]`.
    pub opacity: f64,
}

#[derive(Clone, Debug)]
pub(crate) struct OverlayState {
    mode: OverlayMode,
    fade: Tween<f64>,
}

impl OverlayState {
    pub(crate) fn fade_in(mode: OverlayMode, now: Millis, duration_ms: u64) -> Self {
        Self {
            mode,
            fade: Tween {
                from: 0.0,
                to: 1.0,
                start: now,
                duration_ms,
                ease: Ease::InOutQuad,
            },
        }
    }

    pub(crate) fn fade_out(from_opacity: f64, now: Millis, duration_ms: u64) -> Self {
        Self {
            mode: OverlayMode::FadeOut,
            fade: Tween {
                from: from_opacity,
                to: 0.0,
                start: now,
                duration_ms,
                ease: Ease::InOutQuad,
            },
        }
    }

    pub(crate) fn mode(&self) -> OverlayMode {
        self.mode
    }

    pub(crate) fn frame(&self, now: Millis) -> OverlayFrame {
        OverlayFrame {
            mode: self.mode,
            opacity: self.fade.sample(now),
        }
    }
}
