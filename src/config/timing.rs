//! Product-tunable choreography constants.
//!
//! Every duration is a nominal contract: the director waits exactly this long, and the matching
//! visual tween runs for exactly this long.

use crate::{
    animation::ease::Ease,
    foundation::error::{ChoreoError, ChoreoResult},
};

/// All stage, settle and overlay timings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Delay before a begin command resolves, guaranteeing one rendered frame at the source.
    pub bootstrap_ms: u64,
    /// Delay between mounting a destination scene and measuring its placeholder.
    pub mount_delay_ms: u64,
    /// Waits between the animator's completion signal and committing the steady scene.
    pub settle: SettleTiming,
    /// Default rect-to-rect move.
    pub motion: MotionTiming,
    /// Audio object leaf fall.
    pub leaf: LeafFallTiming,
    /// Immersive portal zoom.
    pub portal: PortalTiming,
    /// Card stack wipe.
    pub wipe: WipeTiming,
    /// Overlay-only commands.
    pub overlay: OverlayTiming,
    /// Destination used when no placeholder can be measured.
    pub fallback: FallbackRect,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            bootstrap_ms: 50,
            mount_delay_ms: 50,
            settle: SettleTiming::default(),
            motion: MotionTiming::default(),
            leaf: LeafFallTiming::default(),
            portal: PortalTiming::default(),
            wipe: WipeTiming::default(),
            overlay: OverlayTiming::default(),
            fallback: FallbackRect::default(),
        }
    }
}

/// Settle windows, measured from the begin command's completion signal.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SettleTiming {
    /// Default forward move into the detail scene.
    pub default_ms: u64,
    /// Default back move onto the grid.
    pub back_ms: u64,
    /// Immersive portal.
    pub immersive_ms: u64,
    /// Card stack wipe.
    pub wipe_ms: u64,
}

impl Default for SettleTiming {
    fn default() -> Self {
        Self {
            default_ms: 750,
            back_ms: 750,
            immersive_ms: 1600,
            wipe_ms: 1500,
        }
    }
}

/// Rect-to-rect move used by the default variant in both directions.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MotionTiming {
    /// Duration of the move.
    pub move_ms: u64,
    /// The clone starts slightly tilted and straightens while moving.
    pub start_rotation_deg: f64,
    /// Curve of the move.
    pub ease: Ease,
}

impl Default for MotionTiming {
    fn default() -> Self {
        Self {
            move_ms: 750,
            start_rotation_deg: -2.0,
            ease: Ease::Standard,
        }
    }
}

/// Leaf fall into the visualizer scene.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LeafFallTiming {
    /// Move to the viewport center.
    pub centering_ms: u64,
    /// Fall duration.
    pub fall_ms: u64,
    /// Extra distance past the viewport bottom the clone falls.
    pub fall_extra_px: f64,
    /// Lower bound of the random end rotation.
    pub rotation_min_deg: f64,
    /// Upper bound of the random end rotation.
    pub rotation_max_deg: f64,
    /// Horizontal drift is drawn uniformly from `[-drift_px, drift_px)`.
    pub drift_px: f64,
    /// Brightness at the end of the fall.
    pub fall_brightness: f64,
    /// Overlay trigger offset, measured from the start of the fall.
    pub overlay_offset_ms: u64,
    /// Forward overlay fade-in.
    pub overlay_fade_ms: u64,
    /// Scroll start, measured from the start of the fall.
    pub scroll_delay_ms: u64,
    /// Document scroll duration.
    pub scroll_ms: u64,
    /// Wait after the reveal before release.
    pub release_after_reveal_ms: u64,
}

impl Default for LeafFallTiming {
    fn default() -> Self {
        Self {
            centering_ms: 400,
            fall_ms: 1600,
            fall_extra_px: 500.0,
            rotation_min_deg: 270.0,
            rotation_max_deg: 450.0,
            drift_px: 50.0,
            fall_brightness: 0.8,
            overlay_offset_ms: 400,
            overlay_fade_ms: 600,
            scroll_delay_ms: 1000,
            scroll_ms: 1500,
            release_after_reveal_ms: 800,
        }
    }
}

/// How the portal zoom finishes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortalFinish {
    /// The clone fades to transparent while it grows.
    #[default]
    FadeOut,
    /// The clone stays opaque and its content darkens, flashing before the reveal.
    Flash,
}

/// Immersive zoom-through.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PortalTiming {
    /// Move to the viewport center.
    pub centering_ms: u64,
    /// Zoom duration.
    pub zoom_ms: u64,
    /// Scale reached at the end of the zoom.
    pub zoom_scale: f64,
    /// Opacity and brightness at the end of the zoom.
    pub finish: PortalFinish,
    /// Brightness reached by the [`PortalFinish::Flash`] finish.
    pub flash_brightness: f64,
}

impl Default for PortalTiming {
    fn default() -> Self {
        Self {
            centering_ms: 600,
            zoom_ms: 1000,
            zoom_scale: 12.0,
            finish: PortalFinish::FadeOut,
            flash_brightness: 0.0,
        }
    }
}

/// Card stack wipe into the full-panel layout.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct WipeTiming {
    /// Slide off the right edge.
    pub exit_ms: u64,
    /// Tilt at the end of the exit.
    pub exit_rotation_deg: f64,
    /// Opacity at the end of the exit.
    pub exit_opacity: f64,
    /// Full-panel sweep.
    pub swipe_ms: u64,
    /// Background the full-panel clone is recolored to, matching the destination panel.
    pub panel_color: String,
}

impl Default for WipeTiming {
    fn default() -> Self {
        Self {
            exit_ms: 500,
            exit_rotation_deg: 8.0,
            exit_opacity: 0.2,
            swipe_ms: 1000,
            panel_color: "#f4f1ea".to_owned(),
        }
    }
}

/// Overlay-only commands.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OverlayTiming {
    /// Reverse overlay fade-in when leaving the visualizer.
    pub reverse_fade_ms: u64,
    /// Overlay fade-out.
    pub fade_out_ms: u64,
    /// Wait after returning home before the overlay is released.
    pub home_restore_ms: u64,
}

impl Default for OverlayTiming {
    fn default() -> Self {
        Self {
            reverse_fade_ms: 2000,
            fade_out_ms: 2000,
            home_restore_ms: 1200,
        }
    }
}

/// Fixed destination rect: horizontally centered, top edge at a fraction of viewport height.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FallbackRect {
    /// Rect width.
    pub width: f64,
    /// Rect height.
    pub height: f64,
    /// Top edge as a fraction of the viewport height.
    pub top_fraction: f64,
}

impl Default for FallbackRect {
    fn default() -> Self {
        Self {
            width: 420.0,
            height: 504.0,
            top_fraction: 0.6,
        }
    }
}

fn check_unit(name: &str, v: f64) -> ChoreoResult<()> {
    if !v.is_finite() || !(0.0..=1.0).contains(&v) {
        return Err(ChoreoError::config(format!("{name} must be in [0, 1], got {v}")));
    }
    Ok(())
}

fn check_finite(name: &str, v: f64) -> ChoreoResult<()> {
    if !v.is_finite() {
        return Err(ChoreoError::config(format!("{name} must be finite")));
    }
    Ok(())
}

impl TimingConfig {
    /// Reject values that cannot drive a transition.
    pub fn validate(&self) -> ChoreoResult<()> {
        check_finite("motion.start_rotation_deg", self.motion.start_rotation_deg)?;
        if !self.motion.ease.is_valid() {
            return Err(ChoreoError::config("motion.ease is not a valid curve"));
        }

        let leaf = &self.leaf;
        check_finite("leaf.fall_extra_px", leaf.fall_extra_px)?;
        check_finite("leaf.rotation_min_deg", leaf.rotation_min_deg)?;
        check_finite("leaf.rotation_max_deg", leaf.rotation_max_deg)?;
        if leaf.rotation_min_deg > leaf.rotation_max_deg {
            return Err(ChoreoError::config(
                "leaf.rotation_min_deg must be <= leaf.rotation_max_deg",
            ));
        }
        if !leaf.drift_px.is_finite() || leaf.drift_px < 0.0 {
            return Err(ChoreoError::config("leaf.drift_px must be finite and >= 0"));
        }
        check_unit("leaf.fall_brightness", leaf.fall_brightness)?;
        if leaf.overlay_offset_ms > leaf.fall_ms {
            return Err(ChoreoError::config(
                "leaf.overlay_offset_ms must fall within leaf.fall_ms",
            ));
        }
        if leaf.scroll_ms == 0 {
            return Err(ChoreoError::config("leaf.scroll_ms must be > 0"));
        }

        let portal = &self.portal;
        if !portal.zoom_scale.is_finite() || portal.zoom_scale <= 0.0 {
            return Err(ChoreoError::config("portal.zoom_scale must be finite and > 0"));
        }
        check_unit("portal.flash_brightness", portal.flash_brightness)?;

        check_finite("wipe.exit_rotation_deg", self.wipe.exit_rotation_deg)?;
        check_unit("wipe.exit_opacity", self.wipe.exit_opacity)?;
        if self.wipe.panel_color.trim().is_empty() {
            return Err(ChoreoError::config("wipe.panel_color must be non-empty"));
        }

        let fb = &self.fallback;
        if !(fb.width.is_finite() && fb.height.is_finite()) || fb.width < 0.0 || fb.height < 0.0 {
            return Err(ChoreoError::config(
                "fallback size must be finite and non-negative",
            ));
        }
        check_unit("fallback.top_fraction", fb.top_fraction)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/timing.rs"]
mod tests;
