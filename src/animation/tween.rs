use crate::{
    animation::ease::Ease,
    foundation::core::{Millis, ViewRect},
};

/// Interpolation contract for tweened value types.
pub trait Lerp: Sized {
    /// Interpolate from `a` to `b` with normalized factor `t` in `[0, 1]`.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for ViewRect {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            left: f64::lerp(&a.left, &b.left, t),
            top: f64::lerp(&a.top, &b.top, t),
            width: f64::lerp(&a.width, &b.width, t),
            height: f64::lerp(&a.height, &b.height, t),
        }
    }
}

/// Every animated property of the floating clone.
///
/// `scale` is applied about the rect center and does not change `rect`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ClonePose {
    /// Layout box in viewport coordinates.
    pub rect: ViewRect,
    /// Clockwise rotation in degrees.
    pub rotation_deg: f64,
    /// Uniform scale about the rect center.
    pub scale: f64,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Brightness filter multiplier (1 = unfiltered, 0 = black).
    pub brightness: f64,
}

impl ClonePose {
    /// Unrotated, unscaled, fully visible pose at `rect`.
    pub fn at(rect: ViewRect) -> Self {
        Self {
            rect,
            rotation_deg: 0.0,
            scale: 1.0,
            opacity: 1.0,
            brightness: 1.0,
        }
    }
}

impl Lerp for ClonePose {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            rect: ViewRect::lerp(&a.rect, &b.rect, t),
            rotation_deg: f64::lerp(&a.rotation_deg, &b.rotation_deg, t),
            scale: f64::lerp(&a.scale, &b.scale, t),
            opacity: f64::lerp(&a.opacity, &b.opacity, t),
            brightness: f64::lerp(&a.brightness, &b.brightness, t),
        }
    }
}

/// One eased segment from `from` to `to`, anchored on the virtual clock.
#[derive(Clone, Debug, PartialEq)]
pub struct Tween<T> {
    /// Value at `start` and before.
    pub from: T,
    /// Value at `start + duration_ms` and after.
    pub to: T,
    /// Clock instant the segment begins.
    pub start: Millis,
    /// Segment length; zero means an instantaneous jump to `to`.
    pub duration_ms: u64,
    /// Easing applied to normalized progress.
    pub ease: Ease,
}

impl<T> Tween<T>
where
    T: Lerp + Clone,
{
    /// A segment that holds `value` forever.
    pub fn hold(value: T, start: Millis) -> Self {
        Self {
            from: value.clone(),
            to: value,
            start,
            duration_ms: 0,
            ease: Ease::Linear,
        }
    }

    /// Clock instant at which the segment reaches `to`.
    pub fn end(&self) -> Millis {
        self.start.after(self.duration_ms)
    }

    /// Linear (un-eased) progress at `now`, clamped to `[0, 1]`.
    pub fn progress(&self, now: Millis) -> f64 {
        if self.duration_ms == 0 {
            return if now >= self.start { 1.0 } else { 0.0 };
        }
        (now.since(self.start) as f64 / self.duration_ms as f64).clamp(0.0, 1.0)
    }

    /// Sample the eased value at `now`.
    pub fn sample(&self, now: Millis) -> T {
        let p = self.progress(now);
        if p <= 0.0 {
            return self.from.clone();
        }
        if p >= 1.0 {
            return self.to.clone();
        }
        T::lerp(&self.from, &self.to, self.ease.apply(p))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/tween.rs"]
mod tests;
