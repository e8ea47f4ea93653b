use crate::foundation::error::{ChoreoError, ChoreoResult};

pub use kurbo::{Point, Rect, Size, Vec2};

/// Virtual-clock instant in milliseconds since the director was created.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct Millis(pub u64);

impl Millis {
    /// The instant `delay_ms` after `self`, saturating at `u64::MAX`.
    pub fn after(self, delay_ms: u64) -> Self {
        Self(self.0.saturating_add(delay_ms))
    }

    /// Milliseconds elapsed from `earlier` to `self` (zero when `earlier` is later).
    pub fn since(self, earlier: Millis) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// Value as `f64` for easing math.
    pub fn as_f64(self) -> f64 {
        self.0 as f64
    }
}

/// Monotonic lifecycle stamp. Work captured under an older stamp is inert.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct Generation(pub u64);

impl Generation {
    /// The stamp following this one.
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Visible viewport dimensions in logical units.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Width in logical units.
    pub width: f64,
    /// Height in logical units.
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1440.0,
            height: 900.0,
        }
    }
}

impl Viewport {
    /// Create a validated viewport with finite, positive dimensions.
    pub fn new(width: f64, height: f64) -> ChoreoResult<Self> {
        let vp = Self { width, height };
        vp.validate()?;
        Ok(vp)
    }

    /// Check that both dimensions are finite and positive.
    pub fn validate(&self) -> ChoreoResult<()> {
        if !(self.width.is_finite() && self.height.is_finite()) {
            return Err(ChoreoError::validation("viewport dimensions must be finite"));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(ChoreoError::validation("viewport dimensions must be > 0"));
        }
        Ok(())
    }

    /// Center point of the viewport.
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Rect covering the whole viewport.
    pub fn full_rect(&self) -> ViewRect {
        ViewRect::new(0.0, 0.0, self.width, self.height)
    }

    /// Rect of the given size, horizontally centered, with its top edge at `top_fraction` of the
    /// viewport height.
    pub fn lower_middle_rect(&self, width: f64, height: f64, top_fraction: f64) -> ViewRect {
        ViewRect::new(
            self.width / 2.0 - width / 2.0,
            self.height * top_fraction,
            width,
            height,
        )
    }
}

/// Axis-aligned box in viewport coordinates, as measured from a laid-out element.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ViewRect {
    /// Left edge.
    pub left: f64,
    /// Top edge.
    pub top: f64,
    /// Width (non-negative).
    pub width: f64,
    /// Height (non-negative).
    pub height: f64,
}

impl ViewRect {
    /// Construct from edges and size.
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Convert from a kurbo rect (`x0,y0` to `x1,y1`).
    pub fn from_kurbo(r: Rect) -> Self {
        let r = r.abs();
        Self::new(r.x0, r.y0, r.width(), r.height())
    }

    /// Convert into a kurbo rect.
    pub fn to_kurbo(self) -> Rect {
        Rect::from_origin_size((self.left, self.top), (self.width, self.height))
    }

    /// Size of the box.
    pub fn size(self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Center point of the box.
    pub fn center(self) -> Point {
        self.to_kurbo().center()
    }

    /// Same size, re-centered on `center`.
    pub fn centered_at(self, center: Point) -> Self {
        Self {
            left: center.x - self.width / 2.0,
            top: center.y - self.height / 2.0,
            ..self
        }
    }

    /// Same size, translated by `delta`.
    pub fn translated(self, delta: Vec2) -> Self {
        Self {
            left: self.left + delta.x,
            top: self.top + delta.y,
            ..self
        }
    }

    /// Same size, moved so the left edge sits at `left`.
    pub fn with_left(self, left: f64) -> Self {
        Self { left, ..self }
    }

    /// Return `true` when every field is finite and the size is non-negative.
    pub fn is_well_formed(self) -> bool {
        [self.left, self.top, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.width >= 0.0
            && self.height >= 0.0
    }

    /// Check [`ViewRect::is_well_formed`].
    pub fn validate(self) -> ChoreoResult<()> {
        if !self.is_well_formed() {
            return Err(ChoreoError::validation(format!(
                "rect must be finite with non-negative size, got {self:?}"
            )));
        }
        Ok(())
    }

    /// Component-wise approximate equality, used by geometry assertions.
    pub fn approx_eq(self, other: ViewRect, eps: f64) -> bool {
        (self.left - other.left).abs() <= eps
            && (self.top - other.top).abs() <= eps
            && (self.width - other.width).abs() <= eps
            && (self.height - other.height).abs() <= eps
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
