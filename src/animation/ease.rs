/// Easing functions used to map normalized stage progress.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    /// Linear interpolation.
    Linear,
    /// Quadratic ease-in.
    InQuad,
    /// Quadratic ease-out.
    OutQuad,
    /// Quadratic ease-in/out.
    InOutQuad,
    /// Cubic ease-in.
    InCubic,
    /// Cubic ease-out.
    OutCubic,
    /// Cubic ease-in/out.
    InOutCubic,
    /// Fast start, long soft landing: `cubic-bezier(.2, .8, .2, 1)`.
    Standard,
    /// Material-style acceleration curve used by the leaf fall: `cubic-bezier(.4, 0, .2, 1)`.
    Leaf,
    /// Arbitrary CSS-style cubic bezier with control points `(x1, y1)` and `(x2, y2)`.
    ///
    /// `x1` and `x2` must lie in `[0, 1]` for the curve to be a function of time.
    Bezier {
        /// First control point x.
        x1: f64,
        /// First control point y.
        y1: f64,
        /// Second control point x.
        x2: f64,
        /// Second control point y.
        y2: f64,
    },
}

impl Ease {
    /// Apply this easing function to normalized progress `t` in `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Self::Standard => cubic_bezier(0.2, 0.8, 0.2, 1.0, t),
            Self::Leaf => cubic_bezier(0.4, 0.0, 0.2, 1.0, t),
            Self::Bezier { x1, y1, x2, y2 } => cubic_bezier(x1, y1, x2, y2, t),
        }
    }

    /// Return `true` when the curve parameters describe a valid timing function.
    pub fn is_valid(self) -> bool {
        match self {
            Self::Bezier { x1, y1, x2, y2 } => {
                [x1, y1, x2, y2].iter().all(|v| v.is_finite())
                    && (0.0..=1.0).contains(&x1)
                    && (0.0..=1.0).contains(&x2)
            }
            _ => true,
        }
    }
}

// One-dimensional bezier with endpoints 0 and 1.
fn bezier_1d(p1: f64, p2: f64, s: f64) -> f64 {
    let u = 1.0 - s;
    3.0 * u * u * s * p1 + 3.0 * u * s * s * p2 + s * s * s
}

fn bezier_1d_slope(p1: f64, p2: f64, s: f64) -> f64 {
    let u = 1.0 - s;
    3.0 * u * u * p1 + 6.0 * u * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, t: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    // Newton first, bisection when the slope flattens out.
    let mut s = t;
    for _ in 0..8 {
        let err = bezier_1d(x1, x2, s) - t;
        if err.abs() < 1e-7 {
            return bezier_1d(y1, y2, s);
        }
        let d = bezier_1d_slope(x1, x2, s);
        if d.abs() < 1e-6 {
            break;
        }
        s = (s - err / d).clamp(0.0, 1.0);
    }

    let (mut lo, mut hi) = (0.0, 1.0);
    s = t;
    for _ in 0..64 {
        let x = bezier_1d(x1, x2, s);
        if (x - t).abs() < 1e-7 {
            break;
        }
        if x < t {
            lo = s;
        } else {
            hi = s;
        }
        s = 0.5 * (lo + hi);
    }
    bezier_1d(y1, y2, s)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
