//! Cubic-bezier timing curves and looping keyframe tracks.

/// A cubic bezier timing curve through `(0, 0)`, `(x1, y1)`, `(x2, y2)`,
/// `(1, 1)`. The control x values are clamped to [0, 1] so the curve is a
/// function of x.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
}

impl CubicBezier {
    pub const EASE_IN_OUT: CubicBezier = CubicBezier {
        x1: 0.42,
        y1: 0.0,
        x2: 0.58,
        y2: 1.0,
    };

    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            x1: x1.clamp(0.0, 1.0),
            y1,
            x2: x2.clamp(0.0, 1.0),
            y2,
        }
    }

    fn axis(a: f64, b: f64, s: f64) -> f64 {
        let r = 1.0 - s;
        3.0 * r * r * s * a + 3.0 * r * s * s * b + s * s * s
    }

    fn axis_slope(a: f64, b: f64, s: f64) -> f64 {
        let r = 1.0 - s;
        3.0 * r * r * a + 6.0 * r * s * (b - a) + 3.0 * s * s * (1.0 - b)
    }

    /// Progress at time fraction `x` (clamped to [0, 1]).
    pub fn at(&self, x: f64) -> f64 {
        let x = if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) };
        let mut s = x;
        for _ in 0..8 {
            let err = Self::axis(self.x1, self.x2, s) - x;
            if err.abs() < 1e-12 {
                return Self::axis(self.y1, self.y2, s);
            }
            let slope = Self::axis_slope(self.x1, self.x2, s);
            if slope.abs() < 1e-9 {
                break;
            }
            s = (s - err / slope).clamp(0.0, 1.0);
        }
        // Newton stalled; bisect
        let (mut lo, mut hi) = (0.0, 1.0);
        s = x;
        for _ in 0..60 {
            let v = Self::axis(self.x1, self.x2, s);
            if (v - x).abs() < 1e-12 {
                break;
            }
            if v < x {
                lo = s;
            } else {
                hi = s;
            }
            s = 0.5 * (lo + hi);
        }
        Self::axis(self.y1, self.y2, s)
    }
}

/// An infinitely repeating keyframe track: `from` at 0%, `to` at 50%,
/// back to `from` at 100%, each half eased with `curve`.
///
/// Before `delay` has elapsed the track holds the untransformed value 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breathe {
    pub from: f64,
    pub to: f64,
    pub duration: f64,
    pub delay: f64,
    pub curve: CubicBezier,
}

impl Breathe {
    pub fn value(&self, t: f64) -> f64 {
        if t < self.delay || self.duration <= 0.0 {
            return 1.0;
        }
        let cycle = (t - self.delay) / self.duration;
        let p = cycle - cycle.floor();
        if p < 0.5 {
            self.from + (self.to - self.from) * self.curve.at(p * 2.0)
        } else {
            self.to + (self.from - self.to) * self.curve.at((p - 0.5) * 2.0)
        }
    }
}
