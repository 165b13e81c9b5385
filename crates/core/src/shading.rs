//! Scalar shading primitives with GLSL semantics.

/// Linear interpolation, unclamped.
pub fn mix(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// 0.0 when `x < edge`, otherwise 1.0.
pub fn step(edge: f64, x: f64) -> f64 {
    if x < edge {
        0.0
    } else {
        1.0
    }
}

/// Hermite interpolation between two edges.
///
/// Reversed edges (`e0 > e1`) give a falling ramp, as the vignettes rely
/// on. Equal edges degrade to [`step`].
pub fn smoothstep(e0: f64, e1: f64, x: f64) -> f64 {
    if e0 == e1 {
        return step(e0, x);
    }
    let t = clamp01((x - e0) / (e1 - e0));
    t * t * (3.0 - 2.0 * t)
}

/// Clamps to [0, 1]; NaN becomes 0.
pub fn clamp01(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}
