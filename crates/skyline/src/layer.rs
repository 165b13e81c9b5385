//! Parallax layers and the 7-tap vertical blur.
//!
//! The depth-layered scenes evaluate the same column function three times
//! (near, mid, far) with different column counts, speeds and seeds, then
//! sum the results with fixed weights.

use glam::DVec2;

/// Vertical blur taps as `(offset in blur radii, weight)`.
///
/// This is a cheap stand-in for a gaussian: seven samples, widening
/// towards the outside. The weights sum to 1.58, not 1, so a blurred
/// layer is brighter than the raw one. The scene weights and exposure are
/// tuned against that gain.
pub const BLUR_TAPS: [(f64, f64); 7] = [
    (-4.0, 0.12),
    (-2.0, 0.22),
    (-1.0, 0.28),
    (0.0, 0.34),
    (1.0, 0.28),
    (2.0, 0.22),
    (4.0, 0.12),
];

/// Sum of the [`BLUR_TAPS`] weights. The taps are not normalized; every
/// blurred layer carries this gain.
pub const BLUR_GAIN: f64 = 1.58;

/// Samples `layer` at the seven [`BLUR_TAPS`] along y, `radius` uv units apart.
pub fn vertical_blur(uv: DVec2, radius: f64, layer: impl Fn(DVec2) -> f64) -> f64 {
    BLUR_TAPS
        .iter()
        .map(|&(offset, weight)| weight * layer(DVec2::new(uv.x, uv.y + offset * radius)))
        .sum()
}

/// One depth layer of columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParallaxLayer {
    cols: f64,
    pub speed: f64,
    pub seed: f64,
}

impl ParallaxLayer {
    /// Column counts below one (or NaN) are raised to one.
    pub fn new(cols: f64, speed: f64, seed: f64) -> Self {
        let cols = if cols.is_nan() { 1.0 } else { cols.max(1.0) };
        Self { cols, speed, seed }
    }

    pub fn cols(&self) -> f64 {
        self.cols
    }

    /// Column index at `uv` and the fractional position across it.
    pub fn column(&self, uv: DVec2) -> (f64, f64) {
        let x = uv.x * self.cols;
        let col = x.floor();
        (col, x - col)
    }
}

/// `sum(weight * value)` over the layers.
pub fn weighted(layers: &[(f64, f64)]) -> f64 {
    layers.iter().map(|(w, v)| w * v).sum()
}
