//! Per-frame context handed to every layer and compositing function.

use glam::DVec2;

/// Pixel dimensions of a render surface, never smaller than 1x1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Viewport {
    width: usize,
    height: usize,
}

impl Viewport {
    /// Zero dimensions are raised to 1.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

/// Immutable per-frame input: simulation time in seconds and the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    pub time: f64,
    pub viewport: Viewport,
}

impl FrameContext {
    pub fn new(time: f64, viewport: Viewport) -> Self {
        Self { time, viewport }
    }

    /// Viewport size as a vector.
    pub fn resolution(&self) -> DVec2 {
        DVec2::new(self.viewport.width as f64, self.viewport.height as f64)
    }

    /// Normalized coordinate of the centre of pixel `(px, py)`.
    ///
    /// `uv.y` grows upward: raster row 0 maps to the top of [0, 1].
    pub fn uv(&self, px: usize, py: usize) -> DVec2 {
        let res = self.resolution();
        DVec2::new(
            (px as f64 + 0.5) / res.x,
            1.0 - (py as f64 + 0.5) / res.y,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_clamps_to_one_by_one() {
        let v = Viewport::new(0, 0);
        assert_eq!((v.width(), v.height()), (1, 1));
        let v = Viewport::new(320, 0);
        assert_eq!((v.width(), v.height()), (320, 1));
    }

    #[test]
    fn aspect_ratio() {
        assert!((Viewport::new(200, 100).aspect() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn uv_samples_pixel_centres_with_y_up() {
        let ctx = FrameContext::new(0.0, Viewport::new(4, 2));
        let top_left = ctx.uv(0, 0);
        assert!((top_left.x - 0.125).abs() < f64::EPSILON);
        assert!((top_left.y - 0.75).abs() < f64::EPSILON);
        let bottom_right = ctx.uv(3, 1);
        assert!((bottom_right.x - 0.875).abs() < f64::EPSILON);
        assert!((bottom_right.y - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn uv_stays_strictly_inside_unit_square() {
        let ctx = FrameContext::new(0.0, Viewport::new(7, 5));
        for py in 0..5 {
            for px in 0..7 {
                let uv = ctx.uv(px, py);
                assert!(uv.x > 0.0 && uv.x < 1.0 && uv.y > 0.0 && uv.y < 1.0);
            }
        }
    }
}
