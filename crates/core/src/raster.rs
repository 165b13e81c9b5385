//! RGB raster surface and the 2D drawing operations the canvas scenes use.
//!
//! Pixels are stored as unclamped [`Srgb`] values, row 0 at the top.
//! Geometry is in pixel units with `(0, 0)` at the top-left corner of the
//! top-left pixel. Coverage is decided at pixel centres: a pixel belongs
//! to a shape when `(x + 0.5, y + 0.5)` is inside it. Drawing outside the
//! surface is silently clipped.

use crate::color::Srgb;
use crate::error::SceneError;
use crate::frame::Viewport;
use glam::DVec2;
use std::ops::Range;

#[derive(Debug, Clone)]
pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<Srgb>,
}

/// Pixel indices whose centres fall in `[a, b)`, clipped to `0..limit`.
fn centre_span(a: f64, b: f64, limit: usize) -> Range<usize> {
    let lo = (a - 0.5).ceil().max(0.0);
    let hi = (b - 0.5).ceil().min(limit as f64);
    if hi > lo {
        lo as usize..hi as usize
    } else {
        0..0
    }
}

impl Raster {
    /// Allocates a raster filled with `fill`.
    ///
    /// Returns `SceneError::InvalidDimensions` for a zero dimension or
    /// when `width * height` overflows.
    pub fn new(width: usize, height: usize, fill: Srgb) -> Result<Self, SceneError> {
        if width == 0 || height == 0 {
            return Err(SceneError::InvalidDimensions);
        }
        let len = width
            .checked_mul(height)
            .ok_or(SceneError::InvalidDimensions)?;
        Ok(Self {
            width,
            height,
            pixels: vec![fill; len],
        })
    }

    pub fn for_viewport(viewport: Viewport, fill: Srgb) -> Result<Self, SceneError> {
        Self::new(viewport.width(), viewport.height(), fill)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }

    pub fn pixels(&self) -> &[Srgb] {
        &self.pixels
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Srgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }

    /// Overwrites one pixel; out-of-range writes are ignored.
    pub fn put(&mut self, x: usize, y: usize, color: Srgb) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
        }
    }

    /// Source-over blend of `color` at `alpha` onto one pixel. Alpha 1 or
    /// more overwrites exactly.
    pub fn blend(&mut self, x: usize, y: usize, color: Srgb, alpha: f64) {
        if x < self.width && y < self.height {
            let idx = y * self.width + x;
            self.pixels[idx] = if alpha >= 1.0 {
                color
            } else {
                self.pixels[idx].lerp(color, alpha)
            };
        }
    }

    pub fn fill(&mut self, color: Srgb) {
        self.pixels.iter_mut().for_each(|p| *p = color);
    }

    /// Fills the axis-aligned rectangle `[x0, x1) x [y0, y1)`.
    pub fn fill_rect(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, color: Srgb, alpha: f64) {
        let xs = centre_span(x0.min(x1), x0.max(x1), self.width);
        for y in centre_span(y0.min(y1), y0.max(y1), self.height) {
            for x in xs.clone() {
                self.blend(x, y, color, alpha);
            }
        }
    }

    /// Strokes a vertical segment of the given width centred on `x`, butt caps.
    pub fn stroke_vline(&mut self, x: f64, y0: f64, y1: f64, width: f64, color: Srgb, alpha: f64) {
        let half = width.max(1.0) * 0.5;
        self.fill_rect(x - half, y0, x + half, y1, color, alpha);
    }

    /// Strokes a horizontal segment of the given width centred on `y`, butt caps.
    pub fn stroke_hline(&mut self, y: f64, x0: f64, x1: f64, width: f64, color: Srgb, alpha: f64) {
        let half = width.max(1.0) * 0.5;
        self.fill_rect(x0, y - half, x1, y + half, color, alpha);
    }

    /// Fills the whole surface with a top-to-bottom gradient.
    ///
    /// `stops` are `(offset, color)` pairs with ascending offsets in [0, 1].
    /// Rows before the first stop or after the last take that stop's color.
    pub fn fill_vertical_gradient(&mut self, stops: &[(f64, Srgb)]) {
        let Some(&(first_at, first)) = stops.first() else {
            return;
        };
        for y in 0..self.height {
            let t = (y as f64 + 0.5) / self.height as f64;
            let mut color = first;
            if t > first_at {
                color = stops[stops.len() - 1].1;
                for pair in stops.windows(2) {
                    let (a_at, a) = pair[0];
                    let (b_at, b) = pair[1];
                    if t <= b_at {
                        let span = b_at - a_at;
                        let f = if span > 0.0 { (t - a_at) / span } else { 1.0 };
                        color = a.lerp(b, f);
                        break;
                    }
                }
            }
            let row = y * self.width;
            self.pixels[row..row + self.width]
                .iter_mut()
                .for_each(|p| *p = color);
        }
    }

    /// Fills a closed polygon with the even-odd rule.
    pub fn fill_polygon(&mut self, points: &[DVec2], color: Srgb, alpha: f64) {
        if points.len() < 3 {
            return;
        }
        let mut crossings = Vec::with_capacity(points.len());
        for y in 0..self.height {
            let yc = y as f64 + 0.5;
            crossings.clear();
            for (i, a) in points.iter().enumerate() {
                let b = points[(i + 1) % points.len()];
                if (a.y <= yc) != (b.y <= yc) {
                    crossings.push(a.x + (yc - a.y) * (b.x - a.x) / (b.y - a.y));
                }
            }
            crossings.sort_by(|l, r| l.total_cmp(r));
            for pair in crossings.chunks_exact(2) {
                for x in centre_span(pair[0], pair[1], self.width) {
                    self.blend(x, y, color, alpha);
                }
            }
        }
    }

    /// Approximates a gaussian blur of standard deviation `sigma` pixels
    /// with three successive box blurs. Edges are clamped.
    pub fn gaussian_blur(&mut self, sigma: f64) {
        if sigma.is_nan() || sigma <= 0.0 {
            return;
        }
        let mut scratch = self.pixels.clone();
        for radius in box_radii(sigma) {
            if radius == 0 {
                continue;
            }
            box_pass(&self.pixels, &mut scratch, self.width, self.height, radius, true);
            box_pass(&scratch, &mut self.pixels, self.width, self.height, radius, false);
        }
    }

    /// Quantized RGBA8 bytes, each channel clamped to [0, 1] first.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 4);
        for p in &self.pixels {
            let [r, g, b] = p.to_rgb8();
            out.extend_from_slice(&[r, g, b, 255]);
        }
        out
    }
}

/// Box radii for a three-pass gaussian approximation.
fn box_radii(sigma: f64) -> [usize; 3] {
    const PASSES: f64 = 3.0;
    let ideal = (12.0 * sigma * sigma / PASSES + 1.0).sqrt();
    let mut lower = ideal.floor() as i64;
    if lower % 2 == 0 {
        lower -= 1;
    }
    let lower = lower.max(1);
    let upper = lower + 2;
    let lf = lower as f64;
    let m = ((12.0 * sigma * sigma - PASSES * lf * lf - 4.0 * PASSES * lf - 3.0 * PASSES)
        / (-4.0 * lf - 4.0))
        .round() as i64;
    let mut radii = [0; 3];
    for (i, r) in radii.iter_mut().enumerate() {
        let size = if (i as i64) < m { lower } else { upper };
        *r = ((size - 1) / 2) as usize;
    }
    radii
}

fn box_pass(
    src: &[Srgb],
    dst: &mut [Srgb],
    width: usize,
    height: usize,
    radius: usize,
    horizontal: bool,
) {
    let r = radius as isize;
    let norm = 1.0 / (2 * radius + 1) as f64;
    for y in 0..height {
        for x in 0..width {
            let mut acc = Srgb::BLACK;
            for k in -r..=r {
                let (sx, sy) = if horizontal {
                    ((x as isize + k).clamp(0, width as isize - 1) as usize, y)
                } else {
                    (x, (y as isize + k).clamp(0, height as isize - 1) as usize)
                };
                let s = src[sy * width + sx];
                acc = Srgb::new(acc.r + s.r, acc.g + s.g, acc.b + s.b);
            }
            dst[y * width + x] = acc.scale(norm);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(r: &Raster) -> usize {
        r.pixels().iter().filter(|p| p.r > 0.5).count()
    }

    #[test]
    fn new_rejects_zero_dimensions() {
        assert!(matches!(
            Raster::new(0, 4, Srgb::BLACK),
            Err(SceneError::InvalidDimensions)
        ));
        assert!(Raster::new(usize::MAX, 2, Srgb::BLACK).is_err());
    }

    #[test]
    fn put_and_get_ignore_out_of_range() {
        let mut r = Raster::new(2, 2, Srgb::BLACK).unwrap();
        r.put(5, 5, Srgb::WHITE);
        r.put(1, 0, Srgb::WHITE);
        assert_eq!(r.get(1, 0), Some(Srgb::WHITE));
        assert_eq!(r.get(2, 0), None);
        assert_eq!(lit(&r), 1);
    }

    #[test]
    fn blend_half_alpha_averages() {
        let mut r = Raster::new(1, 1, Srgb::BLACK).unwrap();
        r.blend(0, 0, Srgb::WHITE, 0.5);
        assert!((r.get(0, 0).unwrap().g - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn fill_rect_covers_pixel_centres() {
        let mut r = Raster::new(10, 10, Srgb::BLACK).unwrap();
        r.fill_rect(2.0, 3.0, 5.0, 4.0, Srgb::WHITE, 1.0);
        assert_eq!(lit(&r), 3);
        assert_eq!(r.get(2, 3), Some(Srgb::WHITE));
        assert_eq!(r.get(5, 3), Some(Srgb::BLACK));
    }

    #[test]
    fn fill_rect_clips_to_surface() {
        let mut r = Raster::new(4, 4, Srgb::BLACK).unwrap();
        r.fill_rect(-10.0, -10.0, 100.0, 100.0, Srgb::WHITE, 1.0);
        assert_eq!(lit(&r), 16);
    }

    #[test]
    fn one_pixel_line_always_hits_one_column() {
        for x in [3.0, 3.2, 3.5, 3.99] {
            let mut r = Raster::new(8, 8, Srgb::BLACK).unwrap();
            r.stroke_vline(x, 8.0, 0.0, 1.0, Srgb::WHITE, 1.0);
            assert_eq!(lit(&r), 8, "x = {x}");
        }
    }

    #[test]
    fn hline_spans_requested_length() {
        let mut r = Raster::new(8, 8, Srgb::BLACK).unwrap();
        r.stroke_hline(4.0, 1.0, 6.0, 2.0, Srgb::WHITE, 1.0);
        assert_eq!(lit(&r), 10);
    }

    #[test]
    fn gradient_interpolates_between_stops() {
        let mut r = Raster::new(1, 4, Srgb::BLACK).unwrap();
        r.fill_vertical_gradient(&[(0.0, Srgb::BLACK), (1.0, Srgb::WHITE)]);
        let top = r.get(0, 0).unwrap().r;
        let bottom = r.get(0, 3).unwrap().r;
        assert!((top - 0.125).abs() < 1e-12);
        assert!((bottom - 0.875).abs() < 1e-12);
    }

    #[test]
    fn gradient_with_no_stops_is_noop() {
        let mut r = Raster::new(2, 2, Srgb::WHITE).unwrap();
        r.fill_vertical_gradient(&[]);
        assert_eq!(lit(&r), 4);
    }

    #[test]
    fn polygon_fills_triangle_area() {
        let mut r = Raster::new(10, 10, Srgb::BLACK).unwrap();
        let tri = [
            DVec2::new(0.0, 0.0),
            DVec2::new(10.0, 0.0),
            DVec2::new(0.0, 10.0),
        ];
        r.fill_polygon(&tri, Srgb::WHITE, 1.0);
        let n = lit(&r);
        assert!((40..=60).contains(&n), "triangle covered {n} pixels");
        assert_eq!(r.get(0, 0), Some(Srgb::WHITE));
        assert_eq!(r.get(9, 9), Some(Srgb::BLACK));
    }

    #[test]
    fn box_radii_for_three_pixel_sigma() {
        assert_eq!(box_radii(3.0), [2, 2, 3]);
    }

    #[test]
    fn blur_preserves_uniform_surface_and_spreads_a_point() {
        let mut flat = Raster::new(6, 6, Srgb::new(0.4, 0.4, 0.4)).unwrap();
        flat.gaussian_blur(3.0);
        assert!(flat.pixels().iter().all(|p| (p.r - 0.4).abs() < 1e-12));

        let mut dot = Raster::new(21, 21, Srgb::BLACK).unwrap();
        dot.put(10, 10, Srgb::WHITE);
        dot.gaussian_blur(2.0);
        let centre = dot.get(10, 10).unwrap().r;
        let near = dot.get(11, 10).unwrap().r;
        assert!(centre < 1.0 && near > 0.0 && centre >= near);
    }

    #[test]
    fn to_rgba8_clamps_and_is_opaque() {
        let r = Raster::new(1, 1, Srgb::new(1.2, -0.1, 0.5)).unwrap();
        assert_eq!(r.to_rgba8(), vec![255, 0, 128, 255]);
    }
}
