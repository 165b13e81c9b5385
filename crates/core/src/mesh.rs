//! Minimal perspective camera and depth-tested triangle rasterizer for
//! the mesh scenes.
//!
//! Attributes are interpolated with screen-space (affine) barycentrics.
//! The meshes drawn here are small and nearly camera-facing, so the
//! difference from perspective-correct interpolation is not visible.

use crate::color::Srgb;
use crate::error::SceneError;
use crate::frame::Viewport;
use crate::raster::Raster;
use glam::{DMat4, DVec2, DVec3};

/// Right-handed perspective camera looking at a target, +Y up.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    eye: DVec3,
    view_proj: DMat4,
    viewport: Viewport,
}

impl Camera {
    /// `fov_y_deg` is the vertical field of view in degrees.
    pub fn perspective(
        fov_y_deg: f64,
        viewport: Viewport,
        near: f64,
        far: f64,
        eye: DVec3,
        target: DVec3,
    ) -> Self {
        let proj = DMat4::perspective_rh(fov_y_deg.to_radians(), viewport.aspect(), near, far);
        let view = DMat4::look_at_rh(eye, target, DVec3::Y);
        Self {
            eye,
            view_proj: proj * view,
            viewport,
        }
    }

    pub fn eye(&self) -> DVec3 {
        self.eye
    }

    /// Projects a world point to `(pixel x, pixel y, depth)`.
    ///
    /// Pixel y grows downward. Returns `None` for points at or behind the
    /// camera plane.
    pub fn project(&self, world: DVec3) -> Option<DVec3> {
        let clip = self.view_proj * world.extend(1.0);
        if clip.w <= 1e-9 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(DVec3::new(
            (ndc.x * 0.5 + 0.5) * self.viewport.width() as f64,
            (0.5 - ndc.y * 0.5) * self.viewport.height() as f64,
            ndc.z,
        ))
    }
}

/// Nearest depth seen so far per pixel.
#[derive(Debug, Clone)]
pub struct DepthBuffer {
    width: usize,
    height: usize,
    depth: Vec<f64>,
}

impl DepthBuffer {
    pub fn new(width: usize, height: usize) -> Result<Self, SceneError> {
        if width == 0 || height == 0 {
            return Err(SceneError::InvalidDimensions);
        }
        let len = width
            .checked_mul(height)
            .ok_or(SceneError::InvalidDimensions)?;
        Ok(Self {
            width,
            height,
            depth: vec![f64::INFINITY; len],
        })
    }

    pub fn for_raster(raster: &Raster) -> Result<Self, SceneError> {
        Self::new(raster.width(), raster.height())
    }

    /// Records `z` at `(x, y)` if it is nearer than what is stored.
    fn test_and_set(&mut self, x: usize, y: usize, z: f64) -> bool {
        let idx = y * self.width + x;
        if z < self.depth[idx] {
            self.depth[idx] = z;
            true
        } else {
            false
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Option<f64> {
        (x < self.width && y < self.height).then(|| self.depth[y * self.width + x])
    }
}

/// A projected vertex: screen position plus a 2D attribute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenVertex {
    pub pos: DVec3,
    pub uv: DVec2,
}

fn edge(a: DVec3, b: DVec3, px: f64, py: f64) -> f64 {
    (b.x - a.x) * (py - a.y) - (b.y - a.y) * (px - a.x)
}

/// Fills a triangle of either winding, depth-tested, shading each covered
/// pixel centre from the interpolated `uv`. Returns the number of pixels
/// written.
pub fn rasterize_triangle(
    raster: &mut Raster,
    depth: &mut DepthBuffer,
    tri: [ScreenVertex; 3],
    mut shade: impl FnMut(DVec2) -> Srgb,
) -> usize {
    let [a, b, c] = tri;
    let area = edge(a.pos, b.pos, c.pos.x, c.pos.y);
    if area == 0.0 || !area.is_finite() {
        return 0;
    }
    let w = raster.width().min(depth.width);
    let h = raster.height().min(depth.height);
    let min_x = a.pos.x.min(b.pos.x).min(c.pos.x).floor().max(0.0) as usize;
    let min_y = a.pos.y.min(b.pos.y).min(c.pos.y).floor().max(0.0) as usize;
    let max_x = (a.pos.x.max(b.pos.x).max(c.pos.x).ceil().max(0.0) as usize).min(w);
    let max_y = (a.pos.y.max(b.pos.y).max(c.pos.y).ceil().max(0.0) as usize).min(h);

    let mut written = 0;
    for y in min_y..max_y {
        let py = y as f64 + 0.5;
        for x in min_x..max_x {
            let px = x as f64 + 0.5;
            let w0 = edge(b.pos, c.pos, px, py) / area;
            let w1 = edge(c.pos, a.pos, px, py) / area;
            let w2 = edge(a.pos, b.pos, px, py) / area;
            if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                continue;
            }
            let z = w0 * a.pos.z + w1 * b.pos.z + w2 * c.pos.z;
            if depth.test_and_set(x, y, z) {
                let uv = a.uv * w0 + b.uv * w1 + c.uv * w2;
                raster.put(x, y, shade(uv));
                written += 1;
            }
        }
    }
    written
}
