//! Axis-aligned boxes, flat quads and their Lambert shading.

use citylights_core::mesh::{rasterize_triangle, Camera, DepthBuffer, ScreenVertex};
use citylights_core::{Raster, Srgb};
use glam::{DVec2, DVec3};

/// Direction the key light shines from.
pub const LIGHT_POSITION: DVec3 = DVec3::new(2.0, 5.0, 4.0);

/// A planar quad with its outward normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    /// Corners in loop order.
    pub corners: [DVec3; 4],
    pub normal: DVec3,
}

impl Face {
    /// Whether the outward side of the face is visible from `eye`.
    pub fn faces(&self, eye: DVec3) -> bool {
        self.normal.dot(eye - self.corners[0]) > 0.0
    }
}

/// The six faces of a box centred at `centre` with edge lengths `size`,
/// ordered +X, -X, +Y, -Y, +Z, -Z.
pub fn box_faces(centre: DVec3, size: DVec3) -> [Face; 6] {
    let half = size * 0.5;
    let axes = [DVec3::X, DVec3::Y, DVec3::Z];
    std::array::from_fn(|k| {
        let axis = k / 2;
        let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
        let normal = axes[axis] * sign;
        let u = axes[(axis + 1) % 3] * half;
        let v = axes[(axis + 2) % 3] * half;
        let c = centre + normal * half;
        Face {
            corners: [c - u - v, c + u - v, c + u + v, c - u + v],
            normal,
        }
    })
}

/// Horizontal quad at y = 0 spanning `width` along x and `depth` along z.
pub fn floor_face(width: f64, depth: f64) -> Face {
    let (hx, hz) = (width * 0.5, depth * 0.5);
    Face {
        corners: [
            DVec3::new(-hx, 0.0, -hz),
            DVec3::new(hx, 0.0, -hz),
            DVec3::new(hx, 0.0, hz),
            DVec3::new(-hx, 0.0, hz),
        ],
        normal: DVec3::Y,
    }
}

/// Diffuse shading under a white ambient and a white directional light.
pub fn lambert(albedo: Srgb, normal: DVec3, ambient: f64, directional: f64) -> Srgb {
    let l = LIGHT_POSITION.normalize();
    albedo.scale(ambient + directional * normal.dot(l).max(0.0))
}

/// Rasterizes `face` flat-shaded in `color`. Returns pixels written; faces
/// with a corner behind the camera are skipped.
pub fn draw_face(
    raster: &mut Raster,
    depth: &mut DepthBuffer,
    camera: &Camera,
    face: &Face,
    color: Srgb,
) -> usize {
    let mut screen = [ScreenVertex {
        pos: DVec3::ZERO,
        uv: DVec2::ZERO,
    }; 4];
    for (slot, corner) in screen.iter_mut().zip(face.corners) {
        let Some(pos) = camera.project(corner) else {
            return 0;
        };
        slot.pos = pos;
    }
    let [a, b, c, d] = screen;
    rasterize_triangle(raster, depth, [a, b, c], |_| color)
        + rasterize_triangle(raster, depth, [a, c, d], |_| color)
}
