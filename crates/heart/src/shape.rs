//! The parametric heart curve and its filled triangle mesh.
//!
//! The outline is the classic `x = 16 sin³t`,
//! `y = 13 cos t - 5 cos 2t - 2 cos 3t - cos 4t`, scaled down and centred
//! on its bounding box. Texture coordinates stay in the uncentred curve
//! space, so they are not confined to [0, 1]: x spans about ±0.96 and y
//! about -1.02..0.72. The outline is star-shaped about the centre, so
//! the interior is filled with concentric rings shrinking towards it:
//! a fan in the middle, quads between rings. The interior vertices give
//! the ripple and pointer displacement something to move.

use glam::DVec2;
use std::f64::consts::TAU;

/// Outline samples per revolution.
pub const OUTLINE_STEPS: usize = 400;
/// Curve units to world units.
pub const OUTLINE_SCALE: f64 = 0.06;
/// Concentric rings between the centre and the outline.
pub const RINGS: usize = 12;

/// Unscaled curve point at parameter `t`.
pub fn heart_point(t: f64) -> DVec2 {
    let x = 16.0 * t.sin().powi(3);
    let y = 13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos();
    DVec2::new(x, y)
}

/// `steps` scaled outline points, one revolution without the closing
/// duplicate. At least three points are produced.
pub fn outline(steps: usize) -> Vec<DVec2> {
    let steps = steps.max(3);
    (0..steps)
        .map(|i| heart_point(i as f64 / steps as f64 * TAU) * OUTLINE_SCALE)
        .collect()
}

/// Axis-aligned bounds of a point set as `(min, max)`.
pub fn bounds(points: &[DVec2]) -> (DVec2, DVec2) {
    points.iter().fold(
        (DVec2::splat(f64::INFINITY), DVec2::splat(f64::NEG_INFINITY)),
        |(lo, hi), &p| (lo.min(p), hi.max(p)),
    )
}

/// Mesh vertex in the heart's plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshVertex {
    /// Position relative to the bounding-box centre.
    pub pos: DVec2,
    /// Scaled curve coordinate before centring.
    pub uv: DVec2,
}

#[derive(Debug, Clone)]
pub struct HeartMesh {
    vertices: Vec<MeshVertex>,
    triangles: Vec<[usize; 3]>,
    half_extent: DVec2,
}

impl HeartMesh {
    pub fn build(steps: usize, rings: usize) -> Self {
        let rings = rings.max(1);
        let mut ring = outline(steps);
        let n = ring.len();
        let (min, max) = bounds(&ring);
        let centre = (min + max) * 0.5;
        let size = max - min;
        for p in &mut ring {
            *p -= centre;
        }
        let uv_of = |p: DVec2| p + centre;

        let mut vertices = Vec::with_capacity(1 + rings * n);
        vertices.push(MeshVertex {
            pos: DVec2::ZERO,
            uv: uv_of(DVec2::ZERO),
        });
        for r in 1..=rings {
            let k = r as f64 / rings as f64;
            vertices.extend(ring.iter().map(|&p| MeshVertex {
                pos: p * k,
                uv: uv_of(p * k),
            }));
        }

        let at = |r: usize, i: usize| 1 + (r - 1) * n + i % n;
        let mut triangles = Vec::with_capacity(n * (2 * rings - 1));
        for i in 0..n {
            triangles.push([0, at(1, i), at(1, i + 1)]);
        }
        for r in 1..rings {
            for i in 0..n {
                let (a, b) = (at(r, i), at(r, i + 1));
                let (c, d) = (at(r + 1, i), at(r + 1, i + 1));
                triangles.push([a, c, d]);
                triangles.push([a, d, b]);
            }
        }

        Self {
            vertices,
            triangles,
            half_extent: size * 0.5,
        }
    }

    pub fn vertices(&self) -> &[MeshVertex] {
        &self.vertices
    }

    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    /// Half the bounding-box size; the mesh spans `-half..=half`.
    pub fn half_extent(&self) -> DVec2 {
        self.half_extent
    }
}

impl Default for HeartMesh {
    fn default() -> Self {
        Self::build(OUTLINE_STEPS, RINGS)
    }
}
