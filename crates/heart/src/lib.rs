#![deny(unsafe_code)]
//! Pulsing heart: a flat parametric heart mesh seen through a perspective
//! camera.
//!
//! Each frame the mesh is scaled by a heartbeat, rippled along z,
//! bulged towards the viewer under the pointer and gently rocked, then
//! rasterized with a per-pixel gradient, vignette and hover glow.

pub mod shape;

use citylights_core::hash::fract;
use citylights_core::mesh::{rasterize_triangle, Camera, DepthBuffer, ScreenVertex};
use citylights_core::params::{param_color, param_f64, schema_color, schema_number};
use citylights_core::scene::check_raster;
use citylights_core::shading::{mix, smoothstep};
use citylights_core::{FrameContext, Raster, Scene, SceneError, Srgb};
use glam::{DMat3, DVec2, DVec3};
use serde_json::{json, Value};
use shape::{HeartMesh, MeshVertex};

/// Flat backdrop behind the heart.
pub const BACKGROUND: Srgb = Srgb::new(10.0 / 255.0, 10.0 / 255.0, 10.0 / 255.0);

const FOV_Y_DEG: f64 = 45.0;
const NEAR: f64 = 0.1;
const FAR: f64 = 100.0;
const EYE: DVec3 = DVec3::new(0.0, 0.0, 6.0);

/// Peak extra scale at the top of a beat.
const BEAT_SCALE: f64 = 0.08;
const HOVER_LIFT: f64 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeartParams {
    pub color_a: Srgb,
    pub color_b: Srgb,
    pub heartbeat_speed: f64,
    pub ripple_strength: f64,
    pub grain_amount: f64,
    /// Initial pointer position in heart uv space, y up.
    pub pointer: DVec2,
}

impl Default for HeartParams {
    fn default() -> Self {
        Self {
            color_a: Srgb::from_u32(0xff2d55),
            color_b: Srgb::from_u32(0xff8a00),
            heartbeat_speed: 2.2,
            ripple_strength: 0.15,
            grain_amount: 0.06,
            pointer: DVec2::splat(0.5),
        }
    }
}

impl HeartParams {
    pub fn from_json(params: &Value) -> Self {
        let d = Self::default();
        Self {
            color_a: param_color(params, "color_a", d.color_a),
            color_b: param_color(params, "color_b", d.color_b),
            heartbeat_speed: param_f64(params, "heartbeat_speed", d.heartbeat_speed),
            ripple_strength: param_f64(params, "ripple_strength", d.ripple_strength),
            grain_amount: param_f64(params, "grain_amount", d.grain_amount),
            pointer: DVec2::new(
                param_f64(params, "pointer_x", d.pointer.x),
                param_f64(params, "pointer_y", d.pointer.y),
            ),
        }
    }
}

/// Film grain hash over a 2D point, in [0, 1).
pub fn grain_hash(p: DVec2) -> f64 {
    let q = p * DVec2::new(123.34, 345.45);
    let q = DVec2::new(fract(q.x), fract(q.y));
    let q = q + q.dot(q + 34.345);
    fract(q.x * q.y)
}

/// Model rotation at time `t`: a slow yaw sway and a smaller pitch rock.
pub fn rotation(t: f64) -> DMat3 {
    DMat3::from_rotation_x((0.5 * t).cos() * 0.05) * DMat3::from_rotation_y((0.5 * t).sin() * 0.1)
}

pub struct Heart {
    params: HeartParams,
    mesh: HeartMesh,
    pointer: DVec2,
}

impl Heart {
    pub fn new(params: HeartParams) -> Self {
        Self {
            params,
            mesh: HeartMesh::default(),
            pointer: params.pointer,
        }
    }

    pub fn from_json(params: &Value) -> Self {
        Self::new(HeartParams::from_json(params))
    }

    pub fn mesh(&self) -> &HeartMesh {
        &self.mesh
    }

    pub fn pointer(&self) -> DVec2 {
        self.pointer
    }

    /// Extra xy scale at time `t`, in [0, 0.08].
    pub fn beat(&self, t: f64) -> f64 {
        BEAT_SCALE * (0.5 + 0.5 * (t * self.params.heartbeat_speed).sin())
    }

    /// Model-space position of `v` at time `t`, before rotation.
    pub fn displace(&self, v: &MeshVertex, t: f64) -> DVec3 {
        let xy = v.pos * (1.0 + self.beat(t));
        let ripple =
            self.params.ripple_strength * (10.0 * v.uv.y + t * 3.0).sin() * (0.5 + 0.5 * t.sin());
        let hover = HOVER_LIFT * smoothstep(0.35, 0.0, v.uv.distance(self.pointer));
        DVec3::new(xy.x, xy.y, ripple + hover)
    }

    /// Surface color at heart uv `uv`, grain included.
    pub fn fragment(&self, uv: DVec2, t: f64) -> Srgb {
        let p = &self.params;
        let pulse = 0.5 + 0.5 * (t * p.heartbeat_speed).sin();
        let base = p.color_a.lerp(p.color_b, uv.y * mix(0.6, 1.0, pulse));
        let vignette = smoothstep(0.95, 0.35, uv.distance(DVec2::splat(0.5)));
        let hover = 1.0 - smoothstep(0.0, 0.3, uv.distance(self.pointer));
        let grain = (grain_hash(uv + t) - 0.5) * p.grain_amount;
        base.scale(0.6 + 0.4 * vignette + 0.25 * hover).offset(grain)
    }
}

impl Scene for Heart {
    fn background(&self) -> Srgb {
        BACKGROUND
    }

    fn render(&mut self, ctx: &FrameContext, raster: &mut Raster) -> Result<(), SceneError> {
        check_raster(ctx, raster)?;
        raster.fill(BACKGROUND);
        let mut depth = DepthBuffer::for_raster(raster)?;
        let camera = Camera::perspective(FOV_Y_DEG, ctx.viewport, NEAR, FAR, EYE, DVec3::ZERO);
        let t = ctx.time;
        let rot = rotation(t);

        let projected: Vec<Option<ScreenVertex>> = self
            .mesh
            .vertices()
            .iter()
            .map(|v| {
                camera
                    .project(rot * self.displace(v, t))
                    .map(|pos| ScreenVertex { pos, uv: v.uv })
            })
            .collect();

        let mut covered = 0;
        for &[a, b, c] in self.mesh.triangles() {
            let (Some(a), Some(b), Some(c)) = (projected[a], projected[b], projected[c]) else {
                continue;
            };
            covered += rasterize_triangle(raster, &mut depth, [a, b, c], |uv| self.fragment(uv, t));
        }
        tracing::trace!(covered, time = t, "heart rasterized");
        Ok(())
    }

    fn params(&self) -> Value {
        let p = &self.params;
        json!({
            "color_a": p.color_a.to_hex(),
            "color_b": p.color_b.to_hex(),
            "heartbeat_speed": p.heartbeat_speed,
            "ripple_strength": p.ripple_strength,
            "grain_amount": p.grain_amount,
            "pointer_x": p.pointer.x,
            "pointer_y": p.pointer.y,
        })
    }

    fn param_schema(&self) -> Value {
        let d = HeartParams::default();
        json!({
            "color_a": schema_color(d.color_a, "Gradient color at the bottom of the heart"),
            "color_b": schema_color(d.color_b, "Gradient color towards the top"),
            "heartbeat_speed": schema_number(d.heartbeat_speed, 0.0, 10.0, "Heartbeat angular speed"),
            "ripple_strength": schema_number(d.ripple_strength, 0.0, 1.0, "Depth of the surface ripple"),
            "grain_amount": schema_number(d.grain_amount, 0.0, 0.5, "Film grain amount"),
            "pointer_x": schema_number(d.pointer.x, 0.0, 1.0, "Initial pointer x in heart uv space"),
            "pointer_y": schema_number(d.pointer.y, 0.0, 1.0, "Initial pointer y in heart uv space"),
        })
    }

    /// `x` and `y` are normalized surface coordinates with y pointing down.
    fn pointer_moved(&mut self, x: f64, y: f64) {
        if x.is_finite() && y.is_finite() {
            self.pointer = DVec2::new(x, 1.0 - y);
        }
    }
}
