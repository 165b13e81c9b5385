#![deny(unsafe_code)]
//! Extruded glitch city: a row of thin slabs on a floor plane, their
//! heights driven by quantized two-octave sine noise with occasional
//! glitch spikes, seen through a perspective camera.
//!
//! The column instances are regenerated from `(index, time)` every frame;
//! nothing carries over between frames.

pub mod columns;
pub mod geometry;

use citylights_core::mesh::{Camera, DepthBuffer};
use citylights_core::params::{param_color, param_f64, param_usize, schema_color, schema_integer, schema_number};
use citylights_core::scene::check_raster;
use citylights_core::{FrameContext, Raster, Scene, SceneError, Srgb};
use columns::ColumnField;
use geometry::{box_faces, draw_face, floor_face, lambert};
use glam::DVec3;
use serde_json::{json, Value};

const FOV_Y_DEG: f64 = 50.0;
const NEAR: f64 = 0.1;
const FAR: f64 = 100.0;
const EYE: DVec3 = DVec3::new(0.0, 4.5, 10.0);
const TARGET: DVec3 = DVec3::new(0.0, 2.5, 0.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtrudeGlitchParams {
    pub bg: Srgb,
    pub floor: Srgb,
    pub columns: usize,
    pub world_width: f64,
    pub world_depth: f64,
    pub min_height: f64,
    pub max_height: f64,
    pub speed: f64,
    pub glitch_intensity: f64,
    pub quantize_levels: f64,
    pub hue_start: f64,
    pub hue_end: f64,
    pub ambient: f64,
    pub dir_light: f64,
}

impl Default for ExtrudeGlitchParams {
    fn default() -> Self {
        Self {
            bg: Srgb::from_u32(0x0b0f14),
            floor: Srgb::from_u32(0x0c1218),
            columns: 280,
            world_width: 12.0,
            world_depth: 4.0,
            min_height: 0.2,
            max_height: 6.0,
            speed: 0.6,
            glitch_intensity: 0.18,
            quantize_levels: 24.0,
            hue_start: 0.58,
            hue_end: 0.08,
            ambient: 0.6,
            dir_light: 0.9,
        }
    }
}

impl ExtrudeGlitchParams {
    pub fn from_json(params: &Value) -> Self {
        let d = Self::default();
        Self {
            bg: param_color(params, "bg", d.bg),
            floor: param_color(params, "floor", d.floor),
            columns: param_usize(params, "columns", d.columns).max(1),
            world_width: param_f64(params, "world_width", d.world_width),
            world_depth: param_f64(params, "world_depth", d.world_depth),
            min_height: param_f64(params, "min_height", d.min_height),
            max_height: param_f64(params, "max_height", d.max_height),
            speed: param_f64(params, "speed", d.speed),
            glitch_intensity: param_f64(params, "glitch_intensity", d.glitch_intensity),
            quantize_levels: param_f64(params, "quantize_levels", d.quantize_levels),
            hue_start: param_f64(params, "hue_start", d.hue_start),
            hue_end: param_f64(params, "hue_end", d.hue_end),
            ambient: param_f64(params, "ambient", d.ambient),
            dir_light: param_f64(params, "dir_light", d.dir_light),
        }
    }

    pub fn column_field(&self) -> ColumnField {
        ColumnField {
            columns: self.columns,
            world_width: self.world_width,
            min_height: self.min_height,
            max_height: self.max_height,
            speed: self.speed,
            glitch_intensity: self.glitch_intensity,
            quantize_levels: self.quantize_levels,
            hue_start: self.hue_start,
            hue_end: self.hue_end,
        }
    }
}

pub struct ExtrudeGlitch {
    params: ExtrudeGlitchParams,
    field: ColumnField,
}

impl ExtrudeGlitch {
    pub fn new(params: ExtrudeGlitchParams) -> Self {
        let field = params.column_field();
        Self { params, field }
    }

    pub fn from_json(params: &Value) -> Self {
        Self::new(ExtrudeGlitchParams::from_json(params))
    }

    pub fn field(&self) -> &ColumnField {
        &self.field
    }
}

impl Scene for ExtrudeGlitch {
    fn background(&self) -> Srgb {
        self.params.bg
    }

    fn render(&mut self, ctx: &FrameContext, raster: &mut Raster) -> Result<(), SceneError> {
        check_raster(ctx, raster)?;
        let p = &self.params;
        raster.fill(p.bg);
        let mut depth = DepthBuffer::for_raster(raster)?;
        let camera = Camera::perspective(FOV_Y_DEG, ctx.viewport, NEAR, FAR, EYE, TARGET);
        let eye = camera.eye();

        let floor = floor_face(p.world_width, p.world_depth);
        let floor_color = lambert(p.floor, floor.normal, p.ambient, p.dir_light);
        let mut covered = draw_face(raster, &mut depth, &camera, &floor, floor_color);

        for inst in self.field.instances(ctx.time) {
            for face in box_faces(inst.centre, inst.size) {
                if !face.faces(eye) {
                    continue;
                }
                let color = lambert(inst.color, face.normal, p.ambient, p.dir_light);
                covered += draw_face(raster, &mut depth, &camera, &face, color);
            }
        }
        tracing::trace!(covered, time = ctx.time, "extrude frame drawn");
        Ok(())
    }

    fn params(&self) -> Value {
        let p = &self.params;
        json!({
            "bg": p.bg.to_hex(),
            "floor": p.floor.to_hex(),
            "columns": p.columns,
            "world_width": p.world_width,
            "world_depth": p.world_depth,
            "min_height": p.min_height,
            "max_height": p.max_height,
            "speed": p.speed,
            "glitch_intensity": p.glitch_intensity,
            "quantize_levels": p.quantize_levels,
            "hue_start": p.hue_start,
            "hue_end": p.hue_end,
            "ambient": p.ambient,
            "dir_light": p.dir_light,
        })
    }

    fn param_schema(&self) -> Value {
        let d = ExtrudeGlitchParams::default();
        json!({
            "bg": schema_color(d.bg, "Background color"),
            "floor": schema_color(d.floor, "Floor plane color"),
            "columns": schema_integer(d.columns, 1, 2000, "Number of slabs"),
            "world_width": schema_number(d.world_width, 0.1, 50.0, "Width of the slab row in world units"),
            "world_depth": schema_number(d.world_depth, 0.1, 50.0, "Depth of the floor plane"),
            "min_height": schema_number(d.min_height, 0.0, 20.0, "Shortest slab"),
            "max_height": schema_number(d.max_height, 0.0, 20.0, "Tallest slab"),
            "speed": schema_number(d.speed, 0.0, 5.0, "Noise drift speed"),
            "glitch_intensity": schema_number(d.glitch_intensity, 0.0, 1.0, "Height of glitch spikes"),
            "quantize_levels": schema_number(d.quantize_levels, 2.0, 256.0, "Height quantization steps"),
            "hue_start": schema_number(d.hue_start, 0.0, 1.0, "Hue of the shortest slabs"),
            "hue_end": schema_number(d.hue_end, 0.0, 1.0, "Hue of the tallest slabs"),
            "ambient": schema_number(d.ambient, 0.0, 2.0, "Ambient light intensity"),
            "dir_light": schema_number(d.dir_light, 0.0, 2.0, "Directional light intensity"),
        })
    }
}
