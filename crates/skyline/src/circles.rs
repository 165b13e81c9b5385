//! Grid of soft disc cut-outs whose size and brightness diffuse upward in
//! waves, tinted along a vertical hue gradient.

use citylights_core::compose::{contrast, exposure, render_fullscreen, Fragment, PixelShader};
use citylights_core::params::{param_color, param_f64, schema_color, schema_number};
use citylights_core::shading::{mix, smoothstep};
use citylights_core::{FrameContext, Raster, Scene, SceneError, Srgb};
use glam::DVec2;
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CirclesDiffusionParams {
    pub bg: Srgb,
    pub cols: f64,
    pub rows: f64,
    /// Disc radius relative to its cell.
    pub radius: f64,
    pub softness: f64,
    pub diffusion_speed: f64,
    pub vertical_wave: f64,
    /// Hue at the bottom row and at the top row.
    pub hue_a: f64,
    pub hue_b: f64,
    pub sat: f64,
    pub light_a: f64,
    pub light_b: f64,
    pub contrast: f64,
    pub exposure: f64,
    pub grain: f64,
}

impl Default for CirclesDiffusionParams {
    fn default() -> Self {
        Self {
            bg: Srgb::from_u32(0x070b12),
            cols: 48.0,
            rows: 48.0,
            radius: 0.42,
            softness: 0.08,
            diffusion_speed: 0.9,
            vertical_wave: 1.2,
            hue_a: 0.58,
            hue_b: 0.04,
            sat: 0.75,
            light_a: 0.65,
            light_b: 0.55,
            contrast: 1.12,
            exposure: 1.4,
            grain: 0.02,
        }
    }
}

impl CirclesDiffusionParams {
    pub fn from_json(params: &Value) -> Self {
        let d = Self::default();
        Self {
            bg: param_color(params, "bg", d.bg),
            cols: param_f64(params, "cols", d.cols).max(1.0),
            rows: param_f64(params, "rows", d.rows).max(1.0),
            radius: param_f64(params, "radius", d.radius),
            softness: param_f64(params, "softness", d.softness),
            diffusion_speed: param_f64(params, "diffusion_speed", d.diffusion_speed),
            vertical_wave: param_f64(params, "vertical_wave", d.vertical_wave),
            hue_a: param_f64(params, "hue_a", d.hue_a),
            hue_b: param_f64(params, "hue_b", d.hue_b),
            sat: param_f64(params, "sat", d.sat),
            light_a: param_f64(params, "light_a", d.light_a),
            light_b: param_f64(params, "light_b", d.light_b),
            contrast: param_f64(params, "contrast", d.contrast),
            exposure: param_f64(params, "exposure", d.exposure),
            grain: param_f64(params, "grain", d.grain),
        }
    }
}

pub struct CirclesDiffusion {
    params: CirclesDiffusionParams,
}

impl CirclesDiffusion {
    pub fn new(params: CirclesDiffusionParams) -> Self {
        Self { params }
    }

    pub fn from_json(params: &Value) -> Self {
        Self::new(CirclesDiffusionParams::from_json(params))
    }

    /// Normalized row of a grid cell, 0 at the bottom row and 1 at the top.
    pub fn row_ratio(&self, gy: f64) -> f64 {
        gy / (self.params.rows - 1.0).max(1.0)
    }

    /// Disc tint for row ratio `ny`.
    pub fn tint(&self, ny: f64) -> Srgb {
        let p = &self.params;
        Srgb::from_hsl(
            mix(p.hue_a, p.hue_b, ny),
            p.sat,
            mix(p.light_a, p.light_b, ny),
        )
    }

    /// Disc luminance for cell `gid` at time `t`.
    pub fn luminance(&self, gid: DVec2, t: f64) -> f64 {
        let p = &self.params;
        let ny = self.row_ratio(gid.y);
        let base = 0.55 + 0.45 * smoothstep(0.0, 1.0, ny);
        let wave = (t * p.diffusion_speed + ny * 6.2831 * p.vertical_wave + gid.x * 0.03).sin();
        base * (0.7 + 0.3 * wave)
    }

    /// Coverage at offset `f` from the cell centre.
    ///
    /// The ramp's edges are reversed, so coverage is 0 inside the
    /// animated radius and rises to 1 towards the cell corners: each cell
    /// reads as a dark soft disc in a lit surround.
    pub fn disc(&self, gid: DVec2, f: DVec2, t: f64) -> f64 {
        let p = &self.params;
        let ny = self.row_ratio(gid.y);
        let r = p.radius * (0.9 + 0.2 * (t * p.diffusion_speed + ny * 7.0 + gid.x * 0.15).sin());
        smoothstep(r, r - p.softness, 0.5 - f.length())
    }
}

impl PixelShader for CirclesDiffusion {
    fn shade(&self, uv: DVec2, ctx: &FrameContext) -> Fragment {
        let p = &self.params;
        let scaled = uv * DVec2::new(p.cols, p.rows);
        let gid = scaled.floor();
        let f = scaled - gid - 0.5;
        let t = ctx.time;

        let lights = self.disc(gid, f, t) * self.luminance(gid, t);
        Fragment {
            intensity: contrast(exposure(lights, p.exposure), p.contrast),
            fg: self.tint(self.row_ratio(gid.y)),
        }
    }
}

impl Scene for CirclesDiffusion {
    fn background(&self) -> Srgb {
        self.params.bg
    }

    fn render(&mut self, ctx: &FrameContext, raster: &mut Raster) -> Result<(), SceneError> {
        let (bg, grain) = (self.params.bg, self.params.grain);
        render_fullscreen(&*self, bg, grain, ctx, raster)
    }

    fn params(&self) -> Value {
        let p = &self.params;
        json!({
            "bg": p.bg.to_hex(),
            "cols": p.cols,
            "rows": p.rows,
            "radius": p.radius,
            "softness": p.softness,
            "diffusion_speed": p.diffusion_speed,
            "vertical_wave": p.vertical_wave,
            "hue_a": p.hue_a,
            "hue_b": p.hue_b,
            "sat": p.sat,
            "light_a": p.light_a,
            "light_b": p.light_b,
            "contrast": p.contrast,
            "exposure": p.exposure,
            "grain": p.grain,
        })
    }

    fn param_schema(&self) -> Value {
        let d = CirclesDiffusionParams::default();
        json!({
            "bg": schema_color(d.bg, "Background color"),
            "cols": schema_number(d.cols, 1.0, 256.0, "Disc grid columns"),
            "rows": schema_number(d.rows, 1.0, 256.0, "Disc grid rows"),
            "radius": schema_number(d.radius, 0.0, 0.5, "Disc radius relative to its cell"),
            "softness": schema_number(d.softness, 0.0, 0.5, "Disc edge softness"),
            "diffusion_speed": schema_number(d.diffusion_speed, 0.0, 5.0, "Wave speed"),
            "vertical_wave": schema_number(d.vertical_wave, 0.0, 5.0, "Wave cycles from bottom to top"),
            "hue_a": schema_number(d.hue_a, 0.0, 1.0, "Hue at the bottom"),
            "hue_b": schema_number(d.hue_b, 0.0, 1.0, "Hue at the top"),
            "sat": schema_number(d.sat, 0.0, 1.0, "Saturation"),
            "light_a": schema_number(d.light_a, 0.0, 1.0, "Lightness at the bottom"),
            "light_b": schema_number(d.light_b, 0.0, 1.0, "Lightness at the top"),
            "contrast": schema_number(d.contrast, 0.1, 4.0, "Exponent applied to light"),
            "exposure": schema_number(d.exposure, 0.0, 5.0, "Exposure curve strength"),
            "grain": schema_number(d.grain, 0.0, 0.5, "Film grain amount"),
        })
    }
}
