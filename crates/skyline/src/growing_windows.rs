//! Window skyline lit from the ground up: in each column the lit region
//! rises and falls with its own phase, revealing the windows underneath.

use crate::column::{cell_hash, grid_cell, window_rim, TowerProfile, PHASE_TURN};
use citylights_core::compose::{contrast, render_fullscreen, Fragment, PixelShader};
use citylights_core::hash::hash;
use citylights_core::params::{param_color, param_f64, schema_color, schema_number};
use citylights_core::shading::{clamp01, step};
use citylights_core::{FrameContext, Raster, Scene, SceneError, Srgb};
use glam::DVec2;
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowingWindowsParams {
    pub bg: Srgb,
    pub fg: Srgb,
    pub cols: f64,
    pub rows: f64,
    pub height_smooth: f64,
    pub height_jitter: f64,
    pub base_min: f64,
    pub base_max: f64,
    pub margin: f64,
    pub window_fill: f64,
    pub grow_speed: f64,
    pub contrast: f64,
    pub grain: f64,
}

impl Default for GrowingWindowsParams {
    fn default() -> Self {
        Self {
            bg: Srgb::from_u32(0x030507),
            fg: Srgb::from_u32(0xe8f0ff),
            cols: 110.0,
            rows: 80.0,
            height_smooth: 0.28,
            height_jitter: 0.12,
            base_min: 0.25,
            base_max: 0.92,
            margin: 0.18,
            window_fill: 0.6,
            grow_speed: 0.9,
            contrast: 1.18,
            grain: 0.0,
        }
    }
}

impl GrowingWindowsParams {
    pub fn from_json(params: &Value) -> Self {
        let d = Self::default();
        Self {
            bg: param_color(params, "bg", d.bg),
            fg: param_color(params, "fg", d.fg),
            cols: param_f64(params, "cols", d.cols).max(1.0),
            rows: param_f64(params, "rows", d.rows).max(1.0),
            height_smooth: param_f64(params, "height_smooth", d.height_smooth),
            height_jitter: param_f64(params, "height_jitter", d.height_jitter),
            base_min: param_f64(params, "base_min", d.base_min),
            base_max: param_f64(params, "base_max", d.base_max),
            margin: param_f64(params, "margin", d.margin),
            window_fill: param_f64(params, "window_fill", d.window_fill),
            grow_speed: param_f64(params, "grow_speed", d.grow_speed),
            contrast: param_f64(params, "contrast", d.contrast),
            grain: param_f64(params, "grain", d.grain),
        }
    }

    pub fn profile(&self) -> TowerProfile {
        TowerProfile {
            base_min: self.base_min,
            base_max: self.base_max,
            smooth: self.height_smooth,
            jitter: self.height_jitter,
        }
    }
}

/// Height of the lit region in column `col` at time `t`, in [0, 1].
pub fn grow_level(col: f64, t: f64, speed: f64) -> f64 {
    let phase = hash(col * 13.7 + 5.1) * PHASE_TURN;
    0.5 + 0.5 * (t * speed + phase).sin()
}

pub struct GrowingWindows {
    params: GrowingWindowsParams,
    profile: TowerProfile,
}

impl GrowingWindows {
    pub fn new(params: GrowingWindowsParams) -> Self {
        let profile = params.profile();
        Self { params, profile }
    }

    pub fn from_json(params: &Value) -> Self {
        Self::new(GrowingWindowsParams::from_json(params))
    }
}

impl PixelShader for GrowingWindows {
    fn shade(&self, uv: DVec2, ctx: &FrameContext) -> Fragment {
        let p = &self.params;
        let col = (uv.x * p.cols).floor();
        let city = step(uv.y, self.profile.height(col, hash));
        let grow = step(uv.y, grow_level(col, ctx.time, p.grow_speed));

        let (cell, f) = grid_cell(uv, DVec2::new(p.cols, p.rows));
        let on = step(1.0 - p.window_fill, cell_hash(cell, 0.0));
        let win = window_rim(f, p.margin) * on;

        Fragment {
            intensity: contrast(clamp01(win * city * grow), p.contrast),
            fg: p.fg,
        }
    }
}

impl Scene for GrowingWindows {
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
            "fg": p.fg.to_hex(),
            "cols": p.cols,
            "rows": p.rows,
            "height_smooth": p.height_smooth,
            "height_jitter": p.height_jitter,
            "base_min": p.base_min,
            "base_max": p.base_max,
            "margin": p.margin,
            "window_fill": p.window_fill,
            "grow_speed": p.grow_speed,
            "contrast": p.contrast,
            "grain": p.grain,
        })
    }

    fn param_schema(&self) -> Value {
        let d = GrowingWindowsParams::default();
        json!({
            "bg": schema_color(d.bg, "Background color"),
            "fg": schema_color(d.fg, "Window color"),
            "cols": schema_number(d.cols, 1.0, 400.0, "Tower columns and window grid width"),
            "rows": schema_number(d.rows, 1.0, 400.0, "Window grid height"),
            "height_smooth": schema_number(d.height_smooth, 0.01, 2.0, "Roofline noise frequency"),
            "height_jitter": schema_number(d.height_jitter, 0.0, 1.0, "Per-column roof jitter"),
            "base_min": schema_number(d.base_min, 0.0, 1.0, "Lowest roof height"),
            "base_max": schema_number(d.base_max, 0.0, 1.0, "Highest roof height"),
            "margin": schema_number(d.margin, 0.0, 0.45, "Window border margin"),
            "window_fill": schema_number(d.window_fill, 0.0, 1.0, "Fraction of lit windows"),
            "grow_speed": schema_number(d.grow_speed, 0.0, 5.0, "Speed of the rising light"),
            "contrast": schema_number(d.contrast, 0.1, 4.0, "Exponent applied to light"),
            "grain": schema_number(d.grain, 0.0, 0.5, "Film grain amount"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use citylights_core::Viewport;

    #[test]
    fn grow_level_oscillates_within_unit_range() {
        for col in 0..50 {
            for i in 0..40 {
                let g = grow_level(col as f64, i as f64 * 0.37, 0.9);
                assert!((0.0..=1.0).contains(&g));
            }
        }
    }

    #[test]
    fn frozen_growth_matches_phase() {
        let g = grow_level(0.0, 0.0, 0.0);
        let expected = 0.5 + 0.5 * (hash(5.1) * PHASE_TURN).sin();
        assert!((g - expected).abs() < 1e-12);
    }

    #[test]
    fn no_windows_without_fill() {
        let scene = GrowingWindows::from_json(&json!({"window_fill": 0.0}));
        let ctx = FrameContext::new(2.0, Viewport::new(110, 80));
        for y in 0..80 {
            for x in (0..110).step_by(7) {
                let uv = ctx.uv(x, y);
                assert_eq!(scene.shade(uv, &ctx).intensity, 0.0);
            }
        }
    }

    #[test]
    fn lights_are_binary_before_contrast() {
        let scene = GrowingWindows::new(GrowingWindowsParams::default());
        let ctx = FrameContext::new(1.5, Viewport::new(110, 80));
        for y in 0..80 {
            let i = scene.shade(ctx.uv(55, y), &ctx).intensity;
            assert!(i == 0.0 || i == 1.0);
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn shading_is_deterministic(x in 0.0_f64..1.0, y in 0.0_f64..1.0, t in 0.0_f64..100.0) {
                let scene = GrowingWindows::new(GrowingWindowsParams::default());
                let ctx = FrameContext::new(t, Viewport::new(110, 80));
                let a = scene.shade(DVec2::new(x, y), &ctx).intensity;
                let b = scene.shade(DVec2::new(x, y), &ctx).intensity;
                prop_assert_eq!(a.to_bits(), b.to_bits());
            }
        }
    }
}
