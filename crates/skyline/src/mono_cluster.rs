//! Monochrome window skyline whose lit windows crowd into a round cluster
//! low in the centre of the frame and thin out towards the rooftops.

use crate::column::{cell_hash, grid_cell, window_rim, TowerProfile};
use citylights_core::compose::{contrast, render_fullscreen, Fragment, PixelShader};
use citylights_core::hash::hash;
use citylights_core::params::{param_color, param_f64, schema_color, schema_number};
use citylights_core::shading::{clamp01, mix, smoothstep, step};
use citylights_core::{FrameContext, Raster, Scene, SceneError, Srgb};
use glam::DVec2;
use serde_json::{json, Value};

const CLUSTER_CENTRE: DVec2 = DVec2::new(0.5, 0.32);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonoClusterParams {
    pub bg: Srgb,
    pub fg: Srgb,
    pub cols: f64,
    pub rows: f64,
    pub height_smooth: f64,
    pub height_jitter: f64,
    pub base_min: f64,
    pub base_max: f64,
    /// Window border margin, 0 to 0.45.
    pub margin: f64,
    pub fill_top: f64,
    pub fill_bottom: f64,
    pub cluster_radius: f64,
    pub cluster_power: f64,
    pub contrast: f64,
    pub grain: f64,
}

impl Default for MonoClusterParams {
    fn default() -> Self {
        Self {
            bg: Srgb::BLACK,
            fg: Srgb::WHITE,
            cols: 110.0,
            rows: 90.0,
            height_smooth: 0.28,
            height_jitter: 0.12,
            base_min: 0.25,
            base_max: 0.92,
            margin: 0.18,
            fill_top: 0.35,
            fill_bottom: 0.95,
            cluster_radius: 0.48,
            cluster_power: 2.2,
            contrast: 1.22,
            grain: 0.03,
        }
    }
}

impl MonoClusterParams {
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
            fill_top: param_f64(params, "fill_top", d.fill_top),
            fill_bottom: param_f64(params, "fill_bottom", d.fill_bottom),
            cluster_radius: param_f64(params, "cluster_radius", d.cluster_radius).max(1e-4),
            cluster_power: param_f64(params, "cluster_power", d.cluster_power),
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

pub struct MonoCluster {
    params: MonoClusterParams,
    profile: TowerProfile,
}

impl MonoCluster {
    pub fn new(params: MonoClusterParams) -> Self {
        let profile = params.profile();
        Self { params, profile }
    }

    pub fn from_json(params: &Value) -> Self {
        Self::new(MonoClusterParams::from_json(params))
    }

    /// Radial boost around the cluster centre, 1 at the centre, 0 at the radius.
    pub fn cluster(&self, uv: DVec2) -> f64 {
        let p = &self.params;
        let d = uv.distance(CLUSTER_CENTRE) / p.cluster_radius;
        clamp01(1.0 - d).powf(p.cluster_power)
    }

    /// Probability a window at `uv` is lit, under a roof at height `h`.
    pub fn fill(&self, uv: DVec2, h: f64) -> f64 {
        let p = &self.params;
        let y_ratio = clamp01(uv.y / h.max(1e-4));
        let fill = mix(p.fill_bottom, p.fill_top, y_ratio);
        clamp01(fill + 0.5 * self.cluster(uv) * (1.0 - y_ratio))
    }
}

impl PixelShader for MonoCluster {
    fn shade(&self, uv: DVec2, _ctx: &FrameContext) -> Fragment {
        let p = &self.params;
        let col = (uv.x * p.cols).floor();
        let h = self.profile.height(col, hash);

        let (cell, f) = grid_cell(uv, DVec2::new(p.cols, p.rows));
        let below = step(uv.y, h);
        let on = step(1.0 - self.fill(uv, h), cell_hash(cell, 0.0));
        let lights = contrast(window_rim(f, p.margin) * below * on, p.contrast);

        let edge = smoothstep(0.0, 0.15, uv.x) * smoothstep(1.0, 0.85, uv.x);
        Fragment {
            intensity: lights * edge,
            fg: p.fg,
        }
    }
}

impl Scene for MonoCluster {
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
            "fill_top": p.fill_top,
            "fill_bottom": p.fill_bottom,
            "cluster_radius": p.cluster_radius,
            "cluster_power": p.cluster_power,
            "contrast": p.contrast,
            "grain": p.grain,
        })
    }

    fn param_schema(&self) -> Value {
        let d = MonoClusterParams::default();
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
            "fill_top": schema_number(d.fill_top, 0.0, 1.0, "Lit fraction at the roof"),
            "fill_bottom": schema_number(d.fill_bottom, 0.0, 1.0, "Lit fraction at street level"),
            "cluster_radius": schema_number(d.cluster_radius, 0.01, 2.0, "Radius of the lit cluster"),
            "cluster_power": schema_number(d.cluster_power, 0.1, 8.0, "Falloff of the cluster boost"),
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
    fn cluster_peaks_at_centre_and_vanishes_outside() {
        let scene = MonoCluster::new(MonoClusterParams::default());
        assert!((scene.cluster(CLUSTER_CENTRE) - 1.0).abs() < 1e-12);
        assert_eq!(scene.cluster(DVec2::new(0.5, 0.9)), 0.0);
    }

    #[test]
    fn fill_thins_towards_the_roof() {
        let scene = MonoCluster::from_json(&json!({"cluster_radius": 0.01}));
        let low = scene.fill(DVec2::new(0.1, 0.0), 0.8);
        let high = scene.fill(DVec2::new(0.1, 0.8), 0.8);
        assert!((low - 0.95).abs() < 1e-12);
        assert!((high - 0.35).abs() < 1e-12);
    }

    #[test]
    fn fill_is_clamped_inside_the_cluster() {
        let scene = MonoCluster::new(MonoClusterParams::default());
        let f = scene.fill(CLUSTER_CENTRE, 0.9);
        assert_eq!(f, 1.0);
    }

    #[test]
    fn zero_radius_does_not_divide_by_zero() {
        let scene = MonoCluster::from_json(&json!({"cluster_radius": 0.0}));
        assert!(scene.cluster(DVec2::new(0.2, 0.2)).is_finite());
    }

    #[test]
    fn frame_edges_stay_dark() {
        let scene = MonoCluster::new(MonoClusterParams::default());
        let ctx = FrameContext::new(0.0, Viewport::new(110, 90));
        for y in 0..90 {
            let uv = DVec2::new(0.0, (y as f64 + 0.5) / 90.0);
            assert_eq!(scene.shade(uv, &ctx).intensity, 0.0);
        }
    }

    #[test]
    fn static_scene_ignores_time() {
        let scene = MonoCluster::new(MonoClusterParams::default());
        let vp = Viewport::new(110, 90);
        let uv = DVec2::new(0.48, 0.2);
        let a = scene.shade(uv, &FrameContext::new(0.0, vp)).intensity;
        let b = scene.shade(uv, &FrameContext::new(99.0, vp)).intensity;
        assert_eq!(a.to_bits(), b.to_bits());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn intensity_is_bounded(x in 0.0_f64..1.0, y in 0.0_f64..1.0) {
                let scene = MonoCluster::new(MonoClusterParams::default());
                let ctx = FrameContext::new(0.0, Viewport::new(220, 180));
                let i = scene.shade(DVec2::new(x, y), &ctx).intensity;
                prop_assert!((0.0..=1.0).contains(&i));
            }
        }
    }
}
