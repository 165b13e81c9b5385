//! Clusters of thin vertical lines bobbing above a rolling ground line,
//! over a three-stop sky gradient.
//!
//! The cluster layout (line positions, rest heights, phases) depends only
//! on the surface width and height, so it is built on resize and reused
//! by every frame.

use citylights_core::hash::seeded_hash;
use citylights_core::params::{param_color, param_f64, param_usize, schema_color, schema_integer, schema_number};
use citylights_core::scene::check_raster;
use citylights_core::{FrameContext, Raster, Scene, SceneError, Srgb, Viewport};
use glam::DVec2;
use serde_json::{json, Value};
use std::f64::consts::TAU;

/// Horizontal step of the ground outline, in pixels.
const GROUND_STEP: usize = 3;
/// Shortest a line may get mid-oscillation, in pixels.
const MIN_LINE_PX: f64 = 2.0;
/// Fraction of the cluster spacing a cluster's lines spread over.
const CLUSTER_SPREAD: f64 = 0.45;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinesOnlyParams {
    pub top: Srgb,
    pub mid: Srgb,
    pub bottom: Srgb,
    pub ground: Srgb,
    pub line: Srgb,
    pub cluster_spacing: f64,
    pub lines_min: usize,
    pub lines_max: usize,
    pub line_width: f64,
    pub ground_base: f64,
    pub ground_amplitude: f64,
    pub line_height_min: f64,
    pub line_height_max: f64,
    pub seed: f64,
    pub motion_speed: f64,
    pub motion_amplitude: f64,
}

impl Default for LinesOnlyParams {
    fn default() -> Self {
        Self {
            top: Srgb::from_u32(0xeef1f4),
            mid: Srgb::from_u32(0xcfd8e1),
            bottom: Srgb::from_u32(0x0f1a27),
            ground: Srgb::from_u32(0x0f1a27),
            line: Srgb::from_u32(0xe7eef7),
            cluster_spacing: 10.0,
            lines_min: 2,
            lines_max: 4,
            line_width: 1.0,
            ground_base: 0.62,
            ground_amplitude: 0.14,
            line_height_min: 0.08,
            line_height_max: 0.35,
            seed: 7.0,
            motion_speed: 1.0,
            motion_amplitude: 0.45,
        }
    }
}

impl LinesOnlyParams {
    pub fn from_json(params: &Value) -> Self {
        let d = Self::default();
        Self {
            top: param_color(params, "top", d.top),
            mid: param_color(params, "mid", d.mid),
            bottom: param_color(params, "bottom", d.bottom),
            ground: param_color(params, "ground", d.ground),
            line: param_color(params, "line", d.line),
            cluster_spacing: param_f64(params, "cluster_spacing", d.cluster_spacing).max(1.0),
            lines_min: param_usize(params, "lines_min", d.lines_min).max(1),
            lines_max: param_usize(params, "lines_max", d.lines_max),
            line_width: param_f64(params, "line_width", d.line_width),
            ground_base: param_f64(params, "ground_base", d.ground_base),
            ground_amplitude: param_f64(params, "ground_amplitude", d.ground_amplitude),
            line_height_min: param_f64(params, "line_height_min", d.line_height_min),
            line_height_max: param_f64(params, "line_height_max", d.line_height_max),
            seed: param_f64(params, "seed", d.seed),
            motion_speed: param_f64(params, "motion_speed", d.motion_speed),
            motion_amplitude: param_f64(params, "motion_amplitude", d.motion_amplitude),
        }
    }

    /// Three-sine rolling noise in [-1, 1] at pixel column `x`.
    pub fn ground_noise(&self, x: f64) -> f64 {
        let s = self.seed;
        0.55 * (x * 0.004 + s).sin() + 0.3 * (x * 0.009 + s * 1.7).sin() + 0.15 * (x * 0.016 - s * 0.8).sin()
    }

    /// Ground line y (pixels, from the top) at pixel column `x`.
    pub fn ground_y(&self, x: f64, height: f64) -> f64 {
        let n = (self.ground_noise(x) + 1.0) * 0.5;
        height * (self.ground_base + self.ground_amplitude * n)
    }
}

/// One cluster of lines sharing a rest height and phase.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub cx: f64,
    pub line_xs: Vec<f64>,
    pub base_height: f64,
    pub phase: f64,
}

impl Cluster {
    /// Line height above the ground at time `t`, never below 2 px.
    pub fn height(&self, t: f64, omega: f64, amplitude: f64) -> f64 {
        let amp = self.base_height * amplitude.clamp(0.0, 1.0);
        (self.base_height + amp * (self.phase + omega * t).sin()).max(MIN_LINE_PX)
    }
}

/// Lays out clusters every `cluster_spacing` pixels across `viewport`.
pub fn build_clusters(p: &LinesOnlyParams, viewport: Viewport) -> Vec<Cluster> {
    let (w, h) = (viewport.width() as f64, viewport.height() as f64);
    let rand = |n: f64| seeded_hash(n, p.seed);
    let spacing = p.cluster_spacing.max(1.0);
    let count_range = (p.lines_max as f64 - p.lines_min as f64 + 1.0).max(1.0);

    let count = (w / spacing).ceil() as usize;
    (0..count)
        .map(|k| {
            let cx = k as f64 * spacing;
            let lines = (p.lines_min + (rand(cx) * count_range).floor() as usize).max(1);
            let step = spacing * CLUSTER_SPREAD / (lines - 1).max(1) as f64;
            let start = cx - (lines - 1) as f64 * step * 0.5;
            let line_xs = (0..lines).map(|i| start + i as f64 * step).collect();
            let rest = p.line_height_min
                + (p.line_height_max - p.line_height_min) * rand(cx + p.seed * 113.1);
            Cluster {
                cx,
                line_xs,
                base_height: h * rest,
                phase: rand(cx + p.seed * 917.3) * TAU,
            }
        })
        .collect()
}

pub struct LinesOnly {
    params: LinesOnlyParams,
    layout: Option<(Viewport, Vec<Cluster>)>,
}

impl LinesOnly {
    pub fn new(params: LinesOnlyParams) -> Self {
        Self {
            params,
            layout: None,
        }
    }

    pub fn from_json(params: &Value) -> Self {
        Self::new(LinesOnlyParams::from_json(params))
    }

    /// Cached clusters, if a layout has been built.
    pub fn clusters(&self) -> Option<&[Cluster]> {
        self.layout.as_ref().map(|(_, c)| c.as_slice())
    }

    fn ensure_layout(&mut self, viewport: Viewport) {
        if !matches!(&self.layout, Some((vp, _)) if *vp == viewport) {
            self.resize(viewport);
        }
    }
}

impl Scene for LinesOnly {
    fn background(&self) -> Srgb {
        self.params.top
    }

    fn render(&mut self, ctx: &FrameContext, raster: &mut Raster) -> Result<(), SceneError> {
        check_raster(ctx, raster)?;
        self.ensure_layout(ctx.viewport);
        let p = &self.params;
        let (w, h) = (ctx.viewport.width(), ctx.viewport.height() as f64);

        raster.fill_vertical_gradient(&[(0.0, p.top), (0.5, p.mid), (1.0, p.bottom)]);

        let mut ground = Vec::with_capacity(w / GROUND_STEP + 3);
        ground.push(DVec2::new(0.0, h));
        ground.extend(
            (0..=w)
                .step_by(GROUND_STEP)
                .map(|x| DVec2::new(x as f64, p.ground_y(x as f64, h))),
        );
        ground.push(DVec2::new(w as f64, h));
        raster.fill_polygon(&ground, p.ground, 1.0);

        let omega = TAU * p.motion_speed.max(0.0);
        let clusters = self.clusters().unwrap_or_default();
        for cluster in clusters {
            let gy = p.ground_y(cluster.cx, h);
            let len = cluster.height(ctx.time, omega, p.motion_amplitude);
            for &x in &cluster.line_xs {
                raster.stroke_vline(x, gy - len, gy, p.line_width, p.line, 1.0);
            }
        }
        Ok(())
    }

    fn params(&self) -> Value {
        let p = &self.params;
        json!({
            "top": p.top.to_hex(),
            "mid": p.mid.to_hex(),
            "bottom": p.bottom.to_hex(),
            "ground": p.ground.to_hex(),
            "line": p.line.to_hex(),
            "cluster_spacing": p.cluster_spacing,
            "lines_min": p.lines_min,
            "lines_max": p.lines_max,
            "line_width": p.line_width,
            "ground_base": p.ground_base,
            "ground_amplitude": p.ground_amplitude,
            "line_height_min": p.line_height_min,
            "line_height_max": p.line_height_max,
            "seed": p.seed,
            "motion_speed": p.motion_speed,
            "motion_amplitude": p.motion_amplitude,
        })
    }

    fn param_schema(&self) -> Value {
        let d = LinesOnlyParams::default();
        json!({
            "top": schema_color(d.top, "Sky gradient top"),
            "mid": schema_color(d.mid, "Sky gradient middle"),
            "bottom": schema_color(d.bottom, "Sky gradient bottom"),
            "ground": schema_color(d.ground, "Ground silhouette"),
            "line": schema_color(d.line, "Line color"),
            "cluster_spacing": schema_number(d.cluster_spacing, 1.0, 200.0, "Pixels between clusters"),
            "lines_min": schema_integer(d.lines_min, 1, 16, "Fewest lines per cluster"),
            "lines_max": schema_integer(d.lines_max, 1, 16, "Most lines per cluster"),
            "line_width": schema_number(d.line_width, 0.0, 10.0, "Line width in pixels"),
            "ground_base": schema_number(d.ground_base, 0.0, 1.0, "Ground level as a fraction of height"),
            "ground_amplitude": schema_number(d.ground_amplitude, 0.0, 1.0, "Ground roll"),
            "line_height_min": schema_number(d.line_height_min, 0.0, 1.0, "Shortest rest height"),
            "line_height_max": schema_number(d.line_height_max, 0.0, 1.0, "Tallest rest height"),
            "seed": schema_number(d.seed, 0.0, 1000.0, "Layout seed"),
            "motion_speed": schema_number(d.motion_speed, 0.0, 10.0, "Oscillations per second"),
            "motion_amplitude": schema_number(d.motion_amplitude, 0.0, 1.0, "Swing relative to rest height"),
        })
    }

    fn resize(&mut self, viewport: Viewport) {
        let clusters = build_clusters(&self.params, viewport);
        tracing::debug!(
            width = viewport.width(),
            height = viewport.height(),
            clusters = clusters.len(),
            "lines-only layout rebuilt"
        );
        self.layout = Some((viewport, clusters));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- Layout --

    #[test]
    fn clusters_cover_the_width() {
        let p = LinesOnlyParams::default();
        let clusters = build_clusters(&p, Viewport::new(95, 50));
        assert_eq!(clusters.len(), 10);
        assert_eq!(clusters[9].cx, 90.0);
    }

    #[test]
    fn cluster_line_counts_stay_in_range() {
        let p = LinesOnlyParams::default();
        for c in build_clusters(&p, Viewport::new(400, 100)) {
            assert!((2..=4).contains(&c.line_xs.len()));
            let first = c.line_xs[0];
            let last = c.line_xs[c.line_xs.len() - 1];
            assert!(((first + last) * 0.5 - c.cx).abs() < 1e-9);
            assert!((last - first - 4.5).abs() < 1e-9);
        }
    }

    #[test]
    fn inverted_line_range_uses_the_minimum() {
        let p = LinesOnlyParams {
            lines_min: 3,
            lines_max: 1,
            ..LinesOnlyParams::default()
        };
        for c in build_clusters(&p, Viewport::new(100, 100)) {
            assert_eq!(c.line_xs.len(), 3);
        }
    }

    #[test]
    fn single_line_cluster_sits_on_its_centre() {
        let p = LinesOnlyParams {
            lines_min: 1,
            lines_max: 1,
            ..LinesOnlyParams::default()
        };
        let c = &build_clusters(&p, Viewport::new(30, 30))[2];
        assert_eq!(c.line_xs, vec![20.0]);
    }

    #[test]
    fn zero_line_minimum_still_draws_one_line() {
        let p = LinesOnlyParams {
            lines_min: 0,
            lines_max: 0,
            ..LinesOnlyParams::default()
        };
        for c in build_clusters(&p, Viewport::new(60, 30)) {
            assert_eq!(c.line_xs, vec![c.cx]);
        }
    }

    #[test]
    fn line_height_never_drops_below_two_pixels() {
        let c = Cluster {
            cx: 0.0,
            line_xs: vec![0.0],
            base_height: 1.0,
            phase: 0.0,
        };
        assert_eq!(c.height(0.75, TAU, 1.0), MIN_LINE_PX);
    }

    #[test]
    fn ground_stays_in_its_band() {
        let p = LinesOnlyParams::default();
        for x in 0..2000 {
            let y = p.ground_y(x as f64, 100.0);
            assert!((62.0..=76.0 + 1e-9).contains(&y));
        }
    }

    // -- Rendering --

    #[test]
    fn render_builds_layout_on_demand() {
        let mut scene = LinesOnly::new(LinesOnlyParams::default());
        assert!(scene.clusters().is_none());
        let vp = Viewport::new(80, 60);
        let mut raster = Raster::for_viewport(vp, scene.background()).unwrap();
        scene.render(&FrameContext::new(0.0, vp), &mut raster).unwrap();
        assert_eq!(scene.clusters().map(<[Cluster]>::len), Some(8));
    }

    #[test]
    fn resize_is_idempotent() {
        let mut scene = LinesOnly::new(LinesOnlyParams::default());
        scene.resize(Viewport::new(120, 80));
        let first = scene.clusters().unwrap().to_vec();
        scene.resize(Viewport::new(120, 80));
        assert_eq!(scene.clusters().unwrap(), first.as_slice());
    }

    #[test]
    fn bottom_row_is_ground() {
        let mut scene = LinesOnly::new(LinesOnlyParams::default());
        let vp = Viewport::new(64, 64);
        let mut raster = Raster::for_viewport(vp, scene.background()).unwrap();
        scene.render(&FrameContext::new(1.3, vp), &mut raster).unwrap();
        let ground = Srgb::from_u32(0x0f1a27);
        for x in 0..64 {
            assert_eq!(raster.get(x, 63).unwrap(), ground);
        }
    }

    #[test]
    fn lines_rise_above_the_ground() {
        let p = LinesOnlyParams::default();
        let mut scene = LinesOnly::new(p);
        let vp = Viewport::new(100, 100);
        let mut raster = Raster::for_viewport(vp, scene.background()).unwrap();
        scene.render(&FrameContext::new(0.0, vp), &mut raster).unwrap();
        let lit = raster.pixels().iter().filter(|&&c| c == p.line).count();
        assert!(lit > 0);
    }
}
