//! The growing-windows skyline drawn with strokes: every lit window cell
//! below a column's current growth level becomes one short vertical line.

use citylights_core::hash::seeded_hash;
use citylights_core::params::{param_color, param_f64, param_usize, schema_color, schema_integer, schema_number};
use citylights_core::scene::check_raster;
use citylights_core::{FrameContext, Raster, Scene, SceneError, Srgb, Viewport};
use citylights_skyline::column::TowerProfile;
use serde_json::{json, Value};
use std::f64::consts::TAU;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowingLinesParams {
    pub bg: Srgb,
    pub fg: Srgb,
    pub cols: usize,
    pub rows: usize,
    pub height_smooth: f64,
    pub height_jitter: f64,
    pub base_min: f64,
    pub base_max: f64,
    pub margin: f64,
    pub window_fill: f64,
    pub grow_speed: f64,
    pub line_width: f64,
    pub seed: f64,
}

impl Default for GrowingLinesParams {
    fn default() -> Self {
        Self {
            bg: Srgb::from_u32(0x030507),
            fg: Srgb::from_u32(0xe8f0ff),
            cols: 110,
            rows: 80,
            height_smooth: 0.28,
            height_jitter: 0.12,
            base_min: 0.25,
            base_max: 0.92,
            margin: 0.18,
            window_fill: 0.6,
            grow_speed: 0.9,
            line_width: 1.0,
            seed: 7.0,
        }
    }
}

impl GrowingLinesParams {
    pub fn from_json(params: &Value) -> Self {
        let d = Self::default();
        Self {
            bg: param_color(params, "bg", d.bg),
            fg: param_color(params, "fg", d.fg),
            cols: param_usize(params, "cols", d.cols).max(1),
            rows: param_usize(params, "rows", d.rows).max(1),
            height_smooth: param_f64(params, "height_smooth", d.height_smooth),
            height_jitter: param_f64(params, "height_jitter", d.height_jitter),
            base_min: param_f64(params, "base_min", d.base_min),
            base_max: param_f64(params, "base_max", d.base_max),
            margin: param_f64(params, "margin", d.margin),
            window_fill: param_f64(params, "window_fill", d.window_fill),
            grow_speed: param_f64(params, "grow_speed", d.grow_speed),
            line_width: param_f64(params, "line_width", d.line_width),
            seed: param_f64(params, "seed", d.seed),
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

    /// Whether window `(col, row)` is lit.
    pub fn window_on(&self, col: usize, row: usize) -> bool {
        let n = col as f64 * 37.1 + row as f64 * 91.7 + self.seed * 13.3;
        seeded_hash(n, self.seed) >= 1.0 - self.window_fill
    }
}

/// Per-column tower heights (pixels) and growth phases for one surface size.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLayout {
    pub viewport: Viewport,
    pub col_width: f64,
    pub heights: Vec<f64>,
    pub phases: Vec<f64>,
}

impl ColumnLayout {
    pub fn build(p: &GrowingLinesParams, viewport: Viewport) -> Self {
        let profile = p.profile();
        let seed = p.seed;
        let h = viewport.height() as f64;
        let (heights, phases) = (0..p.cols)
            .map(|c| {
                let c = c as f64;
                let norm = profile.height(c, |n| seeded_hash(n, seed));
                (h * norm, seeded_hash(c * 13.7 + 5.1, seed) * TAU)
            })
            .unzip();
        Self {
            viewport,
            col_width: viewport.width() as f64 / p.cols as f64,
            heights,
            phases,
        }
    }

    /// Index of the highest row column `col` reaches at time `t`.
    pub fn top_row(&self, col: usize, rows: usize, t: f64, speed: f64) -> usize {
        let cell_h = self.viewport.height() as f64 / rows as f64;
        let grow = 0.5 + 0.5 * (t * speed + self.phases[col]).sin();
        let reach = (self.heights[col] * grow / cell_h).floor().max(0.0) as usize;
        reach.min(rows - 1)
    }
}

pub struct GrowingLines {
    params: GrowingLinesParams,
    layout: Option<ColumnLayout>,
}

impl GrowingLines {
    pub fn new(params: GrowingLinesParams) -> Self {
        Self {
            params,
            layout: None,
        }
    }

    pub fn from_json(params: &Value) -> Self {
        Self::new(GrowingLinesParams::from_json(params))
    }

    pub fn layout(&self) -> Option<&ColumnLayout> {
        self.layout.as_ref()
    }
}

impl Scene for GrowingLines {
    fn background(&self) -> Srgb {
        self.params.bg
    }

    fn render(&mut self, ctx: &FrameContext, raster: &mut Raster) -> Result<(), SceneError> {
        check_raster(ctx, raster)?;
        if self.layout.as_ref().map(|l| l.viewport) != Some(ctx.viewport) {
            self.resize(ctx.viewport);
        }
        let p = &self.params;
        let Some(layout) = self.layout.as_ref() else {
            return Ok(());
        };

        raster.fill(p.bg);
        let h = ctx.viewport.height() as f64;
        let cell_h = h / p.rows as f64;
        let inset = p.margin.clamp(0.0, 0.45);
        let width = p.line_width.max(1.0);

        for c in 0..p.cols {
            let x = (c as f64 + 0.5) * layout.col_width;
            for r in 0..=layout.top_row(c, p.rows, ctx.time, p.grow_speed) {
                if !p.window_on(c, r) {
                    continue;
                }
                let y0 = h - (r as f64 + 1.0 - inset) * cell_h;
                let y1 = h - (r as f64 + inset) * cell_h;
                raster.stroke_vline(x, y0, y1, width, p.fg, 1.0);
            }
        }
        Ok(())
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
            "line_width": p.line_width,
            "seed": p.seed,
        })
    }

    fn param_schema(&self) -> Value {
        let d = GrowingLinesParams::default();
        json!({
            "bg": schema_color(d.bg, "Background color"),
            "fg": schema_color(d.fg, "Line color"),
            "cols": schema_integer(d.cols, 1, 1000, "Tower columns"),
            "rows": schema_integer(d.rows, 1, 1000, "Window rows"),
            "height_smooth": schema_number(d.height_smooth, 0.0, 2.0, "Noise frequency of tower heights"),
            "height_jitter": schema_number(d.height_jitter, 0.0, 1.0, "Per-column height jitter"),
            "base_min": schema_number(d.base_min, 0.0, 1.0, "Lowest tower"),
            "base_max": schema_number(d.base_max, 0.0, 1.0, "Highest tower"),
            "margin": schema_number(d.margin, 0.0, 0.45, "Gap trimmed from each end of a window line"),
            "window_fill": schema_number(d.window_fill, 0.0, 1.0, "Fraction of lit windows"),
            "grow_speed": schema_number(d.grow_speed, 0.0, 10.0, "Growth oscillation speed"),
            "line_width": schema_number(d.line_width, 1.0, 10.0, "Line width in pixels"),
            "seed": schema_number(d.seed, 0.0, 1000.0, "Layout seed"),
        })
    }

    fn resize(&mut self, viewport: Viewport) {
        let layout = ColumnLayout::build(&self.params, viewport);
        tracing::debug!(
            width = viewport.width(),
            height = viewport.height(),
            cols = layout.heights.len(),
            "growing-lines layout rebuilt"
        );
        self.layout = Some(layout);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(scene: &mut GrowingLines, t: f64, w: usize, h: usize) -> Raster {
        let vp = Viewport::new(w, h);
        let mut raster = Raster::for_viewport(vp, scene.background()).unwrap();
        scene.render(&FrameContext::new(t, vp), &mut raster).unwrap();
        raster
    }

    #[test]
    fn layout_heights_stay_in_profile_range() {
        let p = GrowingLinesParams::default();
        let layout = ColumnLayout::build(&p, Viewport::new(220, 100));
        assert_eq!(layout.heights.len(), 110);
        assert_eq!(layout.col_width, 2.0);
        for &h in &layout.heights {
            assert!((5.0..=99.0 + 1e-9).contains(&h));
        }
        for &ph in &layout.phases {
            assert!((0.0..TAU).contains(&ph));
        }
    }

    #[test]
    fn top_row_never_exceeds_the_grid() {
        let p = GrowingLinesParams {
            rows: 4,
            ..GrowingLinesParams::default()
        };
        let layout = ColumnLayout::build(&p, Viewport::new(110, 40));
        for c in 0..110 {
            for k in 0..20 {
                assert!(layout.top_row(c, 4, k as f64 * 0.37, 0.9) <= 3);
            }
        }
    }

    #[test]
    fn window_fill_bounds_light_all_or_nothing() {
        let full = GrowingLinesParams {
            window_fill: 1.0,
            ..GrowingLinesParams::default()
        };
        let none = GrowingLinesParams {
            window_fill: 0.0,
            ..GrowingLinesParams::default()
        };
        for c in 0..30 {
            for r in 0..30 {
                assert!(full.window_on(c, r));
                assert!(!none.window_on(c, r));
            }
        }
    }

    #[test]
    fn no_fill_draws_nothing() {
        let mut scene = GrowingLines::from_json(&json!({"window_fill": -0.1}));
        let raster = render(&mut scene, 1.0, 60, 40);
        assert!(raster.pixels().iter().all(|&c| c == scene.background()));
    }

    #[test]
    fn top_margin_rows_stay_dark() {
        // margin trims each line so the top pixel row is never stroked
        let mut scene = GrowingLines::from_json(&json!({"window_fill": 1.0, "rows": 10}));
        let raster = render(&mut scene, 0.4, 110, 100);
        let bg = scene.background();
        for x in 0..110 {
            assert_eq!(raster.get(x, 0).unwrap(), bg);
        }
        assert!(raster.pixels().iter().any(|&c| c != bg));
    }

    #[test]
    fn resize_rebuilds_for_new_height() {
        let mut scene = GrowingLines::new(GrowingLinesParams::default());
        scene.resize(Viewport::new(110, 50));
        let short = scene.layout().unwrap().heights.clone();
        scene.resize(Viewport::new(110, 100));
        let tall = &scene.layout().unwrap().heights;
        for (a, b) in short.iter().zip(tall) {
            assert!((b - 2.0 * a).abs() < 1e-9);
        }
    }
}
