//! Stacked box bars: each column is a stack of long boxes that breathes up
//! and down, with whole boxes flicking on and off like office lights.

use crate::column::{MotionSalts, Salt};
use crate::layer::{weighted, ParallaxLayer};
use citylights_core::compose::{contrast, render_fullscreen, Fragment, PixelShader};
use citylights_core::hash::{fract, hash};
use citylights_core::params::{param_color, param_f64, schema_color, schema_number};
use citylights_core::shading::{clamp01, mix, smoothstep, step};
use citylights_core::{FrameContext, Raster, Scene, SceneError, Srgb};
use glam::DVec2;
use serde_json::{json, Value};

const SALTS: MotionSalts = MotionSalts {
    base: Salt::new(7.1, 3.2),
    amp: Salt::new(5.3, 8.9),
    phase: Salt::new(17.7, 9.1),
};
const SPEED_JITTER: Salt = Salt::new(23.1, 4.6);
const SEGMENT: Salt = Salt::new(41.3, 2.1);
const FLICKER_RATE: Salt = Salt::new(2.7, 1.9);

/// Far, mid, near: layer seed, row scale, weight.
const LAYERS: [(f64, f64, f64); 3] = [(1.0, 0.8, 0.6), (2.0, 1.0, 0.9), (3.0, 1.2, 1.2)];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CityBarsParams {
    pub fg: Srgb,
    pub bg: Srgb,
    /// Near, mid, far column counts.
    pub cols: [f64; 3],
    pub speeds: [f64; 3],
    pub rows: f64,
    pub gap_x: f64,
    pub gap_y: f64,
    /// Rows per box, drawn per column between these bounds.
    pub seg_min: f64,
    pub seg_max: f64,
    pub grain: f64,
    pub contrast: f64,
}

impl Default for CityBarsParams {
    fn default() -> Self {
        Self {
            fg: Srgb::from_u32(0xd8dee3),
            bg: Srgb::from_u32(0x0b0f12),
            cols: [60.0, 42.0, 28.0],
            speeds: [0.5, 0.35, 0.25],
            rows: 64.0,
            gap_x: 0.04,
            gap_y: 0.08,
            seg_min: 6.0,
            seg_max: 14.0,
            grain: 0.05,
            contrast: 1.15,
        }
    }
}

impl CityBarsParams {
    pub fn from_json(params: &Value) -> Self {
        let d = Self::default();
        let triple = |prefix: &str, defaults: [f64; 3]| {
            [
                param_f64(params, &format!("{prefix}_near"), defaults[0]),
                param_f64(params, &format!("{prefix}_mid"), defaults[1]),
                param_f64(params, &format!("{prefix}_far"), defaults[2]),
            ]
        };
        Self {
            fg: param_color(params, "fg", d.fg),
            bg: param_color(params, "bg", d.bg),
            cols: triple("cols", d.cols),
            speeds: triple("speed", d.speeds),
            rows: param_f64(params, "rows", d.rows).max(1.0),
            gap_x: param_f64(params, "gap_x", d.gap_x),
            gap_y: param_f64(params, "gap_y", d.gap_y),
            seg_min: param_f64(params, "seg_min", d.seg_min),
            seg_max: param_f64(params, "seg_max", d.seg_max),
            grain: param_f64(params, "grain", d.grain),
            contrast: param_f64(params, "contrast", d.contrast),
        }
    }
}

pub struct CityBars {
    params: CityBarsParams,
    /// Far, mid, near.
    layers: [(ParallaxLayer, f64, f64); 3],
}

impl CityBars {
    pub fn new(params: CityBarsParams) -> Self {
        // cols/speeds are stored near-first; layers run far-first
        let layers = [0_usize, 1, 2].map(|i| {
            let (seed, row_scale, weight) = LAYERS[i];
            let j = 2 - i;
            (
                ParallaxLayer::new(params.cols[j], params.speeds[j], seed),
                params.rows * row_scale,
                weight,
            )
        });
        Self { params, layers }
    }

    pub fn from_json(params: &Value) -> Self {
        Self::new(CityBarsParams::from_json(params))
    }

    /// Height of column `col` in [0.05, 0.98].
    pub fn column_height(&self, col: f64, layer: &ParallaxLayer, t: f64) -> f64 {
        let m = SALTS.motion(col, layer.seed, (0.2, 0.95), (0.08, 0.25));
        let speed = layer.speed * mix(0.7, 1.3, SPEED_JITTER.sample(col, layer.seed));
        m.height(m.arg(t, speed)).clamp(0.05, 0.98)
    }

    /// Rows per box for column `col`, at least one.
    pub fn segment_len(&self, col: f64, seed: f64) -> f64 {
        let p = &self.params;
        mix(p.seg_min, p.seg_max, SEGMENT.sample(col, seed))
            .floor()
            .max(1.0)
    }

    fn layer(&self, uv: DVec2, layer: &ParallaxLayer, rows: f64, t: f64) -> f64 {
        let p = &self.params;
        let seed = layer.seed;
        let (col, xf) = layer.column(uv);
        let body_x = step(p.gap_x, xf) * step(p.gap_x, 1.0 - xf);

        let h = self.column_height(col, layer, t);
        let seg_len = self.segment_len(col, seed);
        let y_idx = (uv.y * rows).floor();
        let y_top = (h * rows).floor();
        let below = step(y_idx, y_top);
        let y_in_seg = fract(uv.y * rows / seg_len);
        let body_y = step(p.gap_y, y_in_seg) * step(p.gap_y, 1.0 - y_in_seg);

        let seg_id = (y_idx / seg_len).floor();
        let tick = (t * mix(0.8, 2.0, FLICKER_RATE.sample(col, seed))).floor();
        let flick = step(
            0.45,
            hash(seg_id + col * 31.7 + seed * 11.0 + tick * 13.7),
        );
        body_x * body_y * below * flick
    }
}

impl PixelShader for CityBars {
    fn shade(&self, uv: DVec2, ctx: &FrameContext) -> Fragment {
        let t = ctx.time;
        let lit = self
            .layers
            .map(|(layer, rows, weight)| (weight, self.layer(uv, &layer, rows, t)));
        let lights = clamp01(weighted(&lit));
        let vignette = smoothstep(1.15, 0.35, uv.distance(DVec2::splat(0.5)));
        Fragment {
            intensity: contrast(lights * vignette, self.params.contrast),
            fg: self.params.fg,
        }
    }
}

impl Scene for CityBars {
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
            "fg": p.fg.to_hex(),
            "bg": p.bg.to_hex(),
            "cols_near": p.cols[0],
            "cols_mid": p.cols[1],
            "cols_far": p.cols[2],
            "speed_near": p.speeds[0],
            "speed_mid": p.speeds[1],
            "speed_far": p.speeds[2],
            "rows": p.rows,
            "gap_x": p.gap_x,
            "gap_y": p.gap_y,
            "seg_min": p.seg_min,
            "seg_max": p.seg_max,
            "grain": p.grain,
            "contrast": p.contrast,
        })
    }

    fn param_schema(&self) -> Value {
        let d = CityBarsParams::default();
        json!({
            "fg": schema_color(d.fg, "Lit box color"),
            "bg": schema_color(d.bg, "Background color"),
            "cols_near": schema_number(d.cols[0], 1.0, 300.0, "Columns in the near layer"),
            "cols_mid": schema_number(d.cols[1], 1.0, 300.0, "Columns in the mid layer"),
            "cols_far": schema_number(d.cols[2], 1.0, 300.0, "Columns in the far layer"),
            "speed_near": schema_number(d.speeds[0], 0.0, 3.0, "Breathing speed, near layer"),
            "speed_mid": schema_number(d.speeds[1], 0.0, 3.0, "Breathing speed, mid layer"),
            "speed_far": schema_number(d.speeds[2], 0.0, 3.0, "Breathing speed, far layer"),
            "rows": schema_number(d.rows, 1.0, 256.0, "Vertical resolution of the box grid"),
            "gap_x": schema_number(d.gap_x, 0.0, 0.5, "Gap between columns"),
            "gap_y": schema_number(d.gap_y, 0.0, 0.5, "Gap between boxes"),
            "seg_min": schema_number(d.seg_min, 1.0, 64.0, "Fewest rows per box"),
            "seg_max": schema_number(d.seg_max, 1.0, 64.0, "Most rows per box"),
            "grain": schema_number(d.grain, 0.0, 0.5, "Film grain amount"),
            "contrast": schema_number(d.contrast, 0.1, 4.0, "Exponent applied to light"),
        })
    }
}
