//! Static poster: translucent gridded towers on white, with a ragged row
//! of small dark blocks along the bottom third.

use citylights_core::hash::seeded_hash;
use citylights_core::params::{param_color, schema_color};
use citylights_core::scene::check_raster;
use citylights_core::{FrameContext, Raster, Scene, SceneError, Srgb};
use serde_json::{json, Value};

/// A gridded tower, geometry in percent of the surface (y down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridTower {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Grid pitch, in percent of the surface width.
    pub cell: f64,
    pub fill: u32,
    pub line_alpha: f64,
    pub alpha: f64,
}

const fn tower(x: f64, y: f64, width: f64, height: f64, cell: f64, fill: u32, line_alpha: f64, alpha: f64) -> GridTower {
    GridTower {
        x,
        y,
        width,
        height,
        cell,
        fill,
        line_alpha,
        alpha,
    }
}

/// Back to front.
pub const TOWERS: &[GridTower] = &[
    tower(77.0, 12.0, 14.0, 66.0, 0.6, 0xffd7e3, 0.08, 0.55),
    tower(84.0, 18.0, 10.0, 60.0, 0.6, 0xcdd0d6, 0.08, 0.55),
    tower(10.0, 16.0, 16.0, 64.0, 0.6, 0xc9d6de, 0.08, 0.9),
    tower(22.0, 36.0, 8.0, 40.0, 0.6, 0xa9c0cc, 0.08, 0.9),
    tower(37.0, 28.0, 14.0, 46.0, 0.7, 0xffb3c6, 0.10, 0.75),
    tower(44.0, 22.0, 16.0, 54.0, 0.7, 0xaeb7c1, 0.10, 0.9),
    tower(52.0, 36.0, 12.0, 36.0, 0.7, 0xff9fb4, 0.10, 0.8),
];

/// Blocks stand on this fraction of the height.
const BLOCK_BASE: f64 = 0.72;
const BLOCK_MIN_H: f64 = 0.04;
const BLOCK_MAX_H: f64 = 0.22;
const BLOCK_DETAIL_ALPHA: f64 = 0.08;

/// `floor(size * percent / 100)`.
fn pct(size: f64, percent: f64) -> f64 {
    (size * percent / 100.0).floor()
}

/// Grid line positions from `start` every `pitch` up to `end` inclusive
/// (with half a pixel of slack).
fn grid_lines(start: f64, end: f64, pitch: f64) -> impl Iterator<Item = f64> {
    let pitch = pitch.max(1.0);
    let count = ((end + 0.5 - start) / pitch).floor().max(-1.0) as i64 + 1;
    (0..count.max(0)).map(move |i| start + i as f64 * pitch)
}

fn draw_tower(raster: &mut Raster, t: &GridTower, w: f64, h: f64) {
    let (x, y) = (pct(w, t.x), pct(h, t.y));
    let (tw, th) = (pct(w, t.width), pct(h, t.height));
    let cell = pct(w, t.cell).max(1.0);
    raster.fill_rect(x, y, x + tw, y + th, Srgb::from_u32(t.fill), t.alpha);

    let line_w = (cell * 0.06).floor().max(1.0);
    let line_alpha = t.line_alpha * t.alpha;
    for yy in grid_lines(y, y + th, cell) {
        raster.stroke_hline(yy, x, x + tw, line_w, Srgb::BLACK, line_alpha);
    }
    for xx in grid_lines(x, x + tw, cell) {
        raster.stroke_vline(xx, y, y + th, line_w, Srgb::BLACK, line_alpha);
    }
}

/// One silhouette block: `(x, width, height)` in pixels.
pub fn bottom_blocks(w: f64, h: f64) -> Vec<(f64, f64, f64)> {
    let rng = |n: f64| seeded_hash(n, 0.0);
    let min_h = (h * BLOCK_MIN_H).floor();
    let max_h = (h * BLOCK_MAX_H).floor();
    let col_w = (w * 0.01).floor().max(6.0);

    let mut blocks = Vec::new();
    let mut x = 0.0;
    let mut i = 0.0;
    while x < w {
        let width = col_w + (rng(i + 1.0) * col_w * 1.2).floor();
        let height = min_h + (rng(i + 7.0) * (max_h - min_h)).floor();
        blocks.push((x, width, height));
        x += width + (rng(i + 11.0) * 3.0).floor();
        i += 1.0;
    }
    blocks
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridTowersParams {
    pub bg: Srgb,
    pub block: Srgb,
}

impl Default for GridTowersParams {
    fn default() -> Self {
        Self {
            bg: Srgb::WHITE,
            block: Srgb::from_u32(0x0a0a0a),
        }
    }
}

impl GridTowersParams {
    pub fn from_json(params: &Value) -> Self {
        let d = Self::default();
        Self {
            bg: param_color(params, "bg", d.bg),
            block: param_color(params, "block", d.block),
        }
    }
}

pub struct GridTowers {
    params: GridTowersParams,
}

impl GridTowers {
    pub fn new(params: GridTowersParams) -> Self {
        Self { params }
    }

    pub fn from_json(params: &Value) -> Self {
        Self::new(GridTowersParams::from_json(params))
    }
}

impl Scene for GridTowers {
    fn background(&self) -> Srgb {
        self.params.bg
    }

    fn render(&mut self, ctx: &FrameContext, raster: &mut Raster) -> Result<(), SceneError> {
        check_raster(ctx, raster)?;
        let p = &self.params;
        let (w, h) = (ctx.viewport.width() as f64, ctx.viewport.height() as f64);
        raster.fill(p.bg);
        for t in TOWERS {
            draw_tower(raster, t, w, h);
        }

        let base = (h * BLOCK_BASE).floor();
        for (x, width, height) in bottom_blocks(w, h) {
            let top = base - height;
            raster.fill_rect(x, top, x + width, base, p.block, 1.0);
            let cell = (width * 0.35).floor().max(6.0);
            let mut yy = top + cell;
            while yy < base {
                raster.stroke_hline(yy, x, x + width, 1.0, Srgb::WHITE, BLOCK_DETAIL_ALPHA);
                yy += cell;
            }
            let mut xx = x + cell;
            while xx < x + width {
                raster.stroke_vline(xx, top, base, 1.0, Srgb::WHITE, BLOCK_DETAIL_ALPHA);
                xx += cell;
            }
        }
        Ok(())
    }

    fn params(&self) -> Value {
        json!({
            "bg": self.params.bg.to_hex(),
            "block": self.params.block.to_hex(),
        })
    }

    fn param_schema(&self) -> Value {
        let d = GridTowersParams::default();
        json!({
            "bg": schema_color(d.bg, "Background color"),
            "block": schema_color(d.block, "Silhouette block color"),
        })
    }
}
