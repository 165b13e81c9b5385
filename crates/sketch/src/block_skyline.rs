//! Soft grey building blocks and white window bars that slowly breathe
//! taller and shorter, each on its own period, blurred together.

use crate::easing::{Breathe, CubicBezier};
use citylights_core::params::{param_color, param_f64, schema_color, schema_number};
use citylights_core::scene::check_raster;
use citylights_core::{FrameContext, Raster, Scene, SceneError, Srgb};
use serde_json::{json, Value};

/// Fill of one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Building,
    BuildingDark,
    Window,
}

/// One animated block, positions in percent of the surface, measured
/// from the bottom-left corner. Blocks grow upward from their bottom edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Block {
    pub left: f64,
    pub bottom: f64,
    pub width: f64,
    pub height: f64,
    pub tone: Tone,
    pub period: f64,
    pub delay: f64,
}

const fn block(left: f64, bottom: f64, width: f64, height: f64, tone: Tone, period: f64, delay: f64) -> Block {
    Block {
        left,
        bottom,
        width,
        height,
        tone,
        period,
        delay,
    }
}

use Tone::{Building as B, BuildingDark as D, Window as W};

/// Painted in order; later blocks cover earlier ones.
pub const BLOCKS: &[Block] = &[
    // buildings
    block(0.0, 0.0, 30.0, 68.0, B, 13.0, 0.2),
    block(30.0, 0.0, 12.0, 54.0, B, 14.0, 0.8),
    block(42.0, 0.0, 18.0, 42.0, D, 15.0, 1.1),
    block(40.0, 0.0, 24.0, 62.0, B, 12.0, 0.6),
    block(64.0, 0.0, 36.0, 42.0, D, 16.0, 0.4),
    block(66.0, 0.0, 3.0, 22.0, B, 13.5, 0.3),
    block(70.0, 0.0, 3.0, 18.0, D, 12.4, 0.7),
    block(74.0, 0.0, 3.0, 24.0, B, 14.2, 1.0),
    block(78.0, 0.0, 3.0, 20.0, D, 12.9, 0.5),
    block(82.0, 0.0, 3.0, 26.0, B, 15.1, 0.9),
    block(86.0, 0.0, 3.0, 19.0, D, 13.8, 1.3),
    block(90.0, 0.0, 3.0, 23.0, B, 14.7, 0.4),
    block(94.0, 0.0, 3.0, 21.0, D, 12.6, 0.8),
    // door
    block(7.0, 0.0, 5.0, 26.0, W, 11.2, 0.3),
    // left window grid
    block(2.4, 58.0, 1.2, 7.0, W, 10.2, 0.1),
    block(4.2, 58.0, 1.2, 7.0, W, 11.0, 0.5),
    block(6.0, 58.0, 1.2, 7.0, W, 12.1, 0.9),
    block(7.8, 58.0, 1.2, 7.0, W, 10.6, 1.2),
    block(2.4, 49.0, 1.2, 7.0, W, 11.4, 0.35),
    block(4.2, 49.0, 1.2, 7.0, W, 12.2, 0.75),
    block(6.0, 49.0, 1.2, 7.0, W, 10.1, 1.05),
    block(7.8, 49.0, 1.2, 7.0, W, 11.0, 1.45),
    // step windows
    block(31.5, 53.0, 1.2, 7.0, W, 12.6, 0.25),
    block(33.3, 53.0, 1.2, 7.0, W, 11.3, 0.65),
    block(35.1, 53.0, 1.2, 7.0, W, 10.5, 1.05),
    block(31.5, 44.0, 1.2, 7.0, W, 10.9, 0.15),
    block(33.3, 44.0, 1.2, 7.0, W, 12.8, 0.55),
    block(35.1, 44.0, 1.2, 7.0, W, 11.6, 1.0),
    // centre tower
    block(43.0, 49.0, 2.4, 12.0, W, 11.7, 0.4),
    block(46.2, 49.0, 2.4, 12.0, W, 10.6, 0.9),
    block(50.6, 49.0, 1.0, 12.0, W, 12.4, 0.2),
    block(52.2, 49.0, 1.0, 12.0, W, 10.9, 0.6),
    block(53.8, 49.0, 1.0, 12.0, W, 10.2, 1.0),
    block(55.4, 49.0, 1.0, 12.0, W, 13.1, 1.3),
    // right-hand specks
    block(67.0, 50.0, 0.8, 6.0, W, 10.8, 0.15),
    block(69.0, 52.0, 0.8, 6.0, W, 11.6, 0.35),
    block(71.0, 48.0, 0.8, 6.0, W, 12.2, 0.65),
    block(73.0, 55.0, 0.8, 6.0, W, 10.5, 0.95),
    block(75.0, 51.0, 0.8, 6.0, W, 11.9, 1.15),
    block(77.0, 53.0, 0.8, 6.0, W, 12.7, 0.25),
    block(79.0, 49.0, 0.8, 6.0, W, 10.2, 0.55),
    block(81.0, 56.0, 0.8, 6.0, W, 11.4, 0.85),
    block(83.0, 50.0, 0.8, 6.0, W, 12.9, 1.05),
    block(85.0, 52.0, 0.8, 6.0, W, 10.7, 1.25),
    block(87.0, 54.0, 0.8, 6.0, W, 11.8, 1.4),
    block(89.0, 49.0, 0.8, 6.0, W, 12.5, 1.6),
];

/// Lowest and highest vertical scale of the breathing keyframes.
pub const SCALE_RANGE: (f64, f64) = (0.82, 1.18);

impl Block {
    pub fn scale(&self, t: f64) -> f64 {
        Breathe {
            from: SCALE_RANGE.0,
            to: SCALE_RANGE.1,
            duration: self.period,
            delay: self.delay,
            curve: CubicBezier::EASE_IN_OUT,
        }
        .value(t)
    }

    /// Pixel rectangle `(x0, y0, x1, y1)` (y down) at time `t`.
    pub fn rect(&self, t: f64, width: f64, height: f64) -> (f64, f64, f64, f64) {
        let x0 = self.left / 100.0 * width;
        let x1 = x0 + self.width / 100.0 * width;
        let base = height - self.bottom / 100.0 * height;
        let top = base - self.height / 100.0 * height * self.scale(t);
        (x0, top, x1, base)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockSkylineParams {
    pub sky_top: Srgb,
    pub sky_bottom: Srgb,
    pub building: Srgb,
    pub building_dark: Srgb,
    pub window: Srgb,
    pub blur: f64,
}

impl Default for BlockSkylineParams {
    fn default() -> Self {
        Self {
            sky_top: Srgb::BLACK,
            sky_bottom: Srgb::BLACK,
            building: Srgb::from_u32(0xb0adb1),
            building_dark: Srgb::from_u32(0xa9a7ab),
            window: Srgb::WHITE,
            blur: 3.0,
        }
    }
}

impl BlockSkylineParams {
    pub fn from_json(params: &Value) -> Self {
        let d = Self::default();
        Self {
            sky_top: param_color(params, "sky_top", d.sky_top),
            sky_bottom: param_color(params, "sky_bottom", d.sky_bottom),
            building: param_color(params, "building", d.building),
            building_dark: param_color(params, "building_dark", d.building_dark),
            window: param_color(params, "window", d.window),
            blur: param_f64(params, "blur", d.blur),
        }
    }

    pub fn tone(&self, tone: Tone) -> Srgb {
        match tone {
            Tone::Building => self.building,
            Tone::BuildingDark => self.building_dark,
            Tone::Window => self.window,
        }
    }
}

pub struct BlockSkyline {
    params: BlockSkylineParams,
}

impl BlockSkyline {
    pub fn new(params: BlockSkylineParams) -> Self {
        Self { params }
    }

    pub fn from_json(params: &Value) -> Self {
        Self::new(BlockSkylineParams::from_json(params))
    }
}

impl Scene for BlockSkyline {
    fn background(&self) -> Srgb {
        self.params.sky_top
    }

    fn render(&mut self, ctx: &FrameContext, raster: &mut Raster) -> Result<(), SceneError> {
        check_raster(ctx, raster)?;
        let p = &self.params;
        let (w, h) = (ctx.viewport.width() as f64, ctx.viewport.height() as f64);
        raster.fill_vertical_gradient(&[(0.0, p.sky_top), (1.0, p.sky_bottom)]);
        for b in BLOCKS {
            let (x0, y0, x1, y1) = b.rect(ctx.time, w, h);
            raster.fill_rect(x0, y0, x1, y1, p.tone(b.tone), 1.0);
        }
        raster.gaussian_blur(p.blur);
        Ok(())
    }

    fn params(&self) -> Value {
        let p = &self.params;
        json!({
            "sky_top": p.sky_top.to_hex(),
            "sky_bottom": p.sky_bottom.to_hex(),
            "building": p.building.to_hex(),
            "building_dark": p.building_dark.to_hex(),
            "window": p.window.to_hex(),
            "blur": p.blur,
        })
    }

    fn param_schema(&self) -> Value {
        let d = BlockSkylineParams::default();
        json!({
            "sky_top": schema_color(d.sky_top, "Sky gradient top"),
            "sky_bottom": schema_color(d.sky_bottom, "Sky gradient bottom"),
            "building": schema_color(d.building, "Light building blocks"),
            "building_dark": schema_color(d.building_dark, "Dark building blocks"),
            "window": schema_color(d.window, "Window bars"),
            "blur": schema_number(d.blur, 0.0, 20.0, "Blur radius in pixels"),
        })
    }
}
