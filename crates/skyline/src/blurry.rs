//! Soft-focus skyline: three parallax layers of breathing towers, each
//! vertically blurred, summed and tone-mapped with an exposure curve.

use crate::column::{ColumnMotion, MotionSalts, Salt};
use crate::layer::{vertical_blur, weighted, ParallaxLayer};
use citylights_core::compose::{contrast, exposure, render_fullscreen, Fragment, PixelShader};
use citylights_core::params::{param_color, param_f64, schema_color, schema_number};
use citylights_core::shading::smoothstep;
use citylights_core::{FrameContext, Raster, Scene, SceneError, Srgb};
use glam::DVec2;
use serde_json::{json, Value};

const SALTS: MotionSalts = MotionSalts {
    base: Salt::new(13.17, 19.73),
    amp: Salt::new(31.7, 7.1),
    phase: Salt::new(17.7, 9.1),
};

const LAYER_WEIGHTS: [f64; 3] = [1.15, 0.8, 0.55];
const HEIGHT_CLAMP: (f64, f64) = (0.04, 0.99);
const OVERSHOOT_DAMPING: f64 = 0.55;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlurryCityParams {
    pub fg: Srgb,
    pub bg: Srgb,
    /// Near, mid, far column counts.
    pub cols: [f64; 3],
    pub speeds: [f64; 3],
    /// Blur radius per layer in pixels.
    pub blur_px: [f64; 3],
    pub base_min: f64,
    pub base_max: f64,
    pub amp_min: f64,
    pub amp_max: f64,
    /// How much a tower narrows as it rises.
    pub squeeze: f64,
    pub overshoot: f64,
    pub contrast: f64,
    pub grain: f64,
    pub exposure: f64,
}

impl Default for BlurryCityParams {
    fn default() -> Self {
        Self {
            fg: Srgb::WHITE,
            bg: Srgb::BLACK,
            cols: [120.0, 80.0, 48.0],
            speeds: [0.22, 0.16, 0.10],
            blur_px: [2.6, 3.6, 5.0],
            base_min: 0.25,
            base_max: 0.92,
            amp_min: 0.08,
            amp_max: 0.34,
            squeeze: 0.18,
            overshoot: 0.28,
            contrast: 1.2,
            grain: 0.03,
            exposure: 1.7,
        }
    }
}

impl BlurryCityParams {
    /// Extracts parameters from a JSON object, falling back to defaults.
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
            blur_px: triple("blur", d.blur_px),
            base_min: param_f64(params, "base_min", d.base_min),
            base_max: param_f64(params, "base_max", d.base_max),
            amp_min: param_f64(params, "amp_min", d.amp_min),
            amp_max: param_f64(params, "amp_max", d.amp_max),
            squeeze: param_f64(params, "squeeze", d.squeeze),
            overshoot: param_f64(params, "overshoot", d.overshoot),
            contrast: param_f64(params, "contrast", d.contrast),
            grain: param_f64(params, "grain", d.grain),
            exposure: param_f64(params, "exposure", d.exposure),
        }
    }
}

/// The blurred parallax skyline.
pub struct BlurryCity {
    params: BlurryCityParams,
    layers: [ParallaxLayer; 3],
}

impl BlurryCity {
    pub fn new(params: BlurryCityParams) -> Self {
        let layers = [0_usize, 1, 2].map(|i| {
            ParallaxLayer::new(params.cols[i], params.speeds[i], (i + 1) as f64)
        });
        Self { params, layers }
    }

    pub fn from_json(params: &Value) -> Self {
        Self::new(BlurryCityParams::from_json(params))
    }

    pub fn motion(&self, col: f64, seed: f64) -> ColumnMotion {
        let p = &self.params;
        SALTS.motion(col, seed, (p.base_min, p.base_max), (p.amp_min, p.amp_max))
    }

    /// Unblurred coverage of one layer at `uv`.
    pub fn coverage(&self, layer: &ParallaxLayer, uv: DVec2, t: f64) -> f64 {
        let p = &self.params;
        let (col, xf) = layer.column(uv);
        let xf = xf - 0.5;
        let m = self.motion(col, layer.seed);
        let arg = m.arg(t, layer.speed);
        let h = m
            .overshoot_height(arg, p.overshoot, OVERSHOOT_DAMPING)
            .clamp(HEIGHT_CLAMP.0, HEIGHT_CLAMP.1);

        let half = 0.5 * (1.0 - 0.65 * p.squeeze * arg.cos());
        let body_x = smoothstep(0.0, 0.02, half - xf.abs());
        let body_y = smoothstep(0.0, 0.015, h - uv.y);
        let shade = 0.65 + 0.35 * smoothstep(0.0, 1.0, uv.y / h.max(1e-4));
        body_x * body_y * shade
    }
}

impl PixelShader for BlurryCity {
    fn shade(&self, uv: DVec2, ctx: &FrameContext) -> Fragment {
        let px = 1.0 / ctx.resolution().y;
        let mut lit = [0.0; 3];
        for (i, layer) in self.layers.iter().enumerate() {
            let radius = self.params.blur_px[i] * px;
            lit[i] = vertical_blur(uv, radius, |p| self.coverage(layer, p, ctx.time));
        }
        let lights = weighted(&[
            (LAYER_WEIGHTS[0], lit[0]),
            (LAYER_WEIGHTS[1], lit[1]),
            (LAYER_WEIGHTS[2], lit[2]),
        ]) + smoothstep(0.0, 0.6, uv.y) * 0.02;
        Fragment {
            intensity: contrast(exposure(lights, self.params.exposure), self.params.contrast),
            fg: self.params.fg,
        }
    }
}

impl Scene for BlurryCity {
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
            "blur_near": p.blur_px[0],
            "blur_mid": p.blur_px[1],
            "blur_far": p.blur_px[2],
            "base_min": p.base_min,
            "base_max": p.base_max,
            "amp_min": p.amp_min,
            "amp_max": p.amp_max,
            "squeeze": p.squeeze,
            "overshoot": p.overshoot,
            "contrast": p.contrast,
            "grain": p.grain,
            "exposure": p.exposure,
        })
    }

    fn param_schema(&self) -> Value {
        let d = BlurryCityParams::default();
        json!({
            "fg": schema_color(d.fg, "Tower color"),
            "bg": schema_color(d.bg, "Sky color"),
            "cols_near": schema_number(d.cols[0], 1.0, 400.0, "Columns in the near layer"),
            "cols_mid": schema_number(d.cols[1], 1.0, 400.0, "Columns in the mid layer"),
            "cols_far": schema_number(d.cols[2], 1.0, 400.0, "Columns in the far layer"),
            "speed_near": schema_number(d.speeds[0], 0.0, 2.0, "Oscillation speed, near layer"),
            "speed_mid": schema_number(d.speeds[1], 0.0, 2.0, "Oscillation speed, mid layer"),
            "speed_far": schema_number(d.speeds[2], 0.0, 2.0, "Oscillation speed, far layer"),
            "blur_near": schema_number(d.blur_px[0], 0.0, 20.0, "Vertical blur radius in pixels, near layer"),
            "blur_mid": schema_number(d.blur_px[1], 0.0, 20.0, "Vertical blur radius in pixels, mid layer"),
            "blur_far": schema_number(d.blur_px[2], 0.0, 20.0, "Vertical blur radius in pixels, far layer"),
            "base_min": schema_number(d.base_min, 0.0, 1.0, "Lowest resting tower height"),
            "base_max": schema_number(d.base_max, 0.0, 1.0, "Highest resting tower height"),
            "amp_min": schema_number(d.amp_min, 0.0, 1.0, "Smallest oscillation amplitude"),
            "amp_max": schema_number(d.amp_max, 0.0, 1.0, "Largest oscillation amplitude"),
            "squeeze": schema_number(d.squeeze, 0.0, 1.0, "Width squash as towers rise"),
            "overshoot": schema_number(d.overshoot, 0.0, 1.0, "Damped wobble on top of the sine"),
            "contrast": schema_number(d.contrast, 0.1, 4.0, "Exponent applied to light"),
            "grain": schema_number(d.grain, 0.0, 0.5, "Film grain amount"),
            "exposure": schema_number(d.exposure, 0.0, 5.0, "Exposure curve strength"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use citylights_core::compose::intensity_field;
    use citylights_core::Viewport;

    #[test]
    fn defaults_match_documented_values() {
        let p = BlurryCityParams::default();
        assert_eq!(p.cols, [120.0, 80.0, 48.0]);
        assert_eq!(p.blur_px, [2.6, 3.6, 5.0]);
        assert!((p.exposure - 1.7).abs() < f64::EPSILON);
    }

    #[test]
    fn from_json_reads_layer_triples_and_colors() {
        let p = BlurryCityParams::from_json(&json!({
            "cols_far": 30,
            "speed_near": 0.5,
            "fg": "#ff0000",
            "bg": "bogus",
        }));
        assert_eq!(p.cols, [120.0, 80.0, 30.0]);
        assert!((p.speeds[0] - 0.5).abs() < f64::EPSILON);
        assert_eq!(p.fg.to_hex(), "#ff0000");
        assert_eq!(p.bg, Srgb::BLACK);
    }

    #[test]
    fn near_layer_first_column_uses_reference_hash() {
        let city = BlurryCity::new(BlurryCityParams::default());
        let m = city.motion(0.0, 1.0);
        assert!((m.base - (0.25 + 0.67 * 0.7900962907806388)).abs() < 1e-9);
    }

    #[test]
    fn zero_columns_are_clamped_to_one() {
        let city = BlurryCity::from_json(&json!({"cols_near": 0, "cols_mid": -4}));
        assert_eq!(city.layers[0].cols(), 1.0);
        assert_eq!(city.layers[1].cols(), 1.0);
    }

    #[test]
    fn coverage_is_zero_above_every_tower() {
        let city = BlurryCity::new(BlurryCityParams::default());
        for x in 0..50 {
            let uv = DVec2::new(x as f64 / 50.0, 0.999);
            assert_eq!(city.coverage(&city.layers[0], uv, 1.3), 0.0);
        }
    }

    #[test]
    fn rendering_is_deterministic() {
        let vp = Viewport::new(24, 16);
        let ctx = FrameContext::new(2.5, vp);
        let mut a = BlurryCity::new(BlurryCityParams::default());
        let mut b = BlurryCity::new(BlurryCityParams::default());
        let mut ra = Raster::for_viewport(vp, a.background()).unwrap();
        let mut rb = Raster::for_viewport(vp, b.background()).unwrap();
        a.render(&ctx, &mut ra).unwrap();
        b.render(&ctx, &mut rb).unwrap();
        for (pa, pb) in ra.pixels().iter().zip(rb.pixels()) {
            assert_eq!(pa.r.to_bits(), pb.r.to_bits());
        }
    }

    #[test]
    fn lower_half_is_brighter_than_sky() {
        let city = BlurryCity::new(BlurryCityParams::default());
        let ctx = FrameContext::new(0.0, Viewport::new(32, 32));
        let field = intensity_field(&city, &ctx).unwrap();
        let row_mean = |y: usize| (0..32).map(|x| field.get(x, y).unwrap()).sum::<f64>() / 32.0;
        assert!(row_mean(31) > row_mean(0));
    }

    #[test]
    fn schema_covers_every_param() {
        let city = BlurryCity::new(BlurryCityParams::default());
        let params = city.params();
        let schema = city.param_schema();
        for key in params.as_object().unwrap().keys() {
            assert!(schema.get(key).is_some(), "schema missing {key}");
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn intensity_is_bounded(
                x in 0.0_f64..1.0,
                y in 0.0_f64..1.0,
                t in 0.0_f64..1000.0,
            ) {
                let city = BlurryCity::new(BlurryCityParams::default());
                let ctx = FrameContext::new(t, Viewport::new(640, 360));
                let i = city.shade(DVec2::new(x, y), &ctx).intensity;
                prop_assert!((0.0..=1.0).contains(&i), "intensity {i}");
            }
        }
    }
}
