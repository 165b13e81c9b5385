//! Thin extruded lines standing on the ground line, three layers deep,
//! with a slight perspective skew and a centre highlight per line.

use crate::column::{MotionSalts, Salt};
use crate::layer::{weighted, ParallaxLayer};
use citylights_core::compose::{contrast, render_fullscreen, Fragment, PixelShader};
use citylights_core::params::{param_color, param_f64, schema_color, schema_number};
use citylights_core::shading::{clamp01, smoothstep};
use citylights_core::{FrameContext, Raster, Scene, SceneError, Srgb};
use glam::DVec2;
use serde_json::{json, Value};

const SALTS: MotionSalts = MotionSalts {
    base: Salt::new(7.1, 3.0),
    amp: Salt::new(11.7, 5.4),
    phase: Salt::new(13.7, 9.1),
};

const LAYER_WEIGHTS: [f64; 3] = [1.2, 0.8, 0.55];
const BASE_RANGE: (f64, f64) = (0.18, 0.96);
const AMP_RANGE: (f64, f64) = (0.08, 0.36);
const OVERSHOOT_DAMPING: f64 = 0.6;
const SKEW: f64 = 0.06;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineExtrudeParams {
    pub bg: Srgb,
    pub line: Srgb,
    /// Near, mid, far.
    pub cols: [f64; 3],
    pub speeds: [f64; 3],
    /// Line width as a fraction of the column cell.
    pub widths: [f64; 3],
    pub overshoot: f64,
    pub squeeze: f64,
    pub contrast: f64,
    pub grain: f64,
}

impl Default for LineExtrudeParams {
    fn default() -> Self {
        Self {
            bg: Srgb::from_u32(0x020408),
            line: Srgb::from_u32(0xdfe7f2),
            cols: [140.0, 96.0, 64.0],
            speeds: [0.32, 0.22, 0.15],
            widths: [0.34, 0.28, 0.22],
            overshoot: 0.25,
            squeeze: 0.2,
            contrast: 1.18,
            grain: 0.03,
        }
    }
}

impl LineExtrudeParams {
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
            bg: param_color(params, "bg", d.bg),
            line: param_color(params, "line", d.line),
            cols: triple("cols", d.cols),
            speeds: triple("speed", d.speeds),
            widths: triple("width", d.widths),
            overshoot: param_f64(params, "overshoot", d.overshoot),
            squeeze: param_f64(params, "squeeze", d.squeeze),
            contrast: param_f64(params, "contrast", d.contrast),
            grain: param_f64(params, "grain", d.grain),
        }
    }
}

pub struct LineExtrude {
    params: LineExtrudeParams,
    layers: [ParallaxLayer; 3],
}

impl LineExtrude {
    pub fn new(params: LineExtrudeParams) -> Self {
        let layers = [0_usize, 1, 2].map(|i| {
            ParallaxLayer::new(params.cols[i], params.speeds[i], (i + 1) as f64)
        });
        Self { params, layers }
    }

    pub fn from_json(params: &Value) -> Self {
        Self::new(LineExtrudeParams::from_json(params))
    }

    /// Coverage of one layer's line at the (already skewed) `uv`.
    pub fn line(&self, layer: &ParallaxLayer, width: f64, uv: DVec2, t: f64) -> f64 {
        let p = &self.params;
        let (col, xf) = layer.column(uv);
        let xf = xf - 0.5;
        let m = SALTS.motion(col, layer.seed, BASE_RANGE, AMP_RANGE);
        let arg = m.arg(t, layer.speed);
        let h = m
            .overshoot_height(arg, p.overshoot, OVERSHOOT_DAMPING)
            .clamp(0.05, 0.99);

        let half = 0.5 * width * (1.0 - p.squeeze * arg.cos());
        let body_x = smoothstep(0.0, 0.02, half - xf.abs());
        let body_y = smoothstep(0.0, 0.008, h - uv.y);

        let highlight = (-(xf / (half + 1e-4)).powi(2) * 6.0).exp();
        body_x * body_y * (0.75 + 0.25 * highlight)
    }
}

/// Leans the scene slightly so the top drifts right of the bottom.
pub fn skew(uv: DVec2) -> DVec2 {
    DVec2::new(uv.x + (uv.y - 0.5) * SKEW, uv.y)
}

impl PixelShader for LineExtrude {
    fn shade(&self, uv: DVec2, ctx: &FrameContext) -> Fragment {
        let uv = skew(uv);
        let mut lit = [(0.0, 0.0); 3];
        for (i, layer) in self.layers.iter().enumerate() {
            lit[i] = (
                LAYER_WEIGHTS[i],
                self.line(layer, self.params.widths[i], uv, ctx.time),
            );
        }
        Fragment {
            intensity: contrast(clamp01(weighted(&lit)), self.params.contrast),
            fg: self.params.line,
        }
    }
}

impl Scene for LineExtrude {
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
            "line": p.line.to_hex(),
            "cols_near": p.cols[0],
            "cols_mid": p.cols[1],
            "cols_far": p.cols[2],
            "speed_near": p.speeds[0],
            "speed_mid": p.speeds[1],
            "speed_far": p.speeds[2],
            "width_near": p.widths[0],
            "width_mid": p.widths[1],
            "width_far": p.widths[2],
            "overshoot": p.overshoot,
            "squeeze": p.squeeze,
            "contrast": p.contrast,
            "grain": p.grain,
        })
    }

    fn param_schema(&self) -> Value {
        let d = LineExtrudeParams::default();
        json!({
            "bg": schema_color(d.bg, "Background color"),
            "line": schema_color(d.line, "Line color"),
            "cols_near": schema_number(d.cols[0], 1.0, 400.0, "Lines in the near layer"),
            "cols_mid": schema_number(d.cols[1], 1.0, 400.0, "Lines in the mid layer"),
            "cols_far": schema_number(d.cols[2], 1.0, 400.0, "Lines in the far layer"),
            "speed_near": schema_number(d.speeds[0], 0.0, 2.0, "Extrusion speed, near layer"),
            "speed_mid": schema_number(d.speeds[1], 0.0, 2.0, "Extrusion speed, mid layer"),
            "speed_far": schema_number(d.speeds[2], 0.0, 2.0, "Extrusion speed, far layer"),
            "width_near": schema_number(d.widths[0], 0.0, 1.0, "Line width relative to its cell, near layer"),
            "width_mid": schema_number(d.widths[1], 0.0, 1.0, "Line width relative to its cell, mid layer"),
            "width_far": schema_number(d.widths[2], 0.0, 1.0, "Line width relative to its cell, far layer"),
            "overshoot": schema_number(d.overshoot, 0.0, 1.0, "Damped wobble on top of the sine"),
            "squeeze": schema_number(d.squeeze, 0.0, 1.0, "Width squash while rising"),
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
    fn skew_pivots_on_the_middle_row() {
        assert_eq!(skew(DVec2::new(0.3, 0.5)), DVec2::new(0.3, 0.5));
        assert!((skew(DVec2::new(0.3, 1.0)).x - 0.33).abs() < 1e-12);
        assert!((skew(DVec2::new(0.3, 0.0)).x - 0.27).abs() < 1e-12);
    }

    #[test]
    fn line_is_dark_between_columns() {
        let scene = LineExtrude::new(LineExtrudeParams::default());
        let layer = ParallaxLayer::new(10.0, 0.3, 1.0);
        // cell edge, far outside any half-width below 0.5
        let uv = DVec2::new(0.1, 0.02);
        assert_eq!(scene.line(&layer, 0.3, uv, 0.0), 0.0);
    }

    #[test]
    fn line_centre_is_lit_near_the_ground() {
        let scene = LineExtrude::new(LineExtrudeParams::default());
        let layer = ParallaxLayer::new(10.0, 0.3, 1.0);
        let uv = DVec2::new(0.05, 0.0);
        let v = scene.line(&layer, 0.34, uv, 0.0);
        assert!(v > 0.9 && v <= 1.0, "coverage {v}");
    }

    #[test]
    fn zero_width_draws_nothing() {
        let scene = LineExtrude::from_json(&json!({
            "width_near": 0, "width_mid": 0, "width_far": 0
        }));
        let ctx = FrameContext::new(3.0, Viewport::new(64, 64));
        for x in 0..64 {
            let uv = DVec2::new((x as f64 + 0.5) / 64.0, 0.1);
            assert_eq!(scene.shade(uv, &ctx).intensity, 0.0);
        }
    }

    #[test]
    fn params_round_trip_through_json() {
        let scene = LineExtrude::from_json(&json!({"line": "#00ff00", "cols_mid": 12}));
        let again = LineExtrudeParams::from_json(&scene.params());
        assert_eq!(again, scene.params);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn intensity_is_bounded(x in 0.0_f64..1.0, y in 0.0_f64..1.0, t in 0.0_f64..500.0) {
                let scene = LineExtrude::new(LineExtrudeParams::default());
                let ctx = FrameContext::new(t, Viewport::new(320, 200));
                let i = scene.shade(DVec2::new(x, y), &ctx).intensity;
                prop_assert!((0.0..=1.0).contains(&i));
            }
        }
    }
}
