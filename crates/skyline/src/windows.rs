//! Lit-window skyline: a static tower silhouette over a window grid whose
//! cells flicker on and off and glow in colors picked from a palette.

use crate::column::{cell_hash, grid_cell, window_rim};
use citylights_core::compose::{contrast, render_fullscreen, Fragment, PixelShader};
use citylights_core::hash::smooth_noise;
use citylights_core::params::{
    param_color, param_f64, param_palette, schema_color, schema_number,
};
use citylights_core::shading::{smoothstep, step};
use citylights_core::{FrameContext, Palette, Raster, Scene, SceneError, Srgb};
use glam::DVec2;
use serde_json::{json, Value};

const WINDOW_MARGIN: f64 = 0.18;

#[derive(Debug, Clone, PartialEq)]
pub struct WindowsCityParams {
    pub bg: Srgb,
    pub palette: Palette,
    pub cols: f64,
    pub rows: f64,
    pub tower_jitter: f64,
    pub tower_smooth: f64,
    /// Fraction of windows lit at any tick.
    pub window_fill: f64,
    /// Flicker ticks per second.
    pub flicker_rate: f64,
    /// Inner vignette edge; light fades out towards distance 1.25.
    pub vignette: f64,
    pub contrast: f64,
    pub grain: f64,
}

impl Default for WindowsCityParams {
    fn default() -> Self {
        Self {
            bg: Srgb::from_u32(0x05070a),
            palette: Palette::windows(),
            cols: 90.0,
            rows: 60.0,
            tower_jitter: 0.18,
            tower_smooth: 0.35,
            window_fill: 0.55,
            flicker_rate: 1.4,
            vignette: 0.55,
            contrast: 1.2,
            grain: 0.03,
        }
    }
}

impl WindowsCityParams {
    pub fn from_json(params: &Value) -> Self {
        let d = Self::default();
        Self {
            bg: param_color(params, "bg", d.bg),
            palette: param_palette(params, "palette", d.palette),
            cols: param_f64(params, "cols", d.cols).max(1.0),
            rows: param_f64(params, "rows", d.rows).max(1.0),
            tower_jitter: param_f64(params, "tower_jitter", d.tower_jitter),
            tower_smooth: param_f64(params, "tower_smooth", d.tower_smooth),
            window_fill: param_f64(params, "window_fill", d.window_fill),
            flicker_rate: param_f64(params, "flicker_rate", d.flicker_rate),
            vignette: param_f64(params, "vignette", d.vignette),
            contrast: param_f64(params, "contrast", d.contrast),
            grain: param_f64(params, "grain", d.grain),
        }
    }
}

/// Palette slot for window `cell`: `(x + 3y) mod n`, always in `0..n`.
pub fn palette_index(cell: DVec2, n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    let idx = (cell.x + 3.0 * cell.y).rem_euclid(n as f64);
    if idx.is_nan() {
        return 0;
    }
    (idx as usize).min(n - 1)
}

pub struct WindowsCity {
    params: WindowsCityParams,
}

impl WindowsCity {
    pub fn new(params: WindowsCityParams) -> Self {
        Self { params }
    }

    pub fn from_json(params: &Value) -> Self {
        Self::new(WindowsCityParams::from_json(params))
    }

    /// Static roof height of column `col` in [0.05, 0.98].
    pub fn tower_height(&self, col: f64) -> f64 {
        let p = &self.params;
        let jitter = p.tower_jitter * (smooth_noise(col * 0.63) - 0.5);
        let base = 0.15 + 0.75 * smooth_noise(col * p.tower_smooth + 17.3);
        (base + jitter).clamp(0.05, 0.98)
    }

    /// 1.0 when the window cell is lit at time `t`.
    pub fn window_on(&self, cell: DVec2, t: f64) -> f64 {
        let tick = (t * self.params.flicker_rate).floor();
        step(1.0 - self.params.window_fill, cell_hash(cell, tick))
    }
}

impl PixelShader for WindowsCity {
    fn shade(&self, uv: DVec2, ctx: &FrameContext) -> Fragment {
        let p = &self.params;
        let col = (uv.x * p.cols).floor();
        let tower = step(uv.y, self.tower_height(col));

        let (cell, f) = grid_cell(uv, DVec2::new(p.cols, p.rows));
        let lights = window_rim(f, WINDOW_MARGIN) * self.window_on(cell, ctx.time) * tower;
        let vignette = smoothstep(1.25, p.vignette, uv.distance(DVec2::splat(0.5)));

        Fragment {
            intensity: contrast(lights * vignette, p.contrast),
            fg: p.palette.color(palette_index(cell, p.palette.len())),
        }
    }
}

impl Scene for WindowsCity {
    fn background(&self) -> Srgb {
        self.params.bg
    }

    fn render(&mut self, ctx: &FrameContext, raster: &mut Raster) -> Result<(), SceneError> {
        let (bg, grain) = (self.params.bg, self.params.grain);
        render_fullscreen(&*self, bg, grain, ctx, raster)
    }

    fn params(&self) -> Value {
        let p = &self.params;
        let palette: Vec<String> = p.palette.colors().iter().map(|c| c.to_hex()).collect();
        json!({
            "bg": p.bg.to_hex(),
            "palette": palette,
            "cols": p.cols,
            "rows": p.rows,
            "tower_jitter": p.tower_jitter,
            "tower_smooth": p.tower_smooth,
            "window_fill": p.window_fill,
            "flicker_rate": p.flicker_rate,
            "vignette": p.vignette,
            "contrast": p.contrast,
            "grain": p.grain,
        })
    }

    fn param_schema(&self) -> Value {
        let d = WindowsCityParams::default();
        let default_palette: Vec<String> = d.palette.colors().iter().map(|c| c.to_hex()).collect();
        json!({
            "bg": schema_color(d.bg, "Background color"),
            "palette": {
                "type": "palette",
                "default": default_palette,
                "names": Palette::list_names(),
                "description": "Window colors, a palette name or an array of hex strings"
            },
            "cols": schema_number(d.cols, 1.0, 400.0, "Tower columns and window grid width"),
            "rows": schema_number(d.rows, 1.0, 400.0, "Window grid height"),
            "tower_jitter": schema_number(d.tower_jitter, 0.0, 1.0, "Per-column roof jitter"),
            "tower_smooth": schema_number(d.tower_smooth, 0.01, 2.0, "Roofline noise frequency"),
            "window_fill": schema_number(d.window_fill, 0.0, 1.0, "Fraction of lit windows"),
            "flicker_rate": schema_number(d.flicker_rate, 0.0, 10.0, "Flicker ticks per second"),
            "vignette": schema_number(d.vignette, 0.0, 1.25, "Inner vignette radius"),
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
    fn palette_index_wraps_rows_by_three() {
        assert_eq!(palette_index(DVec2::new(0.0, 0.0), 6), 0);
        assert_eq!(palette_index(DVec2::new(5.0, 0.0), 6), 5);
        assert_eq!(palette_index(DVec2::new(0.0, 1.0), 6), 3);
        assert_eq!(palette_index(DVec2::new(4.0, 1.0), 6), 1);
        assert_eq!(palette_index(DVec2::new(89.0, 59.0), 6), 2);
    }

    #[test]
    fn palette_index_handles_degenerate_counts() {
        assert_eq!(palette_index(DVec2::new(7.0, 3.0), 1), 0);
        assert_eq!(palette_index(DVec2::new(7.0, 3.0), 0), 0);
        assert_eq!(palette_index(DVec2::new(f64::NAN, 0.0), 6), 0);
    }

    #[test]
    fn tower_heights_stay_in_range() {
        let city = WindowsCity::new(WindowsCityParams::default());
        for col in 0..90 {
            let h = city.tower_height(col as f64);
            assert!((0.05..=0.98).contains(&h));
        }
    }

    #[test]
    fn full_fill_lights_every_window() {
        let city = WindowsCity::from_json(&json!({"window_fill": 1.0}));
        for t in [0.0, 0.8, 12.0] {
            assert_eq!(city.window_on(DVec2::new(3.0, 4.0), t), 1.0);
        }
        let dark = WindowsCity::from_json(&json!({"window_fill": 0.0}));
        let lit = (0..50).filter(|&i| dark.window_on(DVec2::new(i as f64, 2.0), 0.0) > 0.0);
        assert_eq!(lit.count(), 0);
    }

    #[test]
    fn window_color_comes_from_the_palette() {
        let city = WindowsCity::from_json(&json!({"palette": ["#ff0000", "#00ff00"]}));
        let ctx = FrameContext::new(0.0, Viewport::new(90, 60));
        let frag = city.shade(DVec2::new(0.5 / 90.0, 0.5 / 60.0), &ctx);
        assert_eq!(frag.fg.to_hex(), "#ff0000");
    }

    #[test]
    fn named_palette_is_accepted() {
        let p = WindowsCityParams::from_json(&json!({"palette": "neon"}));
        assert_eq!(p.palette, Palette::neon());
    }

    #[test]
    fn sky_above_the_tallest_tower_is_dark() {
        let city = WindowsCity::new(WindowsCityParams::default());
        let ctx = FrameContext::new(1.0, Viewport::new(90, 60));
        for x in 0..90 {
            let uv = DVec2::new((x as f64 + 0.5) / 90.0, 0.99);
            assert_eq!(city.shade(uv, &ctx).intensity, 0.0);
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn palette_index_is_in_range(
                cx in 0_u32..2000,
                cy in 0_u32..2000,
                n in 1_usize..32,
            ) {
                let idx = palette_index(DVec2::new(cx as f64, cy as f64), n);
                prop_assert!(idx < n);
            }

            #[test]
            fn every_pixel_picks_a_valid_color(
                x in 0.0_f64..1.0,
                y in 0.0_f64..1.0,
                n in 1_usize..7,
            ) {
                let hexes = ["#111111", "#222222", "#333333", "#444444", "#555555", "#666666"];
                let colors: Vec<Value> = hexes[..n].iter().map(|h| json!(h)).collect();
                let city = WindowsCity::from_json(&json!({"palette": colors}));
                let ctx = FrameContext::new(0.0, Viewport::new(90, 60));
                let frag = city.shade(DVec2::new(x, y), &ctx);
                prop_assert!(city.params.palette.colors().contains(&frag.fg));
            }
        }
    }
}
