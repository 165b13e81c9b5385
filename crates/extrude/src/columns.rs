//! Per-column height noise and the instance list regenerated every frame.

use citylights_core::Srgb;
use glam::DVec3;

/// Box depth along z.
pub const SLAB_DEPTH: f64 = 0.08;

/// Normalized height of column `i` at time `t`.
///
/// Two sine octaves drifting in opposite directions, quantized to
/// `levels` steps, plus a short spike whenever a fast third sine
/// crosses 0.985. Clamped to [0, 1].
pub fn column_noise(i: f64, t: f64, speed: f64, levels: f64, glitch: f64) -> f64 {
    let n1 = (i * 0.065 + t * speed).sin() * 0.5 + 0.5;
    let n2 = (i * 0.021 - t * speed * 0.6).sin() * 0.5 + 0.5;
    let base = 0.55 * n1 + 0.45 * n2;

    let levels = levels.max(2.0);
    let quant = (base * levels).floor() / (levels - 1.0);
    let spike = if (i * 0.13 + t * 4.0).sin() > 0.985 {
        glitch * (0.5 + 0.5 * (t * 20.0).sin())
    } else {
        0.0
    };
    (quant + spike).clamp(0.0, 1.0)
}

/// One column box for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Instance {
    pub centre: DVec3,
    pub size: DVec3,
    pub color: Srgb,
    /// The noise value the height and hue were derived from.
    pub level: f64,
}

/// Column layout and motion settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnField {
    pub columns: usize,
    pub world_width: f64,
    pub min_height: f64,
    pub max_height: f64,
    pub speed: f64,
    pub glitch_intensity: f64,
    pub quantize_levels: f64,
    pub hue_start: f64,
    pub hue_end: f64,
}

impl ColumnField {
    /// Every column's box at time `t`, left to right.
    pub fn instances(&self, t: f64) -> Vec<Instance> {
        let columns = self.columns.max(1);
        let dx = self.world_width / columns as f64;
        let x_start = -self.world_width * 0.5;
        (0..columns)
            .map(|i| {
                let fi = i as f64;
                let level = column_noise(
                    fi,
                    t,
                    self.speed,
                    self.quantize_levels,
                    self.glitch_intensity,
                );
                let h = self.min_height + (self.max_height - self.min_height) * level;
                let squeeze = 1.0 - 0.25 * (t * 0.8 + fi * 0.07).sin();
                let hue = self.hue_start + (self.hue_end - self.hue_start) * level;
                Instance {
                    centre: DVec3::new(x_start + dx * (fi + 0.5), h * 0.5, 0.0),
                    size: DVec3::new(dx * 0.75 * squeeze, h, SLAB_DEPTH),
                    color: Srgb::from_hsl(hue, 0.55, 0.62),
                    level,
                }
            })
            .collect()
    }
}
