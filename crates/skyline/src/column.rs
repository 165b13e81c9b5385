//! Per-column and per-cell procedural fields.
//!
//! A skyline is a row of columns. Each column index is hashed (with a
//! per-layer seed and per-quantity salt constants) into a base height, an
//! oscillation amplitude and a phase. Windows are cells of a `cols x rows`
//! grid, lit or dark by hashing the cell coordinate.

use citylights_core::hash::{hash, smooth_noise_with};
use citylights_core::shading::{mix, step};
use glam::DVec2;

/// The phase constant the skyline shaders scale `[0, 1)` hashes by.
pub const PHASE_TURN: f64 = 6.2831;

/// Salt pair for `hash(col * col_salt + seed * seed_salt)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Salt {
    pub col: f64,
    pub seed: f64,
}

impl Salt {
    pub const fn new(col: f64, seed: f64) -> Self {
        Self { col, seed }
    }

    pub fn sample(self, col: f64, seed: f64) -> f64 {
        hash(col * self.col + seed * self.seed)
    }
}

/// Salts for the three hashed quantities of a moving column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSalts {
    pub base: Salt,
    pub amp: Salt,
    pub phase: Salt,
}

impl MotionSalts {
    /// Hashes column `col` of the layer seeded `seed` into its motion.
    pub fn motion(
        &self,
        col: f64,
        seed: f64,
        base_range: (f64, f64),
        amp_range: (f64, f64),
    ) -> ColumnMotion {
        ColumnMotion {
            base: mix(base_range.0, base_range.1, self.base.sample(col, seed)),
            amp: mix(amp_range.0, amp_range.1, self.amp.sample(col, seed)),
            phase: self.phase.sample(col, seed) * PHASE_TURN,
        }
    }
}

/// Base height, amplitude and phase of one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnMotion {
    pub base: f64,
    pub amp: f64,
    pub phase: f64,
}

impl ColumnMotion {
    /// Oscillator argument at time `t`.
    pub fn arg(&self, t: f64, speed: f64) -> f64 {
        t * speed + self.phase
    }

    /// Plain sinusoidal height `base + amp * sin(arg)`.
    pub fn height(&self, arg: f64) -> f64 {
        self.base + self.amp * arg.sin()
    }

    /// Height with a damped overshoot wobble layered on the sine.
    ///
    /// The wobble is strongest where the sine crosses zero and fades as
    /// `|sin|` grows, at a rate set by `damping`.
    pub fn overshoot_height(&self, arg: f64, overshoot: f64, damping: f64) -> f64 {
        let s = arg.sin();
        self.base + self.amp * (s + overshoot * (2.3 * arg).sin() * (-s.abs() * damping).exp())
    }
}

/// Static tower heights from smoothed value noise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TowerProfile {
    pub base_min: f64,
    pub base_max: f64,
    pub smooth: f64,
    pub jitter: f64,
}

impl TowerProfile {
    /// Normalized height of column `col` in [0.05, 0.99], over the given
    /// lattice hash.
    pub fn height(&self, col: f64, lattice: impl Fn(f64) -> f64) -> f64 {
        let noise = |x: f64| smooth_noise_with(x, &lattice);
        let shaped = noise(col * self.smooth + 8.3).powf(1.2);
        let base = mix(self.base_min, self.base_max, shaped);
        (base + (noise(col * 0.71) - 0.5) * self.jitter).clamp(0.05, 0.99)
    }
}

/// 1.0 inside a window cell once `margin` is trimmed from every side.
pub fn window_rim(f: DVec2, margin: f64) -> f64 {
    step(margin, f.x) * step(margin, f.y) * step(margin, 1.0 - f.x) * step(margin, 1.0 - f.y)
}

/// Occupancy hash of a window cell at flicker tick `tick`.
pub fn cell_hash(cell: DVec2, tick: f64) -> f64 {
    hash(cell.dot(DVec2::new(37.1, 91.7)) + tick * 13.7)
}

/// Splits `uv * grid` into the cell index and the position inside the cell.
pub fn grid_cell(uv: DVec2, grid: DVec2) -> (DVec2, DVec2) {
    let p = uv * grid;
    let cell = p.floor();
    (cell, p - cell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use citylights_core::hash::seeded_hash;

    const BLURRY: MotionSalts = MotionSalts {
        base: Salt::new(13.17, 19.73),
        amp: Salt::new(31.7, 7.1),
        phase: Salt::new(17.7, 9.1),
    };

    #[test]
    fn first_column_of_near_layer_hashes_reference_value() {
        let r1 = BLURRY.base.sample(0.0, 1.0);
        assert!((r1 - 0.7900962907806388).abs() < 1e-9);
        let m = BLURRY.motion(0.0, 1.0, (0.25, 0.92), (0.08, 0.34));
        assert!((m.base - mix(0.25, 0.92, 0.7900962907806388)).abs() < 1e-9);
    }

    #[test]
    fn scenario_height_at_time_zero_is_in_range() {
        let m = BLURRY.motion(0.0, 1.0, (0.25, 0.92), (0.08, 0.34));
        let h = m.overshoot_height(m.arg(0.0, 0.22), 0.28, 0.55).clamp(0.04, 0.99);
        assert!(h >= 0.25 - 0.34 && h <= 0.92 + 0.34);
        assert!((0.04..=0.99).contains(&h));
    }

    #[test]
    fn motion_is_bit_deterministic() {
        let a = BLURRY.motion(17.0, 2.0, (0.25, 0.92), (0.08, 0.34));
        let b = BLURRY.motion(17.0, 2.0, (0.25, 0.92), (0.08, 0.34));
        assert_eq!(a.base.to_bits(), b.base.to_bits());
        assert_eq!(a.amp.to_bits(), b.amp.to_bits());
        assert_eq!(a.phase.to_bits(), b.phase.to_bits());
    }

    #[test]
    fn plain_height_without_amplitude_is_base() {
        let m = ColumnMotion {
            base: 0.4,
            amp: 0.0,
            phase: 1.0,
        };
        assert!((m.height(3.0) - 0.4).abs() < f64::EPSILON);
        assert!((m.overshoot_height(3.0, 0.5, 0.6) - 0.4).abs() < f64::EPSILON);
    }

    #[test]
    fn overshoot_vanishes_when_disabled() {
        let m = ColumnMotion {
            base: 0.5,
            amp: 0.2,
            phase: 0.0,
        };
        for arg in [0.0, 0.7, 2.0, 4.5] {
            assert!((m.overshoot_height(arg, 0.0, 0.55) - m.height(arg)).abs() < 1e-15);
        }
    }

    #[test]
    fn tower_profile_is_clamped_and_seed_sensitive() {
        let p = TowerProfile {
            base_min: 0.25,
            base_max: 0.92,
            smooth: 0.28,
            jitter: 0.12,
        };
        for col in 0..200 {
            let h = p.height(col as f64, hash);
            assert!((0.05..=0.99).contains(&h));
        }
        let differs = (0..20).any(|c| {
            let c = c as f64;
            p.height(c, |n| seeded_hash(n, 7.0)) != p.height(c, |n| seeded_hash(n, 8.0))
        });
        assert!(differs);
    }

    #[test]
    fn window_rim_trims_margins() {
        assert_eq!(window_rim(DVec2::new(0.5, 0.5), 0.18), 1.0);
        assert_eq!(window_rim(DVec2::new(0.1, 0.5), 0.18), 0.0);
        assert_eq!(window_rim(DVec2::new(0.5, 0.9), 0.18), 0.0);
    }

    #[test]
    fn grid_cell_splits_index_and_fraction() {
        let (cell, f) = grid_cell(DVec2::new(0.26, 0.51), DVec2::new(10.0, 4.0));
        assert_eq!(cell, DVec2::new(2.0, 2.0));
        assert!((f.x - 0.6).abs() < 1e-9);
        assert!((f.y - 0.04).abs() < 1e-9);
    }

    #[test]
    fn cell_hash_changes_with_tick() {
        let c = DVec2::new(3.0, 5.0);
        assert_ne!(cell_hash(c, 0.0), cell_hash(c, 1.0));
        assert_eq!(cell_hash(c, 2.0).to_bits(), cell_hash(c, 2.0).to_bits());
    }
}
