//! Deterministic sine hash and 1D value noise.
//!
//! This is the only source of randomness in the gallery. Every value is a
//! pure function of its inputs, so the same `(index, seed, time)` always
//! reproduces the same output bit for bit.

use glam::DVec2;

/// Fractional part in [0, 1).
///
/// `x - floor(x)` rounds up to exactly 1.0 for tiny negative inputs; those
/// are folded back to 0.0.
pub fn fract(x: f64) -> f64 {
    let f = x - x.floor();
    if f >= 1.0 {
        0.0
    } else {
        f
    }
}

/// `fract(sin(n) * 43758.5453123)`, in [0, 1).
pub fn hash(n: f64) -> f64 {
    fract(n.sin() * 43758.5453123)
}

/// 2D hash: `hash(dot(p, (127.1, 311.7)))`.
pub fn hash2(p: DVec2) -> f64 {
    hash(p.dot(DVec2::new(127.1, 311.7)))
}

/// Seed-salted hash used by the 2D canvas scenes.
pub fn seeded_hash(n: f64, seed: f64) -> f64 {
    fract((n * 12.9898 + seed * 78.233).sin() * 43758.5453)
}

/// Value noise between integer lattice points, eased with `f*f*(3-2f)`.
pub fn smooth_noise(x: f64) -> f64 {
    smooth_noise_with(x, hash)
}

/// [`smooth_noise`] over [`seeded_hash`].
pub fn seeded_noise(x: f64, seed: f64) -> f64 {
    smooth_noise_with(x, |n| seeded_hash(n, seed))
}

/// Value noise over an arbitrary lattice hash.
pub fn smooth_noise_with(x: f64, lattice: impl Fn(f64) -> f64) -> f64 {
    let i = x.floor();
    let f = x - i;
    let u = f * f * (3.0 - 2.0 * f);
    let a = lattice(i);
    let b = lattice(i + 1.0);
    a + (b - a) * u
}
