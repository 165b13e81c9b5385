//! Palette of sRGB color stops.
//!
//! Scenes use a palette two ways: indexed (`color(i)`, one stop per
//! window cell) and sampled (`sample(t)`, a gradient across the stops).
//! Sampling interpolates directly in sRGB, the same space the shaders
//! mix colors in.

use crate::color::Srgb;
use crate::error::SceneError;

const BUILTIN_NAMES: &[&str] = &[
    "windows",
    "ocean",
    "neon",
    "earth",
    "monochrome",
    "vapor",
    "fire",
];

/// A non-empty list of colors.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<Srgb>,
}

impl Palette {
    /// Requires at least one color.
    pub fn new(colors: Vec<Srgb>) -> Result<Self, SceneError> {
        if colors.is_empty() {
            return Err(SceneError::InvalidPalette(
                "palette requires at least 1 color".to_string(),
            ));
        }
        Ok(Self { colors })
    }

    /// Parses `"#rrggbb"` strings. Requires at least one color.
    pub fn from_hex(hexes: &[&str]) -> Result<Self, SceneError> {
        let colors = hexes
            .iter()
            .map(|h| Srgb::from_hex(h))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(colors)
    }

    /// Looks up a built-in palette by name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "windows" => Some(Self::windows()),
            "ocean" => Some(Self::ocean()),
            "neon" => Some(Self::neon()),
            "earth" => Some(Self::earth()),
            "monochrome" => Some(Self::monochrome()),
            "vapor" => Some(Self::vapor()),
            "fire" => Some(Self::fire()),
            _ => None,
        }
    }

    /// Names accepted by [`Palette::from_name`].
    pub fn list_names() -> &'static [&'static str] {
        BUILTIN_NAMES
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false for a constructed palette.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Srgb] {
        &self.colors
    }

    /// Returns stop `index`, wrapping past the end.
    pub fn color(&self, index: usize) -> Srgb {
        self.colors[index % self.colors.len()]
    }

    /// Samples the gradient through all stops at `t` in [0, 1].
    ///
    /// `t` is clamped; NaN samples the first stop.
    pub fn sample(&self, t: f64) -> Srgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let n = self.colors.len();
        if n == 1 {
            return self.colors[0];
        }
        let scaled = t * (n - 1) as f64;
        let idx = (scaled as usize).min(n - 2);
        let frac = scaled - idx as f64;
        self.colors[idx].lerp(self.colors[idx + 1], frac)
    }

    // -- Built-in palettes --

    /// Warm and cool window glows for the lit-window skyline.
    pub fn windows() -> Self {
        Self::from_hex(&[
            "#d9f0ff", "#a5e5ff", "#ffd27f", "#ffb347", "#ff8fa3", "#b2ff9e",
        ])
        .expect("windows palette hex values are valid")
    }

    /// Deep blues to cyan.
    pub fn ocean() -> Self {
        Self::from_hex(&["#001f3f", "#003366", "#005f73", "#0a9396", "#94d2bd"])
            .expect("ocean palette hex values are valid")
    }

    pub fn neon() -> Self {
        Self::from_hex(&["#ff00ff", "#00ff41", "#ffff00", "#ff0080", "#00ffff"])
            .expect("neon palette hex values are valid")
    }

    pub fn earth() -> Self {
        Self::from_hex(&["#5c4033", "#8b6914", "#6b8e23", "#daa520", "#d2b48c"])
            .expect("earth palette hex values are valid")
    }

    pub fn monochrome() -> Self {
        Self::from_hex(&["#000000", "#404040", "#808080", "#c0c0c0", "#ffffff"])
            .expect("monochrome palette hex values are valid")
    }

    /// Pastel purples, pinks, teals.
    pub fn vapor() -> Self {
        Self::from_hex(&["#7b2d8e", "#c77dff", "#ff9ebb", "#80ced6", "#a0e7e5"])
            .expect("vapor palette hex values are valid")
    }

    pub fn fire() -> Self {
        Self::from_hex(&["#800000", "#cc0000", "#ff4500", "#ff8c00", "#ffd700"])
            .expect("fire palette hex values are valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_empty() {
        assert!(matches!(
            Palette::new(vec![]),
            Err(SceneError::InvalidPalette(_))
        ));
    }

    #[test]
    fn from_hex_propagates_color_errors() {
        assert!(matches!(
            Palette::from_hex(&["#ff0000", "#zzzzzz"]),
            Err(SceneError::InvalidColor(_))
        ));
        assert!(Palette::from_hex(&[]).is_err());
    }

    #[test]
    fn every_listed_name_resolves() {
        for name in Palette::list_names() {
            let p = Palette::from_name(name).unwrap_or_else(|| panic!("{name} missing"));
            assert!(!p.is_empty());
        }
        assert!(Palette::from_name("plaid").is_none());
    }

    #[test]
    fn windows_palette_has_six_stops() {
        let p = Palette::windows();
        assert_eq!(p.len(), 6);
        assert_eq!(p.color(0).to_hex(), "#d9f0ff");
        assert_eq!(p.color(5).to_hex(), "#b2ff9e");
    }

    #[test]
    fn color_wraps_index() {
        let p = Palette::from_hex(&["#ff0000", "#00ff00", "#0000ff"]).unwrap();
        assert_eq!(p.color(3), p.color(0));
        assert_eq!(p.color(7), p.color(1));
    }

    #[test]
    fn sample_endpoints_hit_first_and_last_stops() {
        let p = Palette::fire();
        assert_eq!(p.sample(0.0), p.color(0));
        assert_eq!(p.sample(1.0), p.color(p.len() - 1));
    }

    #[test]
    fn sample_midpoint_of_two_stops_is_average() {
        let p = Palette::from_hex(&["#000000", "#ffffff"]).unwrap();
        let mid = p.sample(0.5);
        assert!((mid.r - 0.5).abs() < 1e-12);
        assert!((mid.g - 0.5).abs() < 1e-12);
    }

    #[test]
    fn sample_clamps_and_handles_nan() {
        let p = Palette::ocean();
        assert_eq!(p.sample(-3.0), p.color(0));
        assert_eq!(p.sample(9.0), p.color(p.len() - 1));
        assert_eq!(p.sample(f64::NAN), p.color(0));
    }

    #[test]
    fn single_stop_palette_is_constant() {
        let p = Palette::from_hex(&["#123456"]).unwrap();
        for t in [0.0, 0.3, 1.0] {
            assert_eq!(p.sample(t).to_hex(), "#123456");
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn sample_stays_inside_unit_cube(t in -2.0_f64..3.0) {
                for name in Palette::list_names() {
                    let c = Palette::from_name(name).unwrap().sample(t);
                    for ch in [c.r, c.g, c.b] {
                        prop_assert!((0.0..=1.0).contains(&ch), "{name} at {t}: {ch}");
                    }
                }
            }
        }
    }
}
