//! sRGB color type and the small set of color operations the scenes use.
//!
//! All arithmetic happens directly on sRGB components in `f64`, matching
//! how the scene shaders mix colors. Components are *not* clamped by the
//! arithmetic helpers: grain may push a channel slightly outside [0, 1],
//! and only the final 8-bit quantization ([`Srgb::to_rgb8`]) clamps.

use crate::error::SceneError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// sRGB color with components nominally in [0, 1].
///
/// Serializes as a hex string `"#rrggbb"` for human-readable formats.
/// The hex round-trip has 8-bit quantization (1/255 precision loss),
/// which is acceptable since hex colors are inherently 8-bit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Srgb {
    pub const BLACK: Srgb = Srgb::new(0.0, 0.0, 0.0);
    pub const WHITE: Srgb = Srgb::new(1.0, 1.0, 1.0);

    /// Creates a color from raw components.
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Creates a color from 8-bit components.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }

    /// Creates a color from a packed `0xRRGGBB` value.
    pub fn from_u32(rgb: u32) -> Self {
        Self::from_rgb8((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    /// Parses a hex color string like "#ff00aa" or "ff00aa" (case insensitive).
    ///
    /// Returns `SceneError::InvalidColor` if the input is not a valid 6-digit hex color.
    pub fn from_hex(hex: &str) -> Result<Srgb, SceneError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(SceneError::InvalidColor(format!(
                "expected 6 hex digits, got {:?}",
                hex
            )));
        }
        let r = u8::from_str_radix(&hex[0..2], 16)
            .map_err(|e| SceneError::InvalidColor(format!("invalid red component: {e}")))?;
        let g = u8::from_str_radix(&hex[2..4], 16)
            .map_err(|e| SceneError::InvalidColor(format!("invalid green component: {e}")))?;
        let b = u8::from_str_radix(&hex[4..6], 16)
            .map_err(|e| SceneError::InvalidColor(format!("invalid blue component: {e}")))?;
        Ok(Srgb::from_rgb8(r, g, b))
    }

    /// Converts the color to a hex string like `"#rrggbb"`.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Quantizes to 8-bit components, clamping each channel to [0, 1] first.
    ///
    /// NaN channels map to 0.
    pub fn to_rgb8(self) -> [u8; 3] {
        let q = |c: f64| {
            if c.is_nan() {
                0
            } else {
                (c.clamp(0.0, 1.0) * 255.0).round() as u8
            }
        };
        [q(self.r), q(self.g), q(self.b)]
    }

    /// Builds a color from hue, saturation and lightness, all in [0, 1].
    ///
    /// Hue wraps, so `h = 1.25` is the same as `h = 0.25`.
    pub fn from_hsl(h: f64, s: f64, l: f64) -> Self {
        let channel = |offset: f64| {
            let k = (h * 6.0 + offset).rem_euclid(6.0);
            ((k - 3.0).abs() - 1.0).clamp(0.0, 1.0)
        };
        let chroma = s * (1.0 - (2.0 * l - 1.0).abs());
        Srgb {
            r: l + chroma * (channel(0.0) - 0.5),
            g: l + chroma * (channel(4.0) - 0.5),
            b: l + chroma * (channel(2.0) - 0.5),
        }
    }

    /// Linear interpolation toward `other`; `t = 0` is `self`, `t = 1` is `other`.
    pub fn lerp(self, other: Srgb, t: f64) -> Srgb {
        Srgb {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
        }
    }

    /// Multiplies every channel by `k`.
    pub fn scale(self, k: f64) -> Srgb {
        Srgb {
            r: self.r * k,
            g: self.g * k,
            b: self.b * k,
        }
    }

    /// Adds `d` to every channel.
    pub fn offset(self, d: f64) -> Srgb {
        Srgb {
            r: self.r + d,
            g: self.g + d,
            b: self.b + d,
        }
    }
}

impl Serialize for Srgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Srgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Srgb::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
