//! Pure-computation RGBA8 conversion for rasters and intensity fields.
//!
//! This module is always available (no feature gate) so that hosts without
//! the `png` feature can still hand pixels to their own surface.

use citylights_core::field::Field;
use citylights_core::palette::Palette;
use citylights_core::Raster;

/// Display bytes of a rendered frame, four per pixel, alpha always 255.
///
/// Channels are clamped to [0, 1] here and nowhere earlier.
pub fn raster_to_rgba(raster: &Raster) -> Vec<u8> {
    raster.to_rgba8()
}

/// Maps intensity values through a palette, four bytes per cell.
pub fn field_to_rgba(field: &Field, palette: &Palette) -> Vec<u8> {
    field
        .data()
        .iter()
        .flat_map(|&t| {
            let [r, g, b] = palette.sample(t).to_rgb8();
            [r, g, b, 255u8]
        })
        .collect()
}
