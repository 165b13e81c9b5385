//! PNG output of rendered frames and intensity fields.
//!
//! Feature-gated behind `png` (default on) so hosts that only need pixels
//! do not pull in the `image` crate. The byte conversion itself lives in
//! [`crate::pixel`].

use citylights_core::error::SceneError;
use citylights_core::field::Field;
use citylights_core::palette::Palette;
use citylights_core::Raster;
use std::path::Path;

use crate::pixel::{field_to_rgba, raster_to_rgba};

fn save_rgba(width: usize, height: usize, rgba: Vec<u8>, path: &Path) -> Result<(), SceneError> {
    let w = u32::try_from(width).map_err(|_| SceneError::InvalidDimensions)?;
    let h = u32::try_from(height).map_err(|_| SceneError::InvalidDimensions)?;
    let img = image::RgbaImage::from_raw(w, h, rgba)
        .ok_or_else(|| SceneError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| SceneError::Io(e.to_string()))
}

/// Writes a rendered frame as a PNG.
///
/// Returns `SceneError::InvalidDimensions` if the raster does not fit
/// `u32`, or `SceneError::Io` on write failure.
pub fn write_png(raster: &Raster, path: &Path) -> Result<(), SceneError> {
    save_rgba(raster.width(), raster.height(), raster_to_rgba(raster), path)?;
    tracing::debug!(path = %path.display(), "frame written");
    Ok(())
}

/// Writes an intensity field as a PNG, mapping values through `palette`.
pub fn write_field_png(field: &Field, palette: &Palette, path: &Path) -> Result<(), SceneError> {
    save_rgba(field.width(), field.height(), field_to_rgba(field, palette), path)
}
