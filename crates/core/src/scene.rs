//! The `Scene` trait implemented by every gallery scene.
//!
//! The trait is object-safe so the registry and the frame runtime can drive
//! `Box<dyn Scene>` as well as concrete scene types.

use crate::color::Srgb;
use crate::error::SceneError;
use crate::frame::{FrameContext, Viewport};
use crate::raster::Raster;
use serde_json::Value;

/// A generative scene: a per-frame function of time and viewport.
///
/// Parameters are fixed at construction. Scenes may cache layout derived
/// from the viewport (see [`Scene::resize`]) but never accumulate state
/// across frames, so rendering the same `FrameContext` twice yields the
/// same image.
pub trait Scene {
    /// Color the raster is cleared to before the first frame.
    fn background(&self) -> Srgb;

    /// Draws one complete frame into `raster`.
    ///
    /// The raster must match `ctx.viewport`; otherwise
    /// `SceneError::DimensionMismatch` is returned and nothing is drawn.
    fn render(&mut self, ctx: &FrameContext, raster: &mut Raster) -> Result<(), SceneError>;

    /// Current parameter values as a JSON object.
    fn params(&self) -> Value;

    /// Schema describing every parameter: type, default, range, description.
    fn param_schema(&self) -> Value;

    /// Viewport changed. Scenes with cached layout rebuild it here.
    fn resize(&mut self, _viewport: Viewport) {}

    /// Pointer position in normalized surface coordinates (y up).
    fn pointer_moved(&mut self, _x: f64, _y: f64) {}
}

/// Checks that `raster` matches the frame's viewport.
pub fn check_raster(ctx: &FrameContext, raster: &Raster) -> Result<(), SceneError> {
    let (w, h) = (ctx.viewport.width(), ctx.viewport.height());
    if raster.width() != w || raster.height() != h {
        return Err(SceneError::DimensionMismatch {
            lhs_w: w,
            lhs_h: h,
            rhs_w: raster.width(),
            rhs_h: raster.height(),
        });
    }
    Ok(())
}
