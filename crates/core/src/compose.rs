//! Full-screen compositing shared by the shader scenes.
//!
//! A shader scene only decides, per pixel, how lit the pixel is and which
//! foreground color it is lit with ([`Fragment`]). Everything after that
//! is common: background/foreground interpolation, film grain, and the
//! loop over the raster.

use crate::color::Srgb;
use crate::error::SceneError;
use crate::field::Field;
use crate::frame::FrameContext;
use crate::hash::hash2;
use crate::raster::Raster;
use crate::scene::check_raster;
use crate::shading::clamp01;
use glam::DVec2;

/// Per-pixel shader output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fragment {
    /// Light amount in [0, 1] after contrast.
    pub intensity: f64,
    /// Color the pixel is lit with.
    pub fg: Srgb,
}

/// Per-pixel intensity function of `(uv, time)`.
pub trait PixelShader {
    fn shade(&self, uv: DVec2, ctx: &FrameContext) -> Fragment;
}

/// Soft highlight rolloff: `1 - exp(-e * max(l, 0))`.
pub fn exposure(light: f64, amount: f64) -> f64 {
    1.0 - (-amount * light.max(0.0)).exp()
}

/// Clamps to [0, 1] then raises to `power`.
pub fn contrast(light: f64, power: f64) -> f64 {
    clamp01(light).powf(power)
}

/// Zero-mean film grain, `(hash2(uv * (res + t)) - 0.5) * amount`.
pub fn grain(uv: DVec2, ctx: &FrameContext, amount: f64) -> f64 {
    (hash2(uv * (ctx.resolution() + DVec2::splat(ctx.time))) - 0.5) * amount
}

/// `lerp(bg, fg, intensity) + grain`, not clamped.
pub fn compose(bg: Srgb, fg: Srgb, intensity: f64, grain: f64) -> Srgb {
    bg.lerp(fg, intensity).offset(grain)
}

/// Shades every pixel of `raster` and composites it over `bg`.
pub fn render_fullscreen<S: PixelShader + ?Sized>(
    shader: &S,
    bg: Srgb,
    grain_amount: f64,
    ctx: &FrameContext,
    raster: &mut Raster,
) -> Result<(), SceneError> {
    check_raster(ctx, raster)?;
    for py in 0..raster.height() {
        for px in 0..raster.width() {
            let uv = ctx.uv(px, py);
            let frag = shader.shade(uv, ctx);
            let g = if grain_amount == 0.0 {
                0.0
            } else {
                grain(uv, ctx, grain_amount)
            };
            raster.put(px, py, compose(bg, frag.fg, frag.intensity, g));
        }
    }
    Ok(())
}

/// Evaluates the shader's intensity for every pixel, without color.
pub fn intensity_field<S: PixelShader + ?Sized>(
    shader: &S,
    ctx: &FrameContext,
) -> Result<Field, SceneError> {
    Field::from_fn(ctx.viewport.width(), ctx.viewport.height(), |px, py| {
        shader.shade(ctx.uv(px, py), ctx).intensity
    })
}
