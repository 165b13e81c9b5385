#![deny(unsafe_code)]
//! Core types for the citylights scene gallery.
//!
//! Provides the `Scene` trait, the per-frame `FrameContext`, the sine hash
//! and value noise every scene draws its randomness from, GLSL-style shading
//! helpers, full-screen compositing, the `Raster` surface with its 2D
//! drawing operations, a small depth-tested mesh rasterizer, `Srgb` and
//! `Palette` colors, parameter helpers, `SceneSpec` and the frame runtime.

pub mod color;
pub mod compose;
pub mod error;
pub mod field;
pub mod frame;
pub mod hash;
pub mod mesh;
pub mod palette;
pub mod params;
pub mod raster;
pub mod runtime;
pub mod scene;
pub mod shading;
pub mod spec;

pub use color::Srgb;
pub use compose::{Fragment, PixelShader};
pub use error::SceneError;
pub use field::Field;
pub use frame::{FrameContext, Viewport};
pub use palette::Palette;
pub use raster::Raster;
pub use runtime::{FrameId, FrameScheduler, ManualScheduler, SceneMount};
pub use scene::Scene;
pub use spec::SceneSpec;
