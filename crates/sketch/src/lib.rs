#![deny(unsafe_code)]
//! Skylines drawn with 2D primitives in pixel space rather than per-pixel
//! shaders: gradients, polygons, strokes and rectangles on a [`Raster`].
//!
//! Scenes whose layout depends on the surface size build it in
//! [`Scene::resize`](citylights_core::Scene::resize) and rebuild it lazily
//! if a frame arrives for a different viewport.
//!
//! [`Raster`]: citylights_core::Raster

pub mod easing;

pub mod block_skyline;
pub mod grid_towers;
pub mod growing_lines;
pub mod lines_only;

pub use block_skyline::{BlockSkyline, BlockSkylineParams};
pub use grid_towers::{GridTowers, GridTowersParams};
pub use growing_lines::{GrowingLines, GrowingLinesParams};
pub use lines_only::{LinesOnly, LinesOnlyParams};
