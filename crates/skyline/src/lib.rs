#![deny(unsafe_code)]
#![recursion_limit = "256"]
//! Full-frame skyline shader scenes.
//!
//! Every scene here is a [`PixelShader`](citylights_core::PixelShader):
//! a pure function of `(uv, time)` built from the hashed column and window
//! fields in [`column`], optionally stacked into near/mid/far parallax
//! layers from [`layer`], and composited over the background by
//! [`render_fullscreen`](citylights_core::compose::render_fullscreen).

pub mod column;
pub mod layer;

pub mod bars;
pub mod blurry;
pub mod circles;
pub mod growing_windows;
pub mod line_extrude;
pub mod mono_cluster;
pub mod windows;

pub use bars::{CityBars, CityBarsParams};
pub use blurry::{BlurryCity, BlurryCityParams};
pub use circles::{CirclesDiffusion, CirclesDiffusionParams};
pub use growing_windows::{GrowingWindows, GrowingWindowsParams};
pub use line_extrude::{LineExtrude, LineExtrudeParams};
pub use mono_cluster::{MonoCluster, MonoClusterParams};
pub use windows::{WindowsCity, WindowsCityParams};
