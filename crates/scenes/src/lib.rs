#![deny(unsafe_code)]
//! Scene registry: maps scene and preset names to implementations and
//! provides CPU-side snapshot output.
//!
//! This crate sits between `citylights-core` (which defines the `Scene`
//! trait) and the scene crates (`citylights-skyline`, `citylights-heart`,
//! `citylights-extrude`, `citylights-sketch`), so the CLI and any other
//! host share one dispatch table.

pub mod pixel;
pub mod presets;

#[cfg(feature = "png")]
pub mod snapshot;

use citylights_core::compose::{intensity_field, PixelShader};
use citylights_core::error::SceneError;
use citylights_core::field::Field;
use citylights_core::{FrameContext, Raster, Scene, Srgb, Viewport};
use citylights_extrude::ExtrudeGlitch;
use citylights_heart::Heart;
use citylights_sketch::{BlockSkyline, GridTowers, GrowingLines, LinesOnly};
use citylights_skyline::{
    BlurryCity, CirclesDiffusion, CityBars, GrowingWindows, LineExtrude, MonoCluster, WindowsCity,
};
use serde_json::Value;

/// All registered scene names.
pub(crate) const SCENE_NAMES: &[&str] = &[
    "blurry-city",
    "city-bars",
    "line-extrude",
    "windows-city",
    "mono-cluster",
    "growing-windows",
    "circles-diffusion",
    "heart",
    "extrude-glitch",
    "lines-only",
    "growing-lines",
    "grid-towers",
    "block-skyline",
];

/// Every gallery scene.
///
/// Wraps each scene implementation and delegates the `Scene` trait. Use
/// [`SceneKind::from_name`] for string-based construction.
pub enum SceneKind {
    BlurryCity(BlurryCity),
    CityBars(CityBars),
    LineExtrude(LineExtrude),
    WindowsCity(WindowsCity),
    MonoCluster(MonoCluster),
    GrowingWindows(GrowingWindows),
    CirclesDiffusion(CirclesDiffusion),
    Heart(Heart),
    ExtrudeGlitch(ExtrudeGlitch),
    LinesOnly(LinesOnly),
    GrowingLines(GrowingLines),
    GridTowers(GridTowers),
    BlockSkyline(BlockSkyline),
}

macro_rules! each_scene {
    ($self:expr, $s:ident => $body:expr) => {
        match $self {
            SceneKind::BlurryCity($s) => $body,
            SceneKind::CityBars($s) => $body,
            SceneKind::LineExtrude($s) => $body,
            SceneKind::WindowsCity($s) => $body,
            SceneKind::MonoCluster($s) => $body,
            SceneKind::GrowingWindows($s) => $body,
            SceneKind::CirclesDiffusion($s) => $body,
            SceneKind::Heart($s) => $body,
            SceneKind::ExtrudeGlitch($s) => $body,
            SceneKind::LinesOnly($s) => $body,
            SceneKind::GrowingLines($s) => $body,
            SceneKind::GridTowers($s) => $body,
            SceneKind::BlockSkyline($s) => $body,
        }
    };
}

impl SceneKind {
    /// Constructs a scene by name. Unknown or ill-typed parameters fall
    /// back to their defaults.
    ///
    /// Returns `SceneError::UnknownScene` if the name is not registered.
    pub fn from_name(name: &str, params: &Value) -> Result<Self, SceneError> {
        let scene = match name {
            "blurry-city" => SceneKind::BlurryCity(BlurryCity::from_json(params)),
            "city-bars" => SceneKind::CityBars(CityBars::from_json(params)),
            "line-extrude" => SceneKind::LineExtrude(LineExtrude::from_json(params)),
            "windows-city" => SceneKind::WindowsCity(WindowsCity::from_json(params)),
            "mono-cluster" => SceneKind::MonoCluster(MonoCluster::from_json(params)),
            "growing-windows" => SceneKind::GrowingWindows(GrowingWindows::from_json(params)),
            "circles-diffusion" => SceneKind::CirclesDiffusion(CirclesDiffusion::from_json(params)),
            "heart" => SceneKind::Heart(Heart::from_json(params)),
            "extrude-glitch" => SceneKind::ExtrudeGlitch(ExtrudeGlitch::from_json(params)),
            "lines-only" => SceneKind::LinesOnly(LinesOnly::from_json(params)),
            "growing-lines" => SceneKind::GrowingLines(GrowingLines::from_json(params)),
            "grid-towers" => SceneKind::GridTowers(GridTowers::from_json(params)),
            "block-skyline" => SceneKind::BlockSkyline(BlockSkyline::from_json(params)),
            _ => return Err(SceneError::UnknownScene(name.to_string())),
        };
        tracing::debug!(scene = name, "scene constructed");
        Ok(scene)
    }

    /// Constructs a scene from a scene or preset name, applying `overrides`
    /// on top of the preset's values.
    pub fn resolve(name: &str, overrides: &Value) -> Result<Self, SceneError> {
        let (scene, params) = presets::resolve(name, overrides)?;
        if scene != name {
            tracing::debug!(preset = name, scene, "preset resolved");
        }
        Self::from_name(scene, &params)
    }

    /// Returns a slice of all recognized scene names.
    pub fn list_scenes() -> &'static [&'static str] {
        SCENE_NAMES
    }

    /// The per-pixel shader behind full-frame scenes; `None` for mesh and
    /// 2D canvas scenes.
    pub fn shader(&self) -> Option<&dyn PixelShader> {
        match self {
            SceneKind::BlurryCity(s) => Some(s),
            SceneKind::CityBars(s) => Some(s),
            SceneKind::LineExtrude(s) => Some(s),
            SceneKind::WindowsCity(s) => Some(s),
            SceneKind::MonoCluster(s) => Some(s),
            SceneKind::GrowingWindows(s) => Some(s),
            SceneKind::CirclesDiffusion(s) => Some(s),
            _ => None,
        }
    }

    /// Uncolored intensity of a shader scene for one frame.
    pub fn intensity(&self, ctx: &FrameContext) -> Option<Result<Field, SceneError>> {
        self.shader().map(|s| intensity_field(s, ctx))
    }

    /// Renders a single frame into a fresh raster.
    pub fn render_frame(&mut self, ctx: &FrameContext) -> Result<Raster, SceneError> {
        let mut raster = Raster::for_viewport(ctx.viewport, self.background())?;
        self.resize(ctx.viewport);
        self.render(ctx, &mut raster)?;
        Ok(raster)
    }
}

impl Scene for SceneKind {
    fn background(&self) -> Srgb {
        each_scene!(self, s => s.background())
    }

    fn render(&mut self, ctx: &FrameContext, raster: &mut Raster) -> Result<(), SceneError> {
        each_scene!(self, s => s.render(ctx, raster))
    }

    fn params(&self) -> Value {
        each_scene!(self, s => s.params())
    }

    fn param_schema(&self) -> Value {
        each_scene!(self, s => s.param_schema())
    }

    fn resize(&mut self, viewport: Viewport) {
        each_scene!(self, s => s.resize(viewport))
    }

    fn pointer_moved(&mut self, x: f64, y: f64) {
        each_scene!(self, s => s.pointer_moved(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn frame(name: &str, t: f64) -> Raster {
        let mut scene = SceneKind::from_name(name, &json!({})).unwrap();
        scene
            .render_frame(&FrameContext::new(t, Viewport::new(24, 16)))
            .unwrap()
    }

    #[test]
    fn from_name_every_scene_succeeds() {
        for name in SceneKind::list_scenes() {
            assert!(SceneKind::from_name(name, &json!({})).is_ok(), "{name}");
        }
    }

    #[test]
    fn from_name_unknown_returns_error() {
        let result = SceneKind::from_name("nonexistent", &json!({}));
        assert!(matches!(result, Err(SceneError::UnknownScene(_))));
    }

    #[test]
    fn list_scenes_has_thirteen_unique_names() {
        let mut names = SceneKind::list_scenes().to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 13);
    }

    #[test]
    fn resolve_builds_presets() {
        let scene = SceneKind::resolve("a5", &json!({})).unwrap();
        assert!(matches!(scene, SceneKind::Heart(_)));
        assert_eq!(scene.params()["color_a"], "#ff1744");
    }

    #[test]
    fn trait_delegation_params_and_schema() {
        for name in SceneKind::list_scenes() {
            let scene = SceneKind::from_name(name, &json!({})).unwrap();
            let params = scene.params();
            let schema = scene.param_schema();
            for key in params.as_object().unwrap().keys() {
                assert!(schema.get(key).is_some(), "{name}: schema missing {key}");
            }
        }
    }

    #[test]
    fn overrides_reach_the_scene() {
        let scene = SceneKind::from_name("city-bars", &json!({"rows": 12})).unwrap();
        assert_eq!(scene.params()["rows"], 12.0);
    }

    #[test]
    fn shader_only_for_full_frame_scenes() {
        let shaders = SceneKind::list_scenes()
            .iter()
            .filter(|n| SceneKind::from_name(n, &json!({})).unwrap().shader().is_some())
            .count();
        assert_eq!(shaders, 7);
    }

    #[test]
    fn intensity_field_matches_viewport() {
        let scene = SceneKind::from_name("windows-city", &json!({})).unwrap();
        let ctx = FrameContext::new(1.0, Viewport::new(20, 10));
        let field = scene.intensity(&ctx).unwrap().unwrap();
        assert_eq!((field.width(), field.height()), (20, 10));
    }

    #[test]
    fn determinism_same_time() {
        for name in SceneKind::list_scenes() {
            let a = frame(name, 2.5);
            let b = frame(name, 2.5);
            assert!(
                a.pixels()
                    .iter()
                    .zip(b.pixels())
                    .all(|(x, y)| x.r.to_bits() == y.r.to_bits()
                        && x.g.to_bits() == y.g.to_bits()
                        && x.b.to_bits() == y.b.to_bits()),
                "{name}"
            );
        }
    }

    #[test]
    fn mismatched_raster_is_rejected() {
        let mut scene = SceneKind::from_name("heart", &json!({})).unwrap();
        let mut raster = Raster::new(8, 8, Srgb::BLACK).unwrap();
        let ctx = FrameContext::new(0.0, Viewport::new(9, 8));
        assert!(matches!(
            scene.render(&ctx, &mut raster),
            Err(SceneError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn object_safety() {
        let scene = SceneKind::from_name("grid-towers", &json!({})).unwrap();
        let mut boxed: Box<dyn Scene> = Box::new(scene);
        let vp = Viewport::new(8, 8);
        let mut raster = Raster::for_viewport(vp, boxed.background()).unwrap();
        boxed.render(&FrameContext::new(0.0, vp), &mut raster).unwrap();
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(8))]

            #[test]
            fn every_scene_renders_finite_pixels(t in 0.0_f64..1000.0) {
                for name in SceneKind::list_scenes() {
                    let raster = frame(name, t);
                    prop_assert!(
                        raster.pixels().iter().all(|p| p.r.is_finite() && p.g.is_finite() && p.b.is_finite()),
                        "{}", name
                    );
                }
            }
        }
    }
}
