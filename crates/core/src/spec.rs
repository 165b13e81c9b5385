//! Saved description of a single rendered frame.
//!
//! A [`SceneSpec`] names a scene (or preset), the raster size, the frame
//! time and the parameter overrides. Rendering the same spec twice gives
//! bit-identical pixels, which is what `citylights replay` relies on.

use crate::error::SceneError;
use crate::frame::{FrameContext, Viewport};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SceneSpec {
    pub scene: String,
    pub width: usize,
    pub height: usize,
    #[serde(default)]
    pub time: f64,
    #[serde(default = "empty_object")]
    pub params: Value,
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

impl SceneSpec {
    /// Spec at time zero with no parameter overrides.
    pub fn new(scene: &str, width: usize, height: usize) -> Self {
        Self {
            scene: scene.to_string(),
            width,
            height,
            time: 0.0,
            params: empty_object(),
        }
    }

    /// Rejects zero or overflowing dimensions.
    pub fn validate(&self) -> Result<(), SceneError> {
        if self.width == 0 || self.height == 0 {
            return Err(SceneError::InvalidDimensions);
        }
        self.width
            .checked_mul(self.height)
            .ok_or(SceneError::InvalidDimensions)?;
        Ok(())
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }

    pub fn frame_context(&self) -> FrameContext {
        FrameContext::new(self.time, self.viewport())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_has_empty_params_and_zero_time() {
        let s = SceneSpec::new("blurry-city", 640, 360);
        assert_eq!(s.params, json!({}));
        assert_eq!(s.time, 0.0);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_dimensions() {
        assert!(matches!(
            SceneSpec::new("x", 0, 10).validate(),
            Err(SceneError::InvalidDimensions)
        ));
        assert!(SceneSpec::new("x", usize::MAX, 2).validate().is_err());
    }

    #[test]
    fn json_round_trip_preserves_everything() {
        let mut s = SceneSpec::new("a1", 320, 200);
        s.time = 12.5;
        s.params = json!({"contrast": 1.4, "fg": "#ffffff"});
        let text = serde_json::to_string(&s).unwrap();
        let back: SceneSpec = serde_json::from_str(&text).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn time_and_params_are_optional_in_json() {
        let s: SceneSpec =
            serde_json::from_str(r#"{"scene":"heart","width":10,"height":20}"#).unwrap();
        assert_eq!(s.time, 0.0);
        assert_eq!(s.params, json!({}));
        assert_eq!(s.frame_context().viewport.height(), 20);
    }
}
