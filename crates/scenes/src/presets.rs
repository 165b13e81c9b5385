//! Named presets: a scene plus a fixed set of parameter values.

use citylights_core::error::SceneError;
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    pub scene: &'static str,
    pub description: &'static str,
}

const PRESETS: &[Preset] = &[
    Preset {
        name: "a1",
        scene: "city-bars",
        description: "White segmented bars on black, dense rows, hard contrast",
    },
    Preset {
        name: "a2",
        scene: "heart",
        description: "Cyan to blue heart, slow beat",
    },
    Preset {
        name: "a3",
        scene: "heart",
        description: "Violet to magenta heart, quick beat",
    },
    Preset {
        name: "a4",
        scene: "heart",
        description: "Green heart, slowest beat, strongest ripple",
    },
    Preset {
        name: "a5",
        scene: "heart",
        description: "Red heart, fastest beat, heavy grain",
    },
    Preset {
        name: "a6",
        scene: "block-skyline",
        description: "Breathing grey blocks and window bars",
    },
    Preset {
        name: "a7",
        scene: "grid-towers",
        description: "Gridded pastel towers over a dark block silhouette",
    },
    Preset {
        name: "a8",
        scene: "heart",
        description: "Orange to gold heart",
    },
];

impl Preset {
    /// The preset's parameter values.
    pub fn params(&self) -> Value {
        let heart = |a: &str, b: &str, speed: f64, ripple: f64, grain: f64| {
            json!({
                "color_a": a,
                "color_b": b,
                "heartbeat_speed": speed,
                "ripple_strength": ripple,
                "grain_amount": grain,
            })
        };
        match self.name {
            "a1" => json!({
                "fg": "#ffffff",
                "bg": "#000000",
                "cols_near": 70,
                "cols_mid": 46,
                "cols_far": 28,
                "speed_near": 0.28,
                "speed_mid": 0.18,
                "speed_far": 0.12,
                "rows": 40,
                "gap_x": 0.028,
                "gap_y": 0.08,
                "seg_min": 14,
                "seg_max": 28,
                "contrast": 1.4,
                "grain": 0.04,
            }),
            "a2" => heart("#00c6ff", "#0072ff", 1.8, 0.18, 0.05),
            "a3" => heart("#7f00ff", "#e100ff", 2.8, 0.2, 0.05),
            "a4" => heart("#00ff87", "#00ffa3", 1.5, 0.22, 0.04),
            "a5" => heart("#ff1744", "#ff5252", 3.2, 0.12, 0.08),
            "a8" => heart("#f7971e", "#ffd200", 2.0, 0.17, 0.045),
            _ => Value::Object(Map::new()),
        }
    }
}

pub fn list_presets() -> &'static [Preset] {
    PRESETS
}

pub fn find(name: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.name == name)
}

/// Resolves a scene or preset name into the scene name and the parameters
/// to build it with. `overrides` win over the preset's own values.
///
/// Returns `SceneError::UnknownScene` when the name is neither.
pub fn resolve(name: &str, overrides: &Value) -> Result<(&'static str, Value), SceneError> {
    if let Some(scene) = crate::SCENE_NAMES.iter().copied().find(|s| *s == name) {
        return Ok((scene, overrides.clone()));
    }
    let preset = find(name).ok_or_else(|| SceneError::UnknownScene(name.to_string()))?;
    let mut params = preset.params();
    if let (Some(base), Some(extra)) = (params.as_object_mut(), overrides.as_object()) {
        for (k, v) in extra {
            base.insert(k.clone(), v.clone());
        }
    }
    Ok((preset.scene, params))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_preset_names_a_registered_scene() {
        for p in list_presets() {
            assert!(crate::SCENE_NAMES.contains(&p.scene), "{}", p.name);
        }
    }

    #[test]
    fn preset_names_do_not_shadow_scenes() {
        for p in list_presets() {
            assert!(!crate::SCENE_NAMES.contains(&p.name));
        }
    }

    #[test]
    fn scene_names_pass_through() {
        let (scene, params) = resolve("heart", &json!({"heartbeat_speed": 1.0})).unwrap();
        assert_eq!(scene, "heart");
        assert_eq!(params["heartbeat_speed"], 1.0);
    }

    #[test]
    fn preset_overrides_are_merged() {
        let (scene, params) = resolve("a3", &json!({"grain_amount": 0.0})).unwrap();
        assert_eq!(scene, "heart");
        assert_eq!(params["color_a"], "#7f00ff");
        assert_eq!(params["grain_amount"], 0.0);
    }

    #[test]
    fn unknown_name_is_an_error() {
        assert!(matches!(
            resolve("a9", &json!({})),
            Err(SceneError::UnknownScene(_))
        ));
    }

    #[test]
    fn static_presets_have_no_params() {
        assert_eq!(find("a7").unwrap().params(), json!({}));
    }
}
