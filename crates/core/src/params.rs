//! Typed parameter extraction and schema building over `serde_json::Value`.
//!
//! Scene options arrive as a flat JSON object. Every `param_*` helper takes
//! the object, a key and a default; a missing or ill-typed value yields the
//! default. None of them fail, so a scene can always be built from whatever
//! options the host hands over.

use crate::color::Srgb;
use crate::palette::Palette;
use serde_json::{json, Value};

/// Reads a number, accepting integers as well as floats.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Reads a non-negative integer. Floats and negative numbers fall back.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .map(|v| v as usize)
        .unwrap_or(default)
}

pub fn param_bool(params: &Value, name: &str, default: bool) -> bool {
    params.get(name).and_then(Value::as_bool).unwrap_or(default)
}

pub fn param_string(params: &Value, name: &str, default: &str) -> String {
    params
        .get(name)
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_else(|| default.to_owned())
}

/// Reads a hex color string. Unparseable strings are logged and fall back.
pub fn param_color(params: &Value, name: &str, default: Srgb) -> Srgb {
    let Some(raw) = params.get(name).and_then(Value::as_str) else {
        return default;
    };
    match Srgb::from_hex(raw) {
        Ok(color) => color,
        Err(err) => {
            tracing::warn!(param = name, value = raw, %err, "falling back to default color");
            default
        }
    }
}

/// Reads a palette given either by built-in name or as an array of hex strings.
pub fn param_palette(params: &Value, name: &str, default: Palette) -> Palette {
    let parsed = match params.get(name) {
        None | Some(Value::Null) => return default,
        Some(Value::String(s)) => Palette::from_name(s),
        Some(Value::Array(items)) => {
            let hexes: Option<Vec<&str>> = items.iter().map(Value::as_str).collect();
            hexes.and_then(|h| Palette::from_hex(&h).ok())
        }
        Some(_) => None,
    };
    parsed.unwrap_or_else(|| {
        tracing::warn!(param = name, "falling back to default palette");
        default
    })
}

// -- Schema builders --

/// Schema entry for a numeric parameter with an inclusive range.
pub fn schema_number(default: f64, min: f64, max: f64, description: &str) -> Value {
    json!({
        "type": "number",
        "default": default,
        "min": min,
        "max": max,
        "description": description
    })
}

/// Schema entry for an integer parameter with an inclusive range.
pub fn schema_integer(default: usize, min: usize, max: usize, description: &str) -> Value {
    json!({
        "type": "integer",
        "default": default,
        "min": min,
        "max": max,
        "description": description
    })
}

/// Schema entry for a hex color parameter.
pub fn schema_color(default: Srgb, description: &str) -> Value {
    json!({
        "type": "color",
        "default": default.to_hex(),
        "description": description
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- param_f64 --

    #[test]
    fn param_f64_reads_float_and_integer() {
        let params = json!({"speed": 0.22, "cols": 120});
        assert!((param_f64(&params, "speed", 1.0) - 0.22).abs() < f64::EPSILON);
        assert!((param_f64(&params, "cols", 0.0) - 120.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_falls_back_on_missing_null_and_wrong_type() {
        let params = json!({"a": null, "b": "fast"});
        assert!((param_f64(&params, "a", 3.0) - 3.0).abs() < f64::EPSILON);
        assert!((param_f64(&params, "b", 4.0) - 4.0).abs() < f64::EPSILON);
        assert!((param_f64(&params, "c", 5.0) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_on_non_object_returns_default() {
        assert!((param_f64(&json!([1, 2]), "speed", 7.0) - 7.0).abs() < f64::EPSILON);
    }

    // -- param_usize --

    #[test]
    fn param_usize_reads_integer() {
        assert_eq!(param_usize(&json!({"rows": 64}), "rows", 0), 64);
    }

    #[test]
    fn param_usize_rejects_float_and_negative() {
        let params = json!({"a": 2.5, "b": -1});
        assert_eq!(param_usize(&params, "a", 9), 9);
        assert_eq!(param_usize(&params, "b", 8), 8);
    }

    // -- param_bool / param_string --

    #[test]
    fn param_bool_reads_and_falls_back() {
        let params = json!({"on": false, "n": 1});
        assert!(!param_bool(&params, "on", true));
        assert!(param_bool(&params, "n", true));
    }

    #[test]
    fn param_string_reads_and_falls_back() {
        let params = json!({"name": "", "n": 42});
        assert_eq!(param_string(&params, "name", "x"), "");
        assert_eq!(param_string(&params, "n", "fallback"), "fallback");
    }

    // -- param_color --

    #[test]
    fn param_color_parses_hex() {
        let params = json!({"fg": "#ff2d55"});
        let c = param_color(&params, "fg", Srgb::BLACK);
        assert_eq!(c.to_hex(), "#ff2d55");
    }

    #[test]
    fn param_color_falls_back_on_bad_hex() {
        let params = json!({"fg": "not-a-color"});
        assert_eq!(param_color(&params, "fg", Srgb::WHITE), Srgb::WHITE);
    }

    #[test]
    fn param_color_falls_back_on_number() {
        let params = json!({"fg": 0xffffff});
        assert_eq!(param_color(&params, "fg", Srgb::BLACK), Srgb::BLACK);
    }

    // -- param_palette --

    #[test]
    fn param_palette_accepts_builtin_name() {
        let params = json!({"palette": "neon"});
        let p = param_palette(&params, "palette", Palette::windows());
        assert_eq!(p.len(), Palette::neon().len());
        assert_eq!(p.color(0), Palette::neon().color(0));
    }

    #[test]
    fn param_palette_accepts_hex_array() {
        let params = json!({"palette": ["#ff0000", "#00ff00"]});
        let p = param_palette(&params, "palette", Palette::windows());
        assert_eq!(p.len(), 2);
        assert_eq!(p.color(1).to_hex(), "#00ff00");
    }

    #[test]
    fn param_palette_falls_back_on_unknown_name_or_bad_entries() {
        let default_len = Palette::windows().len();
        for bad in [
            json!({"palette": "nope"}),
            json!({"palette": []}),
            json!({"palette": ["#ff0000", 3]}),
            json!({"palette": ["#zz0000"]}),
            json!({"palette": 12}),
        ] {
            let p = param_palette(&bad, "palette", Palette::windows());
            assert_eq!(p.len(), default_len, "input {bad}");
        }
    }

    // -- schema builders --

    #[test]
    fn schema_number_carries_range_and_description() {
        let s = schema_number(0.22, 0.0, 2.0, "scroll speed");
        assert_eq!(s["type"], "number");
        assert_eq!(s["default"], 0.22);
        assert_eq!(s["min"], 0.0);
        assert_eq!(s["max"], 2.0);
        assert_eq!(s["description"], "scroll speed");
    }

    #[test]
    fn schema_integer_is_typed_integer() {
        let s = schema_integer(64, 1, 512, "rows");
        assert_eq!(s["type"], "integer");
        assert_eq!(s["default"], 64);
    }

    #[test]
    fn schema_color_stores_hex_default() {
        let s = schema_color(Srgb::WHITE, "foreground");
        assert_eq!(s["type"], "color");
        assert_eq!(s["default"], "#ffffff");
    }
}
