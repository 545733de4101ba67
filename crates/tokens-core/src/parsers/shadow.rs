//! Shadow parser (C3): a structured shadow object, or the first element of
//! an array of them (remaining elements are a documented limitation — see
//! DESIGN.md's note on the array-truncation open question).

use serde_json::Value;

use super::color::parse_color;
use crate::model::ShadowValue;

/// String `$value`s are explicitly unsupported for shadows; callers should
/// emit a diagnostic when this returns `None` for a `Value::String`.
pub fn parse_shadow(value: &Value) -> Option<ShadowValue> {
    match value {
        Value::String(_) => None,
        Value::Array(items) => parse_shadow_object(items.first()?),
        Value::Object(_) => parse_shadow_object(value),
        _ => None,
    }
}

fn parse_shadow_object(value: &Value) -> Option<ShadowValue> {
    let obj = value.as_object()?;
    let color = parse_color(obj.get("color")?.as_str()?)?;
    let offset_x = obj.get("offsetX").and_then(Value::as_f64).unwrap_or(0.0);
    let offset_y = obj.get("offsetY").and_then(Value::as_f64).unwrap_or(0.0);
    let blur = obj.get("blur").and_then(Value::as_f64).unwrap_or(0.0);
    let spread = obj.get("spread").and_then(Value::as_f64);
    let inset = obj.get("inset").and_then(Value::as_bool);
    Some(ShadowValue {
        color,
        offset_x,
        offset_y,
        blur,
        spread,
        inset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_form_is_unsupported() {
        assert!(parse_shadow(&json!("0 1px 2px #000")).is_none());
    }

    #[test]
    fn object_with_defaults() {
        let shadow = parse_shadow(&json!({"color": "#000000"})).expect("color-only shadow parses");
        assert_eq!(shadow.offset_x, 0.0);
        assert_eq!(shadow.offset_y, 0.0);
        assert_eq!(shadow.blur, 0.0);
        assert_eq!(shadow.spread, None);
        assert_eq!(shadow.inset, None);
    }

    #[test]
    fn object_with_all_fields() {
        let shadow = parse_shadow(&json!({
            "color": "#000000",
            "offsetX": 1,
            "offsetY": 2,
            "blur": 4,
            "spread": -1,
            "inset": true
        }))
        .expect("fully populated shadow parses");
        assert_eq!(shadow.offset_x, 1.0);
        assert_eq!(shadow.offset_y, 2.0);
        assert_eq!(shadow.blur, 4.0);
        assert_eq!(shadow.spread, Some(-1.0));
        assert_eq!(shadow.inset, Some(true));
    }

    #[test]
    fn array_uses_first_element_only() {
        let shadow = parse_shadow(&json!([
            {"color": "#111111", "blur": 1},
            {"color": "#222222", "blur": 99}
        ]))
        .expect("array form parses its first element");
        assert_eq!(shadow.blur, 1.0);
    }

    #[test]
    fn missing_color_is_no_value() {
        assert!(parse_shadow(&json!({"blur": 4})).is_none());
    }

    #[test]
    fn non_numeric_offsets_default_to_zero() {
        let shadow = parse_shadow(&json!({"color": "#000", "offsetX": "oops"}))
            .expect("non-numeric offsetX falls back to default, not failure");
        assert_eq!(shadow.offset_x, 0.0);
    }
}
