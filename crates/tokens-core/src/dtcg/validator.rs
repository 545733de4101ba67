//! DTCG validator (C4): structural validation of a parsed JSON document.
//! Accumulates diagnostics rather than failing on the first problem.

use serde_json::{Map, Value};

const ALLOWED_TYPES: &[&str] = &[
    "color",
    "dimension",
    "fontFamily",
    "fontSize",
    "fontWeight",
    "lineHeight",
    "letterSpacing",
    "borderRadius",
    "shadow",
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Validates a parsed DTCG document. Never panics; a malformed document
/// yields `valid: false` with a non-empty `errors` list rather than an
/// `Err`.
pub fn validate(doc: &Value) -> ValidationResult {
    let mut errors = Vec::new();

    match doc.as_object() {
        Some(root) => {
            if let Some(schema) = root.get("$schema") {
                if !schema.is_string() {
                    errors.push("$schema must be a string".to_string());
                }
            }
            walk_group(root, "", &mut errors);
        }
        None => errors.push("DTCG file must be an object".to_string()),
    }

    ValidationResult {
        valid: errors.is_empty(),
        errors,
    }
}

fn walk_group(map: &Map<String, Value>, prefix: &str, errors: &mut Vec<String>) {
    for (key, value) in map {
        if key.starts_with('$') {
            continue;
        }
        let path = join_path(prefix, key);
        let Some(node) = value.as_object() else {
            errors.push(format!("{path}: expected an object"));
            continue;
        };

        match node.get("$type") {
            None => walk_group(node, &path, errors),
            Some(Value::String(ty)) => {
                if !ALLOWED_TYPES.contains(&ty.as_str()) {
                    errors.push(format!("{path}: unknown $type \"{ty}\""));
                }
                match node.get("$value") {
                    None => errors.push(format!("{path}: missing $value")),
                    Some(v) => {
                        if !value_shape_ok(ty, v) {
                            errors.push(format!(
                                "{path}: $value has an invalid shape for $type \"{ty}\""
                            ));
                        }
                    }
                }
            }
            Some(_) => errors.push(format!("{path}: $type must be a string")),
        }
    }
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn value_shape_ok(ty: &str, value: &Value) -> bool {
    match ty {
        "color" | "dimension" | "fontFamily" => value.is_string(),
        "fontWeight" => value.is_number() || value.is_string(),
        "shadow" => value.is_object() || value.is_array() || value.is_string(),
        "fontSize" | "lineHeight" | "letterSpacing" | "borderRadius" => {
            value.is_string() || value.is_number()
        }
        // $type itself was already flagged above; don't pile on a second
        // diagnostic for a shape we don't recognize.
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn root_must_be_object() {
        let result = validate(&json!([1, 2, 3]));
        assert!(!result.valid);
        assert_eq!(result.errors, vec!["DTCG file must be an object"]);
    }

    #[test]
    fn schema_must_be_string() {
        let result = validate(&json!({"$schema": 1}));
        assert!(!result.valid);
        assert!(result.errors.iter().any(|e| e.contains("$schema")));
    }

    #[test]
    fn token_missing_value_is_reported_with_path() {
        let result = validate(&json!({"color": {"primary": {"$type": "color"}}}));
        assert!(!result.valid);
        assert!(result.errors.iter().any(|e| e == "color.primary: missing $value"));
    }

    #[test]
    fn unknown_type_is_reported() {
        let result = validate(&json!({"color": {"primary": {"$type": "hsl", "$value": "0,0,0"}}}));
        assert!(!result.valid);
        assert!(result.errors.iter().any(|e| e.contains("unknown $type")));
    }

    #[test]
    fn well_formed_document_is_valid() {
        let doc = json!({
            "$schema": "https://example.com/schema.json",
            "color": {
                "primary": {"$type": "color", "$value": "#FF5733"},
                "secondary": {"$type": "color", "$value": "{color.primary}"}
            }
        });
        let result = validate(&doc);
        assert!(result.valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn shadow_accepts_object_array_or_string_shape() {
        let doc = json!({
            "shadow": {
                "card": {"$type": "shadow", "$value": {"color": "#000", "offsetX": 0, "offsetY": 1, "blur": 2}}
            }
        });
        assert!(validate(&doc).valid);
    }
}
