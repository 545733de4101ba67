//! DTCG flattener (C5): walks a DTCG tree into a path-keyed token mapping,
//! detecting and composing typography groups along the way.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::model::{DimensionValue, FontWeight, LineHeight, TypographyValue};
use crate::parsers::parse_dimension;

const TYPOGRAPHY_PROPS: &[&str] = &[
    "fontFamily",
    "fontSize",
    "fontWeight",
    "lineHeight",
    "letterSpacing",
];

const TYPOGRAPHY_TOKEN_TYPES: &[&str] = &[
    "fontFamily",
    "fontSize",
    "fontWeight",
    "lineHeight",
    "letterSpacing",
    "dimension",
];

/// A token discovered by the flattener, not yet run through the normalizer.
#[derive(Debug, Clone)]
pub enum FlattenedToken {
    /// An ordinary DTCG token node, carrying `$type`/`$value`/`$description`
    /// and any sibling mode objects, still to be parsed by C6.
    Raw(Map<String, Value>),
    /// A typography group already composed into its final value; C6 wraps
    /// this without reparsing anything.
    Typography {
        value: TypographyValue,
        description: Option<String>,
    },
}

pub fn flatten(doc: &Value) -> IndexMap<String, FlattenedToken> {
    let mut out = IndexMap::new();
    if let Some(root) = doc.as_object() {
        walk(root, "", &mut out);
    }
    out
}

fn walk(map: &Map<String, Value>, path: &str, out: &mut IndexMap<String, FlattenedToken>) {
    if !path.is_empty() {
        if let Some(value) = compose_typography(map) {
            out.insert(
                path.to_string(),
                FlattenedToken::Typography {
                    value,
                    description: map.get("$description").and_then(Value::as_str).map(str::to_string),
                },
            );
            return;
        }
    }

    for (key, value) in map {
        if key.starts_with('$') {
            continue;
        }
        let Some(child) = value.as_object() else {
            continue;
        };
        let child_path = join(path, key);
        match child.get("$type") {
            Some(Value::String(_)) => {
                out.insert(child_path, FlattenedToken::Raw(child.clone()));
            }
            _ => walk(child, &child_path, out),
        }
    }
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Structural predicate: every non-metadata child key is a typography
/// property, each is itself a `$type`-bearing token drawn from the
/// typography type set, and at least `fontFamily` and `fontSize` appear.
fn is_typography_group(map: &Map<String, Value>) -> bool {
    let mut has_family = false;
    let mut has_size = false;
    let mut any_child = false;

    for (key, value) in map {
        if key.starts_with('$') {
            continue;
        }
        any_child = true;
        if !TYPOGRAPHY_PROPS.contains(&key.as_str()) {
            return false;
        }
        let Some(obj) = value.as_object() else {
            return false;
        };
        let Some(Value::String(ty)) = obj.get("$type") else {
            return false;
        };
        if !TYPOGRAPHY_TOKEN_TYPES.contains(&ty.as_str()) {
            return false;
        }
        match key.as_str() {
            "fontFamily" => has_family = true,
            "fontSize" => has_size = true,
            _ => {}
        }
    }

    any_child && has_family && has_size
}

fn compose_typography(map: &Map<String, Value>) -> Option<TypographyValue> {
    if !is_typography_group(map) {
        return None;
    }

    let font_family = map
        .get("fontFamily")
        .and_then(|t| t.get("$value"))
        .and_then(Value::as_str)?
        .to_string();
    let font_size = parse_typography_dimension(map, "fontSize")?;

    let font_weight = map
        .get("fontWeight")
        .and_then(|t| t.get("$value"))
        .map(parse_font_weight)
        .unwrap_or(FontWeight::Number(400.0));

    let line_height = map
        .get("lineHeight")
        .and_then(|t| t.get("$value"))
        .map(|v| parse_line_height(v, map))
        .unwrap_or(LineHeight::Number(1.0));

    let letter_spacing = map
        .get("letterSpacing")
        .and_then(|t| t.get("$value"))
        .and_then(Value::as_str)
        .and_then(parse_dimension);

    Some(TypographyValue {
        font_family,
        font_size,
        font_weight,
        line_height,
        letter_spacing,
        text_case: None,
        text_decoration: None,
    })
}

fn parse_typography_dimension(map: &Map<String, Value>, key: &str) -> Option<DimensionValue> {
    map.get(key)
        .and_then(|t| t.get("$value"))
        .and_then(Value::as_str)
        .and_then(parse_dimension)
}

fn parse_font_weight(value: &Value) -> FontWeight {
    match value {
        Value::Number(n) => FontWeight::Number(n.as_f64().unwrap_or(400.0)),
        Value::String(s) => s
            .parse::<f64>()
            .map(FontWeight::Number)
            .unwrap_or_else(|_| FontWeight::Named(s.clone())),
        _ => FontWeight::Number(400.0),
    }
}

fn parse_line_height(value: &Value, map: &Map<String, Value>) -> LineHeight {
    if let Some(n) = value.as_f64() {
        // Unitless number stays a number unless its own $type says otherwise.
        let declared_type = map
            .get("lineHeight")
            .and_then(|t| t.get("$type"))
            .and_then(Value::as_str);
        if declared_type != Some("dimension") {
            return LineHeight::Number(n);
        }
    }
    value
        .as_str()
        .and_then(parse_dimension)
        .map(LineHeight::Dimension)
        .unwrap_or(LineHeight::Number(1.0))
}
