//! DTCG normalizer (C6): maps flattened DTCG tokens to the normalized
//! token model, resolving the `{path}` alias syntax.

use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;

use super::flatten::FlattenedToken;
use crate::model::{
    NormalizedToken, SourceKind, TokenMetadata, TokenPayload, TokenType, TokenValueOrAlias,
};
use crate::name::normalize_name;
use crate::parsers::{parse_border_radius, parse_color, parse_dimension, parse_shadow};

const TYPOGRAPHY_PROP_TYPES: &[&str] = &[
    "fontFamily",
    "fontSize",
    "fontWeight",
    "lineHeight",
    "letterSpacing",
];

fn alias_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\{([^}]+)\}$").expect("valid regex"))
}

fn alias_reference(value: &str) -> Option<&str> {
    alias_re().captures(value).map(|c| c.get(1).unwrap().as_str())
}

fn map_type(dtcg_type: &str, path: &str) -> Option<TokenType> {
    match dtcg_type {
        "color" => Some(TokenType::Color),
        "dimension" => {
            if path.to_lowercase().contains("spacing") {
                Some(TokenType::Spacing)
            } else {
                Some(TokenType::Dimension)
            }
        }
        "borderRadius" => Some(TokenType::BorderRadius),
        "shadow" => Some(TokenType::Shadow),
        _ => None,
    }
}

fn parse_primitive(token_type: TokenType, raw_value: &Value) -> Option<TokenPayload> {
    match token_type {
        TokenType::Color => parse_color(raw_value.as_str()?).map(TokenPayload::Color),
        TokenType::Dimension | TokenType::Spacing => {
            parse_dimension(raw_value.as_str()?).map(TokenPayload::Dimension)
        }
        TokenType::BorderRadius => {
            parse_border_radius(raw_value.as_str()?).map(TokenPayload::BorderRadius)
        }
        TokenType::Shadow => parse_shadow(raw_value).map(TokenPayload::Shadow),
        _ => None,
    }
}

/// Normalizes every flattened token. Returns tokens in input order; the
/// caller (C8) is responsible for collision detection across the set.
pub fn normalize(flattened: &IndexMap<String, FlattenedToken>) -> (Vec<NormalizedToken>, Vec<String>) {
    let mut tokens = Vec::new();
    let mut warnings = Vec::new();

    for (path, token) in flattened {
        match token {
            FlattenedToken::Typography { value, description } => {
                let name = normalize_name(path);
                let Ok(tv) =
                    TokenValueOrAlias::value(TokenPayload::Typography(value.clone()), TokenType::Typography)
                else {
                    continue;
                };
                if let Ok(nt) = NormalizedToken::new(name, TokenType::Typography, tv, None) {
                    tokens.push(
                        nt.with_description(description.clone())
                            .with_metadata(TokenMetadata { source: SourceKind::Dtcg }),
                    );
                }
            }
            FlattenedToken::Raw(node) => {
                let Some(dtcg_type) = node.get("$type").and_then(Value::as_str) else {
                    continue;
                };
                let Some(token_type) = map_type(dtcg_type, path) else {
                    warnings.push(format!(
                        "warn: unsupported $type \"{dtcg_type}\" for token \"{path}\"; skipping"
                    ));
                    continue;
                };
                let Some(raw_value) = node.get("$value") else {
                    continue;
                };

                let resolved = resolve_value(path, flattened, token_type, raw_value, &mut warnings);
                let Some(value) = resolved else { continue };

                let name = normalize_name(path);
                let Ok(mut nt) = NormalizedToken::new(name, token_type, value, None) else {
                    continue;
                };
                nt = nt.with_metadata(TokenMetadata { source: SourceKind::Dtcg });
                if let Some(desc) = node.get("$description").and_then(Value::as_str) {
                    nt = nt.with_description(Some(desc.to_string()));
                }
                nt.modes = collect_modes(node, token_type);
                tokens.push(nt);
            }
        }
    }

    (tokens, warnings)
}

fn resolve_value(
    path: &str,
    flattened: &IndexMap<String, FlattenedToken>,
    token_type: TokenType,
    raw_value: &Value,
    warnings: &mut Vec<String>,
) -> Option<TokenValueOrAlias> {
    if let Some(reference) = raw_value.as_str().and_then(alias_reference) {
        return if flattened.contains_key(reference) {
            Some(TokenValueOrAlias::alias(normalize_name(reference)))
        } else {
            warnings.push(format!(
                "warn: unknown alias target \"{reference}\" referenced by \"{path}\"; skipping"
            ));
            None
        };
    }

    match parse_primitive(token_type, raw_value) {
        Some(payload) => TokenValueOrAlias::value(payload, token_type).ok(),
        None => {
            warnings.push(format!("warn: could not parse $value for token \"{path}\"; skipping"));
            None
        }
    }
}

fn collect_modes(
    node: &serde_json::Map<String, Value>,
    token_type: TokenType,
) -> Option<IndexMap<String, TokenValueOrAlias>> {
    let mut modes = IndexMap::new();
    for (key, sibling) in node {
        if key.starts_with('$') {
            continue;
        }
        let Some(sibling_obj) = sibling.as_object() else {
            continue;
        };
        let Some(mode_value) = sibling_obj.get("$value") else {
            continue;
        };
        let is_typography_property = sibling_obj
            .get("$type")
            .and_then(Value::as_str)
            .is_some_and(|t| TYPOGRAPHY_PROP_TYPES.contains(&t));
        if is_typography_property {
            continue;
        }
        if let Some(payload) = parse_primitive(token_type, mode_value) {
            if let Ok(value) = TokenValueOrAlias::value(payload, token_type) {
                modes.insert(key.clone(), value);
            }
        }
    }
    (!modes.is_empty()).then_some(modes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtcg::flatten::flatten;
    use serde_json::json;

    // spec scenario 4
    #[test]
    fn dtcg_alias_resolves_to_normalized_reference() {
        let doc = json!({
            "color": {
                "primary": {"$type": "color", "$value": "#FF5733"},
                "secondary": {"$type": "color", "$value": "{color.primary}"}
            }
        });
        let flat = flatten(&doc);
        let (tokens, warnings) = normalize(&flat);
        assert_eq!(tokens.len(), 2);
        assert!(warnings.is_empty());
        let secondary = tokens.iter().find(|t| t.name == "color.secondary").unwrap();
        assert_eq!(
            secondary.value.as_alias_reference(),
            Some("color.primary")
        );
    }

    #[test]
    fn unknown_alias_target_warns_and_skips() {
        let doc = json!({
            "color": {
                "secondary": {"$type": "color", "$value": "{color.primary}"}
            }
        });
        let flat = flatten(&doc);
        let (tokens, warnings) = normalize(&flat);
        assert!(tokens.is_empty());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("unknown alias target"));
    }

    #[test]
    fn standalone_typography_property_is_unsupported() {
        let doc = json!({
            "fontWeight": {"$type": "fontWeight", "$value": "400"}
        });
        let flat = flatten(&doc);
        let (tokens, warnings) = normalize(&flat);
        assert!(tokens.is_empty());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("unsupported"));
    }

    #[test]
    fn dimension_under_spacing_path_maps_to_spacing_type() {
        let doc = json!({
            "spacing": {"small": {"$type": "dimension", "$value": "4px"}}
        });
        let flat = flatten(&doc);
        let (tokens, _warnings) = normalize(&flat);
        assert_eq!(tokens[0].r#type, TokenType::Spacing);
    }

    #[test]
    fn sibling_mode_objects_are_collected() {
        let doc = json!({
            "color": {
                "primary": {
                    "$type": "color",
                    "$value": "#FFFFFF",
                    "dark": {"$value": "#000000"}
                }
            }
        });
        let flat = flatten(&doc);
        let (tokens, _warnings) = normalize(&flat);
        let token = &tokens[0];
        let modes = token.modes.as_ref().expect("modes present");
        assert!(modes.contains_key("dark"));
    }
}
