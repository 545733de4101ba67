//! Variables normalizer (C7): maps Figma-style variable records to the
//! normalized token model.

use indexmap::IndexMap;

use super::types::{Collection, FigmaVariable, VariableValue};
use crate::model::{
    NormalizedToken, SourceKind, TokenMetadata, TokenPayload, TokenType, TokenValueOrAlias,
};
use crate::name::normalize_name;
use crate::parsers::parse_color;

fn map_resolved_type(raw: &str) -> Option<TokenType> {
    match raw {
        "COLOR" => Some(TokenType::Color),
        "FLOAT" => Some(TokenType::Number),
        "STRING" => Some(TokenType::String),
        "BOOLEAN" => Some(TokenType::Boolean),
        _ => None,
    }
}

fn choose_default_mode_id(var: &FigmaVariable, collection: Option<&Collection>) -> Option<String> {
    if let Some(c) = collection {
        if var.values_by_mode.contains_key(&c.default_mode_id) {
            return Some(c.default_mode_id.clone());
        }
    }
    var.values_by_mode.keys().next().cloned()
}

fn mode_name(collection: Option<&Collection>, mode_id: &str) -> String {
    collection
        .and_then(|c| c.modes.iter().find(|m| m.mode_id == mode_id))
        .map(|m| m.name.clone())
        .unwrap_or_else(|| mode_id.to_string())
}

fn resolve_value(
    mode_value: &VariableValue,
    token_type: TokenType,
    id_to_name: &IndexMap<String, String>,
    var_name: &str,
    var_id: &str,
    warnings: &mut Vec<String>,
) -> Option<TokenValueOrAlias> {
    match mode_value {
        VariableValue::Alias { value: id } => match id_to_name.get(id) {
            Some(name) => Some(TokenValueOrAlias::alias(name.clone())),
            None => {
                warnings.push(format!(
                    "warn: unknown alias target id \"{id}\" referenced by variable \"{var_name}\" ({var_id})"
                ));
                None
            }
        },
        VariableValue::Value { value } => {
            let payload = match token_type {
                TokenType::Color => value.as_str().and_then(parse_color).map(TokenPayload::Color),
                TokenType::Number => value.as_f64().filter(|n| n.is_finite()).map(TokenPayload::Number),
                TokenType::String => value.as_str().map(|s| TokenPayload::String(s.to_string())),
                TokenType::Boolean => value.as_bool().map(TokenPayload::Bool),
                _ => None,
            }?;
            TokenValueOrAlias::value(payload, token_type).ok()
        }
    }
}

/// Normalizes every variable, applying the default-mode selection (rule 3)
/// and name-collision policy (rule 6) internally — the caller does not need
/// to perform a separate collision pass for the variables source.
pub fn normalize(
    variables: &IndexMap<String, FigmaVariable>,
    collections: &IndexMap<String, Collection>,
) -> (IndexMap<String, NormalizedToken>, Vec<String>) {
    let mut warnings = Vec::new();

    let id_to_name: IndexMap<String, String> = variables
        .iter()
        .map(|(id, var)| (id.clone(), normalize_name(&var.name)))
        .collect();

    let mut result: IndexMap<String, NormalizedToken> = IndexMap::new();
    let mut name_to_variable_id: IndexMap<String, String> = IndexMap::new();

    for (id, var) in variables {
        let Some(token_type) = map_resolved_type(&var.resolved_type) else {
            warnings.push(format!(
                "Unsupported variable type \"{}\" for variable \"{}\" ({id}). Skipping.",
                var.resolved_type, var.name
            ));
            continue;
        };

        let collection = collections.get(&var.variable_collection_id);
        let Some(default_mode_id) = choose_default_mode_id(var, collection) else {
            continue;
        };
        let Some(default_raw) = var.values_by_mode.get(&default_mode_id) else {
            continue;
        };

        let name = id_to_name.get(id).cloned().unwrap_or_else(|| normalize_name(&var.name));

        let Some(primary_value) =
            resolve_value(default_raw, token_type, &id_to_name, &var.name, id, &mut warnings)
        else {
            continue;
        };

        let mut modes = IndexMap::new();
        for (mode_id, mode_value) in &var.values_by_mode {
            if *mode_id == default_mode_id {
                continue;
            }
            if let Some(v) = resolve_value(mode_value, token_type, &id_to_name, &var.name, id, &mut warnings) {
                modes.insert(mode_name(collection, mode_id), v);
            }
        }

        let Ok(mut token) =
            NormalizedToken::new(name.clone(), token_type, primary_value, (!modes.is_empty()).then_some(modes))
        else {
            continue;
        };
        token = token.with_metadata(TokenMetadata { source: SourceKind::Figma });
        if let Some(desc) = &var.description {
            token = token.with_description(Some(desc.clone()));
        }

        if let Some(prev_id) = name_to_variable_id.get(&name) {
            warnings.push(format!(
                "warn: variable \"{}\" ({id}) collides with variable ({prev_id}) on normalized name \"{name}\"; the later one wins",
                var.name
            ));
        }
        name_to_variable_id.insert(name.clone(), id.clone());
        result.insert(name, token);
    }

    (result, warnings)
}
