//! Cross-token validator (C9): required-type coverage, alias-target
//! existence, and circular-reference detection. Runs after normalization,
//! across an entire token set.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::model::{NormalizedToken, TokenType};

const REQUIRED_TYPES: &[TokenType] = &[
    TokenType::Color,
    TokenType::Spacing,
    TokenType::Typography,
    TokenType::BorderRadius,
    TokenType::Shadow,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokenAlias {
    /// The referring token's name, qualified with `" (mode: <mode>)"` when
    /// the broken reference came from a mode value rather than the primary.
    pub token_name: String,
    pub reference: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrossValidationResult {
    pub missing_required_types: Vec<TokenType>,
    pub broken_aliases: Vec<BrokenAlias>,
    pub cycles: Vec<Vec<String>>,
}

impl CrossValidationResult {
    pub fn is_valid(&self) -> bool {
        self.missing_required_types.is_empty() && self.broken_aliases.is_empty() && self.cycles.is_empty()
    }
}

pub fn validate(tokens: &IndexMap<String, NormalizedToken>) -> CrossValidationResult {
    CrossValidationResult {
        missing_required_types: missing_required_types(tokens),
        broken_aliases: broken_aliases(tokens),
        cycles: detect_cycles(tokens),
    }
}

fn missing_required_types(tokens: &IndexMap<String, NormalizedToken>) -> Vec<TokenType> {
    let present: std::collections::HashSet<TokenType> = tokens.values().map(|t| t.r#type).collect();
    REQUIRED_TYPES
        .iter()
        .copied()
        .filter(|t| !present.contains(t))
        .collect()
}

fn broken_aliases(tokens: &IndexMap<String, NormalizedToken>) -> Vec<BrokenAlias> {
    let mut out = Vec::new();
    for (name, token) in tokens {
        if let Some(reference) = token.value.as_alias_reference() {
            if !tokens.contains_key(reference) {
                out.push(BrokenAlias {
                    token_name: name.clone(),
                    reference: reference.to_string(),
                });
            }
        }
        if let Some(modes) = &token.modes {
            for (mode_name, mode_value) in modes {
                if let Some(reference) = mode_value.as_alias_reference() {
                    if !tokens.contains_key(reference) {
                        out.push(BrokenAlias {
                            token_name: format!("{name} (mode: {mode_name})"),
                            reference: reference.to_string(),
                        });
                    }
                }
            }
        }
    }
    out
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    White,
    Gray,
    Black,
}

fn detect_cycles(tokens: &IndexMap<String, NormalizedToken>) -> Vec<Vec<String>> {
    let mut marks: HashMap<String, Mark> = HashMap::new();
    let mut cycles = Vec::new();
    for name in tokens.keys() {
        let mut path = Vec::new();
        visit(name, tokens, &mut marks, &mut path, &mut cycles);
    }
    cycles
}

fn visit(
    name: &str,
    tokens: &IndexMap<String, NormalizedToken>,
    marks: &mut HashMap<String, Mark>,
    path: &mut Vec<String>,
    cycles: &mut Vec<Vec<String>>,
) {
    match marks.get(name).copied().unwrap_or(Mark::White) {
        Mark::Black => return,
        Mark::Gray => {
            if let Some(pos) = path.iter().position(|n| n == name) {
                let mut cycle = path[pos..].to_vec();
                cycle.push(name.to_string());
                cycles.push(cycle);
            }
            return;
        }
        Mark::White => {}
    }

    marks.insert(name.to_string(), Mark::Gray);
    path.push(name.to_string());
    if let Some(reference) = tokens.get(name).and_then(|t| t.value.as_alias_reference()) {
        if tokens.contains_key(reference) {
            visit(reference, tokens, marks, path, cycles);
        }
    }
    path.pop();
    marks.insert(name.to_string(), Mark::Black);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ColorValue, SourceKind, TokenMetadata, TokenPayload, TokenValueOrAlias};

    fn color_token(name: &str) -> NormalizedToken {
        let value =
            TokenValueOrAlias::value(TokenPayload::Color(ColorValue::new(0.0, 0.0, 0.0, None)), TokenType::Color)
                .unwrap();
        NormalizedToken::new(name, TokenType::Color, value, None)
            .unwrap()
            .with_metadata(TokenMetadata { source: SourceKind::Dtcg })
    }

    fn alias_token(name: &str, reference: &str) -> NormalizedToken {
        NormalizedToken::new(name, TokenType::Color, TokenValueOrAlias::alias(reference), None).unwrap()
    }

    #[test]
    fn reports_missing_required_types() {
        let mut tokens = IndexMap::new();
        tokens.insert("color.a".to_string(), color_token("color.a"));
        let result = validate(&tokens);
        assert!(result.missing_required_types.contains(&TokenType::Spacing));
        assert!(result.missing_required_types.contains(&TokenType::Typography));
        assert!(!result.missing_required_types.contains(&TokenType::Color));
        assert!(!result.is_valid());
    }

    #[test]
    fn alias_target_validator_flips_on_removal() {
        let mut tokens = IndexMap::new();
        tokens.insert("color.a".to_string(), color_token("color.a"));
        tokens.insert("color.b".to_string(), alias_token("color.b", "color.a"));
        assert!(validate(&tokens).broken_aliases.is_empty());

        tokens.shift_remove("color.a");
        let result = validate(&tokens);
        assert_eq!(result.broken_aliases.len(), 1);
        assert_eq!(result.broken_aliases[0].reference, "color.a");
    }

    // spec scenario 7
    #[test]
    fn detects_two_node_cycle() {
        let mut tokens = IndexMap::new();
        tokens.insert("a".to_string(), alias_token("a", "b"));
        tokens.insert("b".to_string(), alias_token("b", "a"));
        let result = validate(&tokens);
        assert_eq!(result.cycles.len(), 1);
        let cycle = &result.cycles[0];
        assert_eq!(cycle.first(), cycle.last());
        assert_eq!(cycle.len(), 3);
    }

    #[test]
    fn acyclic_set_reports_no_cycles() {
        let mut tokens = IndexMap::new();
        tokens.insert("color.a".to_string(), color_token("color.a"));
        tokens.insert("color.b".to_string(), alias_token("color.b", "color.a"));
        assert!(validate(&tokens).cycles.is_empty());
    }
}
