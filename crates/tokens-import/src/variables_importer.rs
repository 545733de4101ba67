//! C8 (variables branch): fetches variables and collections concurrently
//! from a Figma-style variables service (spec §6.2), then runs C7.

use indexmap::IndexMap;

use tokens_core::{cross_validate, TokenSet, TokenSetMetadata};

use crate::error::{Error, Result};
use crate::transport;

#[derive(Debug, Clone)]
pub struct VariablesSource {
    pub base_url: String,
    pub file_key: String,
    pub api_key: String,
}

pub struct VariablesImportOutcome {
    pub token_set: TokenSet,
    pub warnings: Vec<String>,
}

/// Fetches variables and collections concurrently. A failed variables fetch
/// is fatal (no tokens can be built without it); a failed collections fetch
/// degrades to mode IDs standing in for mode names (spec §6.2 "settled"
/// semantics — one source failing does not abort the other).
pub async fn import(source: &VariablesSource) -> Result<VariablesImportOutcome> {
    let (variables_result, collections_result) = tokio::join!(
        transport::fetch_variables(&source.base_url, &source.file_key, &source.api_key),
        transport::fetch_collections(&source.base_url, &source.file_key, &source.api_key),
    );

    let variables = variables_result.map_err(|e| Error::FigmaImport(e.to_string()))?;

    let mut warnings = Vec::new();
    let collections = match collections_result {
        Ok(collections) => collections,
        Err(e) => {
            warnings.push(format!(
                "Failed to fetch variable collections: {e}. Continuing with mode IDs instead of names."
            ));
            IndexMap::new()
        }
    };

    let (tokens, mut normalize_warnings) = tokens_core::variables::normalize(&variables, &collections);
    warnings.append(&mut normalize_warnings);

    let token_set = TokenSet {
        tokens,
        metadata: TokenSetMetadata {
            source: Some(tokens_core::SourceKind::Figma),
            name: Some(format!("Figma Variables - {}", source.file_key)),
            version: None,
            description: None,
        },
    };

    let cross = cross_validate(&token_set.tokens);
    for missing in &cross.missing_required_types {
        warnings.push(format!("warn: no tokens of required type \"{missing:?}\" were found"));
    }
    for broken in &cross.broken_aliases {
        warnings.push(format!(
            "warn: token \"{}\" has a broken alias reference \"{}\"",
            broken.token_name, broken.reference
        ));
    }
    for cycle in &cross.cycles {
        warnings.push(format!("warn: alias cycle detected: {}", cycle.join(" -> ")));
    }

    Ok(VariablesImportOutcome { token_set, warnings })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn collections_failure_degrades_instead_of_aborting() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/files/abc/variables/local"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "meta": {
                    "variables": {
                        "V1": {
                            "id": "V1",
                            "name": "color/primary",
                            "variableCollectionId": "C1",
                            "resolvedType": "COLOR",
                            "valuesByMode": {"M1": {"type": "VALUE", "value": "#FF5733"}}
                        }
                    }
                }
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/files/abc/variable-collections"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let source = VariablesSource {
            base_url: server.uri(),
            file_key: "abc".to_string(),
            api_key: "token".to_string(),
        };
        let outcome = import(&source).await.expect("variables fetch succeeded despite collections 404");
        assert_eq!(outcome.token_set.tokens.len(), 1);
        assert!(outcome
            .warnings
            .iter()
            .any(|w| w.starts_with("Failed to fetch variable collections")));
    }

    #[tokio::test]
    async fn variables_failure_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/files/abc/variables/local"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/files/abc/variable-collections"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "meta": {"variableCollections": {}}
            })))
            .mount(&server)
            .await;

        let source = VariablesSource {
            base_url: server.uri(),
            file_key: "abc".to_string(),
            api_key: "token".to_string(),
        };
        let err = import(&source).await.expect_err("401 on variables must be fatal");
        assert!(matches!(err, Error::FigmaImport(_)));
    }
}
