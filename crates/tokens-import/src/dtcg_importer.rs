//! C8 (DTCG branch): locates a DTCG document on disk or over HTTP, then
//! runs it through the core's validate → flatten → normalize pipeline
//! (spec §6.1).

use tokens_core::{cross_validate, TokenSet, TokenSetMetadata};

use crate::error::{Error, Result};
use crate::transport;

/// Exactly one of `path` or `url` must be set (spec §4.8 / §7 category 1).
#[derive(Debug, Clone)]
pub enum DtcgLocator {
    Path(String),
    Url(String),
}

impl DtcgLocator {
    pub fn from_options(path: Option<String>, url: Option<String>) -> Result<Self> {
        match (path, url) {
            (Some(_), Some(_)) => Err(Error::ConflictingSources),
            (Some(path), None) => Ok(Self::Path(path)),
            (None, Some(url)) => Ok(Self::Url(url)),
            (None, None) => Err(Error::NoSource),
        }
    }

    fn describe(&self) -> &str {
        match self {
            Self::Path(path) => path,
            Self::Url(url) => url,
        }
    }
}

pub struct DtcgImportOutcome {
    pub token_set: TokenSet,
    pub warnings: Vec<String>,
}

/// Runs the full DTCG import: retrieve bytes, parse JSON, validate, flatten,
/// normalize, detect name collisions. All failures up to and including a
/// failed structural validation are reported as a single `Error::DtcgImport`
/// (spec §7 category 2 — fatal, not a per-token warning).
pub async fn import(locator: &DtcgLocator) -> Result<DtcgImportOutcome> {
    let bytes = match locator {
        DtcgLocator::Path(path) => transport::read_file(path)
            .await
            .map_err(|e| Error::DtcgImport(e.to_string()))?,
        DtcgLocator::Url(url) => transport::get_bytes_str(url, None, locator.describe())
            .await
            .map_err(|e| Error::DtcgImport(e.to_string()))?,
    };

    let doc: serde_json::Value =
        serde_json::from_slice(&bytes).map_err(|e| Error::DtcgImport(format!("invalid JSON: {e}")))?;

    let validation = tokens_core::dtcg::validate(&doc);
    if !validation.valid {
        return Err(Error::DtcgImport(validation.errors.join("; ")));
    }

    let flattened = tokens_core::dtcg::flatten(&doc);
    let (tokens, mut warnings) = tokens_core::dtcg::normalize(&flattened);

    let mut token_set = TokenSet::new(TokenSetMetadata {
        source: Some(tokens_core::SourceKind::Dtcg),
        name: Some(format!("DTCG Tokens - {}", locator.describe())),
        version: None,
        description: None,
    });

    for token in tokens {
        if let Some(displaced) = token_set.insert(token) {
            warnings.push(format!(
                "warn: token \"{}\" collides with an earlier token of the same name; the later one wins",
                displaced.name
            ));
        }
    }

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

    Ok(DtcgImportOutcome { token_set, warnings })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locator_rejects_both_sources() {
        let err = DtcgLocator::from_options(Some("a.json".into()), Some("https://x".into()))
            .expect_err("both set must fail");
        assert!(matches!(err, Error::ConflictingSources));
    }

    #[test]
    fn locator_rejects_neither_source() {
        let err = DtcgLocator::from_options(None, None).expect_err("neither set must fail");
        assert!(matches!(err, Error::NoSource));
    }

    #[tokio::test]
    async fn import_fails_fatally_on_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("tokens.json");
        std::fs::write(&file_path, "not json").unwrap();
        let locator = DtcgLocator::Path(file_path.to_string_lossy().to_string());
        let err = import(&locator).await.expect_err("invalid JSON must fail");
        assert!(matches!(err, Error::DtcgImport(_)));
    }

    #[tokio::test]
    async fn import_succeeds_on_well_formed_document() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("tokens.json");
        std::fs::write(
            &file_path,
            r#"{"color": {"primary": {"$type": "color", "$value": "#FF5733"}}}"#,
        )
        .unwrap();
        let locator = DtcgLocator::Path(file_path.to_string_lossy().to_string());
        let outcome = import(&locator).await.expect("well-formed document imports");
        assert_eq!(outcome.token_set.tokens.len(), 1);
        assert!(outcome.token_set.tokens.contains_key("color.primary"));
    }
}
