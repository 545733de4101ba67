//! The byte-level contract spec.md leaves unspecified (§1, §6): reading a
//! DTCG document from disk or HTTP, and calling the two variables-service
//! endpoints. Owns the canonical HTTP error-message mapping (§4.8) and the
//! ambient logging around every request (§10.2).

use std::time::{Duration, Instant};

use indexmap::IndexMap;
use serde::Deserialize;
use url::Url;

use tokens_core::variables::{Collection, FigmaVariable};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("{0}")]
    Status(String),
}

pub type Result<T> = std::result::Result<T, TransportError>;

fn client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()
}

/// Joins `path` onto `base`, treating `base`'s path as a directory
/// regardless of whether the caller included a trailing slash.
fn join_url(base: &str, path: &str) -> Result<Url> {
    let mut base = Url::parse(base)?;
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }
    Ok(base.join(path)?)
}

/// Reads bytes from a local file path.
pub async fn read_file(path: &str) -> Result<Vec<u8>> {
    tracing::debug!(path, "reading DTCG file from disk");
    let bytes = tokio::fs::read(path).await?;
    tracing::debug!(path, bytes = bytes.len(), "read DTCG file");
    Ok(bytes)
}

/// GETs a URL and, on any non-2xx status, maps the response to a canonical
/// message (spec §4.8). `context` names the resource for 404 messages
/// ("Invalid file key \"<key>\"" needs the file key, not the URL).
pub async fn get_bytes(url: &Url, token_header: Option<&str>, not_found_context: &str) -> Result<Vec<u8>> {
    let started = Instant::now();
    tracing::debug!(url = %url, "GET request");

    let mut request = client()?.get(url.clone());
    if let Some(token) = token_header {
        request = request.header("X-Figma-Token", token);
    }
    let response = request.send().await?;
    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis();

    if status.is_success() {
        tracing::debug!(url = %url, status = status.as_u16(), elapsed_ms, "GET succeeded");
        return Ok(response.bytes().await?.to_vec());
    }

    let retry_after = response
        .headers()
        .get("Retry-After")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());
    let body = response.text().await.unwrap_or_default();
    let message = canonical_http_error(status.as_u16(), &body, retry_after, not_found_context);
    tracing::warn!(url = %url, status = status.as_u16(), elapsed_ms, message = %message, "GET failed");
    Err(TransportError::Status(message))
}

/// Parses `url`, then GETs it. See [`get_bytes`] for the success/failure
/// contract.
pub async fn get_bytes_str(url: &str, token_header: Option<&str>, not_found_context: &str) -> Result<Vec<u8>> {
    let parsed = Url::parse(url)?;
    get_bytes(&parsed, token_header, not_found_context).await
}

fn canonical_http_error(status: u16, body: &str, retry_after: Option<u64>, not_found_context: &str) -> String {
    match status {
        401 | 403 => "Authentication failed: Invalid or expired Personal Access Token".to_string(),
        404 => format!("File not found: Invalid file key \"{not_found_context}\""),
        429 => match retry_after {
            Some(seconds) => format!("Rate limit exceeded. Retry after {seconds} seconds"),
            None => "Rate limit exceeded".to_string(),
        },
        other => extract_err_field(body).unwrap_or_else(|| format!("API request failed with status {other}")),
    }
}

fn extract_err_field(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("err")?.as_str().map(str::to_string)
}

#[derive(Debug, Deserialize)]
struct VariablesResponse {
    meta: VariablesMeta,
}

#[derive(Debug, Deserialize)]
struct VariablesMeta {
    variables: IndexMap<String, FigmaVariable>,
}

#[derive(Debug, Deserialize)]
struct CollectionsResponse {
    meta: CollectionsMeta,
}

#[derive(Debug, Deserialize)]
struct CollectionsMeta {
    #[serde(rename = "variableCollections")]
    variable_collections: IndexMap<String, Collection>,
}

pub async fn fetch_variables(
    base_url: &str,
    file_key: &str,
    api_key: &str,
) -> Result<IndexMap<String, FigmaVariable>> {
    let url = join_url(base_url, &format!("v1/files/{file_key}/variables/local"))?;
    let bytes = get_bytes(&url, Some(api_key), file_key).await?;
    let parsed: VariablesResponse = serde_json::from_slice(&bytes)?;
    Ok(parsed.meta.variables)
}

pub async fn fetch_collections(
    base_url: &str,
    file_key: &str,
    api_key: &str,
) -> Result<IndexMap<String, Collection>> {
    let url = join_url(base_url, &format!("v1/files/{file_key}/variable-collections"))?;
    let bytes = get_bytes(&url, Some(api_key), file_key).await?;
    let parsed: CollectionsResponse = serde_json::from_slice(&bytes)?;
    Ok(parsed.meta.variable_collections)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_401_and_403_to_auth_message() {
        assert_eq!(
            canonical_http_error(401, "", None, "abc"),
            "Authentication failed: Invalid or expired Personal Access Token"
        );
        assert_eq!(
            canonical_http_error(403, "", None, "abc"),
            "Authentication failed: Invalid or expired Personal Access Token"
        );
    }

    #[test]
    fn maps_404_with_file_key() {
        assert_eq!(
            canonical_http_error(404, "", None, "abc123"),
            "File not found: Invalid file key \"abc123\""
        );
    }

    #[test]
    fn maps_429_with_and_without_retry_after() {
        assert_eq!(canonical_http_error(429, "", None, "k"), "Rate limit exceeded");
        assert_eq!(
            canonical_http_error(429, "", Some(30), "k"),
            "Rate limit exceeded. Retry after 30 seconds"
        );
    }

    #[test]
    fn extracts_err_field_from_body() {
        assert_eq!(
            canonical_http_error(500, r#"{"err":"internal failure"}"#, None, "k"),
            "internal failure"
        );
    }

    #[test]
    fn falls_back_to_generic_status_message() {
        assert_eq!(
            canonical_http_error(500, "not json", None, "k"),
            "API request failed with status 500"
        );
    }

    #[test]
    fn join_url_handles_missing_and_present_trailing_slash() {
        let a = join_url("https://api.figma.com", "v1/files/abc/variables/local").unwrap();
        let b = join_url("https://api.figma.com/", "v1/files/abc/variables/local").unwrap();
        assert_eq!(a.as_str(), "https://api.figma.com/v1/files/abc/variables/local");
        assert_eq!(a, b);
    }

    #[test]
    fn join_url_rejects_malformed_base() {
        assert!(join_url("not a url", "v1/files/abc/variables/local").is_err());
    }
}
