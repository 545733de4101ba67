//! Name normalization shared by the DTCG normalizer (C6) and the variables
//! normalizer (C7): lowercase, `/` becomes `.`, whitespace runs become a
//! single `-`.

use std::sync::OnceLock;

use regex::Regex;

fn whitespace_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"))
}

/// Normalizes a raw DTCG path or variable name into a dot-separated,
/// lowercase token name.
pub fn normalize_name(raw: &str) -> String {
    let lowered = raw.to_lowercase().replace('/', ".");
    whitespace_run().replace_all(&lowered, "-").into_owned()
}

/// Derives a token `id` from its normalized `name` (dots become hyphens).
pub fn id_from_name(name: &str) -> String {
    name.replace('.', "-")
}
