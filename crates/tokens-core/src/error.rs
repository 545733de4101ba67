pub type Result<T> = std::result::Result<T, Error>;

/// Core-local failures. Most per-token problems never reach this type — they
/// are collected as warnings instead (see the module docs on `dtcg` and
/// `variables`). `Error` is reserved for structural failures: a malformed
/// DTCG document (C4) or a constructor invariant violated by the caller.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("DTCG file must be an object")]
    RootNotObject,

    #[error("invalid DTCG document: {0}")]
    Invalid(String),

    #[error("token type {expected:?} cannot hold a {actual} payload")]
    PayloadTypeMismatch {
        expected: crate::model::TokenType,
        actual: &'static str,
    },

    #[error("token name must be non-empty")]
    EmptyName,
}
