#![forbid(unsafe_code)]

//! Design-token normalization pipeline.
//!
//! Turns two heterogeneous sources — DTCG-format JSON documents and
//! Figma-style variables service records — into a single normalized
//! [`TokenSet`](model::TokenSet). This crate is the CORE: pure, synchronous,
//! and free of file-system or network access. Byte retrieval, HTTP, and the
//! CLI live in `tokens-import` / `tokens-cli`.

pub mod dtcg;
pub mod error;
pub mod model;
pub mod name;
pub mod parsers;
pub mod validate;
pub mod variables;

pub use error::{Error, Result};
pub use model::{
    BorderRadiusUnit, BorderRadiusValue, ColorValue, DimensionUnit, DimensionValue, FontWeight,
    LineHeight, NormalizedToken, SourceKind, TokenMetadata, TokenPayload, TokenSet,
    TokenSetMetadata, TokenType, TokenValueOrAlias, TypographyValue,
};
pub use validate::{validate as cross_validate, BrokenAlias, CrossValidationResult};
