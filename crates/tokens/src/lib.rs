#![forbid(unsafe_code)]

//! `tokens` ingests design tokens from DTCG-format JSON and Figma-style
//! variables services, and normalizes both into one token model.
//!
//! The core model and parsers (`tokens-core`) are always available.
//! Enable the `import` feature for the async importers that actually
//! fetch/read a source (`tokens-import`).

pub use tokens_core::*;

#[cfg(feature = "import")]
pub mod import {
    pub use tokens_import::{
        dtcg_importer, import, transport, variables_importer, DtcgImportOutcome, DtcgLocator, Error, ExitClass,
        ImportOutcome, ImportSource, Result, VariablesImportOutcome, VariablesSource,
    };
}
