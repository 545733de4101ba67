#![forbid(unsafe_code)]

//! Importer orchestration (C8): turns a DTCG locator or a Figma-style
//! variables-service credential triple into a [`tokens_core::TokenSet`],
//! plus the byte-level transport underneath both.

pub mod dtcg_importer;
pub mod error;
pub mod transport;
pub mod variables_importer;

pub use dtcg_importer::{DtcgImportOutcome, DtcgLocator};
pub use error::{Error, ExitClass, Result};
pub use variables_importer::{VariablesImportOutcome, VariablesSource};

use tokens_core::TokenSet;

/// Which of the two sources an import request targets. Constructing one
/// enforces the "exactly one source" configuration rule (spec §7 category 1)
/// at the point where both kinds of input are in scope together.
pub enum ImportSource {
    Dtcg(DtcgLocator),
    Variables(VariablesSource),
}

impl ImportSource {
    pub fn from_options(
        dtcg_path: Option<String>,
        dtcg_url: Option<String>,
        variables: Option<VariablesSource>,
    ) -> Result<Self> {
        let dtcg_requested = dtcg_path.is_some() || dtcg_url.is_some();
        match (dtcg_requested, variables) {
            (true, Some(_)) => Err(Error::ConflictingSources),
            (true, None) => Ok(Self::Dtcg(DtcgLocator::from_options(dtcg_path, dtcg_url)?)),
            (false, Some(source)) => Ok(Self::Variables(source)),
            (false, None) => Err(Error::NoSource),
        }
    }
}

/// The outcome shape every importer converges on (spec §6): a normalized
/// token set plus any soft-failure warnings collected along the way.
pub struct ImportOutcome {
    pub token_set: TokenSet,
    pub warnings: Vec<String>,
}

pub async fn import(source: ImportSource) -> Result<ImportOutcome> {
    match source {
        ImportSource::Dtcg(locator) => {
            let outcome = dtcg_importer::import(&locator).await?;
            Ok(ImportOutcome {
                token_set: outcome.token_set,
                warnings: outcome.warnings,
            })
        }
        ImportSource::Variables(source) => {
            let outcome = variables_importer::import(&source).await?;
            Ok(ImportOutcome {
                token_set: outcome.token_set,
                warnings: outcome.warnings,
            })
        }
    }
}
