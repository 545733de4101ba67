pub type Result<T> = std::result::Result<T, Error>;

/// Structural/configuration and transport/load failures (spec §7
/// categories 1 and 2). Per-token soft failures never reach this type —
/// they accumulate in an importer's `warnings` vector instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("both a DTCG locator and variables-source credentials were supplied; pick one")]
    ConflictingSources,

    #[error("no DTCG locator or variables-source credentials were supplied")]
    NoSource,

    #[error("DTCG import failed: {0}")]
    DtcgImport(String),

    #[error("Figma import failed: {0}")]
    FigmaImport(String),
}

impl Error {
    /// The exit-code class a caller should report for this error (spec §6,
    /// §7). `ConflictingSources`/`NoSource` are configuration problems;
    /// everything else here is a fatal ingest failure.
    pub fn exit_class(&self) -> ExitClass {
        match self {
            Self::ConflictingSources | Self::NoSource => ExitClass::Validation,
            Self::DtcgImport(_) | Self::FigmaImport(_) => ExitClass::Fatal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitClass {
    Validation,
    Fatal,
}
