use thiserror::Error;

use voidline_core::ConfigError;

/// Errors that abort a save or a sector load.
///
/// Unresolved cross-references are not errors. They degrade to a
/// placeholder plus a `LoadDiagnostic`.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("no codec registered for entity type '{type_name}'")]
    UnknownType { type_name: String },

    #[error("codec for '{expected}' was handed a '{found}' entity")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("malformed '{type_name}' record: {source}")]
    Malformed {
        type_name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("'{type_name}' did not serialize to a field map")]
    NotAnObject { type_name: String },

    #[error("diff for sector '{sector}' has format version {found}, newest supported is {supported}")]
    UnsupportedVersion {
        sector: String,
        found: u32,
        supported: u32,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("diff storage i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("diff encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}
