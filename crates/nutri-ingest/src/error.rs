use std::path::PathBuf;

use nutri_model::SourceTag;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read source file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON source {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read CSV source {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("source document {path} is tagged {found}, expected {expected}")]
    TagMismatch {
        path: PathBuf,
        expected: SourceTag,
        found: SourceTag,
    },
}

impl IngestError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
