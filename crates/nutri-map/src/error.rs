//! Error types for mapping operations.

use nutri_model::{ModelError, NutrientField, RecordLayout, SourceTag};

/// Errors from mapping operations. Any of them aborts the whole batch.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MappingError {
    #[error("unknown source tag: {0}")]
    UnknownSourceTag(String),

    #[error("{found} record passed to the {expected} mapping")]
    SourceMismatch { expected: SourceTag, found: SourceTag },

    #[error("column count mismatch for {tag}: expected {expected} columns, found {actual}")]
    ColumnCountMismatch {
        tag: SourceTag,
        expected: usize,
        actual: usize,
    },

    #[error("{tag} mapping is {expected} but the record is {found}")]
    LayoutMismatch {
        tag: SourceTag,
        expected: RecordLayout,
        found: RecordLayout,
    },

    #[error(
        "declared column {position} of {tag} source is '{found}', mapping expects '{expected}'"
    )]
    HeaderMismatch {
        tag: SourceTag,
        position: usize,
        expected: String,
        found: String,
    },

    #[error("unexpected column '{column}' in {tag} record")]
    UnexpectedColumn { tag: SourceTag, column: String },

    #[error("{tag} record has no name")]
    MissingName { tag: SourceTag },

    #[error("invalid value '{value}' in column '{column}' ({field})")]
    InvalidValue {
        column: String,
        field: NutrientField,
        value: String,
    },

    #[error("invalid mapping: {0}")]
    InvalidMapping(String),

    #[error("{tag} mapping has no reference record to verify it against")]
    UnverifiedMapping { tag: SourceTag },

    #[error(
        "reference '{reference}' of {tag} maps {field} to {actual}, expected {expected}"
    )]
    ReferenceMismatch {
        tag: SourceTag,
        reference: String,
        field: NutrientField,
        expected: f64,
        actual: f64,
    },

    #[error("record {index}: {source}")]
    AtRecord {
        index: usize,
        source: Box<MappingError>,
    },
}

impl MappingError {
    /// Attaches the position of the failing record within its batch.
    pub fn at_record(self, index: usize) -> Self {
        MappingError::AtRecord {
            index,
            source: Box::new(self),
        }
    }

    /// The error without record position context.
    pub fn root(&self) -> &MappingError {
        match self {
            MappingError::AtRecord { source, .. } => source.root(),
            other => other,
        }
    }
}

impl From<ModelError> for MappingError {
    fn from(error: ModelError) -> Self {
        match error {
            ModelError::UnknownSourceTag(tag) => MappingError::UnknownSourceTag(tag),
            other => MappingError::InvalidMapping(other.to_string()),
        }
    }
}
