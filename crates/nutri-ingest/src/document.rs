//! JSON source documents.
//!
//! A document is either a bare array of records or an object carrying the
//! records plus optional metadata:
//!
//! ```json
//! { "fonte": "IBGE", "columns": ["codigo", "nome", "..."], "records": [[...], ...] }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use nutri_model::{RawRecord, SourceTag};

use crate::csv_source::read_csv_document;
use crate::error::{IngestError, Result};

/// Raw records of one source, as read from disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDocument {
    #[serde(rename = "fonte", default)]
    pub source: Option<SourceTag>,
    /// Column labels declared by the extractor, if it wrote any.
    #[serde(default)]
    pub columns: Option<Vec<String>>,
    pub records: Vec<RawRecord>,
}

impl SourceDocument {
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self {
            source: None,
            columns: None,
            records,
        }
    }
}

/// On-disk encoding of a source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    #[default]
    Json,
    /// Positional rows, optionally preceded by a row of column labels.
    Csv,
}

/// Parses a JSON document from text.
///
/// # Errors
///
/// Returns the JSON error when the text is neither an array of records nor a
/// document object.
pub fn parse_source_document(text: &str) -> serde_json::Result<SourceDocument> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    if value.is_array() {
        let records: Vec<RawRecord> = serde_json::from_value(value)?;
        Ok(SourceDocument::new(records))
    } else {
        serde_json::from_value(value)
    }
}

pub fn read_json_document(path: &Path) -> Result<SourceDocument> {
    let text = fs::read_to_string(path).map_err(|source| IngestError::io(path, source))?;
    parse_source_document(&text).map_err(|source| IngestError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads the document of `expected` source from `path`. `has_header` only
/// applies to CSV; JSON documents declare their columns explicitly.
///
/// # Errors
///
/// Fails on I/O and parse errors, and when the document declares a different
/// source than the one it was configured for.
pub fn read_source(
    path: &Path,
    format: SourceFormat,
    has_header: bool,
    expected: SourceTag,
) -> Result<SourceDocument> {
    let mut document = match format {
        SourceFormat::Json => read_json_document(path)?,
        SourceFormat::Csv => read_csv_document(path, has_header)?,
    };
    if let Some(found) = document.source
        && found != expected
    {
        return Err(IngestError::TagMismatch {
            path: PathBuf::from(path),
            expected,
            found,
        });
    }
    document.source = Some(expected);
    debug!(
        source = %expected,
        path = %path.display(),
        record_count = document.records.len(),
        "source document read"
    );
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_array_is_a_document() {
        let document = parse_source_document(r#"[["1", "Arroz"], ["2", "Feijao"]]"#).unwrap();
        assert_eq!(document.records.len(), 2);
        assert!(document.source.is_none());
    }

    #[test]
    fn wrapped_document_keeps_metadata() {
        let document = parse_source_document(
            r#"{"fonte": "TACO", "records": [{"descricao": "Arroz", "energia_kcal": 124}]}"#,
        )
        .unwrap();
        assert_eq!(document.source, Some(SourceTag::Taco));
        assert_eq!(document.records[0].layout(), nutri_model::RecordLayout::Keyed);
    }

    #[test]
    fn scalar_is_rejected() {
        assert!(parse_source_document("42").is_err());
    }
}
