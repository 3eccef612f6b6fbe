use std::path::Path;

use csv::ReaderBuilder;

use nutri_model::{RawRecord, RawValue};

use crate::document::SourceDocument;
use crate::error::{IngestError, Result};

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Reads a positional CSV export. With `has_header` the first non-empty row
/// holds the column labels; otherwise every row is a record.
///
/// Rows keep their own width; a short or long row is reported later by the
/// mapper instead of being padded here.
pub fn read_csv_document(path: &Path, has_header: bool) -> Result<SourceDocument> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|source| csv_error(path, source))?;
    let mut header: Option<Vec<String>> = None;
    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|source| csv_error(path, source))?;
        let cells: Vec<String> = row.iter().map(normalize_cell).collect();
        if cells.iter().all(String::is_empty) {
            continue;
        }
        if has_header && header.is_none() {
            header = Some(cells);
            continue;
        }
        records.push(RawRecord::Positional(
            cells.into_iter().map(RawValue::Text).collect(),
        ));
    }
    Ok(SourceDocument {
        source: None,
        columns: header,
        records,
    })
}

fn csv_error(path: &Path, source: csv::Error) -> IngestError {
    IngestError::Csv {
        path: path.to_path_buf(),
        source,
    }
}
