//! Source parsers for food-composition tables.

pub mod csv_source;
pub mod document;
pub mod error;
pub mod values;

pub use csv_source::read_csv_document;
pub use document::{
    SourceDocument, SourceFormat, parse_source_document, read_json_document, read_source,
};
pub use error::{IngestError, Result};
pub use values::{
    InvalidNumber, MISSING_MARKERS, format_number, is_missing_marker, parse_numeric, parse_tags,
    parse_text,
};
