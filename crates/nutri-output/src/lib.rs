#![deny(unsafe_code)]

//! Canonical dataset output: atomic write with backup, reading and search.

pub mod error;
pub mod read;
pub mod search;
pub mod write;

pub use error::{OutputError, Result};
pub use read::{read_canonical, read_canonical_if_exists};
pub use search::{
    DEFAULT_LIMIT, MAX_LIMIT, SearchPage, SearchQuery, SortField, SortOrder, categories, search,
};
pub use write::{
    WriteOutcome, atomic_write, backup_path, report_path_for, sha256_hex, to_json_bytes,
    write_canonical, write_report,
};
