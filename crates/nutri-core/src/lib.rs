#![deny(unsafe_code)]

//! Deduplication and merge of mapped food records.

pub mod dedupe;
pub mod error;
pub mod merge;
pub mod offsets;

pub use dedupe::{dedupe_key, dedupe_records};
pub use error::MergeError;
pub use merge::{MergeOutcome, MergeStats, SourceMergeStats, merge};
pub use offsets::IdOffsets;
