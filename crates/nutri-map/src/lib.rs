#![deny(unsafe_code)]

//! Field mapping: raw source records to canonical food records.

pub mod error;
pub mod mapper;
pub mod repository;
pub mod verify;

pub use error::MappingError;
pub use mapper::{check_declared_columns, map_batch, map_record};
pub use repository::{MappingKind, MappingMetadata, MappingRepository, StoredMapping};
pub use verify::{ReferenceCheck, verify_mapping};
