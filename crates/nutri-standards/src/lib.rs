//! Built-in source layouts, the canonical category map and pipeline
//! configuration.

pub mod categories;
pub mod config;
pub mod error;
pub mod hash;
pub mod ibge;
pub mod taco;

use nutri_model::{ColumnMapping, SourceTag};

pub use categories::{CANONICAL_CATEGORIES, FALLBACK_CATEGORY, default_category_map};
pub use config::{PipelineConfig, PipelineSection, SourceConfig, load_config, parse_config};
pub use error::{ConfigError, Result};
pub use hash::{is_sha256_hex, sha256_file, sha256_hex};
pub use ibge::{arroz_polido_row, ibge_mapping};
pub use taco::{arroz_integral_record, taco_mapping};

/// Built-in column mapping for a source.
pub fn builtin_mapping(tag: SourceTag) -> ColumnMapping {
    match tag {
        SourceTag::Taco => taco_mapping(),
        SourceTag::Ibge => ibge_mapping(),
    }
}
