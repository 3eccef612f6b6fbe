//! Name and category normalization.

pub mod category;
pub mod text;

pub use category::{
    CategoryNormalizer, CategoryOutcome, Resolution, UnmappedCategory, normalize_categories,
};
pub use text::{contains_normalized, normalize_name, strip_accents};
