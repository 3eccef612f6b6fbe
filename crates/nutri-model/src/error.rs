use thiserror::Error;

use crate::source::SourceTag;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("unknown source tag: {0}")]
    UnknownSourceTag(String),
    #[error("unknown nutrient field: {0}")]
    UnknownNutrient(String),
    #[error("unknown column target: {0}")]
    UnknownTarget(String),
    #[error("invalid column mapping for {tag}: {message}")]
    InvalidMapping { tag: SourceTag, message: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
