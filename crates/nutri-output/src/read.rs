use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::warn;

use nutri_model::CanonicalDataset;

use crate::error::{OutputError, Result};

/// Reads a canonical dataset.
///
/// An envelope that disagrees with its records (a hand-edited `totalFoods`,
/// a stale category list) is logged and returned as read; the next write
/// derives both again.
pub fn read_canonical(path: &Path) -> Result<CanonicalDataset> {
    let bytes = fs::read(path).map_err(|source| OutputError::io("read", path, source))?;
    let dataset: CanonicalDataset =
        serde_json::from_slice(&bytes).map_err(|source| OutputError::Deserialization {
            path: path.to_path_buf(),
            source,
        })?;
    if !dataset.is_consistent() {
        warn!(
            path = %path.display(),
            total_foods = dataset.total_foods,
            record_count = dataset.alimentos.len(),
            "canonical envelope disagrees with its records"
        );
    }
    Ok(dataset)
}

/// Like [`read_canonical`], but a missing file is `None`.
pub fn read_canonical_if_exists(path: &Path) -> Result<Option<CanonicalDataset>> {
    match fs::metadata(path) {
        Ok(_) => read_canonical(path).map(Some),
        Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(OutputError::io("inspect", path, source)),
    }
}
