//! Atomic replacement of output files.
//!
//! Bytes go to a temp file next to the target, are synced, the previous
//! version is copied to the backup directory and the temp file is renamed
//! over the target. Readers see either the old or the new file in full.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use nutri_model::CanonicalDataset;

use crate::error::{OutputError, Result};

/// What a completed write produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteOutcome {
    pub path: PathBuf,
    pub sha256: String,
    pub bytes: usize,
    /// Copy of the replaced file, when there was one.
    pub backup: Option<PathBuf>,
}

/// Pretty JSON with a trailing newline.
pub fn to_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut bytes = serde_json::to_vec_pretty(value)
        .map_err(|source| OutputError::Serialization { source })?;
    bytes.push(b'\n');
    Ok(bytes)
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Backup file name for `target`: `<stem>-<UTC timestamp>.json`.
pub fn backup_path(target: &Path, backup_dir: &Path, at: DateTime<Utc>) -> PathBuf {
    let stem = target
        .file_stem()
        .map_or_else(|| "dataset".into(), |stem| stem.to_string_lossy());
    let stamp = at.format("%Y%m%dT%H%M%SZ");
    let mut candidate = backup_dir.join(format!("{stem}-{stamp}.json"));
    let mut suffix = 1;
    while candidate.exists() {
        candidate = backup_dir.join(format!("{stem}-{stamp}-{suffix}.json"));
        suffix += 1;
    }
    candidate
}

/// Writes `bytes` to `path` through a synced temp file and a rename.
///
/// With `backup_dir`, an existing file at `path` is copied there first.
pub fn atomic_write(
    path: &Path,
    bytes: &[u8],
    backup_dir: Option<&Path>,
    at: DateTime<Utc>,
) -> Result<WriteOutcome> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .map_err(|source| OutputError::io("create directory", parent, source))?;
    }
    let temp_path = temp_path_for(path);
    let replaced = replace_via_temp(path, &temp_path, bytes, backup_dir, at);
    if replaced.is_err()
        && let Err(error) = fs::remove_file(&temp_path)
        && error.kind() != io::ErrorKind::NotFound
    {
        warn!(temp = %temp_path.display(), %error, "temp file left behind");
    }
    let backup = replaced?;

    Ok(WriteOutcome {
        path: path.to_path_buf(),
        sha256: sha256_hex(bytes),
        bytes: bytes.len(),
        backup,
    })
}

/// Returns the backup path, if one was taken.
fn replace_via_temp(
    path: &Path,
    temp_path: &Path,
    bytes: &[u8],
    backup_dir: Option<&Path>,
    at: DateTime<Utc>,
) -> Result<Option<PathBuf>> {
    let mut file =
        File::create(temp_path).map_err(|source| OutputError::io("create", temp_path, source))?;
    file.write_all(bytes)
        .map_err(|source| OutputError::io("write", temp_path, source))?;
    file.sync_all()
        .map_err(|source| OutputError::io("sync", temp_path, source))?;
    drop(file);

    let backup = match backup_dir {
        Some(dir) if path.is_file() => {
            fs::create_dir_all(dir)
                .map_err(|source| OutputError::io("create directory", dir, source))?;
            let backup = backup_path(path, dir, at);
            fs::copy(path, &backup).map_err(|source| OutputError::io("back up", path, source))?;
            debug!(backup = %backup.display(), "previous version backed up");
            Some(backup)
        }
        _ => None,
    };

    fs::rename(temp_path, path).map_err(|source| OutputError::AtomicWriteFailed {
        temp_path: temp_path.to_path_buf(),
        target_path: path.to_path_buf(),
        source,
    })?;
    Ok(backup)
}

/// Serializes and atomically replaces the canonical dataset.
pub fn write_canonical(
    dataset: &CanonicalDataset,
    path: &Path,
    backup_dir: Option<&Path>,
    at: DateTime<Utc>,
) -> Result<WriteOutcome> {
    let bytes = to_json_bytes(dataset)?;
    let outcome = atomic_write(path, &bytes, backup_dir, at)?;
    info!(
        path = %outcome.path.display(),
        record_count = dataset.total_foods,
        sha256 = %outcome.sha256,
        "canonical dataset written"
    );
    Ok(outcome)
}

/// `<stem>.report.json` next to the dataset.
pub fn report_path_for(dataset_path: &Path) -> PathBuf {
    let stem = dataset_path
        .file_stem()
        .map_or_else(|| "dataset".into(), |stem| stem.to_string_lossy());
    dataset_path.with_file_name(format!("{stem}.report.json"))
}

/// Writes a run report next to the dataset it describes.
pub fn write_report<T: Serialize>(
    report: &T,
    dataset_path: &Path,
    at: DateTime<Utc>,
) -> Result<WriteOutcome> {
    let bytes = to_json_bytes(report)?;
    atomic_write(&report_path_for(dataset_path), &bytes, None, at)
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn report_sits_next_to_dataset() {
        assert_eq!(
            report_path_for(Path::new("/data/alimentos.json")),
            PathBuf::from("/data/alimentos.report.json")
        );
        assert_eq!(
            temp_path_for(Path::new("/data/alimentos.json")),
            PathBuf::from("/data/alimentos.json.tmp")
        );
    }

    #[test]
    fn backup_names_carry_utc_stamp() {
        let dir = tempfile::tempdir().unwrap();
        let at = Utc.with_ymd_and_hms(2025, 8, 24, 13, 5, 9).unwrap();
        let first = backup_path(Path::new("alimentos.json"), dir.path(), at);
        assert_eq!(first, dir.path().join("alimentos-20250824T130509Z.json"));
        fs::write(&first, b"{}").unwrap();
        let second = backup_path(Path::new("alimentos.json"), dir.path(), at);
        assert_eq!(second, dir.path().join("alimentos-20250824T130509Z-1.json"));
    }

    #[test]
    fn failed_replace_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory at the target makes the rename fail.
        let target = dir.path().join("alimentos.json");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), b"x").unwrap();

        let at = Utc.with_ymd_and_hms(2025, 8, 24, 12, 0, 0).unwrap();
        let err = atomic_write(&target, b"{}\n", None, at).unwrap_err();
        assert!(matches!(err, OutputError::AtomicWriteFailed { .. }));
        assert!(!temp_path_for(&target).exists());
        assert!(target.join("keep").is_file());
    }
}
