#![deny(unsafe_code)]

//! Pipeline configuration (TOML).
//!
//! Relative paths are resolved against the directory holding the config file,
//! so a config can travel with its raw inputs.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use nutri_ingest::SourceFormat;
use nutri_model::SourceTag;

use crate::error::{ConfigError, Result};
use crate::hash::{is_sha256_hex, sha256_file};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub pipeline: PipelineSection,
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSection {
    /// Canonical dataset path.
    pub output: PathBuf,
    /// Where previous versions are copied before replacement.
    #[serde(default)]
    pub backup_dir: Option<PathBuf>,
    /// Repository of column and category mappings overriding the built-ins.
    #[serde(default)]
    pub mappings_dir: Option<PathBuf>,
    /// Allowed coverage drop, in percentage points, before the write is blocked.
    #[serde(default)]
    pub coverage_tolerance: f64,
    /// Pinned `lastUpdated` date; today (UTC) when absent.
    #[serde(default)]
    pub last_updated: Option<NaiveDate>,
    #[serde(default)]
    pub allow_unverified_mappings: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub tag: SourceTag,
    pub input: PathBuf,
    #[serde(default)]
    pub format: SourceFormat,
    /// Whether a CSV input starts with a row of column labels.
    #[serde(default = "default_has_header")]
    pub has_header: bool,
    #[serde(default)]
    pub id_offset: Option<u32>,
    /// Expected sha256 of the input file.
    #[serde(default)]
    pub sha256: Option<String>,
    /// Record count the source is known to publish.
    #[serde(default)]
    pub expected_records: Option<usize>,
}

fn default_has_header() -> bool {
    true
}

impl SourceConfig {
    pub fn id_offset(&self) -> u32 {
        self.id_offset.unwrap_or_else(|| self.tag.default_id_offset())
    }
}

impl PipelineConfig {
    pub fn backup_dir(&self) -> PathBuf {
        match &self.pipeline.backup_dir {
            Some(dir) => dir.clone(),
            None => self
                .pipeline
                .output
                .parent()
                .map_or_else(|| PathBuf::from("backups"), |parent| parent.join("backups")),
        }
    }

    /// Structural checks that need no file access.
    pub fn validate(&self) -> Result<()> {
        if self.sources.is_empty() {
            return Err(ConfigError::invalid("no [[sources]] configured"));
        }
        let tolerance = self.pipeline.coverage_tolerance;
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(ConfigError::invalid(format!(
                "coverage_tolerance must be a non-negative number, got {tolerance}"
            )));
        }
        let mut seen = BTreeSet::new();
        for source in &self.sources {
            if !seen.insert(source.tag) {
                return Err(ConfigError::DuplicateSource { tag: source.tag });
            }
            if let Some(pin) = &source.sha256
                && !is_sha256_hex(pin)
            {
                return Err(ConfigError::InvalidSha256 {
                    path: source.input.clone(),
                    message: "expected 64 hex characters".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Checks pinned checksums of every input that declares one.
    pub fn verify_pins(&self) -> Result<()> {
        for source in &self.sources {
            let Some(expected) = &source.sha256 else {
                continue;
            };
            let actual = sha256_file(&source.input)?;
            if !actual.eq_ignore_ascii_case(expected) {
                return Err(ConfigError::Sha256Mismatch {
                    path: source.input.clone(),
                    expected: expected.clone(),
                    actual,
                });
            }
            debug!(source = %source.tag, path = %source.input.display(), "input checksum verified");
        }
        Ok(())
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        resolve(&mut self.pipeline.output);
        if let Some(dir) = self.pipeline.backup_dir.as_mut() {
            resolve(dir);
        }
        if let Some(dir) = self.pipeline.mappings_dir.as_mut() {
            resolve(dir);
        }
        for source in &mut self.sources {
            resolve(&mut source.input);
        }
    }
}

/// Parses a config from TOML text without resolving paths.
pub fn parse_config(text: &str, path: &Path) -> Result<PipelineConfig> {
    toml::from_str(text).map_err(|source| ConfigError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads, resolves and validates a pipeline config file.
pub fn load_config(path: &Path) -> Result<PipelineConfig> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::io(path, source))?;
    let mut config = parse_config(&text, path)?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    config.resolve_paths(base);
    config.validate()?;
    Ok(config)
}
