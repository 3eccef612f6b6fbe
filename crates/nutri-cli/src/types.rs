use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use nutri_core::MergeStats;
use nutri_model::{QualityReport, SourceTag, ValidationReport};
use nutri_normalization::UnmappedCategory;
use nutri_validate::GatingDecision;

/// Where a source's column mapping came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MappingOrigin {
    Builtin,
    Repository,
}

impl MappingOrigin {
    pub fn as_str(self) -> &'static str {
        match self {
            MappingOrigin::Builtin => "built-in",
            MappingOrigin::Repository => "repository",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSummary {
    pub tag: SourceTag,
    pub input: PathBuf,
    pub input_sha256: String,
    pub records: usize,
    pub mapping: MappingOrigin,
    /// Reference rows the mapping was verified against; zero when skipped.
    pub references_verified: usize,
}

/// The run report written as `<stem>.report.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub generated_at: DateTime<Utc>,
    pub last_updated: NaiveDate,
    pub dataset: PathBuf,
    pub dry_run: bool,
    pub written: bool,
    pub sha256: Option<String>,
    pub backup: Option<PathBuf>,
    pub sources: Vec<SourceSummary>,
    pub merge: MergeStats,
    pub categories_rewritten: usize,
    pub unmapped_categories: Vec<UnmappedCategory>,
    pub quality: QualityReport,
    pub previous_quality: Option<QualityReport>,
    pub validation: ValidationReport,
    pub gate: GatingDecision,
}

#[derive(Debug)]
pub struct RunOutcome {
    pub report: RunReport,
    pub report_path: Option<PathBuf>,
}

impl RunOutcome {
    /// A blocked write fails the run.
    pub fn has_errors(&self) -> bool {
        self.report.gate.block_write
    }
}
