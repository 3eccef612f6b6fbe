//! Batch pipeline with explicit stages.
//!
//! The stages run in this order:
//! 1. **Ingest**: read each configured source and check declared columns
//! 2. **Map**: verify the source mapping against its reference rows, then map
//! 3. **Merge**: deduplicate per source and renumber from the id offsets
//! 4. **Normalize**: rewrite categories to canonical codes
//! 5. **Validate**: plausibility checks and the quality report
//! 6. **Gate**: compare with the previous canonical dataset
//! 7. **Output**: atomic write with backup, then the run report
//!
//! Any mapping error aborts the run before anything is written.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, ensure};
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info, info_span, warn};

use nutri_core::{IdOffsets, merge};
use nutri_ingest::{SourceDocument, read_source};
use nutri_map::{MappingError, MappingRepository, check_declared_columns, map_batch, verify_mapping};
use nutri_model::{CanonicalDataset, CategoryMap, ColumnMapping, FoodRecord, SourceTag};
use nutri_normalization::normalize_categories;
use nutri_output::{read_canonical_if_exists, write_canonical, write_report};
use nutri_standards::{PipelineConfig, SourceConfig, builtin_mapping, default_category_map, sha256_file};
use nutri_validate::{CheckOptions, GateOverrides, gate_write, report, run_checks};

use crate::types::{MappingOrigin, RunOutcome, RunReport, SourceSummary};

/// Command-line choices layered over the configuration file.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub overrides: GateOverrides,
    pub allow_unverified_mappings: bool,
    /// Replaces the configured `last_updated`.
    pub last_updated: Option<NaiveDate>,
    /// Run every stage but write nothing.
    pub dry_run: bool,
    pub now: DateTime<Utc>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            overrides: GateOverrides::default(),
            allow_unverified_mappings: false,
            last_updated: None,
            dry_run: false,
            now: Utc::now(),
        }
    }
}

// ============================================================================
// Mappings
// ============================================================================

/// Column mappings of the configured sources plus the shared category map.
#[derive(Debug, Clone)]
pub struct MappingSet {
    pub columns: BTreeMap<SourceTag, (ColumnMapping, MappingOrigin)>,
    pub categories: CategoryMap,
}

impl MappingSet {
    fn columns_for(&self, tag: SourceTag) -> Result<&(ColumnMapping, MappingOrigin)> {
        self.columns
            .get(&tag)
            .with_context(|| format!("no column mapping loaded for {tag}"))
    }
}

/// Stored mappings override the built-ins source by source.
pub fn load_mappings(config: &PipelineConfig) -> Result<MappingSet> {
    let repository = match &config.pipeline.mappings_dir {
        Some(dir) => {
            ensure!(
                dir.is_dir(),
                "mapping repository {} does not exist",
                dir.display()
            );
            Some(MappingRepository::new(dir.clone())?)
        }
        None => None,
    };

    let mut columns = BTreeMap::new();
    for source in &config.sources {
        let stored = match &repository {
            Some(repository) => repository
                .load_columns(source.tag)
                .with_context(|| format!("load {} column mapping", source.tag))?,
            None => None,
        };
        let entry = match stored {
            Some(mapping) => (mapping, MappingOrigin::Repository),
            None => (builtin_mapping(source.tag), MappingOrigin::Builtin),
        };
        debug!(source = %source.tag, origin = ?entry.1, "column mapping selected");
        columns.insert(source.tag, entry);
    }

    let categories = match &repository {
        Some(repository) => repository
            .load_categories()
            .context("load category map")?
            .unwrap_or_else(default_category_map),
        None => default_category_map(),
    };
    Ok(MappingSet {
        columns,
        categories,
    })
}

// ============================================================================
// Stage 1: Ingest
// ============================================================================

#[derive(Debug)]
pub struct IngestedSource {
    pub tag: SourceTag,
    pub input: PathBuf,
    pub sha256: String,
    pub document: SourceDocument,
}

/// Reads one source and checks any column labels its extractor declared.
pub fn ingest(source: &SourceConfig, mapping: &ColumnMapping) -> Result<IngestedSource> {
    let document = read_source(&source.input, source.format, source.has_header, source.tag)
        .with_context(|| format!("read {} source", source.tag))?;
    if let Some(columns) = &document.columns {
        check_declared_columns(mapping, columns)
            .with_context(|| format!("{} declared columns", source.tag))?;
    }
    let sha256 = sha256_file(&source.input)
        .with_context(|| format!("checksum {}", source.input.display()))?;
    Ok(IngestedSource {
        tag: source.tag,
        input: source.input.clone(),
        sha256,
        document,
    })
}

// ============================================================================
// Stage 2: Map
// ============================================================================

#[derive(Debug)]
pub struct MappedSource {
    pub records: Vec<FoodRecord>,
    pub references_verified: usize,
}

/// Verifies the mapping, then maps every record of the source.
///
/// A mapping without reference rows is only accepted with
/// `allow_unverified`; a reference mismatch always aborts.
pub fn map_source(
    ingested: &IngestedSource,
    mapping: &ColumnMapping,
    allow_unverified: bool,
) -> Result<MappedSource> {
    let references_verified = match verify_mapping(mapping) {
        Ok(checks) => checks.len(),
        Err(MappingError::UnverifiedMapping { tag }) if allow_unverified => {
            warn!(source = %tag, "using unverified mapping");
            0
        }
        Err(error) => {
            return Err(error).with_context(|| format!("verify {} mapping", ingested.tag));
        }
    };
    let records = map_batch(ingested.tag, &ingested.document.records, mapping)
        .with_context(|| format!("map {} records from {}", ingested.tag, ingested.input.display()))?;
    Ok(MappedSource {
        records,
        references_verified,
    })
}

// ============================================================================
// Run
// ============================================================================

/// Runs every stage for a loaded configuration.
///
/// Returns an outcome even when the gate blocks the write; callers decide the
/// exit status from [`RunOutcome::has_errors`].
pub fn run(config: &PipelineConfig, options: &RunOptions) -> Result<RunOutcome> {
    let run_start = Instant::now();
    config.verify_pins().context("verify pinned input checksums")?;
    let mappings = load_mappings(config)?;
    let allow_unverified =
        options.allow_unverified_mappings || config.pipeline.allow_unverified_mappings;

    // =========================================================================
    // Stages 1-2: Ingest and map each source
    // =========================================================================
    let mut sources = Vec::with_capacity(config.sources.len());
    let mut mapped = Vec::new();
    for source in &config.sources {
        let (mapping, origin) = mappings.columns_for(source.tag)?;

        let ingest_span = info_span!("ingest", source = %source.tag);
        let ingest_start = Instant::now();
        let ingested = ingest_span.in_scope(|| ingest(source, mapping))?;
        info!(
            source = %source.tag,
            record_count = ingested.document.records.len(),
            duration_ms = ingest_start.elapsed().as_millis(),
            "ingest complete"
        );

        let map_span = info_span!("map", source = %source.tag);
        let map_start = Instant::now();
        let result = map_span.in_scope(|| map_source(&ingested, mapping, allow_unverified))?;
        info!(
            source = %source.tag,
            record_count = result.records.len(),
            references_verified = result.references_verified,
            duration_ms = map_start.elapsed().as_millis(),
            "map complete"
        );

        sources.push(SourceSummary {
            tag: source.tag,
            input: ingested.input,
            input_sha256: ingested.sha256,
            records: result.records.len(),
            mapping: *origin,
            references_verified: result.references_verified,
        });
        mapped.extend(result.records);
    }

    // =========================================================================
    // Stage 3: Merge
    // =========================================================================
    let offsets: IdOffsets = config
        .sources
        .iter()
        .map(|source| (source.tag, source.id_offset()))
        .collect();
    let merge_start = Instant::now();
    let merged = info_span!("merge").in_scope(|| merge(mapped, &offsets))?;
    info!(
        record_count = merged.stats.unique,
        duplicates_removed = merged.stats.duplicates_removed,
        duration_ms = merge_start.elapsed().as_millis(),
        "merge stage complete"
    );

    // =========================================================================
    // Stage 4: Normalize categories
    // =========================================================================
    let normalize_start = Instant::now();
    let normalized = info_span!("normalize")
        .in_scope(|| normalize_categories(merged.records, &mappings.categories));
    info!(
        record_count = normalized.records.len(),
        rewritten = normalized.rewritten,
        unmapped_records = normalized.unmapped_records(),
        duration_ms = normalize_start.elapsed().as_millis(),
        "normalize complete"
    );
    let records = normalized.records;

    // =========================================================================
    // Stage 5: Validate
    // =========================================================================
    let validate_start = Instant::now();
    let check_options = CheckOptions {
        expected_records: config
            .sources
            .iter()
            .filter_map(|source| source.expected_records.map(|count| (source.tag, count)))
            .collect(),
    };
    let (validation, quality) = info_span!("validate")
        .in_scope(|| (run_checks(&records, &check_options), report(&records)));
    info!(
        error_count = validation.error_count(),
        warning_count = validation.warning_count(),
        duration_ms = validate_start.elapsed().as_millis(),
        "validate complete"
    );

    // =========================================================================
    // Stage 6: Gate against the previous canonical dataset
    // =========================================================================
    let output_path = &config.pipeline.output;
    let previous = read_canonical_if_exists(output_path)
        .with_context(|| format!("read previous dataset {}", output_path.display()))?;
    let previous_quality = previous.as_ref().map(|dataset| report(&dataset.alimentos));
    let gate = gate_write(
        previous_quality.as_ref(),
        &quality,
        config.pipeline.coverage_tolerance,
        &validation,
        options.overrides,
    );
    if gate.block_write {
        warn!(
            regressions = gate.coverage_regressions.len(),
            blocking_issues = ?gate.blocking_issues,
            "canonical dataset write blocked"
        );
    }

    // =========================================================================
    // Stage 7: Output
    // =========================================================================
    let last_updated = options
        .last_updated
        .or(config.pipeline.last_updated)
        .unwrap_or_else(|| options.now.date_naive());
    let dataset = CanonicalDataset::from_records(records, last_updated);
    let output_span = info_span!("output", path = %output_path.display());
    let written = if options.dry_run || gate.block_write {
        None
    } else {
        let backup_dir = config.backup_dir();
        Some(output_span.in_scope(|| {
            write_canonical(&dataset, output_path, Some(backup_dir.as_path()), options.now)
        })?)
    };

    let report = RunReport {
        generated_at: options.now,
        last_updated,
        dataset: output_path.clone(),
        dry_run: options.dry_run,
        written: written.is_some(),
        sha256: written.as_ref().map(|outcome| outcome.sha256.clone()),
        backup: written.as_ref().and_then(|outcome| outcome.backup.clone()),
        sources,
        merge: merged.stats,
        categories_rewritten: normalized.rewritten,
        unmapped_categories: normalized.unmapped,
        quality,
        previous_quality,
        validation,
        gate,
    };
    let report_path = if options.dry_run {
        None
    } else {
        let outcome = output_span
            .in_scope(|| write_report(&report, output_path, options.now))
            .context("write run report")?;
        Some(outcome.path)
    };

    info!(
        record_count = dataset.total_foods,
        written = report.written,
        duration_ms = run_start.elapsed().as_millis(),
        "pipeline complete"
    );
    Ok(RunOutcome {
        report,
        report_path,
    })
}
