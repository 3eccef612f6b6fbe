//! Plausibility checks over mapped records.
//!
//! Each check returns aggregated issues: one issue per code, source and
//! field, with the number of affected records and a few example names.

mod drift;
mod energy;
mod expected;
mod range;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use nutri_model::{
    FoodRecord, IssueSeverity, NutrientField, SourceTag, ValidationIssue, ValidationReport,
};

const MAX_EXAMPLES: usize = 5;

/// Inputs to the checks beyond the records themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOptions {
    /// Record count each source is known to publish.
    pub expected_records: BTreeMap<SourceTag, usize>,
}

/// Runs every check and returns issues ordered by code, source and field.
pub fn run_checks(records: &[FoodRecord], options: &CheckOptions) -> ValidationReport {
    let mut collector = IssueCollector::default();
    for record in records {
        range::check(record, &mut collector);
        energy::check(record, &mut collector);
        drift::check(record, &mut collector);
    }
    let mut issues = collector.finish();
    issues.extend(expected::check(records, &options.expected_records));
    issues.sort_by(|a, b| {
        (&a.code, a.source, &a.field).cmp(&(&b.code, b.source, &b.field))
    });
    debug!(issue_count = issues.len(), "plausibility checks complete");
    ValidationReport { issues }
}

/// Issue identity used for aggregation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct IssueKey {
    code: &'static str,
    source: SourceTag,
    field: Option<NutrientField>,
}

struct Pending {
    severity: IssueSeverity,
    message: String,
    count: usize,
    examples: Vec<String>,
}

#[derive(Default)]
pub(crate) struct IssueCollector {
    issues: BTreeMap<IssueKey, Pending>,
}

impl IssueCollector {
    pub(crate) fn record(
        &mut self,
        code: &'static str,
        severity: IssueSeverity,
        field: Option<NutrientField>,
        record: &FoodRecord,
        message: impl FnOnce() -> String,
    ) {
        let key = IssueKey {
            code,
            source: record.source,
            field,
        };
        let pending = self.issues.entry(key).or_insert_with(|| Pending {
            severity,
            message: message(),
            count: 0,
            examples: Vec::new(),
        });
        pending.count += 1;
        if pending.examples.len() < MAX_EXAMPLES {
            pending.examples.push(record.name.clone());
        }
    }

    fn finish(self) -> Vec<ValidationIssue> {
        self.issues
            .into_iter()
            .map(|(key, pending)| ValidationIssue {
                code: key.code.to_string(),
                message: pending.message,
                severity: pending.severity,
                field: key.field.map(|field| field.key().to_string()),
                source: Some(key.source),
                count: pending.count,
                examples: pending.examples,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn food(name: &str) -> FoodRecord {
        let mut record = FoodRecord::new(SourceTag::Ibge, "6300101", name);
        record.nutrients.energy_kcal = 127.74;
        record.nutrients.fill_missing_energy();
        record
    }

    #[test]
    fn clean_records_have_no_issues() {
        let report = run_checks(&[food("Arroz polido - Cozido")], &CheckOptions::default());
        assert!(report.issues.is_empty());
    }

    #[test]
    fn issues_are_aggregated_per_field() {
        let mut records: Vec<FoodRecord> = (0..8).map(|i| food(&format!("Item {i}"))).collect();
        for record in &mut records {
            record.nutrients.lipids_g = -1.0;
        }
        let report = run_checks(&records, &CheckOptions::default());
        assert_eq!(report.issues.len(), 1);
        let issue = &report.issues[0];
        assert_eq!(issue.code, "NUT001");
        assert_eq!(issue.count, 8);
        assert_eq!(issue.examples.len(), MAX_EXAMPLES);
        assert_eq!(issue.field.as_deref(), Some("lipidios_g"));
        assert!(report.has_errors());
    }
}
