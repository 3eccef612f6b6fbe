//! Record counts per source against their published totals.

use std::collections::BTreeMap;

use nutri_model::{FoodRecord, IssueSeverity, SourceTag, ValidationIssue};

pub(crate) fn check(
    records: &[FoodRecord],
    expected: &BTreeMap<SourceTag, usize>,
) -> Vec<ValidationIssue> {
    expected
        .iter()
        .filter_map(|(tag, expected)| {
            let actual = records.iter().filter(|record| record.source == *tag).count();
            (actual != *expected).then(|| ValidationIssue {
                code: "NUT006".to_string(),
                message: format!("{tag} produced {actual} records, expected {expected}"),
                severity: IssueSeverity::Warning,
                field: None,
                source: Some(*tag),
                count: actual.abs_diff(*expected),
                examples: Vec::new(),
            })
        })
        .collect()
}
