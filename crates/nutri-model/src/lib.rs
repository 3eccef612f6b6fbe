pub mod category;
pub mod dataset;
pub mod error;
pub mod food;
pub mod issues;
pub mod mapping;
pub mod nutrient;
pub mod quality;
pub mod raw;
pub mod source;

pub use category::CategoryMap;
pub use dataset::CanonicalDataset;
pub use error::{ModelError, Result};
pub use food::FoodRecord;
pub use issues::{IssueSeverity, ValidationIssue, ValidationReport};
pub use mapping::{ColumnMapping, ColumnSpec, ColumnTarget, RecordLayout, ReferenceRecord};
pub use nutrient::{KJ_PER_KCAL, NutrientField, NutrientGroup, NutrientProfile, round_to};
pub use quality::{CategoryCoverage, CoverageMetric, CoverageStat, QualityReport};
pub use raw::{RawRecord, RawValue};
pub use source::SourceTag;

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(code: &str, severity: IssueSeverity) -> ValidationIssue {
        ValidationIssue {
            code: code.to_string(),
            message: "message".to_string(),
            severity,
            field: Some("ferro_mg".to_string()),
            source: Some(SourceTag::Ibge),
            count: 2,
            examples: vec![],
        }
    }

    #[test]
    fn validation_report_counts() {
        let report = ValidationReport {
            issues: vec![
                issue("NUT001", IssueSeverity::Error),
                issue("NUT003", IssueSeverity::Warning),
                issue("NUT005", IssueSeverity::Warning),
            ],
        };
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.warning_count(), 2);
        assert!(report.has_errors());
    }

    #[test]
    fn quality_report_serializes() {
        let report = QualityReport {
            total_records: 4,
            with_macros: CoverageStat::new(4, 4),
            ..QualityReport::default()
        };
        let json = serde_json::to_string(&report).expect("serialize report");
        let round: QualityReport = serde_json::from_str(&json).expect("deserialize report");
        assert_eq!(round, report);
        assert_eq!(round.stat(CoverageMetric::Macros).percent, 100.0);
    }
}
