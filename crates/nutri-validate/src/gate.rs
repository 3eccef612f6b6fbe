//! Decision whether a run may replace the canonical dataset.

use serde::{Deserialize, Serialize};
use tracing::warn;

use nutri_model::{CoverageMetric, IssueSeverity, QualityReport, ValidationReport, round_to};

/// A coverage percentage that dropped beyond tolerance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageRegression {
    pub metric: CoverageMetric,
    pub previous: f64,
    pub current: f64,
    /// Percentage points lost.
    pub drop: f64,
}

/// Operator overrides given on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateOverrides {
    pub accept_coverage_regression: bool,
    pub allow_validation_errors: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GatingDecision {
    pub block_write: bool,
    pub coverage_regressions: Vec<CoverageRegression>,
    /// Codes of error-severity issues.
    pub blocking_issues: Vec<String>,
    /// Overrides that let an otherwise blocked write through.
    pub overrides_applied: Vec<String>,
}

/// Compares coverage of the previous canonical dataset with the new one.
///
/// Without a previous report there is nothing to regress from.
pub fn coverage_regressions(
    previous: Option<&QualityReport>,
    current: &QualityReport,
    tolerance: f64,
) -> Vec<CoverageRegression> {
    let Some(previous) = previous else {
        return Vec::new();
    };
    CoverageMetric::ALL
        .into_iter()
        .filter_map(|metric| {
            let before = previous.stat(metric).percent;
            let after = current.stat(metric).percent;
            let drop = round_to(before - after, 2);
            (drop > tolerance).then_some(CoverageRegression {
                metric,
                previous: before,
                current: after,
                drop,
            })
        })
        .collect()
}

/// Combines the coverage gate and validation errors into one decision.
pub fn gate_write(
    previous: Option<&QualityReport>,
    current: &QualityReport,
    tolerance: f64,
    validation: &ValidationReport,
    overrides: GateOverrides,
) -> GatingDecision {
    let coverage_regressions = coverage_regressions(previous, current, tolerance);
    let mut blocking_issues: Vec<String> = validation
        .issues
        .iter()
        .filter(|issue| issue.severity == IssueSeverity::Error)
        .map(|issue| issue.code.clone())
        .collect();
    blocking_issues.sort();
    blocking_issues.dedup();

    let mut block_write = false;
    let mut overrides_applied = Vec::new();
    if !coverage_regressions.is_empty() {
        if overrides.accept_coverage_regression {
            warn!(
                regressions = coverage_regressions.len(),
                "coverage regression accepted by operator"
            );
            overrides_applied.push("accept-coverage-regression".to_string());
        } else {
            block_write = true;
        }
    }
    if !blocking_issues.is_empty() {
        if overrides.allow_validation_errors {
            warn!(
                codes = %blocking_issues.join(","),
                "validation errors allowed by operator"
            );
            overrides_applied.push("allow-validation-errors".to_string());
        } else {
            block_write = true;
        }
    }
    GatingDecision {
        block_write,
        coverage_regressions,
        blocking_issues,
        overrides_applied,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nutri_model::{CoverageStat, ValidationIssue};

    fn coverage(macros: usize, minerals: usize) -> QualityReport {
        QualityReport {
            total_records: 100,
            with_macros: CoverageStat::new(macros, 100),
            with_minerals: CoverageStat::new(minerals, 100),
            ..QualityReport::default()
        }
    }

    fn error_issue(code: &str) -> ValidationIssue {
        ValidationIssue {
            code: code.to_string(),
            message: String::new(),
            severity: IssueSeverity::Error,
            field: None,
            source: None,
            count: 1,
            examples: Vec::new(),
        }
    }

    #[test]
    fn first_run_is_never_a_regression() {
        assert!(coverage_regressions(None, &coverage(10, 10), 0.0).is_empty());
    }

    #[test]
    fn drop_beyond_tolerance_blocks() {
        let decision = gate_write(
            Some(&coverage(100, 95)),
            &coverage(100, 90),
            1.0,
            &ValidationReport::default(),
            GateOverrides::default(),
        );
        assert!(decision.block_write);
        assert_eq!(decision.coverage_regressions.len(), 1);
        assert_eq!(decision.coverage_regressions[0].metric, CoverageMetric::Minerals);
        assert_eq!(decision.coverage_regressions[0].drop, 5.0);
    }

    #[test]
    fn drop_within_tolerance_passes() {
        let decision = gate_write(
            Some(&coverage(100, 95)),
            &coverage(100, 94),
            1.0,
            &ValidationReport::default(),
            GateOverrides::default(),
        );
        assert!(!decision.block_write);
    }

    #[test]
    fn overrides_are_independent() {
        let validation = ValidationReport {
            issues: vec![error_issue("NUT004"), error_issue("NUT004")],
        };
        let accept_coverage = GateOverrides {
            accept_coverage_regression: true,
            ..GateOverrides::default()
        };
        let decision = gate_write(
            Some(&coverage(100, 95)),
            &coverage(100, 90),
            0.0,
            &validation,
            accept_coverage,
        );
        assert!(decision.block_write);
        assert_eq!(decision.blocking_issues, vec!["NUT004".to_string()]);

        let both = GateOverrides {
            accept_coverage_regression: true,
            allow_validation_errors: true,
        };
        let decision = gate_write(
            Some(&coverage(100, 95)),
            &coverage(100, 90),
            0.0,
            &validation,
            both,
        );
        assert!(!decision.block_write);
        assert_eq!(decision.overrides_applied.len(), 2);
    }
}
