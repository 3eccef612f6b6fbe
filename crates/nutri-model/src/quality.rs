use serde::{Deserialize, Serialize};

use crate::nutrient::round_to;

/// Count of records meeting a coverage condition and its share of the total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageStat {
    pub count: usize,
    /// Percentage of all records, rounded to two decimals.
    pub percent: f64,
}

impl CoverageStat {
    pub fn new(count: usize, total: usize) -> Self {
        let percent = if total == 0 {
            0.0
        } else {
            round_to(count as f64 * 100.0 / total as f64, 2)
        };
        Self { count, percent }
    }
}

/// Coverage measures compared between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverageMetric {
    Macros,
    Minerals,
    Vitamins,
    Complete,
}

impl CoverageMetric {
    pub const ALL: [CoverageMetric; 4] = [
        CoverageMetric::Macros,
        CoverageMetric::Minerals,
        CoverageMetric::Vitamins,
        CoverageMetric::Complete,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CoverageMetric::Macros => "macronutrients",
            CoverageMetric::Minerals => "minerals",
            CoverageMetric::Vitamins => "vitamins",
            CoverageMetric::Complete => "all three groups",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCoverage {
    pub category: String,
    pub count: usize,
    pub without_data: usize,
}

/// Nutrient coverage summary of a set of records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub total_records: usize,
    pub with_macros: CoverageStat,
    pub with_minerals: CoverageStat,
    pub with_vitamins: CoverageStat,
    pub complete: CoverageStat,
    pub empty: CoverageStat,
    pub categories: Vec<CategoryCoverage>,
}

impl QualityReport {
    pub fn stat(&self, metric: CoverageMetric) -> CoverageStat {
        match metric {
            CoverageMetric::Macros => self.with_macros,
            CoverageMetric::Minerals => self.with_minerals,
            CoverageMetric::Vitamins => self.with_vitamins,
            CoverageMetric::Complete => self.complete,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_handles_empty_total() {
        assert_eq!(CoverageStat::new(0, 0).percent, 0.0);
        assert_eq!(CoverageStat::new(1, 3).percent, 33.33);
        assert_eq!(CoverageStat::new(3, 3).percent, 100.0);
    }
}
