//! Energy in kJ against energy in kcal.

use nutri_model::{FoodRecord, IssueSeverity, KJ_PER_KCAL, NutrientField};

use super::IssueCollector;

/// Absolute slack in kJ; published tables round kJ independently.
const ABSOLUTE_TOLERANCE_KJ: f64 = 2.0;
const RELATIVE_TOLERANCE: f64 = 0.01;

pub(crate) fn check(record: &FoodRecord, issues: &mut IssueCollector) {
    let nutrients = &record.nutrients;
    let kcal = nutrients.energy_kcal;
    let kj = nutrients.energy_kj;
    if kcal <= 0.0 && kj <= 0.0 {
        return;
    }
    let expected = kcal * KJ_PER_KCAL;
    let tolerance = ABSOLUTE_TOLERANCE_KJ.max(expected * RELATIVE_TOLERANCE);
    // One side zero while the other is set also lands here.
    if (kj - expected).abs() > tolerance {
        issues.record(
            "NUT002",
            IssueSeverity::Warning,
            Some(NutrientField::EnergyKj),
            record,
            || "energia_kj inconsistent with energia_kcal × 4.184".to_string(),
        );
    }
}
