//! Sign and magnitude of every nutrient value.

use nutri_model::{FoodRecord, IssueSeverity, NutrientField};

use super::IssueCollector;

/// Values from this magnitude on are food codes read as numbers.
pub(crate) const CODE_LIKE_MIN: f64 = 1_000_000.0;

pub(crate) fn check(record: &FoodRecord, issues: &mut IssueCollector) {
    for field in NutrientField::ALL {
        let value = record.nutrients.get(field);
        if value < 0.0 {
            issues.record("NUT001", IssueSeverity::Error, Some(field), record, || {
                format!("negative {} value", field.key())
            });
        } else if value >= CODE_LIKE_MIN {
            issues.record("NUT004", IssueSeverity::Error, Some(field), record, || {
                format!(
                    "{} holds a value shaped like a 7-digit food code",
                    field.key()
                )
            });
        } else if value > field.plausible_max() {
            issues.record("NUT003", IssueSeverity::Warning, Some(field), record, || {
                format!(
                    "{} above the plausible {} {} per 100 g",
                    field.key(),
                    field.plausible_max(),
                    field.unit()
                )
            });
        }
    }
}
