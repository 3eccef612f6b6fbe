//! Signature of a mineral column shift.
//!
//! When a column goes missing before iron, iron picks up manganese or
//! phosphorus values while sodium and potassium pick up much smaller
//! neighbours. High iron together with low sodium and potassium is that
//! pattern.

use nutri_model::{FoodRecord, IssueSeverity};

use super::IssueCollector;

const IRON_ABOVE_MG: f64 = 10.0;
const SODIUM_BELOW_MG: f64 = 10.0;
const POTASSIUM_BELOW_MG: f64 = 500.0;

pub(crate) fn check(record: &FoodRecord, issues: &mut IssueCollector) {
    let n = &record.nutrients;
    if n.iron_mg > IRON_ABOVE_MG && n.sodium_mg < SODIUM_BELOW_MG && n.potassium_mg < POTASSIUM_BELOW_MG
    {
        issues.record("NUT005", IssueSeverity::Warning, None, record, || {
            format!(
                "iron > {IRON_ABOVE_MG} mg with sodium < {SODIUM_BELOW_MG} mg and potassium < {POTASSIUM_BELOW_MG} mg suggests shifted mineral columns"
            )
        });
    }
}

#[cfg(test)]
mod tests {
    use super::super::{CheckOptions, run_checks};
    use nutri_model::{FoodRecord, SourceTag};

    #[test]
    fn shifted_minerals_are_counted() {
        let shifted: Vec<FoodRecord> = (0..3)
            .map(|i| {
                let mut record = FoodRecord::new(SourceTag::Ibge, "6300101", format!("Item {i}"));
                record.nutrients.iron_mg = 17.77;
                record.nutrients.sodium_mg = 0.08;
                record.nutrients.potassium_mg = 382.0;
                record
            })
            .collect();
        let report = run_checks(&shifted, &CheckOptions::default());
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].code, "NUT005");
        assert_eq!(report.issues[0].count, 3);
        assert!(!report.has_errors());
    }
}
