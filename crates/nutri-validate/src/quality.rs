//! Nutrient coverage report.

use std::collections::BTreeMap;

use nutri_model::{
    CategoryCoverage, CoverageStat, FoodRecord, NutrientGroup, QualityReport,
};

/// Label used for records whose category is blank.
pub const UNCATEGORIZED: &str = "(sem categoria)";

#[derive(Default)]
struct Tally {
    macros: usize,
    minerals: usize,
    vitamins: usize,
    complete: usize,
    empty: usize,
}

/// Coverage counts and percentages over `records`.
///
/// A nutrient group counts as present when any of its fields is nonzero.
pub fn report(records: &[FoodRecord]) -> QualityReport {
    let mut tally = Tally::default();
    let mut categories: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for record in records {
        let nutrients = &record.nutrients;
        let macros = nutrients.has_group(NutrientGroup::Macro);
        let minerals = nutrients.has_group(NutrientGroup::Mineral);
        let vitamins = nutrients.has_group(NutrientGroup::Vitamin);
        tally.macros += usize::from(macros);
        tally.minerals += usize::from(minerals);
        tally.vitamins += usize::from(vitamins);
        tally.complete += usize::from(macros && minerals && vitamins);
        let empty = !(macros || minerals || vitamins);
        tally.empty += usize::from(empty);

        let category = match record.category.trim() {
            "" => UNCATEGORIZED,
            category => category,
        };
        let entry = categories.entry(category).or_default();
        entry.0 += 1;
        entry.1 += usize::from(empty);
    }

    let total = records.len();
    QualityReport {
        total_records: total,
        with_macros: CoverageStat::new(tally.macros, total),
        with_minerals: CoverageStat::new(tally.minerals, total),
        with_vitamins: CoverageStat::new(tally.vitamins, total),
        complete: CoverageStat::new(tally.complete, total),
        empty: CoverageStat::new(tally.empty, total),
        categories: categories
            .into_iter()
            .map(|(category, (count, without_data))| CategoryCoverage {
                category: category.to_string(),
                count,
                without_data,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nutri_model::SourceTag;

    fn food(category: &str, kcal: f64, iron: f64, vitamin_c: f64) -> FoodRecord {
        let mut record = FoodRecord::new(SourceTag::Taco, "1", "x");
        record.category = category.to_string();
        record.nutrients.energy_kcal = kcal;
        record.nutrients.iron_mg = iron;
        record.nutrients.vitamin_c_mg = vitamin_c;
        record
    }

    #[test]
    fn counts_groups_and_categories() {
        let records = vec![
            food("cereais", 124.0, 0.3, 0.0),
            food("frutas", 98.0, 0.4, 21.6),
            food("frutas", 0.0, 0.0, 0.0),
            food("", 0.0, 0.0, 5.0),
        ];
        let report = report(&records);
        assert_eq!(report.total_records, 4);
        assert_eq!(report.with_macros.count, 2);
        assert_eq!(report.with_minerals.percent, 50.0);
        assert_eq!(report.with_vitamins.count, 2);
        assert_eq!(report.complete.count, 1);
        assert_eq!(report.empty.count, 1);
        assert_eq!(
            report.categories,
            vec![
                CategoryCoverage {
                    category: UNCATEGORIZED.to_string(),
                    count: 1,
                    without_data: 0,
                },
                CategoryCoverage {
                    category: "cereais".to_string(),
                    count: 1,
                    without_data: 0,
                },
                CategoryCoverage {
                    category: "frutas".to_string(),
                    count: 2,
                    without_data: 1,
                },
            ]
        );
    }

    #[test]
    fn empty_input_reports_zero() {
        let report = report(&[]);
        assert_eq!(report.total_records, 0);
        assert_eq!(report.with_macros.percent, 0.0);
        assert!(report.categories.is_empty());
    }
}
