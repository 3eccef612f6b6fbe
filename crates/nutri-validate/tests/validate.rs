//! Report, checks and gate over one batch.

use nutri_model::{FoodRecord, SourceTag};
use nutri_validate::{CheckOptions, GateOverrides, gate_write, report, run_checks};
use proptest::prelude::*;

fn food(tag: SourceTag, name: &str, kcal: f64, iron: f64, vitamin_c: f64) -> FoodRecord {
    let mut record = FoodRecord::new(tag, "1", name);
    record.category = "frutas".to_string();
    record.nutrients.energy_kcal = kcal;
    record.nutrients.iron_mg = iron;
    record.nutrients.vitamin_c_mg = vitamin_c;
    record.nutrients.fill_missing_energy();
    record
}

#[test]
fn mineral_loss_blocks_replacement() {
    let previous = vec![
        food(SourceTag::Ibge, "Banana", 98.0, 0.4, 21.6),
        food(SourceTag::Ibge, "Manga", 64.0, 0.1, 17.4),
    ];
    let current = vec![
        food(SourceTag::Ibge, "Banana", 98.0, 0.4, 21.6),
        food(SourceTag::Ibge, "Manga", 64.0, 0.0, 17.4),
    ];
    let validation = run_checks(&current, &CheckOptions::default());
    let decision = gate_write(
        Some(&report(&previous)),
        &report(&current),
        0.5,
        &validation,
        GateOverrides::default(),
    );
    assert!(decision.block_write);
    let json = serde_json::to_string(&decision.coverage_regressions).unwrap();
    insta::assert_snapshot!(json, @r#"[{"metric":"minerals","previous":100.0,"current":50.0,"drop":50.0},{"metric":"complete","previous":100.0,"current":50.0,"drop":50.0}]"#);
}

proptest! {
    #[test]
    fn coverage_percentages_stay_in_bounds(
        values in prop::collection::vec((0.0f64..900.0, 0.0f64..20.0, 0.0f64..100.0), 0..30)
    ) {
        let records: Vec<FoodRecord> = values
            .into_iter()
            .map(|(kcal, iron, vitamin_c)| food(SourceTag::Taco, "x", kcal, iron, vitamin_c))
            .collect();
        let quality = report(&records);
        for stat in [quality.with_macros, quality.with_minerals, quality.with_vitamins, quality.complete, quality.empty] {
            prop_assert!((0.0..=100.0).contains(&stat.percent));
            prop_assert!(stat.count <= records.len());
        }
        prop_assert!(quality.complete.count <= quality.with_macros.count);
        let category_total: usize = quality.categories.iter().map(|c| c.count).sum();
        prop_assert_eq!(category_total, records.len());
    }
}
