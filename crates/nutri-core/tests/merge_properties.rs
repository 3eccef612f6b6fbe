//! Properties of the merge over generated record batches.

use nutri_core::{IdOffsets, merge};
use nutri_model::{FoodRecord, SourceTag};
use proptest::prelude::*;

const NAMES: [&str; 8] = [
    "Arroz, integral, cozido",
    "arroz integral cozido",
    "Feijão, carioca, cozido",
    "Banana, prata, crua",
    "BANANA PRATA CRUA",
    "Leite, de vaca, integral",
    "Ovo, de galinha, inteiro, cozido",
    "Pão, trigo, francês",
];

fn record_strategy() -> impl Strategy<Value = FoodRecord> {
    (
        prop::sample::select(SourceTag::ALL.to_vec()),
        prop::sample::select(NAMES.to_vec()),
        0.0f64..900.0,
        prop::option::of(0.0f64..50.0),
        prop::option::of(0.0f64..20.0),
    )
        .prop_map(|(tag, name, kcal, protein, iron)| {
            let mut record = FoodRecord::new(tag, "1", name);
            record.nutrients.energy_kcal = kcal;
            record.nutrients.protein_g = protein.unwrap_or(0.0);
            record.nutrients.iron_mg = iron.unwrap_or(0.0);
            record
        })
}

fn food(tag: SourceTag, name: String) -> FoodRecord {
    let mut record = FoodRecord::new(tag, "1", name);
    record.nutrients.energy_kcal = 50.0;
    record
}

#[test]
fn half_duplicates_reduce_to_unique_count() {
    let unique: Vec<FoodRecord> = (0..100)
        .map(|index| food(SourceTag::Ibge, format!("Alimento {index}")))
        .collect();
    let mut batch = unique.clone();
    batch.extend(unique.iter().take(100).map(|record| {
        let mut duplicate = record.clone();
        duplicate.name = duplicate.name.to_uppercase();
        duplicate
    }));
    assert_eq!(batch.len(), 200);

    let outcome = merge(batch, &IdOffsets::new()).unwrap();
    assert_eq!(outcome.records.len(), 100);
    assert_eq!(outcome.stats.duplicates_removed, 100);
    assert_eq!(outcome.records[0].id, 7000);
    assert_eq!(outcome.records[99].id, 7099);
}

proptest! {
    #[test]
    fn merge_is_idempotent(records in prop::collection::vec(record_strategy(), 0..40)) {
        let offsets = IdOffsets::new();
        let once = merge(records, &offsets).unwrap();
        let twice = merge(once.records.clone(), &offsets).unwrap();
        prop_assert_eq!(&twice.records, &once.records);
        prop_assert_eq!(twice.stats.duplicates_removed, 0);
    }

    #[test]
    fn merge_is_deterministic(records in prop::collection::vec(record_strategy(), 0..40)) {
        let offsets = IdOffsets::new();
        let first = merge(records.clone(), &offsets).unwrap();
        let second = merge(records, &offsets).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn ids_are_unique_and_keys_distinct(records in prop::collection::vec(record_strategy(), 0..40)) {
        let outcome = merge(records, &IdOffsets::new()).unwrap();
        let mut ids: Vec<u32> = outcome.records.iter().map(|record| record.id).collect();
        ids.sort_unstable();
        ids.dedup();
        prop_assert_eq!(ids.len(), outcome.records.len());
        let keys: std::collections::BTreeSet<_> =
            outcome.records.iter().map(nutri_core::dedupe_key).collect();
        prop_assert_eq!(keys.len(), outcome.records.len());
    }
}
