//! Duplicate removal within one source.

use std::collections::BTreeMap;

use nutri_model::{FoodRecord, SourceTag};
use nutri_normalization::normalize_name;

/// Duplicate key: the source and the normalized display name.
pub fn dedupe_key(record: &FoodRecord) -> (SourceTag, String) {
    (record.source, normalize_name(&record.name))
}

/// Keeps one record per [`dedupe_key`], in first-seen key order.
///
/// A later duplicate replaces the kept record only when it carries strictly
/// more nonzero nutrient fields. Returns the kept records and the number of
/// records dropped.
pub fn dedupe_records(records: Vec<FoodRecord>) -> (Vec<FoodRecord>, usize) {
    let mut positions: BTreeMap<(SourceTag, String), usize> = BTreeMap::new();
    let mut kept: Vec<FoodRecord> = Vec::with_capacity(records.len());
    let mut dropped = 0;
    for record in records {
        match positions.get(&dedupe_key(&record)) {
            Some(&index) => {
                dropped += 1;
                if record.nutrients.populated_count() > kept[index].nutrients.populated_count() {
                    kept[index] = record;
                }
            }
            None => {
                positions.insert(dedupe_key(&record), kept.len());
                kept.push(record);
            }
        }
    }
    (kept, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn food(name: &str, kcal: f64, protein: f64) -> FoodRecord {
        let mut record = FoodRecord::new(SourceTag::Taco, "1", name);
        record.nutrients.energy_kcal = kcal;
        record.nutrients.protein_g = protein;
        record
    }

    #[test]
    fn richer_duplicate_wins_in_place() {
        let (kept, dropped) = dedupe_records(vec![
            food("Arroz, integral, cozido", 124.0, 0.0),
            food("Feijão, carioca, cozido", 76.0, 4.8),
            food("arroz integral cozido", 124.0, 2.6),
        ]);
        assert_eq!(dropped, 1);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].nutrients.protein_g, 2.6);
        assert_eq!(kept[1].name, "Feijão, carioca, cozido");
    }

    #[test]
    fn exact_tie_keeps_first_seen() {
        let (kept, _) = dedupe_records(vec![food("Banana", 98.0, 1.3), food("BANANA", 90.0, 1.0)]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name, "Banana");
    }

    #[test]
    fn same_name_in_two_sources_is_kept() {
        let mut ibge = food("Banana", 98.0, 1.3);
        ibge.source = SourceTag::Ibge;
        let (kept, dropped) = dedupe_records(vec![food("Banana", 98.0, 1.3), ibge]);
        assert_eq!(kept.len(), 2);
        assert_eq!(dropped, 0);
    }
}
