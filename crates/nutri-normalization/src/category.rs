//! Category normalization.
//!
//! Rewrites each record's free-text category to a canonical code. Input that
//! no map entry covers falls back to the map's fallback code and is reported,
//! never rejected.

use std::collections::{BTreeMap, BTreeSet};

use rapidfuzz::distance::jaro_winkler;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use nutri_model::{CategoryMap, FoodRecord};

use crate::text::normalize_name;

/// Minimum similarity for a "did you mean" suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.80;

/// A source category that no entry of the map covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnmappedCategory {
    pub name: String,
    pub count: usize,
    /// Closest map entry by name similarity, if any is close enough.
    pub suggestion: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryOutcome {
    pub records: Vec<FoodRecord>,
    /// Records whose category changed.
    pub rewritten: usize,
    pub unmapped: Vec<UnmappedCategory>,
}

impl CategoryOutcome {
    pub fn unmapped_records(&self) -> usize {
        self.unmapped.iter().map(|entry| entry.count).sum()
    }
}

/// How a record's category was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Already a canonical code.
    Canonical,
    Entry(String),
    CodePrefix(String),
    Fallback,
}

/// Lookup structure built once per category map.
#[derive(Debug, Clone)]
pub struct CategoryNormalizer<'a> {
    map: &'a CategoryMap,
    index: BTreeMap<String, &'a str>,
    canonical: BTreeSet<&'a str>,
}

impl<'a> CategoryNormalizer<'a> {
    pub fn new(map: &'a CategoryMap) -> Self {
        let index = map
            .entries
            .iter()
            .map(|(source, code)| (normalize_name(source), code.as_str()))
            .collect();
        Self {
            map,
            index,
            canonical: map.canonical_codes(),
        }
    }

    pub fn resolve(&self, record: &FoodRecord) -> Resolution {
        let raw = record.category.trim();
        if self.canonical.contains(raw) {
            return Resolution::Canonical;
        }
        if !raw.is_empty() {
            if let Some(code) = self.index.get(&normalize_name(raw)) {
                return Resolution::Entry((*code).to_string());
            }
            return Resolution::Fallback;
        }
        match self.map.category_for_code(&record.code) {
            Some(code) => Resolution::CodePrefix(code.to_string()),
            None => Resolution::Fallback,
        }
    }

    /// Rewrites categories of all records.
    ///
    /// Idempotent: a second pass over its own output changes nothing and
    /// reports nothing.
    pub fn normalize(&self, records: Vec<FoodRecord>) -> CategoryOutcome {
        let mut unmapped: BTreeMap<String, usize> = BTreeMap::new();
        let mut rewritten = 0usize;
        let mut output = Vec::with_capacity(records.len());
        for mut record in records {
            let target = match self.resolve(&record) {
                Resolution::Canonical => Some(record.category.trim().to_string()),
                Resolution::Entry(code) | Resolution::CodePrefix(code) => Some(code),
                Resolution::Fallback => {
                    let name = match record.category.trim() {
                        "" => "(sem categoria)".to_string(),
                        other => other.to_string(),
                    };
                    *unmapped.entry(name).or_default() += 1;
                    Some(self.map.fallback.clone())
                }
            };
            if let Some(code) = target
                && code != record.category
            {
                debug!(id = record.id, from = %record.category, to = %code, "category rewritten");
                record.category = code;
                rewritten += 1;
            }
            output.push(record);
        }

        let unmapped: Vec<UnmappedCategory> = unmapped
            .into_iter()
            .map(|(name, count)| {
                let suggestion = self.suggest(&name);
                UnmappedCategory {
                    name,
                    count,
                    suggestion,
                }
            })
            .collect();
        for entry in &unmapped {
            warn!(
                category = %entry.name,
                count = entry.count,
                fallback = %self.map.fallback,
                suggestion = entry.suggestion.as_deref().unwrap_or("-"),
                "unmapped category"
            );
        }

        CategoryOutcome {
            records: output,
            rewritten,
            unmapped,
        }
    }

    /// Closest known source category or label for an unmapped name.
    fn suggest(&self, name: &str) -> Option<String> {
        let normalized = normalize_name(name);
        let candidates = self
            .map
            .entries
            .keys()
            .chain(self.map.labels.values());
        let mut best: Option<(f64, &String)> = None;
        for candidate in candidates {
            let score =
                jaro_winkler::similarity(normalized.chars(), normalize_name(candidate).chars());
            if score >= SUGGESTION_THRESHOLD && best.is_none_or(|(current, _)| score > current) {
                best = Some((score, candidate));
            }
        }
        best.map(|(_, candidate)| candidate.clone())
    }
}

/// Normalizes the categories of `records` against `map`.
pub fn normalize_categories(records: Vec<FoodRecord>, map: &CategoryMap) -> CategoryOutcome {
    CategoryNormalizer::new(map).normalize(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nutri_model::SourceTag;
    use proptest::prelude::*;

    fn map() -> CategoryMap {
        CategoryMap::new("diversos")
            .with_entry("Cereais e derivados", "cereais")
            .with_entry("Frutas e derivados", "frutas")
            .with_prefix("63", "cereais")
            .with_prefix("67", "frutas")
            .with_label("cereais", "Cereais e derivados")
            .with_label("frutas", "Frutas e derivados")
            .with_label("diversos", "Diversos")
    }

    fn record(code: &str, category: &str) -> FoodRecord {
        let mut record = FoodRecord::new(SourceTag::Taco, code, format!("food {code}"));
        record.category = category.to_string();
        record
    }

    #[test]
    fn maps_free_text_ignoring_case_and_accents() {
        let outcome = normalize_categories(
            vec![
                record("1", "cereais E DERIVADOS"),
                record("2", "Frutas e derivados"),
            ],
            &map(),
        );
        assert_eq!(outcome.records[0].category, "cereais");
        assert_eq!(outcome.records[1].category, "frutas");
        assert_eq!(outcome.rewritten, 2);
        assert!(outcome.unmapped.is_empty());
    }

    #[test]
    fn empty_category_uses_code_prefix() {
        let outcome = normalize_categories(vec![record("6300101", "")], &map());
        assert_eq!(outcome.records[0].category, "cereais");
    }

    #[test]
    fn unmapped_falls_back_and_is_reported() {
        let outcome = normalize_categories(
            vec![
                record("1", "Frutas e derivado"),
                record("2", "Frutas e derivado"),
                record("3", "Pratos prontos"),
            ],
            &map(),
        );
        assert!(outcome.records.iter().all(|r| r.category == "diversos"));
        assert_eq!(outcome.unmapped_records(), 3);
        let near = outcome
            .unmapped
            .iter()
            .find(|entry| entry.name == "Frutas e derivado")
            .unwrap();
        assert_eq!(near.count, 2);
        assert_eq!(near.suggestion.as_deref(), Some("Frutas e derivados"));
    }

    #[test]
    fn normalized_output_is_a_fixed_point() {
        let first = normalize_categories(
            vec![record("1", "Cereais e derivados"), record("2", "???")],
            &map(),
        );
        let second = normalize_categories(first.records.clone(), &map());
        assert_eq!(second.records, first.records);
        assert_eq!(second.rewritten, 0);
        assert!(second.unmapped.is_empty());
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(categories in proptest::collection::vec("[A-Za-z ]{0,20}", 0..20)) {
            let records: Vec<FoodRecord> = categories
                .iter()
                .enumerate()
                .map(|(index, category)| record(&format!("6{index}"), category))
                .collect();
            let once = normalize_categories(records, &map());
            let twice = normalize_categories(once.records.clone(), &map());
            prop_assert_eq!(twice.records, once.records);
            prop_assert_eq!(twice.rewritten, 0);
        }
    }
}
