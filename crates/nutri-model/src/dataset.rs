use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::food::FoodRecord;

/// The canonical dataset as written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalDataset {
    pub total_foods: usize,
    pub last_updated: NaiveDate,
    pub categories: Vec<String>,
    pub alimentos: Vec<FoodRecord>,
}

impl CanonicalDataset {
    /// Builds the dataset envelope; the total and category list are always
    /// derived from the records themselves.
    pub fn from_records(alimentos: Vec<FoodRecord>, last_updated: NaiveDate) -> Self {
        let categories: BTreeSet<String> = alimentos
            .iter()
            .filter(|record| !record.category.is_empty())
            .map(|record| record.category.clone())
            .collect();
        Self {
            total_foods: alimentos.len(),
            last_updated,
            categories: categories.into_iter().collect(),
            alimentos,
        }
    }

    /// True when the envelope agrees with the records it carries.
    pub fn is_consistent(&self) -> bool {
        let categories: BTreeSet<&str> = self
            .alimentos
            .iter()
            .filter(|record| !record.category.is_empty())
            .map(|record| record.category.as_str())
            .collect();
        self.total_foods == self.alimentos.len()
            && self.categories.iter().map(String::as_str).eq(categories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceTag;

    #[test]
    fn envelope_is_derived_from_records() {
        let mut a = FoodRecord::new(SourceTag::Taco, "1", "Arroz, integral, cozido");
        a.category = "cereais".to_string();
        let mut b = FoodRecord::new(SourceTag::Taco, "2", "Banana, prata, crua");
        b.category = "frutas".to_string();
        let mut c = FoodRecord::new(SourceTag::Ibge, "6300101", "Arroz polido");
        c.category = "cereais".to_string();

        let date = NaiveDate::from_ymd_opt(2025, 8, 24).unwrap();
        let dataset = CanonicalDataset::from_records(vec![a, b, c], date);
        assert_eq!(dataset.total_foods, 3);
        assert_eq!(dataset.categories, vec!["cereais", "frutas"]);
        assert!(dataset.is_consistent());

        let json = serde_json::to_value(&dataset).unwrap();
        assert_eq!(json["totalFoods"], 3);
        assert_eq!(json["lastUpdated"], "2025-08-24");
    }
}
