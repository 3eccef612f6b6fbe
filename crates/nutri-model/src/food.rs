use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::nutrient::NutrientProfile;
use crate::source::SourceTag;

/// A food in the canonical dataset.
///
/// Created by the field mapper from one raw source record, then touched only
/// by the merger (identifier) and the category normalizer (category).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodRecord {
    pub id: u32,
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "fonte")]
    pub source: SourceTag,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "nomeNormalizado", default)]
    pub normalized_name: String,
    #[serde(rename = "categoria", default)]
    pub category: String,
    #[serde(flatten)]
    pub nutrients: NutrientProfile,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl FoodRecord {
    pub fn new(source: SourceTag, code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: 0,
            code: code.into(),
            source,
            name: name.into(),
            normalized_name: String::new(),
            category: String::new(),
            nutrients: NutrientProfile::default(),
            tags: BTreeSet::new(),
        }
    }

    /// True when at least one nutrient carries data.
    pub fn has_any_data(&self) -> bool {
        !self.nutrients.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_flat_dataset_shape() {
        let mut record = FoodRecord::new(SourceTag::Ibge, "6300101", "Arroz polido - Cozido");
        record.id = 7000;
        record.category = "cereais".to_string();
        record.nutrients.calcium_mg = 3.51;
        record.tags.insert("arroz".to_string());

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["fonte"], "IBGE");
        assert_eq!(json["codigo"], "6300101");
        assert_eq!(json["categoria"], "cereais");
        assert_eq!(json["calcio_mg"], 3.51);
        assert_eq!(json["tags"][0], "arroz");

        let back: FoodRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
