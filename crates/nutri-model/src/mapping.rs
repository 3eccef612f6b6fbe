//! Column mappings: the declared layout of a source table.
//!
//! A mapping is the single place where a source's column order or key names
//! are described. Positional sources are consumed strictly in declared order;
//! a [`ColumnTarget::Skip`] column consumes its slot without producing a
//! field, which is how columns such as IBGE "sódio de adição" are kept from
//! shifting every value after them.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::nutrient::NutrientField;
use crate::raw::RawRecord;
use crate::source::SourceTag;

/// Shape of the records a source emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordLayout {
    Positional,
    Keyed,
}

impl fmt::Display for RecordLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordLayout::Positional => f.write_str("positional"),
            RecordLayout::Keyed => f.write_str("keyed"),
        }
    }
}

/// Where the value of a source column ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ColumnTarget {
    Code,
    Name,
    /// Preparation method, appended to the display name.
    Preparation,
    Category,
    /// Semicolon or comma separated list of tags.
    Tags,
    /// Consume the column and drop its value.
    Skip,
    Nutrient(NutrientField),
}

impl fmt::Display for ColumnTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnTarget::Code => f.write_str("code"),
            ColumnTarget::Name => f.write_str("name"),
            ColumnTarget::Preparation => f.write_str("preparation"),
            ColumnTarget::Category => f.write_str("category"),
            ColumnTarget::Tags => f.write_str("tags"),
            ColumnTarget::Skip => f.write_str("skip"),
            ColumnTarget::Nutrient(field) => f.write_str(field.key()),
        }
    }
}

impl FromStr for ColumnTarget {
    type Err = ModelError;

    fn from_str(raw: &str) -> Result<Self> {
        let key = raw.trim().to_ascii_lowercase();
        match key.as_str() {
            "code" => Ok(ColumnTarget::Code),
            "name" => Ok(ColumnTarget::Name),
            "preparation" => Ok(ColumnTarget::Preparation),
            "category" => Ok(ColumnTarget::Category),
            "tags" => Ok(ColumnTarget::Tags),
            "skip" => Ok(ColumnTarget::Skip),
            other => other
                .parse::<NutrientField>()
                .map(ColumnTarget::Nutrient)
                .map_err(|_| ModelError::UnknownTarget(raw.trim().to_string())),
        }
    }
}

impl From<ColumnTarget> for String {
    fn from(target: ColumnTarget) -> Self {
        target.to_string()
    }
}

impl TryFrom<String> for ColumnTarget {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// One declared source column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column label (positional) or key (keyed).
    pub column: String,
    pub target: ColumnTarget,
}

impl ColumnSpec {
    pub fn new(column: impl Into<String>, target: ColumnTarget) -> Self {
        Self {
            column: column.into(),
            target,
        }
    }

    pub fn nutrient(column: impl Into<String>, field: NutrientField) -> Self {
        Self::new(column, ColumnTarget::Nutrient(field))
    }

    pub fn skip(column: impl Into<String>) -> Self {
        Self::new(column, ColumnTarget::Skip)
    }
}

/// A known sample row and the values it must map to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRecord {
    pub description: String,
    pub raw: RawRecord,
    pub expected: BTreeMap<NutrientField, f64>,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

fn default_tolerance() -> f64 {
    0.005
}

impl ReferenceRecord {
    pub fn new(
        description: impl Into<String>,
        raw: RawRecord,
        expected: impl IntoIterator<Item = (NutrientField, f64)>,
    ) -> Self {
        Self {
            description: description.into(),
            raw,
            expected: expected.into_iter().collect(),
            tolerance: default_tolerance(),
        }
    }
}

/// Declared layout of one source table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub source: SourceTag,
    pub layout: RecordLayout,
    #[serde(default)]
    pub description: Option<String>,
    pub columns: Vec<ColumnSpec>,
    #[serde(default)]
    pub references: Vec<ReferenceRecord>,
}

impl ColumnMapping {
    pub fn new(source: SourceTag, layout: RecordLayout, columns: Vec<ColumnSpec>) -> Self {
        Self {
            source,
            layout,
            description: None,
            columns,
            references: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_reference(mut self, reference: ReferenceRecord) -> Self {
        self.references.push(reference);
        self
    }

    /// Number of values a positional record must carry.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.columns.iter().map(|spec| spec.column.as_str()).collect()
    }

    pub fn target_for(&self, column: &str) -> Option<ColumnTarget> {
        self.columns
            .iter()
            .find(|spec| spec.column == column)
            .map(|spec| spec.target)
    }

    pub fn nutrient_fields(&self) -> BTreeSet<NutrientField> {
        self.columns
            .iter()
            .filter_map(|spec| match spec.target {
                ColumnTarget::Nutrient(field) => Some(field),
                _ => None,
            })
            .collect()
    }

    /// Structural checks that do not need any data.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidMapping`] when the mapping has no columns,
    /// does not declare exactly one name column, repeats a column label, or
    /// maps the same nutrient twice.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| ModelError::InvalidMapping {
            tag: self.source,
            message,
        };
        if self.columns.is_empty() {
            return Err(invalid("no columns declared".to_string()));
        }
        let names = self
            .columns
            .iter()
            .filter(|spec| spec.target == ColumnTarget::Name)
            .count();
        if names != 1 {
            return Err(invalid(format!(
                "expected exactly one name column, found {names}"
            )));
        }
        let mut labels = BTreeSet::new();
        let mut nutrients = BTreeSet::new();
        for spec in &self.columns {
            if !labels.insert(spec.column.as_str()) {
                return Err(invalid(format!("duplicate column '{}'", spec.column)));
            }
            if let ColumnTarget::Nutrient(field) = spec.target
                && !nutrients.insert(field)
            {
                return Err(invalid(format!(
                    "nutrient {field} mapped by more than one column"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> ColumnMapping {
        ColumnMapping::new(
            SourceTag::Ibge,
            RecordLayout::Positional,
            vec![
                ColumnSpec::new("codigo", ColumnTarget::Code),
                ColumnSpec::new("nome", ColumnTarget::Name),
                ColumnSpec::nutrient("sodio", NutrientField::Sodium),
                ColumnSpec::skip("sodio_adicao"),
            ],
        )
    }

    #[test]
    fn targets_parse_from_keys() {
        assert_eq!("skip".parse::<ColumnTarget>().unwrap(), ColumnTarget::Skip);
        assert_eq!(
            "ferro_mg".parse::<ColumnTarget>().unwrap(),
            ColumnTarget::Nutrient(NutrientField::Iron)
        );
        assert!("ferro".parse::<ColumnTarget>().is_err());
    }

    #[test]
    fn skip_columns_count_toward_width() {
        let mapping = minimal();
        assert_eq!(mapping.width(), 4);
        assert_eq!(mapping.nutrient_fields().len(), 1);
        mapping.validate().unwrap();
    }

    #[test]
    fn rejects_nutrient_mapped_twice() {
        let mut mapping = minimal();
        mapping
            .columns
            .push(ColumnSpec::nutrient("sodio_total", NutrientField::Sodium));
        let err = mapping.validate().unwrap_err();
        assert!(matches!(err, ModelError::InvalidMapping { .. }));
    }

    #[test]
    fn rejects_missing_name_column() {
        let mut mapping = minimal();
        mapping.columns.remove(1);
        assert!(mapping.validate().is_err());
    }

    #[test]
    fn mapping_json_uses_target_keys() {
        let json = serde_json::to_value(minimal()).unwrap();
        assert_eq!(json["layout"], "positional");
        assert_eq!(json["columns"][2]["target"], "sodio_mg");
        assert_eq!(json["columns"][3]["target"], "skip");
        let back: ColumnMapping = serde_json::from_value(json).unwrap();
        assert_eq!(back, minimal());
    }
}
