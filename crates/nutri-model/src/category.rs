use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Mapping from free-text source categories to canonical category codes.
///
/// `entries` keys are matched on normalized text, so "Cereais e derivados"
/// and "cereais e derivados" hit the same entry. `code_prefixes` map a prefix
/// of the source-native food code to a category and apply only when a record
/// carries no category of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMap {
    pub fallback: String,
    #[serde(default)]
    pub entries: BTreeMap<String, String>,
    #[serde(default)]
    pub code_prefixes: BTreeMap<String, String>,
    /// Display label per canonical code.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

impl CategoryMap {
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            fallback: fallback.into(),
            entries: BTreeMap::new(),
            code_prefixes: BTreeMap::new(),
            labels: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_entry(mut self, source: impl Into<String>, code: impl Into<String>) -> Self {
        self.entries.insert(source.into(), code.into());
        self
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>, code: impl Into<String>) -> Self {
        self.code_prefixes.insert(prefix.into(), code.into());
        self
    }

    #[must_use]
    pub fn with_label(mut self, code: impl Into<String>, label: impl Into<String>) -> Self {
        self.labels.insert(code.into(), label.into());
        self
    }

    /// Every code a record may carry after normalization.
    pub fn canonical_codes(&self) -> BTreeSet<&str> {
        self.entries
            .values()
            .chain(self.code_prefixes.values())
            .chain(self.labels.keys())
            .map(String::as_str)
            .chain(std::iter::once(self.fallback.as_str()))
            .collect()
    }

    pub fn label_for<'a>(&'a self, code: &'a str) -> &'a str {
        self.labels.get(code).map_or(code, String::as_str)
    }

    /// Code for a source-native food code, longest matching prefix first.
    pub fn category_for_code(&self, code: &str) -> Option<&str> {
        self.code_prefixes
            .iter()
            .filter(|(prefix, _)| code.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, category)| category.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_codes_include_fallback() {
        let map = CategoryMap::new("diversos")
            .with_entry("Frutas e derivados", "frutas")
            .with_prefix("63", "cereais");
        let codes = map.canonical_codes();
        assert!(codes.contains("diversos"));
        assert!(codes.contains("frutas"));
        assert!(codes.contains("cereais"));
    }

    #[test]
    fn longest_code_prefix_wins() {
        let map = CategoryMap::new("diversos")
            .with_prefix("6", "hortalicas")
            .with_prefix("63", "cereais");
        assert_eq!(map.category_for_code("6300101"), Some("cereais"));
        assert_eq!(map.category_for_code("6400201"), Some("hortalicas"));
        assert_eq!(map.category_for_code("8500101"), None);
    }

    #[test]
    fn unlabelled_codes_display_as_themselves() {
        let map = CategoryMap::new("diversos").with_label("cereais", "Cereais e derivados");
        assert_eq!(map.label_for("cereais"), "Cereais e derivados");
        assert_eq!(map.label_for("diversos"), "diversos");
    }
}
