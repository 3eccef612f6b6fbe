//! Read-side search over the canonical dataset.
//!
//! Text matching is accent- and case-insensitive over the name, the category
//! and the tags. Results are paginated from page 1.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use nutri_model::{CanonicalDataset, FoodRecord, SourceTag};
use nutri_normalization::{contains_normalized, normalize_name};

pub const DEFAULT_LIMIT: usize = 20;
pub const MAX_LIMIT: usize = 200;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Name,
    Id,
    Energy,
    Protein,
    Lipids,
    Carbohydrate,
}

impl SortField {
    pub const ALL: [SortField; 6] = [
        SortField::Name,
        SortField::Id,
        SortField::Energy,
        SortField::Protein,
        SortField::Lipids,
        SortField::Carbohydrate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Id => "id",
            SortField::Energy => "energy",
            SortField::Protein => "protein",
            SortField::Lipids => "lipids",
            SortField::Carbohydrate => "carbohydrate",
        }
    }

    fn numeric(self, record: &FoodRecord) -> Option<f64> {
        let nutrients = &record.nutrients;
        match self {
            SortField::Name | SortField::Id => None,
            SortField::Energy => Some(nutrients.energy_kcal),
            SortField::Protein => Some(nutrients.protein_g),
            SortField::Lipids => Some(nutrients.lipids_g),
            SortField::Carbohydrate => Some(nutrients.carbohydrate_g),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == value)
            .ok_or_else(|| format!("unknown sort field: {value}"))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub text: Option<String>,
    /// Canonical category code.
    pub category: Option<String>,
    pub source: Option<SourceTag>,
    /// 1-based.
    pub page: usize,
    pub limit: usize,
    pub sort: SortField,
    pub order: SortOrder,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            text: None,
            category: None,
            source: None,
            page: 1,
            limit: DEFAULT_LIMIT,
            sort: SortField::default(),
            order: SortOrder::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    pub items: Vec<FoodRecord>,
    /// Records matching the filters, across all pages.
    pub filtered_count: usize,
    pub page: usize,
    pub limit: usize,
    pub total_pages: usize,
    pub has_more: bool,
}

/// Filters, sorts and paginates the dataset.
///
/// A page past the end is empty; `page` 0 is read as 1 and `limit` is kept
/// within `1..=MAX_LIMIT`.
pub fn search(dataset: &CanonicalDataset, query: &SearchQuery) -> SearchPage {
    let needle = query
        .text
        .as_deref()
        .map(normalize_name)
        .filter(|needle| !needle.is_empty());
    let category = query
        .category
        .as_deref()
        .map(str::trim)
        .filter(|category| !category.is_empty());

    let mut matches: Vec<&FoodRecord> = dataset
        .alimentos
        .iter()
        .filter(|record| query.source.is_none_or(|source| record.source == source))
        .filter(|record| category.is_none_or(|category| record.category.eq_ignore_ascii_case(category)))
        .filter(|record| needle.as_deref().is_none_or(|needle| matches_text(record, needle)))
        .collect();

    matches.sort_by(|a, b| {
        let ordering = compare(query.sort, a, b);
        match query.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });

    let limit = query.limit.clamp(1, MAX_LIMIT);
    let page = query.page.max(1);
    let filtered_count = matches.len();
    let total_pages = filtered_count.div_ceil(limit);
    let items = matches
        .into_iter()
        .skip((page - 1).saturating_mul(limit))
        .take(limit)
        .cloned()
        .collect();
    SearchPage {
        items,
        filtered_count,
        page,
        limit,
        total_pages,
        has_more: page < total_pages,
    }
}

/// Distinct categories, optionally restricted to one source.
pub fn categories(dataset: &CanonicalDataset, source: Option<SourceTag>) -> Vec<String> {
    dataset
        .alimentos
        .iter()
        .filter(|record| source.is_none_or(|source| record.source == source))
        .filter(|record| !record.category.is_empty())
        .map(|record| record.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn matches_text(record: &FoodRecord, needle: &str) -> bool {
    let name_hit = if record.normalized_name.is_empty() {
        contains_normalized(&record.name, needle)
    } else {
        record.normalized_name.contains(needle)
    };
    name_hit
        || contains_normalized(&record.category, needle)
        || record.tags.iter().any(|tag| contains_normalized(tag, needle))
}

fn compare(field: SortField, a: &FoodRecord, b: &FoodRecord) -> Ordering {
    let primary = match field {
        SortField::Name => sort_name(a).cmp(&sort_name(b)),
        SortField::Id => Ordering::Equal,
        _ => {
            let left = field.numeric(a).unwrap_or_default();
            let right = field.numeric(b).unwrap_or_default();
            left.total_cmp(&right)
        }
    };
    primary.then(a.id.cmp(&b.id))
}

fn sort_name(record: &FoodRecord) -> String {
    if record.normalized_name.is_empty() {
        normalize_name(&record.name)
    } else {
        record.normalized_name.clone()
    }
}
