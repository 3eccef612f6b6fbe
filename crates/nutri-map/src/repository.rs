//! Mapping repository for persisting and reusing source mappings.
//!
//! Operators export the built-in mappings once, adjust them when a source
//! publishes a new table layout, and point the pipeline at the directory.
//!
//! # Storage Format
//!
//! - `{source}_columns.json`: the [`ColumnMapping`] of one source
//! - `categories.json`: the [`CategoryMap`] shared by all sources
//!
//! Both are wrapped in a [`StoredMapping`] envelope carrying a save timestamp
//! and a format version.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use nutri_model::{CategoryMap, ColumnMapping, SourceTag};

/// Envelope written around every stored mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredMapping<T> {
    #[serde(flatten)]
    pub mapping: T,
    /// RFC 3339 timestamp of the save.
    pub saved_at: Option<String>,
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl<T> StoredMapping<T> {
    pub fn new(mapping: T) -> Self {
        Self {
            mapping,
            saved_at: Some(Utc::now().to_rfc3339()),
            version: default_version(),
        }
    }
}

/// Metadata about a stored mapping file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingMetadata {
    /// `None` for the shared category map.
    pub source: Option<SourceTag>,
    pub kind: MappingKind,
    pub file_path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MappingKind {
    Columns,
    Categories,
}

impl MappingKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MappingKind::Columns => "columns",
            MappingKind::Categories => "categories",
        }
    }
}

/// Directory-backed store of column and category mappings.
#[derive(Debug, Clone)]
pub struct MappingRepository {
    base_dir: PathBuf,
}

impl MappingRepository {
    /// Opens the repository, creating the directory when needed.
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir).with_context(|| {
            format!(
                "Failed to create mapping repository: {}",
                base_dir.display()
            )
        })?;
        Ok(Self { base_dir })
    }

    pub fn save_columns(&self, mapping: &ColumnMapping) -> Result<PathBuf> {
        let stored = StoredMapping::new(mapping.clone());
        self.write(&self.columns_path(mapping.source), &stored)
    }

    pub fn save_categories(&self, map: &CategoryMap) -> Result<PathBuf> {
        let stored = StoredMapping::new(map.clone());
        self.write(&self.categories_path(), &stored)
    }

    /// Returns `None` when no column mapping is stored for the source.
    pub fn load_columns(&self, source: SourceTag) -> Result<Option<ColumnMapping>> {
        let stored: Option<StoredMapping<ColumnMapping>> =
            self.read(&self.columns_path(source))?;
        match stored {
            Some(stored) if stored.mapping.source != source => anyhow::bail!(
                "mapping file for {source} declares source {}",
                stored.mapping.source
            ),
            other => Ok(other.map(|stored| stored.mapping)),
        }
    }

    pub fn load_categories(&self) -> Result<Option<CategoryMap>> {
        let stored: Option<StoredMapping<CategoryMap>> = self.read(&self.categories_path())?;
        Ok(stored.map(|stored| stored.mapping))
    }

    /// Lists stored mapping files: column mappings by source, then categories.
    pub fn list(&self) -> Result<Vec<MappingMetadata>> {
        let mut metadata: Vec<MappingMetadata> = SourceTag::ALL
            .into_iter()
            .map(|source| MappingMetadata {
                source: Some(source),
                kind: MappingKind::Columns,
                file_path: self.columns_path(source),
            })
            .collect();
        metadata.push(MappingMetadata {
            source: None,
            kind: MappingKind::Categories,
            file_path: self.categories_path(),
        });
        metadata.retain(|entry| entry.file_path.is_file());
        Ok(metadata)
    }

    fn columns_path(&self, source: SourceTag) -> PathBuf {
        self.base_dir.join(format!(
            "{}_{}.json",
            source.as_str().to_lowercase(),
            MappingKind::Columns.as_str()
        ))
    }

    fn categories_path(&self) -> PathBuf {
        self.base_dir
            .join(format!("{}.json", MappingKind::Categories.as_str()))
    }

    fn write<T: Serialize>(&self, path: &Path, stored: &StoredMapping<T>) -> Result<PathBuf> {
        let json = serde_json::to_string_pretty(stored)
            .with_context(|| format!("Failed to serialize mapping for {}", path.display()))?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write mapping to {}", path.display()))?;
        Ok(path.to_path_buf())
    }

    fn read<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<StoredMapping<T>>> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read mapping from {}", path.display()))?;
        let stored = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse mapping from {}", path.display()))?;
        Ok(Some(stored))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nutri_model::{ColumnSpec, ColumnTarget, NutrientField, RecordLayout};

    fn sample_mapping() -> ColumnMapping {
        ColumnMapping::new(
            SourceTag::Ibge,
            RecordLayout::Positional,
            vec![
                ColumnSpec::new("codigo", ColumnTarget::Code),
                ColumnSpec::new("descricao", ColumnTarget::Name),
                ColumnSpec::nutrient("energia_kcal", NutrientField::EnergyKcal),
            ],
        )
    }

    #[test]
    fn stores_and_lists_mappings() {
        let dir = tempfile::tempdir().unwrap();
        let repo = MappingRepository::new(dir.path().join("mappings")).unwrap();
        assert!(repo.load_columns(SourceTag::Ibge).unwrap().is_none());

        let path = repo.save_columns(&sample_mapping()).unwrap();
        assert!(path.ends_with("ibge_columns.json"));
        repo.save_categories(&CategoryMap::new("diversos").with_entry("Bebidas", "bebidas"))
            .unwrap();

        let loaded = repo.load_columns(SourceTag::Ibge).unwrap().unwrap();
        assert_eq!(loaded, sample_mapping());
        let categories = repo.load_categories().unwrap().unwrap();
        assert_eq!(categories.fallback, "diversos");

        let listed = repo.list().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].source, Some(SourceTag::Ibge));
        assert_eq!(listed[1].kind, MappingKind::Categories);
    }

    #[test]
    fn misfiled_mapping_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let repo = MappingRepository::new(dir.path()).unwrap();
        let path = repo.save_columns(&sample_mapping()).unwrap();
        fs::rename(&path, dir.path().join("taco_columns.json")).unwrap();
        assert!(repo.load_columns(SourceTag::Taco).is_err());
    }
}
