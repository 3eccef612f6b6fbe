//! Fixed per-source id offsets.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use nutri_model::SourceTag;

/// First id assigned to each source's records.
///
/// Sources without an explicit entry use [`SourceTag::default_id_offset`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdOffsets {
    offsets: BTreeMap<SourceTag, u32>,
}

impl IdOffsets {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, tag: SourceTag, offset: u32) -> Self {
        self.set(tag, offset);
        self
    }

    pub fn set(&mut self, tag: SourceTag, offset: u32) {
        self.offsets.insert(tag, offset);
    }

    pub fn get(&self, tag: SourceTag) -> u32 {
        self.offsets
            .get(&tag)
            .copied()
            .unwrap_or_else(|| tag.default_id_offset())
    }

    /// Orders `tags` by offset, then by tag.
    pub fn ordered(&self, tags: impl IntoIterator<Item = SourceTag>) -> Vec<SourceTag> {
        let mut tags: Vec<SourceTag> = tags.into_iter().collect();
        tags.sort_by_key(|tag| (self.get(*tag), *tag));
        tags.dedup();
        tags
    }
}

impl FromIterator<(SourceTag, u32)> for IdOffsets {
    fn from_iter<I: IntoIterator<Item = (SourceTag, u32)>>(iter: I) -> Self {
        Self {
            offsets: iter.into_iter().collect(),
        }
    }
}
