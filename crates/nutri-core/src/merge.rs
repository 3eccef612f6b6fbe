//! Merge of mapped records from every source into one id space.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use nutri_model::{FoodRecord, SourceTag};

use crate::dedupe::dedupe_records;
use crate::error::MergeError;
use crate::offsets::IdOffsets;

/// Counts for one source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMergeStats {
    pub input: usize,
    pub duplicates_removed: usize,
    pub unique: usize,
    /// Id range assigned to the source, absent when it kept no record.
    pub first_id: Option<u32>,
    pub last_id: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeStats {
    pub input: usize,
    pub duplicates_removed: usize,
    pub unique: usize,
    pub per_source: BTreeMap<SourceTag, SourceMergeStats>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub records: Vec<FoodRecord>,
    pub stats: MergeStats,
}

/// Deduplicates and renumbers records.
///
/// Records are grouped by source, sources are ordered by id offset and each
/// source is numbered contiguously from its offset. Running the merge on its
/// own output returns the same records.
///
/// # Errors
///
/// Returns [`MergeError::IdRangeOverlap`] when a source's id range reaches
/// into the next source's offset, or [`MergeError::IdOverflow`] when ids would
/// not fit in `u32`.
pub fn merge(records: Vec<FoodRecord>, offsets: &IdOffsets) -> Result<MergeOutcome, MergeError> {
    let mut stats = MergeStats {
        input: records.len(),
        ..MergeStats::default()
    };
    let mut by_source: BTreeMap<SourceTag, Vec<FoodRecord>> = BTreeMap::new();
    for record in records {
        by_source.entry(record.source).or_default().push(record);
    }

    let mut merged = Vec::new();
    let mut previous: Option<(SourceTag, u32, u32)> = None;
    for tag in offsets.ordered(by_source.keys().copied()) {
        let Some(group) = by_source.remove(&tag) else {
            continue;
        };
        let input = group.len();
        let (mut kept, dropped) = dedupe_records(group);
        let offset = offsets.get(tag);
        let last_id = last_id(tag, offset, kept.len())?;

        if let Some((first, first_start, first_end)) = previous
            && offset <= first_end
        {
            return Err(MergeError::IdRangeOverlap {
                first,
                first_start,
                first_end,
                second: tag,
                second_start: offset,
            });
        }
        for (id, record) in (offset..).zip(kept.iter_mut()) {
            record.id = id;
        }
        debug!(source = %tag, input, duplicates = dropped, unique = kept.len(), "source merged");

        stats.duplicates_removed += dropped;
        stats.per_source.insert(
            tag,
            SourceMergeStats {
                input,
                duplicates_removed: dropped,
                unique: kept.len(),
                first_id: (!kept.is_empty()).then_some(offset),
                last_id,
            },
        );
        if let Some(end) = last_id {
            previous = Some((tag, offset, end));
        }
        merged.extend(kept);
    }
    stats.unique = merged.len();
    info!(
        record_count = stats.input,
        duplicates = stats.duplicates_removed,
        unique = stats.unique,
        "merge complete"
    );
    Ok(MergeOutcome {
        records: merged,
        stats,
    })
}

fn last_id(tag: SourceTag, offset: u32, count: usize) -> Result<Option<u32>, MergeError> {
    if count == 0 {
        return Ok(None);
    }
    u32::try_from(count - 1)
        .ok()
        .and_then(|span| offset.checked_add(span))
        .map(Some)
        .ok_or(MergeError::IdOverflow { tag, offset, count })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn food(tag: SourceTag, name: &str) -> FoodRecord {
        let mut record = FoodRecord::new(tag, "0", name);
        record.nutrients.energy_kcal = 100.0;
        record
    }

    #[test]
    fn sources_are_numbered_from_their_offsets() {
        let outcome = merge(
            vec![
                food(SourceTag::Ibge, "Arroz polido - Cozido"),
                food(SourceTag::Taco, "Arroz, integral, cozido"),
                food(SourceTag::Ibge, "Feijão carioca - Cozido"),
            ],
            &IdOffsets::new(),
        )
        .unwrap();
        let ids: Vec<(SourceTag, u32)> = outcome
            .records
            .iter()
            .map(|record| (record.source, record.id))
            .collect();
        assert_eq!(
            ids,
            vec![
                (SourceTag::Taco, 1),
                (SourceTag::Ibge, 7000),
                (SourceTag::Ibge, 7001)
            ]
        );
        let ibge = &outcome.stats.per_source[&SourceTag::Ibge];
        assert_eq!(ibge.first_id, Some(7000));
        assert_eq!(ibge.last_id, Some(7001));
    }

    #[test]
    fn overlapping_ranges_are_rejected() {
        let offsets = IdOffsets::new()
            .with(SourceTag::Taco, 1)
            .with(SourceTag::Ibge, 2);
        let err = merge(
            vec![
                food(SourceTag::Taco, "a"),
                food(SourceTag::Taco, "b"),
                food(SourceTag::Ibge, "c"),
            ],
            &offsets,
        )
        .unwrap_err();
        assert_eq!(
            err,
            MergeError::IdRangeOverlap {
                first: SourceTag::Taco,
                first_start: 1,
                first_end: 2,
                second: SourceTag::Ibge,
                second_start: 2,
            }
        );
    }

    #[test]
    fn ids_past_u32_overflow() {
        let offsets = IdOffsets::new().with(SourceTag::Taco, u32::MAX);
        let err = merge(
            vec![food(SourceTag::Taco, "a"), food(SourceTag::Taco, "b")],
            &offsets,
        )
        .unwrap_err();
        assert!(matches!(err, MergeError::IdOverflow { count: 2, .. }));
    }

    #[test]
    fn empty_input_merges_to_nothing() {
        let outcome = merge(Vec::new(), &IdOffsets::new()).unwrap();
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.stats.unique, 0);
    }
}
