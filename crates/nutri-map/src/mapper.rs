//! Field mapper: raw source record to canonical [`FoodRecord`].
//!
//! Positional records are consumed strictly in the declared column order and
//! must carry exactly as many values as the mapping declares. Keyed records
//! may omit declared keys (the field stays at zero) but may not carry keys the
//! mapping does not declare. Both rules make a drifted layout fail loudly
//! instead of silently shifting values into neighbouring nutrients.

use std::collections::BTreeMap;

use nutri_ingest::{parse_numeric, parse_tags, parse_text};
use nutri_model::{
    ColumnMapping, ColumnSpec, ColumnTarget, FoodRecord, RawRecord, RawValue, RecordLayout,
    SourceTag,
};
use nutri_normalization::normalize_name;

use crate::error::MappingError;

/// Identity fields collected while walking the columns.
#[derive(Default)]
struct Draft {
    code: String,
    name: String,
    preparation: String,
    category: String,
    tags: Vec<String>,
}

/// Maps one raw record with `mapping`.
///
/// # Errors
///
/// Returns a [`MappingError`] when the record does not fit the mapping:
/// wrong source, wrong shape, wrong column count, undeclared key,
/// unparseable nutrient value or missing name.
pub fn map_record(
    tag: SourceTag,
    raw: &RawRecord,
    mapping: &ColumnMapping,
) -> Result<FoodRecord, MappingError> {
    if tag != mapping.source {
        return Err(MappingError::SourceMismatch {
            expected: mapping.source,
            found: tag,
        });
    }
    let mut draft = Draft::default();
    let mut record = FoodRecord::new(tag, String::new(), String::new());

    match (raw, mapping.layout) {
        (RawRecord::Positional(values), RecordLayout::Positional) => {
            if values.len() != mapping.width() {
                return Err(MappingError::ColumnCountMismatch {
                    tag,
                    expected: mapping.width(),
                    actual: values.len(),
                });
            }
            for (spec, value) in mapping.columns.iter().zip(values) {
                apply(spec, value, &mut draft, &mut record)?;
            }
        }
        (RawRecord::Keyed(values), RecordLayout::Keyed) => {
            reject_undeclared_keys(tag, values, mapping)?;
            for spec in &mapping.columns {
                if let Some(value) = values.get(&spec.column) {
                    apply(spec, value, &mut draft, &mut record)?;
                }
            }
        }
        (raw, expected) => {
            return Err(MappingError::LayoutMismatch {
                tag,
                expected,
                found: raw.layout(),
            });
        }
    }

    if draft.name.is_empty() {
        return Err(MappingError::MissingName { tag });
    }
    record.name = display_name(&draft.name, &draft.preparation);
    record.normalized_name = normalize_name(&record.name);
    record.code = draft.code;
    record.category = draft.category;
    record.tags.extend(draft.tags);
    record.nutrients.fill_missing_energy();
    Ok(record)
}

/// Maps every record of one source, stopping at the first failure.
///
/// # Errors
///
/// Returns the first record's error wrapped in [`MappingError::AtRecord`], or
/// a structural error of the mapping itself.
pub fn map_batch(
    tag: SourceTag,
    records: &[RawRecord],
    mapping: &ColumnMapping,
) -> Result<Vec<FoodRecord>, MappingError> {
    mapping.validate()?;
    records
        .iter()
        .enumerate()
        .map(|(index, raw)| map_record(tag, raw, mapping).map_err(|error| error.at_record(index)))
        .collect()
}

/// Compares column labels an extractor wrote into its document with the
/// mapping's declared columns.
///
/// Labels are compared on their normalized form. Keyed mappings are not
/// checked here; their keys are validated per record.
///
/// # Errors
///
/// Returns [`MappingError::ColumnCountMismatch`] or
/// [`MappingError::HeaderMismatch`] for positional layouts that disagree.
pub fn check_declared_columns(
    mapping: &ColumnMapping,
    declared: &[String],
) -> Result<(), MappingError> {
    if mapping.layout != RecordLayout::Positional {
        return Ok(());
    }
    if declared.len() != mapping.width() {
        return Err(MappingError::ColumnCountMismatch {
            tag: mapping.source,
            expected: mapping.width(),
            actual: declared.len(),
        });
    }
    for (position, (spec, found)) in mapping.columns.iter().zip(declared).enumerate() {
        if normalize_name(&spec.column) != normalize_name(found) {
            return Err(MappingError::HeaderMismatch {
                tag: mapping.source,
                position,
                expected: spec.column.clone(),
                found: found.clone(),
            });
        }
    }
    Ok(())
}

fn reject_undeclared_keys(
    tag: SourceTag,
    values: &BTreeMap<String, RawValue>,
    mapping: &ColumnMapping,
) -> Result<(), MappingError> {
    match values
        .keys()
        .find(|key| mapping.target_for(key).is_none())
    {
        Some(column) => Err(MappingError::UnexpectedColumn {
            tag,
            column: column.clone(),
        }),
        None => Ok(()),
    }
}

fn apply(
    spec: &ColumnSpec,
    value: &RawValue,
    draft: &mut Draft,
    record: &mut FoodRecord,
) -> Result<(), MappingError> {
    match spec.target {
        ColumnTarget::Code => draft.code = parse_text(value),
        ColumnTarget::Name => draft.name = parse_text(value),
        ColumnTarget::Preparation => draft.preparation = parse_text(value),
        ColumnTarget::Category => draft.category = parse_text(value),
        ColumnTarget::Tags => draft.tags.extend(parse_tags(value)),
        ColumnTarget::Skip => {}
        ColumnTarget::Nutrient(field) => {
            let parsed = parse_numeric(value).map_err(|invalid| MappingError::InvalidValue {
                column: spec.column.clone(),
                field,
                value: invalid.0,
            })?;
            record.nutrients.set(field, parsed);
        }
    }
    Ok(())
}

fn display_name(name: &str, preparation: &str) -> String {
    let preparation = preparation.trim();
    if preparation.is_empty() || normalize_name(preparation) == "nao se aplica" {
        name.to_string()
    } else {
        format!("{name} - {preparation}")
    }
}
