//! Verification of a column mapping against known reference rows.
//!
//! A mapping is only trusted for bulk import after every reference row maps
//! to its expected values. This is what catches a column-order drift such as
//! the one that moved manganese into phosphorus and sodium into potassium.

use serde::Serialize;
use tracing::debug;

use nutri_model::ColumnMapping;

use crate::error::MappingError;
use crate::mapper::map_record;

/// Outcome of one verified reference row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceCheck {
    pub reference: String,
    pub fields_checked: usize,
}

/// Maps each reference row and compares the result with its expected values.
///
/// # Errors
///
/// Returns [`MappingError::UnverifiedMapping`] when the mapping has no
/// reference rows, [`MappingError::ReferenceMismatch`] for the first value
/// outside tolerance, or the mapping error raised by a reference row.
pub fn verify_mapping(mapping: &ColumnMapping) -> Result<Vec<ReferenceCheck>, MappingError> {
    mapping.validate()?;
    if mapping.references.is_empty() {
        return Err(MappingError::UnverifiedMapping {
            tag: mapping.source,
        });
    }
    let mut checks = Vec::with_capacity(mapping.references.len());
    for reference in &mapping.references {
        let record = map_record(mapping.source, &reference.raw, mapping)?;
        for (field, expected) in &reference.expected {
            let actual = record.nutrients.get(*field);
            if (actual - expected).abs() > reference.tolerance {
                return Err(MappingError::ReferenceMismatch {
                    tag: mapping.source,
                    reference: reference.description.clone(),
                    field: *field,
                    expected: *expected,
                    actual,
                });
            }
        }
        debug!(
            source = %mapping.source,
            reference = %reference.description,
            fields = reference.expected.len(),
            "reference row verified"
        );
        checks.push(ReferenceCheck {
            reference: reference.description.clone(),
            fields_checked: reference.expected.len(),
        });
    }
    Ok(checks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nutri_model::{
        ColumnSpec, ColumnTarget, NutrientField, RawRecord, RawValue, RecordLayout,
        ReferenceRecord, SourceTag,
    };

    fn mapping(columns: Vec<ColumnSpec>) -> ColumnMapping {
        let raw = RawRecord::Positional(
            ["Arroz polido", "1,19", "382,00", "14,53"]
                .into_iter()
                .map(RawValue::text)
                .collect(),
        );
        ColumnMapping::new(SourceTag::Ibge, RecordLayout::Positional, columns).with_reference(
            ReferenceRecord::new(
                "Arroz polido",
                raw,
                [(NutrientField::Sodium, 1.19), (NutrientField::Potassium, 14.53)],
            ),
        )
    }

    #[test]
    fn correct_mapping_verifies() {
        let checks = verify_mapping(&mapping(vec![
            ColumnSpec::new("nome", ColumnTarget::Name),
            ColumnSpec::nutrient("sodio", NutrientField::Sodium),
            ColumnSpec::skip("sodio_adicao"),
            ColumnSpec::nutrient("potassio", NutrientField::Potassium),
        ]))
        .unwrap();
        assert_eq!(checks.len(), 1);
        assert_eq!(checks[0].fields_checked, 2);
    }

    #[test]
    fn missing_skip_marker_fails_verification() {
        let err = verify_mapping(&mapping(vec![
            ColumnSpec::new("nome", ColumnTarget::Name),
            ColumnSpec::nutrient("sodio", NutrientField::Sodium),
            ColumnSpec::nutrient("potassio", NutrientField::Potassium),
            ColumnSpec::nutrient("cobre", NutrientField::Copper),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            MappingError::ReferenceMismatch {
                field: NutrientField::Potassium,
                ..
            }
        ));
    }

    #[test]
    fn mapping_without_references_is_unverified() {
        let unverified = ColumnMapping::new(
            SourceTag::Taco,
            RecordLayout::Keyed,
            vec![ColumnSpec::new("descricao", ColumnTarget::Name)],
        );
        assert_eq!(
            verify_mapping(&unverified).unwrap_err(),
            MappingError::UnverifiedMapping {
                tag: SourceTag::Taco
            }
        );
    }
}
