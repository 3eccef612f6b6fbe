//! TACO (Tabela Brasileira de Composição de Alimentos), 4th edition.
//!
//! The JSON export carries one keyed object per food. Keys without a
//! canonical field (moisture, ash, cholesterol, retinol equivalents,
//! pyridoxine) are declared as skip columns so that undeclared keys can be
//! treated as layout drift.

use std::collections::BTreeMap;

use nutri_model::{
    ColumnMapping, ColumnSpec, ColumnTarget, NutrientField, RawRecord, RawValue, RecordLayout,
    ReferenceRecord, SourceTag,
};

fn columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::new("numero", ColumnTarget::Code),
        ColumnSpec::new("descricao", ColumnTarget::Name),
        ColumnSpec::new("categoria", ColumnTarget::Category),
        ColumnSpec::new("tags", ColumnTarget::Tags),
        ColumnSpec::skip("umidade_g"),
        ColumnSpec::nutrient("energia_kcal", NutrientField::EnergyKcal),
        ColumnSpec::nutrient("energia_kj", NutrientField::EnergyKj),
        ColumnSpec::nutrient("proteina_g", NutrientField::Protein),
        ColumnSpec::nutrient("lipidios_g", NutrientField::Lipids),
        ColumnSpec::skip("colesterol_mg"),
        ColumnSpec::nutrient("carboidrato_g", NutrientField::Carbohydrate),
        ColumnSpec::nutrient("fibra_alimentar_g", NutrientField::Fiber),
        ColumnSpec::skip("cinzas_g"),
        ColumnSpec::nutrient("calcio_mg", NutrientField::Calcium),
        ColumnSpec::nutrient("magnesio_mg", NutrientField::Magnesium),
        ColumnSpec::nutrient("manganes_mg", NutrientField::Manganese),
        ColumnSpec::nutrient("fosforo_mg", NutrientField::Phosphorus),
        ColumnSpec::nutrient("ferro_mg", NutrientField::Iron),
        ColumnSpec::nutrient("sodio_mg", NutrientField::Sodium),
        ColumnSpec::nutrient("potassio_mg", NutrientField::Potassium),
        ColumnSpec::nutrient("cobre_mg", NutrientField::Copper),
        ColumnSpec::nutrient("zinco_mg", NutrientField::Zinc),
        ColumnSpec::skip("retinol_mcg"),
        ColumnSpec::skip("re_mcg"),
        ColumnSpec::skip("rae_mcg"),
        ColumnSpec::nutrient("tiamina_mg", NutrientField::Thiamine),
        ColumnSpec::nutrient("riboflavina_mg", NutrientField::Riboflavin),
        ColumnSpec::skip("piridoxina_mg"),
        ColumnSpec::nutrient("niacina_mg", NutrientField::Niacin),
        ColumnSpec::nutrient("vitamina_c_mg", NutrientField::VitaminC),
    ]
}

/// Food #1 of the table, "Arroz, integral, cozido".
pub fn arroz_integral_record() -> RawRecord {
    let cells = [
        ("numero", "1"),
        ("descricao", "Arroz, integral, cozido"),
        ("categoria", "Cereais e derivados"),
        ("umidade_g", "70,1"),
        ("energia_kcal", "124"),
        ("energia_kj", "517"),
        ("proteina_g", "2,6"),
        ("lipidios_g", "1,0"),
        ("colesterol_mg", "NA"),
        ("carboidrato_g", "25,8"),
        ("fibra_alimentar_g", "2,7"),
        ("cinzas_g", "0,5"),
        ("calcio_mg", "5"),
        ("magnesio_mg", "59"),
        ("manganes_mg", "0,63"),
        ("fosforo_mg", "106"),
        ("ferro_mg", "0,3"),
        ("sodio_mg", "1"),
        ("potassio_mg", "75"),
        ("cobre_mg", "0,02"),
        ("zinco_mg", "0,7"),
        ("retinol_mcg", "NA"),
        ("re_mcg", "NA"),
        ("rae_mcg", "NA"),
        ("tiamina_mg", "0,08"),
        ("riboflavina_mg", "Tr"),
        ("piridoxina_mg", "0,08"),
        ("niacina_mg", "Tr"),
        ("vitamina_c_mg", "NA"),
    ];
    RawRecord::Keyed(
        cells
            .into_iter()
            .map(|(key, value)| (key.to_string(), RawValue::text(value)))
            .collect::<BTreeMap<_, _>>(),
    )
}

fn arroz_integral_reference() -> ReferenceRecord {
    ReferenceRecord::new(
        "Arroz, integral, cozido",
        arroz_integral_record(),
        [
            (NutrientField::EnergyKcal, 124.0),
            (NutrientField::EnergyKj, 517.0),
            (NutrientField::Protein, 2.6),
            (NutrientField::Lipids, 1.0),
            (NutrientField::Carbohydrate, 25.8),
            (NutrientField::Fiber, 2.7),
            (NutrientField::Magnesium, 59.0),
            (NutrientField::Phosphorus, 106.0),
            (NutrientField::Iron, 0.3),
            (NutrientField::Sodium, 1.0),
            (NutrientField::Potassium, 75.0),
            (NutrientField::Riboflavin, 0.0),
        ],
    )
}

/// Built-in keyed mapping of the TACO JSON export.
pub fn taco_mapping() -> ColumnMapping {
    let mut mapping = ColumnMapping::new(SourceTag::Taco, RecordLayout::Keyed, columns())
        .with_reference(arroz_integral_reference());
    mapping.description = Some(SourceTag::Taco.description().to_string());
    mapping
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_keys_are_all_declared() {
        let mapping = taco_mapping();
        mapping.validate().unwrap();
        let RawRecord::Keyed(values) = arroz_integral_record() else {
            panic!("TACO reference must be keyed");
        };
        for key in values.keys() {
            assert!(mapping.target_for(key).is_some(), "undeclared key {key}");
        }
    }
}
