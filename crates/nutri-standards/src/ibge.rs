//! IBGE POF 2008-2009 nutritional composition tables.
//!
//! Extracted rows join tables 1 (macronutrients), 3 (minerals) and 4
//! (vitamins) after the food code, description and preparation columns.
//! Table 3 carries "sódio de adição" right after sodium and selenium after
//! zinc; neither has a canonical field, so both are skip columns.

use nutri_model::{
    ColumnMapping, ColumnSpec, ColumnTarget, NutrientField, RawRecord, RawValue, RecordLayout,
    ReferenceRecord, SourceTag,
};

/// Column labels of table 3 (minerals), in printed order.
pub const MINERAL_COLUMNS: [&str; 11] = [
    "calcio",
    "magnesio",
    "manganes",
    "fosforo",
    "ferro",
    "sodio",
    "sodio_adicao",
    "potassio",
    "cobre",
    "zinco",
    "selenio",
];

fn identity_columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::new("codigo", ColumnTarget::Code),
        ColumnSpec::new("descricao", ColumnTarget::Name),
        ColumnSpec::new("preparacao", ColumnTarget::Preparation),
    ]
}

fn macro_columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::nutrient("energia_kcal", NutrientField::EnergyKcal),
        ColumnSpec::nutrient("proteina", NutrientField::Protein),
        ColumnSpec::nutrient("lipidios", NutrientField::Lipids),
        ColumnSpec::nutrient("carboidrato", NutrientField::Carbohydrate),
        ColumnSpec::nutrient("fibra_alimentar", NutrientField::Fiber),
    ]
}

fn mineral_columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::nutrient(MINERAL_COLUMNS[0], NutrientField::Calcium),
        ColumnSpec::nutrient(MINERAL_COLUMNS[1], NutrientField::Magnesium),
        ColumnSpec::nutrient(MINERAL_COLUMNS[2], NutrientField::Manganese),
        ColumnSpec::nutrient(MINERAL_COLUMNS[3], NutrientField::Phosphorus),
        ColumnSpec::nutrient(MINERAL_COLUMNS[4], NutrientField::Iron),
        ColumnSpec::nutrient(MINERAL_COLUMNS[5], NutrientField::Sodium),
        ColumnSpec::skip(MINERAL_COLUMNS[6]),
        ColumnSpec::nutrient(MINERAL_COLUMNS[7], NutrientField::Potassium),
        ColumnSpec::nutrient(MINERAL_COLUMNS[8], NutrientField::Copper),
        ColumnSpec::nutrient(MINERAL_COLUMNS[9], NutrientField::Zinc),
        ColumnSpec::skip(MINERAL_COLUMNS[10]),
    ]
}

fn vitamin_columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::skip("retinol"),
        ColumnSpec::skip("rae"),
        ColumnSpec::nutrient("tiamina", NutrientField::Thiamine),
        ColumnSpec::nutrient("riboflavina", NutrientField::Riboflavin),
        ColumnSpec::nutrient("niacina", NutrientField::Niacin),
        ColumnSpec::skip("niacina_ne"),
        ColumnSpec::skip("piridoxina"),
        ColumnSpec::nutrient("cobalamina", NutrientField::VitaminB12),
        ColumnSpec::nutrient("folato", NutrientField::Folate),
        ColumnSpec::nutrient("vitamina_d", NutrientField::VitaminD),
        ColumnSpec::nutrient("vitamina_e", NutrientField::VitaminE),
        ColumnSpec::nutrient("vitamina_c", NutrientField::VitaminC),
    ]
}

/// Published sample row for "Arroz polido", cooked.
///
/// Mineral cells as printed: Ca 3,51; Mg 2,23; Mn 0,29; P 17,77; Fe 0,08;
/// Na 1,19; Na de adição 382,00; K 14,53; Cu 0,01; Zn 0,49; Se 0,45.
pub fn arroz_polido_row() -> Vec<RawValue> {
    let cells = [
        "6300101",
        "Arroz polido",
        "Cozido",
        "127,74",
        "2,52",
        "0,23",
        "28,06",
        "1,56",
        "3,51",
        "2,23",
        "0,29",
        "17,77",
        "0,08",
        "1,19",
        "382,00",
        "14,53",
        "0,01",
        "0,49",
        "0,45",
        "-",
        "-",
        "0,02",
        "0,01",
        "0,43",
        "-",
        "0,01",
        "-",
        "1,00",
        "-",
        "-",
        "-",
    ];
    cells.into_iter().map(RawValue::text).collect()
}

fn arroz_polido_reference() -> ReferenceRecord {
    ReferenceRecord::new(
        "Arroz polido - Cozido",
        RawRecord::Positional(arroz_polido_row()),
        [
            (NutrientField::EnergyKcal, 127.74),
            (NutrientField::Calcium, 3.51),
            (NutrientField::Magnesium, 2.23),
            (NutrientField::Manganese, 0.29),
            (NutrientField::Phosphorus, 17.77),
            (NutrientField::Iron, 0.08),
            (NutrientField::Sodium, 1.19),
            (NutrientField::Potassium, 14.53),
            (NutrientField::Copper, 0.01),
            (NutrientField::Zinc, 0.49),
        ],
    )
}

/// Built-in positional mapping of the joined IBGE tables.
pub fn ibge_mapping() -> ColumnMapping {
    let columns = identity_columns()
        .into_iter()
        .chain(macro_columns())
        .chain(mineral_columns())
        .chain(vitamin_columns())
        .collect();
    let mut mapping = ColumnMapping::new(SourceTag::Ibge, RecordLayout::Positional, columns)
        .with_reference(arroz_polido_reference());
    mapping.description = Some(SourceTag::Ibge.description().to_string());
    mapping
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_has_declared_width() {
        let mapping = ibge_mapping();
        mapping.validate().unwrap();
        assert_eq!(mapping.width(), 31);
        assert_eq!(arroz_polido_row().len(), mapping.width());
    }

    #[test]
    fn added_salt_sodium_is_skipped() {
        let mapping = ibge_mapping();
        assert_eq!(
            mapping.target_for("sodio_adicao"),
            Some(ColumnTarget::Skip)
        );
        assert_eq!(
            mapping.target_for("potassio"),
            Some(ColumnTarget::Nutrient(NutrientField::Potassium))
        );
    }
}
