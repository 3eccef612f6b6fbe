//! Canonical nutrient fields and the per-100 g nutrient profile of a food.
//!
//! Every nutrient value is expressed per 100 g of edible portion. A value of
//! `0.0` means "not measured" as well as "measured zero"; the source tables do
//! not distinguish the two once traces and missing markers are parsed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Conversion factor between kilocalories and kilojoules.
pub const KJ_PER_KCAL: f64 = 4.184;

/// Coverage group a nutrient belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NutrientGroup {
    Macro,
    Mineral,
    Vitamin,
}

impl NutrientGroup {
    pub const ALL: [NutrientGroup; 3] = [
        NutrientGroup::Macro,
        NutrientGroup::Mineral,
        NutrientGroup::Vitamin,
    ];

    pub fn label(self) -> &'static str {
        match self {
            NutrientGroup::Macro => "macronutrients",
            NutrientGroup::Mineral => "minerals",
            NutrientGroup::Vitamin => "vitamins",
        }
    }
}

/// A canonical nutrient column of the dataset.
///
/// Serialized as its dataset key (for example `ferro_mg`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum NutrientField {
    EnergyKcal,
    EnergyKj,
    Protein,
    Lipids,
    Carbohydrate,
    Fiber,
    Calcium,
    Magnesium,
    Manganese,
    Phosphorus,
    Iron,
    Sodium,
    Potassium,
    Copper,
    Zinc,
    VitaminC,
    VitaminD,
    VitaminE,
    VitaminB12,
    Thiamine,
    Riboflavin,
    Niacin,
    Folate,
}

impl NutrientField {
    pub const ALL: [NutrientField; 23] = [
        NutrientField::EnergyKcal,
        NutrientField::EnergyKj,
        NutrientField::Protein,
        NutrientField::Lipids,
        NutrientField::Carbohydrate,
        NutrientField::Fiber,
        NutrientField::Calcium,
        NutrientField::Magnesium,
        NutrientField::Manganese,
        NutrientField::Phosphorus,
        NutrientField::Iron,
        NutrientField::Sodium,
        NutrientField::Potassium,
        NutrientField::Copper,
        NutrientField::Zinc,
        NutrientField::VitaminC,
        NutrientField::VitaminD,
        NutrientField::VitaminE,
        NutrientField::VitaminB12,
        NutrientField::Thiamine,
        NutrientField::Riboflavin,
        NutrientField::Niacin,
        NutrientField::Folate,
    ];

    /// Key used in the canonical dataset and in mapping files.
    pub fn key(self) -> &'static str {
        match self {
            NutrientField::EnergyKcal => "energia_kcal",
            NutrientField::EnergyKj => "energia_kj",
            NutrientField::Protein => "proteina_g",
            NutrientField::Lipids => "lipidios_g",
            NutrientField::Carbohydrate => "carboidrato_g",
            NutrientField::Fiber => "fibra_alimentar_g",
            NutrientField::Calcium => "calcio_mg",
            NutrientField::Magnesium => "magnesio_mg",
            NutrientField::Manganese => "manganes_mg",
            NutrientField::Phosphorus => "fosforo_mg",
            NutrientField::Iron => "ferro_mg",
            NutrientField::Sodium => "sodio_mg",
            NutrientField::Potassium => "potassio_mg",
            NutrientField::Copper => "cobre_mg",
            NutrientField::Zinc => "zinco_mg",
            NutrientField::VitaminC => "vitamina_c_mg",
            NutrientField::VitaminD => "vitamina_d_mcg",
            NutrientField::VitaminE => "vitamina_e_mg",
            NutrientField::VitaminB12 => "vitamina_b12_mcg",
            NutrientField::Thiamine => "tiamina_mg",
            NutrientField::Riboflavin => "riboflavina_mg",
            NutrientField::Niacin => "niacina_mg",
            NutrientField::Folate => "folato_mcg",
        }
    }

    pub fn group(self) -> NutrientGroup {
        match self {
            NutrientField::EnergyKcal
            | NutrientField::EnergyKj
            | NutrientField::Protein
            | NutrientField::Lipids
            | NutrientField::Carbohydrate
            | NutrientField::Fiber => NutrientGroup::Macro,
            NutrientField::Calcium
            | NutrientField::Magnesium
            | NutrientField::Manganese
            | NutrientField::Phosphorus
            | NutrientField::Iron
            | NutrientField::Sodium
            | NutrientField::Potassium
            | NutrientField::Copper
            | NutrientField::Zinc => NutrientGroup::Mineral,
            NutrientField::VitaminC
            | NutrientField::VitaminD
            | NutrientField::VitaminE
            | NutrientField::VitaminB12
            | NutrientField::Thiamine
            | NutrientField::Riboflavin
            | NutrientField::Niacin
            | NutrientField::Folate => NutrientGroup::Vitamin,
        }
    }

    /// Upper bound of a plausible value per 100 g.
    ///
    /// Values above the bound are almost always extraction artifacts
    /// (shifted columns, codes read as numbers, unit confusion).
    pub fn plausible_max(self) -> f64 {
        match self {
            NutrientField::EnergyKcal => 900.0,
            NutrientField::EnergyKj => 900.0 * KJ_PER_KCAL,
            NutrientField::Protein | NutrientField::Lipids | NutrientField::Carbohydrate => 100.0,
            NutrientField::Fiber => 50.0,
            NutrientField::Calcium | NutrientField::Phosphorus | NutrientField::VitaminC => 2000.0,
            NutrientField::Magnesium | NutrientField::VitaminD | NutrientField::VitaminB12 => {
                1000.0
            }
            NutrientField::Manganese | NutrientField::Iron | NutrientField::Copper => 50.0,
            NutrientField::Sodium => 10000.0,
            NutrientField::Potassium | NutrientField::Folate => 5000.0,
            NutrientField::Zinc | NutrientField::Thiamine | NutrientField::Riboflavin => 100.0,
            NutrientField::VitaminE => 200.0,
            NutrientField::Niacin => 500.0,
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            NutrientField::EnergyKcal => "kcal",
            NutrientField::EnergyKj => "kJ",
            NutrientField::Protein
            | NutrientField::Lipids
            | NutrientField::Carbohydrate
            | NutrientField::Fiber => "g",
            NutrientField::VitaminD | NutrientField::VitaminB12 | NutrientField::Folate => "mcg",
            _ => "mg",
        }
    }

    pub fn fields_in(group: NutrientGroup) -> impl Iterator<Item = NutrientField> {
        Self::ALL
            .into_iter()
            .filter(move |field| field.group() == group)
    }
}

impl fmt::Display for NutrientField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for NutrientField {
    type Err = ModelError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let key = raw.trim();
        Self::ALL
            .into_iter()
            .find(|field| field.key().eq_ignore_ascii_case(key))
            .ok_or_else(|| ModelError::UnknownNutrient(key.to_string()))
    }
}

impl From<NutrientField> for String {
    fn from(field: NutrientField) -> Self {
        field.key().to_string()
    }
}

impl TryFrom<String> for NutrientField {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Per-100 g nutrient values of one food.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NutrientProfile {
    #[serde(rename = "energia_kcal")]
    pub energy_kcal: f64,
    #[serde(rename = "energia_kj")]
    pub energy_kj: f64,
    #[serde(rename = "proteina_g")]
    pub protein_g: f64,
    #[serde(rename = "lipidios_g")]
    pub lipids_g: f64,
    #[serde(rename = "carboidrato_g")]
    pub carbohydrate_g: f64,
    #[serde(rename = "fibra_alimentar_g")]
    pub fiber_g: f64,
    #[serde(rename = "calcio_mg")]
    pub calcium_mg: f64,
    #[serde(rename = "magnesio_mg")]
    pub magnesium_mg: f64,
    #[serde(rename = "manganes_mg")]
    pub manganese_mg: f64,
    #[serde(rename = "fosforo_mg")]
    pub phosphorus_mg: f64,
    #[serde(rename = "ferro_mg")]
    pub iron_mg: f64,
    #[serde(rename = "sodio_mg")]
    pub sodium_mg: f64,
    #[serde(rename = "potassio_mg")]
    pub potassium_mg: f64,
    #[serde(rename = "cobre_mg")]
    pub copper_mg: f64,
    #[serde(rename = "zinco_mg")]
    pub zinc_mg: f64,
    #[serde(rename = "vitamina_c_mg")]
    pub vitamin_c_mg: f64,
    #[serde(rename = "vitamina_d_mcg")]
    pub vitamin_d_mcg: f64,
    #[serde(rename = "vitamina_e_mg")]
    pub vitamin_e_mg: f64,
    #[serde(rename = "vitamina_b12_mcg")]
    pub vitamin_b12_mcg: f64,
    #[serde(rename = "tiamina_mg")]
    pub thiamine_mg: f64,
    #[serde(rename = "riboflavina_mg")]
    pub riboflavin_mg: f64,
    #[serde(rename = "niacina_mg")]
    pub niacin_mg: f64,
    #[serde(rename = "folato_mcg")]
    pub folate_mcg: f64,
}

impl NutrientProfile {
    pub fn get(&self, field: NutrientField) -> f64 {
        match field {
            NutrientField::EnergyKcal => self.energy_kcal,
            NutrientField::EnergyKj => self.energy_kj,
            NutrientField::Protein => self.protein_g,
            NutrientField::Lipids => self.lipids_g,
            NutrientField::Carbohydrate => self.carbohydrate_g,
            NutrientField::Fiber => self.fiber_g,
            NutrientField::Calcium => self.calcium_mg,
            NutrientField::Magnesium => self.magnesium_mg,
            NutrientField::Manganese => self.manganese_mg,
            NutrientField::Phosphorus => self.phosphorus_mg,
            NutrientField::Iron => self.iron_mg,
            NutrientField::Sodium => self.sodium_mg,
            NutrientField::Potassium => self.potassium_mg,
            NutrientField::Copper => self.copper_mg,
            NutrientField::Zinc => self.zinc_mg,
            NutrientField::VitaminC => self.vitamin_c_mg,
            NutrientField::VitaminD => self.vitamin_d_mcg,
            NutrientField::VitaminE => self.vitamin_e_mg,
            NutrientField::VitaminB12 => self.vitamin_b12_mcg,
            NutrientField::Thiamine => self.thiamine_mg,
            NutrientField::Riboflavin => self.riboflavin_mg,
            NutrientField::Niacin => self.niacin_mg,
            NutrientField::Folate => self.folate_mcg,
        }
    }

    pub fn get_mut(&mut self, field: NutrientField) -> &mut f64 {
        match field {
            NutrientField::EnergyKcal => &mut self.energy_kcal,
            NutrientField::EnergyKj => &mut self.energy_kj,
            NutrientField::Protein => &mut self.protein_g,
            NutrientField::Lipids => &mut self.lipids_g,
            NutrientField::Carbohydrate => &mut self.carbohydrate_g,
            NutrientField::Fiber => &mut self.fiber_g,
            NutrientField::Calcium => &mut self.calcium_mg,
            NutrientField::Magnesium => &mut self.magnesium_mg,
            NutrientField::Manganese => &mut self.manganese_mg,
            NutrientField::Phosphorus => &mut self.phosphorus_mg,
            NutrientField::Iron => &mut self.iron_mg,
            NutrientField::Sodium => &mut self.sodium_mg,
            NutrientField::Potassium => &mut self.potassium_mg,
            NutrientField::Copper => &mut self.copper_mg,
            NutrientField::Zinc => &mut self.zinc_mg,
            NutrientField::VitaminC => &mut self.vitamin_c_mg,
            NutrientField::VitaminD => &mut self.vitamin_d_mcg,
            NutrientField::VitaminE => &mut self.vitamin_e_mg,
            NutrientField::VitaminB12 => &mut self.vitamin_b12_mcg,
            NutrientField::Thiamine => &mut self.thiamine_mg,
            NutrientField::Riboflavin => &mut self.riboflavin_mg,
            NutrientField::Niacin => &mut self.niacin_mg,
            NutrientField::Folate => &mut self.folate_mcg,
        }
    }

    pub fn set(&mut self, field: NutrientField, value: f64) {
        *self.get_mut(field) = value;
    }

    /// Number of nutrient fields carrying a nonzero value.
    pub fn populated_count(&self) -> usize {
        NutrientField::ALL
            .into_iter()
            .filter(|field| self.get(*field) != 0.0)
            .count()
    }

    /// True when any nutrient of the group is nonzero.
    pub fn has_group(&self, group: NutrientGroup) -> bool {
        NutrientField::fields_in(group).any(|field| self.get(field) != 0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.populated_count() == 0
    }

    /// Fills whichever of `energia_kj` and `energia_kcal` the source left
    /// empty from the other one.
    pub fn fill_missing_energy(&mut self) {
        if self.energy_kj == 0.0 && self.energy_kcal > 0.0 {
            self.energy_kj = round_to(self.energy_kcal * KJ_PER_KCAL, 1);
        } else if self.energy_kcal == 0.0 && self.energy_kj > 0.0 {
            self.energy_kcal = round_to(self.energy_kj / KJ_PER_KCAL, 1);
        }
    }
}

/// Rounds half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip_through_from_str() {
        for field in NutrientField::ALL {
            assert_eq!(field.key().parse::<NutrientField>().unwrap(), field);
        }
    }

    #[test]
    fn groups_partition_all_fields() {
        let total: usize = NutrientGroup::ALL
            .into_iter()
            .map(|group| NutrientField::fields_in(group).count())
            .sum();
        assert_eq!(total, NutrientField::ALL.len());
        assert_eq!(NutrientField::fields_in(NutrientGroup::Mineral).count(), 9);
    }

    #[test]
    fn get_and_set_address_the_same_slot() {
        let mut profile = NutrientProfile::default();
        for (index, field) in NutrientField::ALL.into_iter().enumerate() {
            profile.set(field, index as f64 + 1.0);
        }
        for (index, field) in NutrientField::ALL.into_iter().enumerate() {
            assert_eq!(profile.get(field), index as f64 + 1.0);
        }
        assert_eq!(profile.populated_count(), NutrientField::ALL.len());
    }

    #[test]
    fn group_presence_uses_any_nonzero() {
        let profile = NutrientProfile {
            zinc_mg: 0.4,
            ..NutrientProfile::default()
        };
        assert!(profile.has_group(NutrientGroup::Mineral));
        assert!(!profile.has_group(NutrientGroup::Macro));
        assert!(!profile.has_group(NutrientGroup::Vitamin));
    }

    #[test]
    fn derives_kilojoules_only_when_missing() {
        let mut profile = NutrientProfile {
            energy_kcal: 128.0,
            ..NutrientProfile::default()
        };
        profile.fill_missing_energy();
        assert_eq!(profile.energy_kj, 535.6);

        let mut explicit = NutrientProfile {
            energy_kcal: 124.0,
            energy_kj: 518.0,
            ..NutrientProfile::default()
        };
        explicit.fill_missing_energy();
        assert_eq!(explicit.energy_kj, 518.0);
    }

    #[test]
    fn derives_kilocalories_from_kilojoules() {
        let mut profile = NutrientProfile {
            energy_kj: 517.0,
            ..NutrientProfile::default()
        };
        profile.fill_missing_energy();
        assert_eq!(profile.energy_kcal, 123.6);
        assert_eq!(profile.energy_kj, 517.0);
    }

    #[test]
    fn serializes_with_dataset_keys() {
        let profile = NutrientProfile {
            iron_mg: 0.08,
            ..NutrientProfile::default()
        };
        let json = serde_json::to_value(profile).unwrap();
        assert_eq!(json["ferro_mg"], 0.08);
        assert_eq!(json["sodio_mg"], 0.0);
    }
}
