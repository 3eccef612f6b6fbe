//! Macronutrient split of a calorie target.

use serde::{Deserialize, Serialize};

use crate::error::{EnergyError, Result, require_energy, round_to};

pub const KCAL_PER_G_CARBOHYDRATE: f64 = 4.0;
pub const KCAL_PER_G_PROTEIN: f64 = 4.0;
pub const KCAL_PER_G_FAT: f64 = 9.0;

/// Percentages of the calorie target. They are used as given: a split that
/// does not sum to 100 is not rescaled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroSplit {
    pub carbohydrate_pct: f64,
    pub protein_pct: f64,
    pub fat_pct: f64,
}

impl MacroSplit {
    pub fn new(carbohydrate_pct: f64, protein_pct: f64, fat_pct: f64) -> Self {
        Self {
            carbohydrate_pct,
            protein_pct,
            fat_pct,
        }
    }

    pub fn total_pct(&self) -> f64 {
        self.carbohydrate_pct + self.protein_pct + self.fat_pct
    }

    pub fn validate(&self) -> Result<()> {
        for (field, pct) in [
            ("carbohydrate_pct", self.carbohydrate_pct),
            ("protein_pct", self.protein_pct),
            ("fat_pct", self.fat_pct),
        ] {
            if !pct.is_finite() || pct < 0.0 {
                return Err(EnergyError::validation(
                    field,
                    format!("must be a finite non-negative percentage, got {pct}"),
                ));
            }
        }
        Ok(())
    }
}

impl Default for MacroSplit {
    fn default() -> Self {
        Self::new(50.0, 20.0, 30.0)
    }
}

/// Grams per day, rounded to 0.1 g.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroGrams {
    pub carbohydrate_g: f64,
    pub protein_g: f64,
    pub fat_g: f64,
}

pub fn macro_grams(kcal: f64, split: &MacroSplit) -> Result<MacroGrams> {
    let kcal = require_energy("target_kcal", kcal)?;
    split.validate()?;
    let grams = |pct: f64, kcal_per_g: f64| round_to(kcal * pct / 100.0 / kcal_per_g, 1);
    Ok(MacroGrams {
        carbohydrate_g: grams(split.carbohydrate_pct, KCAL_PER_G_CARBOHYDRATE),
        protein_g: grams(split.protein_pct, KCAL_PER_G_PROTEIN),
        fat_g: grams(split.fat_pct, KCAL_PER_G_FAT),
    })
}
