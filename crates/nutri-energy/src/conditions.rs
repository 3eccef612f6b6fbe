//! Special physiological conditions.
//!
//! Additive adjustments (pregnancy, lactation) apply first, then the
//! multiplicative ones (thyroid, then metabolic disorder).

use serde::{Deserialize, Serialize};

use crate::error::{Result, checked, require_energy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Trimester {
    First,
    Second,
    Third,
}

impl Trimester {
    pub fn from_number(trimester: u8) -> Option<Self> {
        match trimester {
            1 => Some(Trimester::First),
            2 => Some(Trimester::Second),
            3 => Some(Trimester::Third),
            _ => None,
        }
    }

    /// Extra kcal per day.
    pub fn extra_kcal(self) -> f64 {
        match self {
            Trimester::First => 0.0,
            Trimester::Second => 340.0,
            Trimester::Third => 450.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LactationType {
    Exclusive,
    Partial,
}

impl LactationType {
    pub fn extra_kcal(self) -> f64 {
        match self {
            LactationType::Exclusive => 500.0,
            LactationType::Partial => 300.0,
        }
    }
}

pub const THYROID_FACTOR: f64 = 0.9;
pub const METABOLIC_DISORDER_FACTOR: f64 = 0.95;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialConditions {
    #[serde(default)]
    pub pregnancy: Option<Trimester>,
    #[serde(default)]
    pub lactation: Option<LactationType>,
    #[serde(default)]
    pub thyroid: bool,
    #[serde(default)]
    pub metabolic_disorder: bool,
}

impl SpecialConditions {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Sum of the additive adjustments, in kcal.
    pub fn additive_kcal(&self) -> f64 {
        self.pregnancy.map_or(0.0, Trimester::extra_kcal)
            + self.lactation.map_or(0.0, LactationType::extra_kcal)
    }

    /// Product of the multiplicative adjustments.
    pub fn factor(&self) -> f64 {
        let mut factor = 1.0;
        if self.thyroid {
            factor *= THYROID_FACTOR;
        }
        if self.metabolic_disorder {
            factor *= METABOLIC_DISORDER_FACTOR;
        }
        factor
    }
}

/// BMR after special-condition adjustments.
pub fn adjust_for_conditions(bmr: f64, conditions: &SpecialConditions) -> Result<f64> {
    let bmr = require_energy("bmr", bmr)?;
    let mut adjusted = bmr + conditions.additive_kcal();
    if conditions.thyroid {
        adjusted *= THYROID_FACTOR;
    }
    if conditions.metabolic_disorder {
        adjusted *= METABOLIC_DISORDER_FACTOR;
    }
    checked("adjust_for_conditions", adjusted)
}
