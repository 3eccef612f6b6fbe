//! The full calculation chain.

use serde::{Deserialize, Serialize};

use crate::activity::{ActivityLevel, total_energy_expenditure};
use crate::bmr::{BmrResult, Equation, bmr};
use crate::conditions::adjust_for_conditions;
use crate::error::Result;
use crate::macros::{MacroGrams, MacroSplit, macro_grams};
use crate::objective::{Objective, target_calories};
use crate::profile::AnthropometricProfile;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyRequest {
    pub profile: AnthropometricProfile,
    #[serde(default)]
    pub equation: Equation,
    #[serde(default)]
    pub activity: ActivityLevel,
    #[serde(default)]
    pub objective: Objective,
    #[serde(default)]
    pub split: MacroSplit,
}

/// Every intermediate value of one calculation, unrounded except for grams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyPlan {
    pub bmr: BmrResult,
    pub adjusted_bmr: f64,
    pub total_energy_expenditure: f64,
    pub target_kcal: f64,
    pub macros: MacroGrams,
}

impl EnergyPlan {
    /// BMR, then conditions, then activity, then objective, then grams.
    pub fn compute(request: &EnergyRequest) -> Result<Self> {
        request.split.validate()?;
        let bmr = bmr(&request.profile, request.equation)?;
        let adjusted_bmr = adjust_for_conditions(bmr.kcal, &request.profile.conditions)?;
        let total_energy_expenditure = total_energy_expenditure(adjusted_bmr, request.activity)?;
        let target_kcal = target_calories(total_energy_expenditure, request.objective)?;
        let macros = macro_grams(target_kcal, &request.split)?;
        Ok(Self {
            bmr,
            adjusted_bmr,
            total_energy_expenditure,
            target_kcal,
            macros,
        })
    }
}
