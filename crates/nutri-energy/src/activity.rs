use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EnergyError, Result, checked, require_energy};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityLevel {
    /// Little or no exercise.
    #[default]
    Sedentary,
    /// Exercise 1-3 days a week.
    Light,
    /// Exercise 3-5 days a week.
    Moderate,
    /// Hard exercise 6-7 days a week.
    Intense,
    /// Very hard exercise and a physical job.
    Extreme,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Intense,
        ActivityLevel::Extreme,
    ];

    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Intense => 1.725,
            ActivityLevel::Extreme => 1.9,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Intense => "intense",
            ActivityLevel::Extreme => "extreme",
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityLevel {
    type Err = EnergyError;

    fn from_str(value: &str) -> Result<Self> {
        let wanted = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == wanted)
            .ok_or_else(|| {
                EnergyError::validation("activity", format!("unknown activity level '{value}'"))
            })
    }
}

/// Total energy expenditure: adjusted BMR times the activity multiplier.
pub fn total_energy_expenditure(adjusted_bmr: f64, activity: ActivityLevel) -> Result<f64> {
    let adjusted_bmr = require_energy("adjusted_bmr", adjusted_bmr)?;
    checked("total_energy_expenditure", adjusted_bmr * activity.multiplier())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moderate_activity_reference() {
        let tee = total_energy_expenditure(1765.2, ActivityLevel::Moderate).unwrap();
        assert!((tee - 2736.06).abs() < 1e-9);
    }

    #[test]
    fn multipliers_increase_with_activity() {
        let multipliers: Vec<f64> = ActivityLevel::ALL.iter().map(|l| l.multiplier()).collect();
        assert!(multipliers.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
