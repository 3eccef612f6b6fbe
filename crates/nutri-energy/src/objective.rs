use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EnergyError, Result, checked, require_energy};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Objective {
    WeightLoss,
    #[default]
    Maintenance,
    WeightGain,
    MuscleGain,
}

impl Objective {
    pub const ALL: [Objective; 4] = [
        Objective::WeightLoss,
        Objective::Maintenance,
        Objective::WeightGain,
        Objective::MuscleGain,
    ];

    pub fn factor(self) -> f64 {
        match self {
            Objective::WeightLoss => 0.85,
            Objective::Maintenance => 1.0,
            Objective::WeightGain => 1.15,
            Objective::MuscleGain => 1.20,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Objective::WeightLoss => "weight-loss",
            Objective::Maintenance => "maintenance",
            Objective::WeightGain => "weight-gain",
            Objective::MuscleGain => "muscle-gain",
        }
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Objective {
    type Err = EnergyError;

    fn from_str(value: &str) -> Result<Self> {
        let wanted = value.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|objective| objective.as_str() == wanted)
            .ok_or_else(|| {
                EnergyError::validation("objective", format!("unknown objective '{value}'"))
            })
    }
}

/// Daily calorie target for an objective.
pub fn target_calories(tee: f64, objective: Objective) -> Result<f64> {
    let tee = require_energy("tee", tee)?;
    checked("target_calories", tee * objective.factor())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::round_to;

    #[test]
    fn weight_loss_reference() {
        let target = target_calories(2736.06, Objective::WeightLoss).unwrap();
        assert_eq!(round_to(target, 2), 2325.65);
    }

    #[test]
    fn maintenance_keeps_tee() {
        assert_eq!(target_calories(2000.0, Objective::Maintenance).unwrap(), 2000.0);
        assert!(target_calories(f64::INFINITY, Objective::Maintenance).is_err());
    }

    #[test]
    fn parses_snake_and_kebab() {
        assert_eq!("MUSCLE_GAIN".parse::<Objective>().unwrap(), Objective::MuscleGain);
        assert_eq!("weight-loss".parse::<Objective>().unwrap(), Objective::WeightLoss);
    }
}
