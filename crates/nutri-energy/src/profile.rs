//! Anthropometric input.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::conditions::SpecialConditions;
use crate::error::{EnergyError, Result};

pub const MAX_WEIGHT_KG: f64 = 500.0;
pub const MAX_HEIGHT_CM: f64 = 300.0;
pub const MAX_AGE_YEARS: f64 = 130.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sex {
    Male,
    Female,
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Sex::Male => "male",
            Sex::Female => "female",
        })
    }
}

impl FromStr for Sex {
    type Err = EnergyError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Sex::Male),
            "female" | "f" => Ok(Sex::Female),
            other => Err(EnergyError::validation(
                "sex",
                format!("expected male or female, got '{other}'"),
            )),
        }
    }
}

/// One person's measurements for a single calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnthropometricProfile {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age_years: f64,
    pub sex: Sex,
    #[serde(default)]
    pub body_fat_pct: Option<f64>,
    #[serde(default)]
    pub lean_mass_kg: Option<f64>,
    #[serde(default)]
    pub conditions: SpecialConditions,
}

impl AnthropometricProfile {
    pub fn new(weight_kg: f64, height_cm: f64, age_years: f64, sex: Sex) -> Self {
        Self {
            weight_kg,
            height_cm,
            age_years,
            sex,
            body_fat_pct: None,
            lean_mass_kg: None,
            conditions: SpecialConditions::default(),
        }
    }

    #[must_use]
    pub fn with_body_fat(mut self, body_fat_pct: f64) -> Self {
        self.body_fat_pct = Some(body_fat_pct);
        self
    }

    #[must_use]
    pub fn with_lean_mass(mut self, lean_mass_kg: f64) -> Self {
        self.lean_mass_kg = Some(lean_mass_kg);
        self
    }

    #[must_use]
    pub fn with_conditions(mut self, conditions: SpecialConditions) -> Self {
        self.conditions = conditions;
        self
    }

    /// Rejects measurements no formula can use.
    ///
    /// A body-fat value outside (0, 50) is not an error: it only rules out
    /// Katch-McArdle. A non-finite one is.
    pub fn validate(&self) -> Result<()> {
        positive_within("weight_kg", self.weight_kg, MAX_WEIGHT_KG)?;
        positive_within("height_cm", self.height_cm, MAX_HEIGHT_CM)?;
        positive_within("age_years", self.age_years, MAX_AGE_YEARS)?;
        if let Some(body_fat) = self.body_fat_pct
            && !body_fat.is_finite()
        {
            return Err(EnergyError::validation(
                "body_fat_pct",
                format!("must be finite, got {body_fat}"),
            ));
        }
        if let Some(lean_mass) = self.lean_mass_kg {
            positive_within("lean_mass_kg", lean_mass, self.weight_kg)?;
        }
        Ok(())
    }

    /// True when body fat is known and inside (0, 50).
    pub fn can_use_katch_mcardle(&self) -> bool {
        self.body_fat_pct
            .is_some_and(|body_fat| body_fat > 0.0 && body_fat < 50.0)
    }

    /// Lean body mass: the given value, else derived from body fat.
    pub fn lean_mass(&self) -> Option<f64> {
        if !self.can_use_katch_mcardle() {
            return None;
        }
        self.lean_mass_kg.or_else(|| {
            self.body_fat_pct
                .map(|body_fat| self.weight_kg * (1.0 - body_fat / 100.0))
        })
    }
}

fn positive_within(field: &'static str, value: f64, max: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(EnergyError::validation(
            field,
            format!("must be a finite number greater than 0, got {value}"),
        ));
    }
    if value > max {
        return Err(EnergyError::validation(
            field,
            format!("must not exceed {max}, got {value}"),
        ));
    }
    Ok(())
}
