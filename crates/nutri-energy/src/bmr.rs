//! Basal metabolic rate equations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EnergyError, Result, checked};
use crate::profile::{AnthropometricProfile, Sex};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Equation {
    #[default]
    MifflinStJeor,
    HarrisBenedictOriginal,
    HarrisBenedictRevised,
    KatchMcArdle,
}

/// Reference notes on an equation, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EquationInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub accuracy: &'static str,
    pub best_for: &'static str,
    pub requirements: &'static str,
}

impl Equation {
    pub const ALL: [Equation; 4] = [
        Equation::MifflinStJeor,
        Equation::HarrisBenedictOriginal,
        Equation::HarrisBenedictRevised,
        Equation::KatchMcArdle,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Equation::MifflinStJeor => "mifflin-st-jeor",
            Equation::HarrisBenedictOriginal => "harris-benedict-original",
            Equation::HarrisBenedictRevised => "harris-benedict-revised",
            Equation::KatchMcArdle => "katch-mcardle",
        }
    }

    pub fn info(self) -> EquationInfo {
        match self {
            Equation::MifflinStJeor => EquationInfo {
                name: "Mifflin-St Jeor",
                description: "Most accurate for the general population (1990)",
                accuracy: "high",
                best_for: "general population, overweight and obesity",
                requirements: "weight, height, age, sex",
            },
            Equation::HarrisBenedictOriginal => EquationInfo {
                name: "Harris-Benedict (original)",
                description: "Classic equation (1919)",
                accuracy: "moderate",
                best_for: "historical reference",
                requirements: "weight, height, age, sex",
            },
            Equation::HarrisBenedictRevised => EquationInfo {
                name: "Harris-Benedict (revised)",
                description: "Roza and Shizgal revision (1984)",
                accuracy: "good",
                best_for: "comparison with Mifflin-St Jeor",
                requirements: "weight, height, age, sex",
            },
            Equation::KatchMcArdle => EquationInfo {
                name: "Katch-McArdle",
                description: "Based on lean body mass",
                accuracy: "very high",
                best_for: "athletes and people with known body fat",
                requirements: "weight, body fat percentage",
            },
        }
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Equation {
    type Err = EnergyError;

    fn from_str(value: &str) -> Result<Self> {
        let wanted = value.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|equation| equation.as_str() == wanted)
            .ok_or_else(|| EnergyError::validation("equation", format!("unknown equation '{value}'")))
    }
}

/// Why Katch-McArdle was not used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    MissingBodyFat,
    BodyFatOutOfRange,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FallbackReason::MissingBodyFat => "body fat percentage not given",
            FallbackReason::BodyFatOutOfRange => "body fat percentage outside (0, 50)",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BmrResult {
    pub kcal: f64,
    pub requested: Equation,
    /// Equation actually evaluated.
    pub used: Equation,
    pub fallback: Option<FallbackReason>,
}

/// Evaluates `equation` for a validated profile.
///
/// Katch-McArdle without usable body fat falls back to Mifflin-St Jeor and
/// records why in [`BmrResult::fallback`].
pub fn bmr(profile: &AnthropometricProfile, equation: Equation) -> Result<BmrResult> {
    profile.validate()?;
    let (used, fallback, kcal) = match (equation, profile.lean_mass()) {
        (Equation::KatchMcArdle, Some(lean_mass)) => {
            (Equation::KatchMcArdle, None, katch_mcardle(lean_mass))
        }
        (Equation::KatchMcArdle, None) => {
            let reason = if profile.body_fat_pct.is_some() {
                FallbackReason::BodyFatOutOfRange
            } else {
                FallbackReason::MissingBodyFat
            };
            debug!(%reason, "Katch-McArdle unavailable, using Mifflin-St Jeor");
            (Equation::MifflinStJeor, Some(reason), mifflin_st_jeor(profile))
        }
        (Equation::MifflinStJeor, _) => (equation, None, mifflin_st_jeor(profile)),
        (Equation::HarrisBenedictRevised, _) => (equation, None, harris_benedict_revised(profile)),
        (Equation::HarrisBenedictOriginal, _) => (equation, None, harris_benedict_original(profile)),
    };
    Ok(BmrResult {
        kcal: checked("bmr", kcal)?,
        requested: equation,
        used,
        fallback,
    })
}

fn linear(profile: &AnthropometricProfile, constant: f64, weight: f64, height: f64, age: f64) -> f64 {
    constant + weight * profile.weight_kg + height * profile.height_cm - age * profile.age_years
}

/// Same coefficients as the revised Harris-Benedict equation.
fn mifflin_st_jeor(profile: &AnthropometricProfile) -> f64 {
    harris_benedict_revised(profile)
}

fn harris_benedict_revised(profile: &AnthropometricProfile) -> f64 {
    match profile.sex {
        Sex::Male => linear(profile, 88.362, 13.397, 4.799, 5.677),
        Sex::Female => linear(profile, 447.593, 9.247, 3.098, 4.330),
    }
}

fn harris_benedict_original(profile: &AnthropometricProfile) -> f64 {
    match profile.sex {
        Sex::Male => linear(profile, 66.5, 13.75, 5.003, 6.755),
        Sex::Female => linear(profile, 655.1, 9.563, 1.850, 4.676),
    }
}

fn katch_mcardle(lean_mass_kg: f64) -> f64 {
    370.0 + 21.6 * lean_mass_kg
}
