#![deny(unsafe_code)]

//! Energy and macronutrient calculations.
//!
//! The stages run in a fixed order:
//! [`bmr`] → [`adjust_for_conditions`] → [`total_energy_expenditure`] →
//! [`target_calories`] → [`macro_grams`]. [`EnergyPlan::compute`] runs the
//! whole chain. Every function is pure and rejects input that would yield a
//! negative or non-finite energy.

pub mod activity;
pub mod bmr;
pub mod conditions;
pub mod error;
pub mod macros;
pub mod objective;
pub mod plan;
pub mod profile;

pub use activity::{ActivityLevel, total_energy_expenditure};
pub use bmr::{BmrResult, Equation, EquationInfo, FallbackReason, bmr};
pub use conditions::{LactationType, SpecialConditions, Trimester, adjust_for_conditions};
pub use error::{EnergyError, Result};
pub use macros::{MacroGrams, MacroSplit, macro_grams};
pub use objective::{Objective, target_calories};
pub use plan::{EnergyPlan, EnergyRequest};
pub use profile::{AnthropometricProfile, Sex};
