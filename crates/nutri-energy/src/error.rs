use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnergyError {
    /// Input rejected before any computation.
    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// A stage produced a value that cannot be a calorie amount.
    #[error("{stage} produced {value}, which is not a finite non-negative energy")]
    InvalidResult { stage: &'static str, value: f64 },
}

impl EnergyError {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EnergyError>;

/// Accepts a stage output only when it is finite and not negative.
pub(crate) fn checked(stage: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(EnergyError::InvalidResult { stage, value })
    }
}

/// Rejects non-finite or negative energy inputs to a stage.
pub(crate) fn require_energy(field: &'static str, kcal: f64) -> Result<f64> {
    if kcal.is_finite() && kcal >= 0.0 {
        Ok(kcal)
    } else {
        Err(EnergyError::validation(
            field,
            format!("must be a finite non-negative kcal value, got {kcal}"),
        ))
    }
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
