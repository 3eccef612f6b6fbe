#![deny(unsafe_code)]

//! Quality reporting, the coverage regression gate and plausibility checks.

pub mod checks;
pub mod gate;
pub mod quality;

pub use checks::{CheckOptions, run_checks};
pub use gate::{
    CoverageRegression, GateOverrides, GatingDecision, coverage_regressions, gate_write,
};
pub use quality::{UNCATEGORIZED, report};
