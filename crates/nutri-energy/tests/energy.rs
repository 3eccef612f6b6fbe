//! Calculator behavior over the public API.

use nutri_energy::{
    ActivityLevel, AnthropometricProfile, EnergyPlan, EnergyRequest, Equation, MacroSplit,
    Objective, Sex, SpecialConditions, Trimester, adjust_for_conditions, bmr,
    total_energy_expenditure,
};
use proptest::prelude::*;

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn plan_types_are_thread_safe() {
    assert_send_sync::<EnergyRequest>();
    assert_send_sync::<EnergyPlan>();
}

#[test]
fn request_deserializes_with_defaults() {
    let request: EnergyRequest = serde_json::from_str(
        r#"{
            "profile": {
                "weight_kg": 70.0,
                "height_cm": 170.0,
                "age_years": 40.0,
                "sex": "FEMALE",
                "conditions": { "pregnancy": "SECOND" }
            },
            "equation": "HARRIS_BENEDICT_REVISED",
            "activity": "LIGHT"
        }"#,
    )
    .unwrap();
    assert_eq!(request.objective, Objective::Maintenance);
    assert_eq!(request.split, MacroSplit::default());
    assert_eq!(request.profile.conditions.pregnancy, Some(Trimester::Second));

    let plan = EnergyPlan::compute(&request).unwrap();
    assert!((plan.adjusted_bmr - plan.bmr.kcal - 340.0).abs() < 1e-9);
    assert!((plan.total_energy_expenditure - plan.adjusted_bmr * 1.375).abs() < 1e-9);
}

#[test]
fn katch_mcardle_fallback_is_reported() {
    let request = EnergyRequest {
        profile: AnthropometricProfile::new(80.0, 175.0, 34.0, Sex::Male),
        equation: Equation::KatchMcArdle,
        activity: ActivityLevel::Sedentary,
        objective: Objective::Maintenance,
        split: MacroSplit::default(),
    };
    let plan = EnergyPlan::compute(&request).unwrap();
    assert_eq!(plan.bmr.requested, Equation::KatchMcArdle);
    assert_eq!(plan.bmr.used, Equation::MifflinStJeor);
    assert!(plan.bmr.fallback.is_some());
}

proptest! {
    #[test]
    fn valid_profiles_never_yield_nan_or_negative(
        weight in 30.0f64..200.0,
        height in 120.0f64..220.0,
        age in 18.0f64..90.0,
        male in any::<bool>(),
        equation in prop::sample::select(Equation::ALL.to_vec()),
        activity in prop::sample::select(ActivityLevel::ALL.to_vec()),
        thyroid in any::<bool>(),
    ) {
        let sex = if male { Sex::Male } else { Sex::Female };
        let profile = AnthropometricProfile::new(weight, height, age, sex);
        let result = bmr(&profile, equation).unwrap();
        prop_assert!(result.kcal.is_finite() && result.kcal > 0.0);
        let conditions = SpecialConditions { thyroid, ..SpecialConditions::default() };
        let adjusted = adjust_for_conditions(result.kcal, &conditions).unwrap();
        let tee = total_energy_expenditure(adjusted, activity).unwrap();
        prop_assert!(tee >= adjusted);
    }

    #[test]
    fn non_positive_weight_is_a_validation_error(weight in -1000.0f64..=0.0) {
        let profile = AnthropometricProfile::new(weight, 170.0, 30.0, Sex::Female);
        let is_validation = matches!(
            bmr(&profile, Equation::MifflinStJeor),
            Err(nutri_energy::EnergyError::Validation { .. })
        );
        prop_assert!(is_validation);
    }
}
