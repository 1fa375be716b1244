//! FoodBuddy WASM Module
//!
//! Browser bindings for the energy calculations, so the onboarding form can
//! preview BMR, TDEE and the daily target before the profile is saved.

use foodbuddy_shared::{
    calculate_bmi_result, compute_bmr, compute_target_calories, compute_tdee, meal_ceiling,
    ActivitySelection, BodyMetrics, DayPlan, Gender, GoalSelection,
};
use wasm_bindgen::prelude::*;

/// Unrecognised genders use the female offset, same as "other"
fn parse_gender(gender: &str) -> Gender {
    gender.parse().unwrap_or(Gender::Other)
}

/// Mifflin-St Jeor BMR, rounded
#[wasm_bindgen]
pub fn bmr(weight_kg: f64, height_cm: f64, age_years: u32, gender: &str) -> i32 {
    compute_bmr(&BodyMetrics {
        weight_kg,
        height_cm,
        age_years,
        gender: parse_gender(gender),
    })
}

/// Accepts a tier name or free text; free text uses the moderately active multiplier
#[wasm_bindgen]
pub fn tdee(bmr: i32, activity: &str) -> i32 {
    let selection = ActivitySelection::from_columns(Some(activity), None);
    compute_tdee(bmr, selection.resolve())
}

/// Accepts a goal name or free text; free text keeps maintenance calories
#[wasm_bindgen]
pub fn target_calories(tdee: i32, goal: &str) -> i32 {
    let selection = GoalSelection::from_columns(Some(goal), None);
    compute_target_calories(tdee, selection.resolve())
}

#[wasm_bindgen]
pub fn per_meal_ceiling(target_calories: i32) -> i32 {
    meal_ceiling(target_calories)
}

/// BMI rounded to one decimal, 0 for a non-positive height
#[wasm_bindgen]
pub fn bmi(weight_kg: f64, height_cm: f64) -> f64 {
    if height_cm <= 0.0 {
        return 0.0;
    }
    calculate_bmi_result(weight_kg, height_cm).value
}

/// Thai BMI category label
#[wasm_bindgen]
pub fn bmi_label(weight_kg: f64, height_cm: f64) -> String {
    if height_cm <= 0.0 {
        return String::new();
    }
    calculate_bmi_result(weight_kg, height_cm)
        .category
        .label_th()
        .to_string()
}

/// Difference between a plan's reported total and the sum of its meals
#[wasm_bindgen]
pub fn plan_calorie_drift(plan_json: &str) -> Result<f64, JsValue> {
    let plan: DayPlan =
        serde_json::from_str(plan_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(plan.calorie_drift())
}
