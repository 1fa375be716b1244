//! Energy calculations module
//!
//! Mifflin-St Jeor BMR, activity-scaled TDEE and goal-adjusted daily calorie
//! targets, plus the BMI read-out shown next to them.
//!
//! Every figure that leaves this module is a whole kilocalorie: each step
//! rounds to the nearest integer before the next one consumes it, so the
//! target is computed from the rounded TDEE and the TDEE from the rounded BMR.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Profile Enumerations
// ============================================================================

/// Gender as captured during onboarding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[serde(alias = "Male")]
    Male,
    #[serde(alias = "Female")]
    Female,
    /// Uses the female BMR offset
    #[serde(alias = "Other")]
    Other,
}

impl Gender {
    /// Constant term of the Mifflin-St Jeor equation
    pub fn bmr_offset(&self) -> f64 {
        match self {
            Gender::Male => 5.0,
            Gender::Female | Gender::Other => -161.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl FromStr for Gender {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(UnknownVariant::new("gender", s)),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Activity tier for TDEE calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Light exercise 1-3 days/week
    LightlyActive,
    /// Moderate exercise 3-5 days/week
    ModeratelyActive,
    /// Hard exercise 6-7 days/week
    VeryActive,
    /// Very hard exercise or a physical job
    SuperActive,
}

impl ActivityLevel {
    /// Tier used when the user describes their activity in free text
    pub const CUSTOM_FALLBACK: ActivityLevel = ActivityLevel::ModeratelyActive;

    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::LightlyActive,
        ActivityLevel::ModeratelyActive,
        ActivityLevel::VeryActive,
        ActivityLevel::SuperActive,
    ];

    /// Get the activity multiplier for TDEE calculation
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::SuperActive => 1.9,
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Little or no exercise",
            ActivityLevel::LightlyActive => "Light exercise 1-3 days/week",
            ActivityLevel::ModeratelyActive => "Moderate exercise 3-5 days/week",
            ActivityLevel::VeryActive => "Hard exercise 6-7 days/week",
            ActivityLevel::SuperActive => "Very hard exercise or physical job",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::LightlyActive => "lightly_active",
            ActivityLevel::ModeratelyActive => "moderately_active",
            ActivityLevel::VeryActive => "very_active",
            ActivityLevel::SuperActive => "super_active",
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActivityLevel::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownVariant::new("activity_level", s))
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weight goal driving the calorie adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    LoseWeight,
    MaintainWeight,
    GainMuscle,
}

impl Goal {
    /// Goal used when the user describes their goal in free text
    pub const CUSTOM_FALLBACK: Goal = Goal::MaintainWeight;

    pub const ALL: [Goal; 3] = [Goal::LoseWeight, Goal::MaintainWeight, Goal::GainMuscle];

    /// Daily kcal added to TDEE. Deficit and surplus are deliberately unequal.
    pub fn calorie_adjustment(&self) -> i32 {
        match self {
            Goal::LoseWeight => -500,
            Goal::MaintainWeight => 0,
            Goal::GainMuscle => 300,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::LoseWeight => "lose_weight",
            Goal::MaintainWeight => "maintain_weight",
            Goal::GainMuscle => "gain_muscle",
        }
    }
}

impl FromStr for Goal {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Goal::ALL
            .into_iter()
            .find(|goal| goal.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownVariant::new("goal", s))
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a stored or submitted enum value is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

// ============================================================================
// BMR, TDEE and Target Calories
// ============================================================================

/// Body measurements needed for BMR
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyMetrics {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age_years: u32,
    pub gender: Gender,
}

/// Calculate Basal Metabolic Rate using Mifflin-St Jeor
///
/// BMR = 10 × weight(kg) + 6.25 × height(cm) − 5 × age(y) + offset,
/// with offset +5 for male and −161 otherwise.
pub fn compute_bmr(metrics: &BodyMetrics) -> i32 {
    let base = 10.0 * metrics.weight_kg + 6.25 * metrics.height_cm - 5.0 * metrics.age_years as f64;
    (base + metrics.gender.bmr_offset()).round() as i32
}

/// TDEE = BMR × activity multiplier, rounded
pub fn compute_tdee(bmr: i32, activity: ActivityLevel) -> i32 {
    (bmr as f64 * activity.multiplier()).round() as i32
}

/// Goal-adjusted daily calorie target
pub fn compute_target_calories(tdee: i32, goal: Goal) -> i32 {
    tdee + goal.calorie_adjustment()
}

/// Per-meal ceiling used for single meal suggestions
pub fn meal_ceiling(target_calories: i32) -> i32 {
    (target_calories as f64 / 3.0).round() as i32
}

/// Full energy breakdown for a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergySummary {
    pub bmr: i32,
    pub tdee: i32,
    pub target_calories: i32,
    pub meal_ceiling: i32,
}

impl EnergySummary {
    pub fn compute(metrics: &BodyMetrics, activity: ActivityLevel, goal: Goal) -> Self {
        let bmr = compute_bmr(metrics);
        let tdee = compute_tdee(bmr, activity);
        let target_calories = compute_target_calories(tdee, goal);
        Self {
            bmr,
            tdee,
            target_calories,
            meal_ceiling: meal_ceiling(target_calories),
        }
    }
}

// ============================================================================
// BMI
// ============================================================================

/// BMI category using the Asian cut-offs shown on the home screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
    SeverelyObese,
}

impl BmiCategory {
    /// Thai label
    pub fn label_th(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "น้ำหนักน้อย",
            BmiCategory::Normal => "ปกติ",
            BmiCategory::Overweight => "ท้วม",
            BmiCategory::Obese => "อ้วน",
            BmiCategory::SeverelyObese => "อ้วนมาก",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
            BmiCategory::SeverelyObese => "Severely obese",
        }
    }
}

/// Formula: BMI = weight(kg) / height(m)²
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

pub fn classify_bmi(bmi: f64) -> BmiCategory {
    if bmi < 18.5 {
        BmiCategory::Underweight
    } else if bmi < 23.0 {
        BmiCategory::Normal
    } else if bmi < 25.0 {
        BmiCategory::Overweight
    } else if bmi < 30.0 {
        BmiCategory::Obese
    } else {
        BmiCategory::SeverelyObese
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BmiResult {
    /// BMI rounded to one decimal place
    pub value: f64,
    pub category: BmiCategory,
}

pub fn calculate_bmi_result(weight_kg: f64, height_cm: f64) -> BmiResult {
    let bmi = calculate_bmi(weight_kg, height_cm);
    BmiResult {
        value: (bmi * 10.0).round() / 10.0,
        category: classify_bmi(bmi),
    }
}
