//! User profile and onboarding
//!
//! A profile is "complete" once age, height and weight are known; anything
//! less routes the user back through onboarding.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::energy::{ActivityLevel, BodyMetrics, EnergySummary, Gender, Goal};
use crate::errors::ProfileError;
use crate::validation::{
    normalize_restrictions, validate_age, validate_height_cm, validate_text, validate_weight,
};

/// Activity answer: a tier, or a free-text description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActivitySelection {
    Tier(ActivityLevel),
    Custom(String),
}

impl ActivitySelection {
    /// Tier used for TDEE; free text falls back to moderately active
    pub fn resolve(&self) -> ActivityLevel {
        match self {
            ActivitySelection::Tier(level) => *level,
            ActivitySelection::Custom(_) => ActivityLevel::CUSTOM_FALLBACK,
        }
    }

    pub fn custom_text(&self) -> Option<&str> {
        match self {
            ActivitySelection::Tier(_) => None,
            ActivitySelection::Custom(text) => Some(text),
        }
    }

    /// Rebuild from stored columns. Unknown stored tiers become free text.
    pub fn from_columns(level: Option<&str>, custom: Option<&str>) -> Self {
        if let Some(text) = custom.filter(|t| !t.trim().is_empty()) {
            return ActivitySelection::Custom(text.to_string());
        }
        match level {
            Some(raw) => raw
                .parse()
                .map(ActivitySelection::Tier)
                .unwrap_or_else(|_| ActivitySelection::Custom(raw.to_string())),
            None => ActivitySelection::Tier(ActivityLevel::CUSTOM_FALLBACK),
        }
    }

    /// Prompt wording
    pub fn describe(&self) -> &str {
        match self {
            ActivitySelection::Tier(level) => level.as_str(),
            ActivitySelection::Custom(text) => text,
        }
    }
}

/// Goal answer: a preset, or a free-text description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GoalSelection {
    Preset(Goal),
    Custom(String),
}

impl GoalSelection {
    /// Goal used for the calorie target; free text is treated as maintenance
    pub fn resolve(&self) -> Goal {
        match self {
            GoalSelection::Preset(goal) => *goal,
            GoalSelection::Custom(_) => Goal::CUSTOM_FALLBACK,
        }
    }

    pub fn custom_text(&self) -> Option<&str> {
        match self {
            GoalSelection::Preset(_) => None,
            GoalSelection::Custom(text) => Some(text),
        }
    }

    /// Admins may overwrite the stored goal with arbitrary text, so anything
    /// unparseable is kept as a custom goal.
    pub fn from_columns(goal: Option<&str>, custom: Option<&str>) -> Self {
        if let Some(text) = custom.filter(|t| !t.trim().is_empty()) {
            return GoalSelection::Custom(text.to_string());
        }
        match goal {
            Some(raw) => raw
                .parse()
                .map(GoalSelection::Preset)
                .unwrap_or_else(|_| GoalSelection::Custom(raw.to_string())),
            None => GoalSelection::Preset(Goal::CUSTOM_FALLBACK),
        }
    }

    pub fn describe(&self) -> &str {
        match self {
            GoalSelection::Preset(goal) => goal.as_str(),
            GoalSelection::Custom(text) => text,
        }
    }
}

/// A complete user profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub age: u32,
    pub gender: Gender,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub activity: ActivitySelection,
    pub goal: GoalSelection,
    #[serde(default)]
    pub dietary_restrictions: BTreeSet<String>,
    /// Cached at save time
    #[serde(default)]
    pub bmr: Option<i32>,
    #[serde(default)]
    pub tdee: Option<i32>,
}

impl UserProfile {
    pub fn body_metrics(&self) -> BodyMetrics {
        BodyMetrics {
            weight_kg: self.weight_kg,
            height_cm: self.height_cm,
            age_years: self.age,
            gender: self.gender,
        }
    }

    /// Freshly computed energy figures
    pub fn energy(&self) -> EnergySummary {
        EnergySummary::compute(&self.body_metrics(), self.activity.resolve(), self.goal.resolve())
    }

    /// Refresh the cached BMR and TDEE
    pub fn recompute_energy(&mut self) {
        let summary = self.energy();
        self.bmr = Some(summary.bmr);
        self.tdee = Some(summary.tdee);
    }

    /// Planning target from the cached TDEE, or `fallback` when none is stored
    pub fn target_calories_or(&self, fallback: i32) -> i32 {
        self.tdee
            .map(|tdee| crate::energy::compute_target_calories(tdee, self.goal.resolve()))
            .unwrap_or(fallback)
    }
}

/// Whether stored data is enough to skip onboarding
pub fn is_complete(age: Option<u32>, height_cm: Option<f64>, weight_kg: Option<f64>) -> bool {
    age.is_some() && height_cm.is_some() && weight_kg.is_some()
}

/// Onboarding submission. Every field may be missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileDraft {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub activity: Option<ActivitySelection>,
    pub goal: Option<GoalSelection>,
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
}

impl ProfileDraft {
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.as_deref().map_or(true, |n| n.trim().is_empty()) {
            missing.push("name");
        }
        if self.age.is_none() {
            missing.push("age");
        }
        if self.height_cm.is_none() {
            missing.push("height_cm");
        }
        if self.weight_kg.is_none() {
            missing.push("weight_kg");
        }
        missing
    }

    /// Validate and turn the draft into a profile with energy cached.
    ///
    /// Unanswered choices take the onboarding defaults: male, sedentary,
    /// maintain weight.
    pub fn into_profile(self, email: Option<String>) -> Result<UserProfile, ProfileError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(ProfileError::Incomplete(missing));
        }
        let (Some(name), Some(age), Some(height_cm), Some(weight_kg)) =
            (self.name, self.age, self.height_cm, self.weight_kg)
        else {
            return Err(ProfileError::Incomplete(vec!["name", "age", "height_cm", "weight_kg"]));
        };

        validate_text("name", &name, 100)?;
        validate_age(age)?;
        validate_height_cm(height_cm)?;
        validate_weight(weight_kg)?;

        let activity = self
            .activity
            .unwrap_or(ActivitySelection::Tier(ActivityLevel::Sedentary));
        if let ActivitySelection::Custom(text) = &activity {
            validate_text("custom_activity", text, 200)?;
        }
        let goal = self.goal.unwrap_or(GoalSelection::Preset(Goal::MaintainWeight));
        if let GoalSelection::Custom(text) = &goal {
            validate_text("custom_goal", text, 200)?;
        }

        let mut profile = UserProfile {
            name: name.trim().to_string(),
            email,
            age,
            gender: self.gender.unwrap_or(Gender::Male),
            height_cm,
            weight_kg,
            activity,
            goal,
            dietary_restrictions: normalize_restrictions(&self.dietary_restrictions),
            bmr: None,
            tdee: None,
        };
        profile.recompute_energy();
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ProfileDraft {
        ProfileDraft {
            name: Some("Somchai".to_string()),
            age: Some(30),
            gender: Some(Gender::Male),
            height_cm: Some(175.0),
            weight_kg: Some(70.0),
            activity: Some(ActivitySelection::Tier(ActivityLevel::Sedentary)),
            goal: Some(GoalSelection::Preset(Goal::LoseWeight)),
            dietary_restrictions: vec!["No pork".into(), "No pork ".into(), "".into()],
        }
    }

    #[test]
    fn test_draft_into_profile_caches_energy() {
        let profile = draft().into_profile(Some("a@b.co".into())).unwrap();
        assert_eq!(profile.bmr, Some(1649));
        assert_eq!(profile.tdee, Some(1979));
        assert_eq!(profile.target_calories_or(2000), 1479);
        assert_eq!(profile.dietary_restrictions.len(), 1);
    }

    #[test]
    fn test_missing_fields_reported() {
        let mut d = draft();
        d.age = None;
        d.weight_kg = None;
        match d.into_profile(None) {
            Err(ProfileError::Incomplete(fields)) => assert_eq!(fields, vec!["age", "weight_kg"]),
            other => panic!("expected incomplete, got {:?}", other),
        }
    }

    #[test]
    fn test_onboarding_defaults() {
        let mut d = draft();
        d.gender = None;
        d.activity = None;
        d.goal = None;
        let profile = d.into_profile(None).unwrap();
        assert_eq!(profile.gender, Gender::Male);
        assert_eq!(profile.activity, ActivitySelection::Tier(ActivityLevel::Sedentary));
        assert_eq!(profile.goal, GoalSelection::Preset(Goal::MaintainWeight));
    }

    #[test]
    fn test_custom_selections_fall_back() {
        let mut d = draft();
        d.activity = Some(ActivitySelection::Custom("เดินวันละหมื่นก้าว".into()));
        d.goal = Some(GoalSelection::Custom("วิ่งมาราธอน".into()));
        let profile = d.into_profile(None).unwrap();
        assert_eq!(profile.activity.resolve(), ActivityLevel::ModeratelyActive);
        assert_eq!(profile.goal.resolve(), Goal::MaintainWeight);
        assert_eq!(profile.tdee, Some(2556));
        assert_eq!(profile.target_calories_or(2000), 2556);
    }

    #[test]
    fn test_blank_custom_text_rejected() {
        let mut d = draft();
        d.activity = Some(ActivitySelection::Custom("  ".into()));
        assert!(matches!(d.into_profile(None), Err(ProfileError::Invalid(_))));
    }

    #[test]
    fn test_selection_json_shapes() {
        let tier: ActivitySelection = serde_json::from_str("\"very_active\"").unwrap();
        assert_eq!(tier, ActivitySelection::Tier(ActivityLevel::VeryActive));
        let custom: ActivitySelection = serde_json::from_str("\"ยกเหล็กทุกวัน\"").unwrap();
        assert_eq!(custom, ActivitySelection::Custom("ยกเหล็กทุกวัน".into()));
    }

    #[test]
    fn test_selections_from_columns() {
        assert_eq!(
            ActivitySelection::from_columns(Some("lightly_active"), None),
            ActivitySelection::Tier(ActivityLevel::LightlyActive)
        );
        assert_eq!(
            ActivitySelection::from_columns(Some("moderately_active"), Some("ปั่นจักรยาน")),
            ActivitySelection::Custom("ปั่นจักรยาน".into())
        );
        assert_eq!(
            GoalSelection::from_columns(Some("Build stamina"), None),
            GoalSelection::Custom("Build stamina".into())
        );
        assert_eq!(
            GoalSelection::from_columns(None, None),
            GoalSelection::Preset(Goal::MaintainWeight)
        );
    }

    #[test]
    fn test_completeness_gate() {
        assert!(is_complete(Some(30), Some(170.0), Some(65.0)));
        assert!(!is_complete(None, Some(170.0), Some(65.0)));
        assert!(!is_complete(Some(30), None, Some(65.0)));
        assert!(!is_complete(Some(30), Some(170.0), None));
    }

    #[test]
    fn test_target_falls_back_without_cached_tdee() {
        let mut profile = draft().into_profile(None).unwrap();
        profile.tdee = None;
        assert_eq!(profile.target_calories_or(2000), 2000);
    }
}
