//! Meal, day plan and weekly plan models
//!
//! These mirror the JSON contract of the generation model (camelCase keys)
//! so a decoded response can be stored and served without remapping.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::PlanError;

/// Number of days in a weekly plan
pub const WEEK_LENGTH: usize = 7;

/// A single dish with its nutrition estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub name: String,
    pub calories: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbs: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fats: Option<f64>,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooking_time: Option<String>,
}

impl Meal {
    /// Favorites are keyed by meal name
    pub fn same_dish(&self, other: &Meal) -> bool {
        self.name == other.name
    }
}

/// Meal slot within a day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealSlot {
    pub fn label_th(&self) -> &'static str {
        match self {
            MealSlot::Breakfast => "มื้อเช้า",
            MealSlot::Lunch => "มื้อกลางวัน",
            MealSlot::Dinner => "มื้อเย็น",
            MealSlot::Snack => "ของว่าง",
        }
    }
}

/// One day's meals. `totalCalories` is whatever the model reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    pub day: String,
    pub breakfast: Meal,
    pub lunch: Meal,
    pub dinner: Meal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snack: Option<Meal>,
    pub total_calories: f64,
}

impl DayPlan {
    pub fn meals(&self) -> impl Iterator<Item = (MealSlot, &Meal)> {
        [
            (MealSlot::Breakfast, Some(&self.breakfast)),
            (MealSlot::Lunch, Some(&self.lunch)),
            (MealSlot::Dinner, Some(&self.dinner)),
            (MealSlot::Snack, self.snack.as_ref()),
        ]
        .into_iter()
        .filter_map(|(slot, meal)| meal.map(|m| (slot, m)))
    }

    pub fn meals_calorie_sum(&self) -> f64 {
        self.meals().map(|(_, meal)| meal.calories).sum()
    }

    /// Reported total minus the sum of the meals. Reported only, never corrected.
    pub fn calorie_drift(&self) -> f64 {
        self.total_calories - self.meals_calorie_sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyPlan {
    pub days: Vec<DayPlan>,
}

impl WeeklyPlan {
    /// A weekly plan is only usable with exactly seven days
    pub fn ensure_complete(&self) -> Result<(), PlanError> {
        if self.days.len() != WEEK_LENGTH {
            return Err(PlanError::WeekLength {
                expected: WEEK_LENGTH,
                actual: self.days.len(),
            });
        }
        Ok(())
    }
}

/// A confirmed day plan as stored in meal history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub id: Uuid,
    pub date: NaiveDate,
    /// Confirmation time in epoch milliseconds
    pub timestamp: i64,
    pub plan: DayPlan,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn meal(name: &str, calories: f64) -> Meal {
        Meal {
            name: name.to_string(),
            calories,
            protein: Some(20.0),
            carbs: Some(50.0),
            fats: Some(10.0),
            description: format!("{} description", name),
            cooking_time: None,
        }
    }

    pub fn day_plan(label: &str) -> DayPlan {
        DayPlan {
            day: label.to_string(),
            breakfast: meal("โจ๊กหมู", 350.0),
            lunch: meal("ข้าวผัดกะเพราไก่", 600.0),
            dinner: meal("ต้มยำกุ้ง", 450.0),
            snack: None,
            total_calories: 1400.0,
        }
    }
}
