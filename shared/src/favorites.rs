//! Favorite meals, keyed by name

use serde::{Deserialize, Serialize};

use crate::meal::Meal;

/// Outcome of a toggle, used to drive persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum FavoriteChange {
    Added { meal: Meal },
    Removed { name: String },
}

impl FavoriteChange {
    pub fn label(&self) -> &'static str {
        match self {
            FavoriteChange::Added { .. } => "added",
            FavoriteChange::Removed { .. } => "removed",
        }
    }

    pub fn is_favorite(&self) -> bool {
        matches!(self, FavoriteChange::Added { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FavoriteSet {
    meals: Vec<Meal>,
}

impl FavoriteSet {
    pub fn from_meals(meals: Vec<Meal>) -> Self {
        Self { meals }
    }

    pub fn meals(&self) -> &[Meal] {
        &self.meals
    }

    pub fn is_favorite(&self, name: &str) -> bool {
        self.meals.iter().any(|meal| meal.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.meals.iter().map(|meal| meal.name.as_str()).collect()
    }

    /// Flip membership by name and report what happened
    pub fn toggle(&mut self, meal: Meal) -> FavoriteChange {
        if self.is_favorite(&meal.name) {
            self.meals.retain(|existing| !existing.same_dish(&meal));
            FavoriteChange::Removed { name: meal.name }
        } else {
            self.meals.push(meal.clone());
            FavoriteChange::Added { meal }
        }
    }
}

/// First stored row whose meal carries `name`
pub fn first_by_name<'a, T, F>(rows: &'a [T], name: &str, meal_of: F) -> Option<&'a T>
where
    F: Fn(&T) -> &Meal,
{
    rows.iter().find(|row| meal_of(row).name == name)
}
