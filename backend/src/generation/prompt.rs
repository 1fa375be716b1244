//! Prompt text for the nutritionist persona

use foodbuddy_shared::{
    meal_ceiling, ActivitySelection, GoalSelection, HistoryItem, Meal, UserProfile,
};

/// Target used for chat, which is not tied to a plan
pub const CHAT_TARGET_CALORIES: i32 = 2000;

/// How many recent history days feed the daily plan prompt
pub const RECENT_HISTORY_DAYS: usize = 3;

pub const WEEKLY_PLAN_PROMPT: &str = "Generate a 7-day meal plan.";

pub const IMAGE_PROMPT: &str = "Analyze this food image. Identify the dish name (in Thai), \
    estimate calories, protein, carbs, fats, and provide a short description.";

/// Profile-derived context shared by every request for one user
#[derive(Debug, Clone)]
pub struct PromptContext {
    pub profile: UserProfile,
    pub target_calories: i32,
    pub favorite_names: Vec<String>,
    pub recent_meals: Vec<String>,
}

impl PromptContext {
    pub fn new(profile: UserProfile, target_calories: i32) -> Self {
        Self {
            profile,
            target_calories,
            favorite_names: Vec::new(),
            recent_meals: Vec::new(),
        }
    }

    pub fn with_favorites(mut self, favorites: &[Meal]) -> Self {
        self.favorite_names = favorites.iter().map(|m| m.name.clone()).collect();
        self
    }

    pub fn with_history(mut self, history: &[HistoryItem]) -> Self {
        self.recent_meals = foodbuddy_shared::history::recent_meal_names(history, RECENT_HISTORY_DAYS);
        self
    }

    pub fn meal_ceiling(&self) -> i32 {
        meal_ceiling(self.target_calories)
    }

    pub fn system_instruction(&self) -> String {
        build_system_instruction(&self.profile, self.target_calories, &self.favorite_names)
    }

    /// Chat ignores the plan target and favorites
    pub fn chat_instruction(&self) -> String {
        let mut text = build_system_instruction(&self.profile, CHAT_TARGET_CALORIES, &[]);
        text.push_str("\nAnswer concisely in Thai.");
        text
    }

    pub fn daily_plan_prompt(&self) -> String {
        let mut prompt = format!(
            "Generate a 1-day meal plan strictly adhering to {} kcal.",
            self.target_calories
        );
        if !self.recent_meals.is_empty() {
            prompt.push_str(&format!(
                " Avoid repeating recent meals: {}.",
                self.recent_meals.join(", ")
            ));
        }
        prompt
    }

    pub fn meal_prompt(&self, meal_type: &str, extra: Option<&str>) -> String {
        format!(
            "Suggest a single {} menu. {}. Limit: {} kcal.",
            meal_type_label(meal_type),
            extra.map(str::trim).unwrap_or_default(),
            self.meal_ceiling()
        )
    }
}

fn build_system_instruction(profile: &UserProfile, target_calories: i32, favorites: &[String]) -> String {
    let goal = match &profile.goal {
        GoalSelection::Custom(text) => format!("Custom Goal: \"{}\"", text),
        GoalSelection::Preset(goal) => format!("Goal: {}", goal.as_str()),
    };
    let activity = match &profile.activity {
        ActivitySelection::Custom(text) => format!("Custom Activity Level: \"{}\"", text),
        ActivitySelection::Tier(level) => format!("Activity Level: {}", level.as_str()),
    };
    let restrictions = if profile.dietary_restrictions.is_empty() {
        "None".to_string()
    } else {
        profile
            .dietary_restrictions
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut text = format!(
        "You are a professional Thai nutritionist (FoodBuddy AI).\n\
         User Profile: Age {}, {}, {}, {}.\n\
         Target: {} kcal/day.\n\
         Restrictions: {}.\n",
        profile.age, profile.gender, goal, activity, target_calories, restrictions
    );
    if !favorites.is_empty() {
        text.push_str(&format!("User's Favorites: {}.\n", favorites.join(", ")));
    }
    text.push_str(
        "\nGenerate recommendations in THAI language.\n\
         Tone: Friendly, Encouraging, Modern.\n\
         IMPORTANT: Return only JSON format.\n",
    );
    text
}

/// Known slot names become their Thai label; anything else passes through
fn meal_type_label(raw: &str) -> &str {
    match raw.trim().to_lowercase().as_str() {
        "breakfast" => "มื้อเช้า",
        "lunch" => "มื้อกลางวัน",
        "dinner" => "มื้อเย็น",
        "snack" => "ของว่าง",
        _ => raw.trim(),
    }
}

#[cfg(test)]
pub(crate) fn sample_profile() -> UserProfile {
    use foodbuddy_shared::{ActivityLevel, Gender, Goal};

    UserProfile {
        name: "Somchai".to_string(),
        email: None,
        age: 30,
        gender: Gender::Male,
        height_cm: 175.0,
        weight_kg: 70.0,
        activity: ActivitySelection::Tier(ActivityLevel::Sedentary),
        goal: GoalSelection::Preset(Goal::LoseWeight),
        dietary_restrictions: Default::default(),
        bmr: Some(1649),
        tdee: Some(1979),
    }
}
