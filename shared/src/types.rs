//! API request and response types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::energy::BmiResult;
use crate::meal::{DayPlan, Meal};
use crate::plan::{DailyPlanner, PlanStatus};
use crate::profile::UserProfile;

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

// ============================================================================
// Accounts
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    /// Stored roles other than "admin" are plain users
    pub fn from_db(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("admin") {
            Role::Admin
        } else {
            Role::User
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Role::User => Role::Admin,
            Role::Admin => Role::User,
        }
    }
}

/// Authentication tokens response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountResponse {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Login and registration both return tokens plus the account, so the client
/// can route admins straight to the admin console.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(flatten)]
    pub tokens: AuthTokens,
    pub account: AccountResponse,
}

// ============================================================================
// Session and Profile
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Ready,
    NeedsOnboarding,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub status: SessionStatus,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<UserProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergyResponse {
    pub bmr: i32,
    pub tdee: i32,
    pub target_calories: i32,
    pub meal_ceiling: i32,
    pub bmi: BmiResult,
}

// ============================================================================
// Plans and Meals
// ============================================================================

/// Renderable snapshot of today's plan. Failures land in `error` rather than
/// an HTTP error so the client always has something to show.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanView {
    pub date: NaiveDate,
    pub status: PlanStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<DayPlan>,
    pub target_calories: i32,
    pub generating: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calorie_drift: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PlanView {
    pub fn from_planner(planner: &DailyPlanner, target_calories: i32) -> Self {
        let plan = planner.plan().cloned();
        Self {
            date: planner.date(),
            status: planner.state().status(),
            calorie_drift: plan.as_ref().map(DayPlan::calorie_drift),
            plan,
            target_calories,
            generating: planner.is_generating(),
            error: planner.last_error().map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestMealRequest {
    pub meal_type: String,
    #[serde(default)]
    pub prompt: Option<String>,
}

/// Raw base64 or a `data:image/...;base64,` URL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeImageRequest {
    pub image: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleFavoriteRequest {
    pub meal: Meal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteToggleResponse {
    pub favorite: bool,
    pub favorites: Vec<Meal>,
}

// ============================================================================
// Chat
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    /// Any role other than "user" is sent as the model's turn
    #[serde(other)]
    Model,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

// ============================================================================
// Admin
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminStats {
    pub users: i64,
    pub meal_plans: i64,
    pub favorites: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUserSummary {
    pub id: Uuid,
    pub email: Option<String>,
    pub name: Option<String>,
    pub goal: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUserList {
    pub users: Vec<AdminUserSummary>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateGoalRequest {
    pub goal: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleResponse {
    pub id: Uuid,
    pub role: Role,
}
