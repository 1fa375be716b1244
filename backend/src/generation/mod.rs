//! Meal generation backed by a generative model
//!
//! Services talk to the [`MealGenerator`] trait; [`GeminiClient`] is the
//! production implementation and tests substitute their own.

mod gemini;
mod image;
mod prompt;
mod retry;
mod schema;

pub use gemini::GeminiClient;
pub use image::InlineImage;
pub use prompt::PromptContext;
pub use retry::RetryPolicy;

use async_trait::async_trait;
use foodbuddy_shared::{ChatMessage, DayPlan, Meal, PlanError, WeeklyPlan};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Model API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Model returned no content")]
    EmptyResponse,

    #[error("Could not decode model output: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Model returned an unusable plan: {0}")]
    InvalidPlan(#[from] PlanError),

    #[error("Image payload is empty")]
    InvalidImage,

    #[error("No API key configured")]
    MissingApiKey,
}

/// Everything the app asks of the generative model
#[async_trait]
pub trait MealGenerator: Send + Sync {
    /// One dish for `meal_type`, kept under a third of the daily target
    async fn suggest_meal(
        &self,
        ctx: &PromptContext,
        meal_type: &str,
        prompt: Option<&str>,
    ) -> Result<Meal, GenerationError>;

    async fn daily_plan(&self, ctx: &PromptContext) -> Result<DayPlan, GenerationError>;

    /// Always seven days on success
    async fn weekly_plan(&self, ctx: &PromptContext) -> Result<WeeklyPlan, GenerationError>;

    async fn analyze_image(&self, image: &InlineImage) -> Result<Meal, GenerationError>;

    async fn chat(
        &self,
        ctx: &PromptContext,
        history: &[ChatMessage],
        message: &str,
    ) -> Result<String, GenerationError>;
}
