//! Single meal suggestions, food photo analysis and nutrition chat

use crate::error::ApiError;
use crate::generation::{InlineImage, PromptContext};
use crate::services::ProfileService;
use crate::state::AppState;
use foodbuddy_shared::{
    AnalyzeImageRequest, ChatMessage, ChatRequest, ChatResponse, Locale, Meal, Message,
    SuggestMealRequest,
};
use tracing::warn;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

#[derive(Debug, Validate)]
struct SuggestionInput {
    #[validate(length(min = 1, max = 50))]
    meal_type: String,
    #[validate(length(max = 500))]
    prompt: Option<String>,
}

#[derive(Debug, Validate)]
struct ChatInput {
    #[validate(length(min = 1, max = 2000))]
    message: String,
    #[validate(length(max = 100))]
    history: Vec<ChatMessage>,
}

pub struct AssistantService;

impl AssistantService {
    pub async fn suggest_meal(
        state: &AppState,
        user_id: Uuid,
        req: SuggestMealRequest,
    ) -> Result<Meal, ApiError> {
        let input = SuggestionInput {
            meal_type: req.meal_type.trim().to_string(),
            prompt: req.prompt.filter(|p| !p.trim().is_empty()),
        };
        input.validate().map_err(invalid_input)?;

        let locale = state.locale();
        let profile = ProfileService::require(state.db(), user_id, locale).await?;
        let target = profile.target_calories_or(state.config().session.fallback_target_calories);
        let ctx = PromptContext::new(profile, target);

        state
            .generator()
            .suggest_meal(&ctx, &input.meal_type, input.prompt.as_deref())
            .await
            .map_err(|_| ApiError::generation(Message::SuggestionFailed, locale))
    }

    /// Malformed image data fails before any model call
    pub async fn analyze_image(state: &AppState, req: AnalyzeImageRequest) -> Result<Meal, ApiError> {
        let locale = state.locale();
        let image = InlineImage::parse(&req.image).map_err(|_| ApiError::Validation {
            field: Some("image".to_string()),
            message: locale.text(Message::ImageAnalysisFailed).to_string(),
        })?;

        state
            .generator()
            .analyze_image(&image)
            .await
            .map_err(|_| ApiError::generation(Message::ImageAnalysisFailed, locale))
    }

    /// An empty model reply becomes a canned apology rather than an error
    pub async fn chat(state: &AppState, user_id: Uuid, req: ChatRequest) -> Result<ChatResponse, ApiError> {
        let input = ChatInput {
            message: req.message.trim().to_string(),
            history: req.history,
        };
        input.validate().map_err(invalid_input)?;

        let locale = state.locale();
        let profile = ProfileService::require(state.db(), user_id, locale).await?;
        let target = profile.target_calories_or(state.config().session.fallback_target_calories);
        let ctx = PromptContext::new(profile, target);

        let reply = state
            .generator()
            .chat(&ctx, &input.history, &input.message)
            .await
            .map_err(|_| ApiError::generation(Message::ChatUnavailable, locale))?;

        Ok(ChatResponse {
            reply: non_empty_reply(reply, locale),
        })
    }
}

fn non_empty_reply(reply: String, locale: Locale) -> String {
    if reply.trim().is_empty() {
        warn!("Model returned an empty chat reply");
        locale.text(Message::ChatEmptyReply).to_string()
    } else {
        reply
    }
}

fn invalid_input(errors: ValidationErrors) -> ApiError {
    let field = errors.field_errors().keys().next().map(|f| f.to_string());
    ApiError::Validation {
        field,
        message: errors.to_string(),
    }
}
