//! Meal suggestion, photo analysis and chat routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::AssistantService;
use crate::state::AppState;
use axum::{
    extract::{DefaultBodyLimit, State},
    routing::post,
    Json, Router,
};
use foodbuddy_shared::{AnalyzeImageRequest, ChatRequest, ChatResponse, Meal, SuggestMealRequest};

/// Photos arrive as base64 inside JSON, so `/analyze` gets its own body limit
pub fn meal_routes(max_image_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/suggest", post(suggest))
        .route(
            "/analyze",
            post(analyze).layer(DefaultBodyLimit::max(max_image_bytes)),
        )
}

/// POST /api/v1/meals/suggest
async fn suggest(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<SuggestMealRequest>,
) -> ApiResult<Json<Meal>> {
    let meal = AssistantService::suggest_meal(&state, auth.user_id, req).await?;
    Ok(Json(meal))
}

/// POST /api/v1/meals/analyze
///
/// Accepts raw base64 or a data URL. The result is not stored.
async fn analyze(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(req): Json<AnalyzeImageRequest>,
) -> ApiResult<Json<Meal>> {
    let meal = AssistantService::analyze_image(&state, req).await?;
    Ok(Json(meal))
}

/// POST /api/v1/chat
pub async fn chat(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<ChatRequest>,
) -> ApiResult<Json<ChatResponse>> {
    let reply = AssistantService::chat(&state, auth.user_id, req).await?;
    Ok(Json(reply))
}
