//! Favorites and history routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::{FavoritesService, HistoryService};
use crate::state::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use foodbuddy_shared::{FavoriteToggleResponse, HistoryItem, Meal, ToggleFavoriteRequest};

pub fn favorite_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_favorites))
        .route("/toggle", post(toggle_favorite))
}

/// GET /api/v1/favorites
async fn list_favorites(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<Vec<Meal>>> {
    let favorites = FavoritesService::list(&state, auth.user_id).await?;
    Ok(Json(favorites))
}

/// POST /api/v1/favorites/toggle
///
/// Answers from the in-memory set; the store is written in the background.
async fn toggle_favorite(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<ToggleFavoriteRequest>,
) -> ApiResult<Json<FavoriteToggleResponse>> {
    let response = FavoritesService::toggle(&state, auth.user_id, req.meal).await?;
    Ok(Json(response))
}

/// GET /api/v1/history
pub async fn history(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<Vec<HistoryItem>>> {
    let items = HistoryService::feed(&state, auth.user_id).await?;
    Ok(Json(items))
}
