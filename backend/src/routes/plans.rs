//! Daily and weekly plan routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::PlannerService;
use crate::state::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use foodbuddy_shared::{PlanView, WeeklyPlan};

pub fn plan_routes() -> Router<AppState> {
    Router::new()
        .route("/today", get(today))
        .route("/today/regenerate", post(regenerate))
        .route("/today/confirm", post(confirm))
        .route("/weekly", post(weekly))
}

/// GET /api/v1/plans/today
///
/// Generates a draft when the day has no plan yet. A generation failure is
/// reported in the view's `error` field.
async fn today(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<PlanView>> {
    Ok(Json(PlannerService::today(&state, auth.user_id).await?))
}

/// POST /api/v1/plans/today/regenerate
async fn regenerate(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<PlanView>> {
    Ok(Json(PlannerService::regenerate(&state, auth.user_id).await?))
}

/// POST /api/v1/plans/today/confirm
async fn confirm(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<PlanView>> {
    Ok(Json(PlannerService::confirm(&state, auth.user_id).await?))
}

/// POST /api/v1/plans/weekly
async fn weekly(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<WeeklyPlan>> {
    Ok(Json(PlannerService::weekly(&state, auth.user_id).await?))
}
