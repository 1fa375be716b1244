//! Session bootstrap and profile routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::ProfileService;
use crate::state::AppState;
use axum::{extract::State, routing::get, Json, Router};
use foodbuddy_shared::{EnergyResponse, ProfileDraft, SessionResponse, UserProfile};

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_profile).put(save_profile))
        .route("/energy", get(get_energy))
}

/// GET /api/v1/session
///
/// Always 200: the status field says whether the user is ready, still
/// onboarding, or whether the profile could not be determined.
pub async fn get_session(State(state): State<AppState>, auth: AuthUser) -> Json<SessionResponse> {
    Json(ProfileService::session(&state, auth.user_id).await)
}

/// GET /api/v1/profile
async fn get_profile(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<UserProfile>> {
    let profile = ProfileService::require(state.db(), auth.user_id, state.locale()).await?;
    Ok(Json(profile))
}

/// PUT /api/v1/profile
///
/// Onboarding submit. BMR and TDEE are recomputed from the answers.
async fn save_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(draft): Json<ProfileDraft>,
) -> ApiResult<Json<UserProfile>> {
    let profile = ProfileService::save(state.db(), auth.user_id, state.locale(), draft).await?;
    // Targets changed, so any cached draft is stale
    state
        .sessions()
        .with_session(auth.user_id, |s| s.planner = None)
        .await;
    Ok(Json(profile))
}

/// GET /api/v1/profile/energy
async fn get_energy(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<EnergyResponse>> {
    let energy = ProfileService::energy(state.db(), auth.user_id, state.locale()).await?;
    Ok(Json(energy))
}
