//! Admin console routes. Every handler requires the admin role.

use crate::auth::AdminUser;
use crate::error::ApiResult;
use crate::services::AdminService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use foodbuddy_shared::{AdminStats, AdminUserList, RoleResponse, UpdateGoalRequest};
use uuid::Uuid;

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(stats))
        .route("/users", get(list_users))
        .route("/users/:id", delete(delete_user))
        .route("/users/:id/role", post(toggle_role))
        .route("/users/:id/goal", put(update_goal))
}

/// GET /api/v1/admin/stats
async fn stats(State(state): State<AppState>, _admin: AdminUser) -> ApiResult<Json<AdminStats>> {
    Ok(Json(AdminService::stats(state.db()).await?))
}

/// GET /api/v1/admin/users
async fn list_users(State(state): State<AppState>, _admin: AdminUser) -> ApiResult<Json<AdminUserList>> {
    Ok(Json(AdminService::list_users(state.db()).await?))
}

/// DELETE /api/v1/admin/users/:id
async fn delete_user(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(user_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    AdminService::delete_user(&state, admin.user_id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/admin/users/:id/role
async fn toggle_role(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<RoleResponse>> {
    Ok(Json(AdminService::toggle_role(state.db(), admin.user_id, user_id).await?))
}

/// PUT /api/v1/admin/users/:id/goal
async fn update_goal(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(user_id): Path<Uuid>,
    Json(req): Json<UpdateGoalRequest>,
) -> ApiResult<StatusCode> {
    AdminService::update_goal(&state, user_id, &req.goal).await?;
    Ok(StatusCode::NO_CONTENT)
}
