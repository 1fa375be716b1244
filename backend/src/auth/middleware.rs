//! Request extractors for authenticated and admin users

use crate::error::ApiError;
use crate::repositories::ProfileRepository;
use crate::state::AppState;
use axum::{
    extract::FromRef,
    http::{header::AUTHORIZATION, request::Parts},
};
use foodbuddy_shared::Role;
use tracing::warn;
use uuid::Uuid;

/// Authenticated user extracted from the bearer token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
}

fn bearer_token(parts: &Parts) -> Result<&str, ApiError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("Invalid authorization format".to_string()))
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let token = bearer_token(parts)?;

        let claims = app_state
            .jwt()
            .validate_access_token(token)
            .map_err(|e| ApiError::Unauthorized(e.to_string()))?;
        let user_id = claims
            .user_id()
            .map_err(|e| ApiError::Unauthorized(e.to_string()))?;

        Ok(AuthUser { user_id })
    }
}

/// Authenticated user whose stored role is admin.
///
/// The role is read from the database on every request so a demotion takes
/// effect without waiting for token expiry.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub user_id: Uuid,
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AdminUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser { user_id } = AuthUser::from_request_parts(parts, state).await?;
        let app_state = AppState::from_ref(state);

        let role = ProfileRepository::role_of(app_state.db(), user_id).await?;
        if role != Role::Admin {
            warn!(%user_id, "Non-admin attempted admin access");
            return Err(ApiError::Forbidden("Admin access required".to_string()));
        }

        Ok(AdminUser { user_id })
    }
}
