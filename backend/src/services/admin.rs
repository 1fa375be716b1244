//! Admin console operations

use crate::error::ApiError;
use crate::repositories::{FavoriteRepository, HistoryRepository, ProfileRepository};
use crate::state::AppState;
use foodbuddy_shared::validation::validate_text;
use foodbuddy_shared::{AdminStats, AdminUserList, RoleResponse};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

const MAX_GOAL_LEN: usize = 200;

pub struct AdminService;

impl AdminService {
    pub async fn stats(pool: &PgPool) -> Result<AdminStats, ApiError> {
        let (users, meal_plans, favorites) = tokio::try_join!(
            ProfileRepository::count(pool),
            HistoryRepository::count(pool),
            FavoriteRepository::count(pool),
        )?;

        Ok(AdminStats {
            users,
            meal_plans,
            favorites,
        })
    }

    /// Newest accounts first
    pub async fn list_users(pool: &PgPool) -> Result<AdminUserList, ApiError> {
        let users: Vec<_> = ProfileRepository::list_all(pool)
            .await?
            .iter()
            .map(|record| record.to_summary())
            .collect();

        Ok(AdminUserList {
            total: users.len(),
            users,
        })
    }

    /// Removes the profile row and any cached session state. The account
    /// itself stays.
    pub async fn delete_user(state: &AppState, admin_id: Uuid, user_id: Uuid) -> Result<(), ApiError> {
        if admin_id == user_id {
            return Err(ApiError::BadRequest("Admins cannot delete themselves".to_string()));
        }

        if !ProfileRepository::delete(state.db(), user_id).await? {
            return Err(ApiError::NotFound("User not found".to_string()));
        }
        state.sessions().remove(user_id).await;

        info!(%admin_id, %user_id, "User profile deleted by admin");
        Ok(())
    }

    /// Flip between user and admin
    pub async fn toggle_role(pool: &PgPool, admin_id: Uuid, user_id: Uuid) -> Result<RoleResponse, ApiError> {
        if admin_id == user_id {
            return Err(ApiError::BadRequest("Admins cannot change their own role".to_string()));
        }

        let current = ProfileRepository::role_of(pool, user_id).await?;
        let role = current.toggled();
        if !ProfileRepository::set_role(pool, user_id, role).await? {
            return Err(ApiError::NotFound("User not found".to_string()));
        }

        info!(%admin_id, %user_id, role = role.as_str(), "User role changed");
        Ok(RoleResponse { id: user_id, role })
    }

    pub async fn update_goal(state: &AppState, user_id: Uuid, goal: &str) -> Result<(), ApiError> {
        let goal = goal.trim();
        validate_text("goal", goal, MAX_GOAL_LEN).map_err(|e| ApiError::validation(&e, state.locale()))?;

        if !ProfileRepository::update_goal(state.db(), user_id, goal).await? {
            return Err(ApiError::NotFound("User not found".to_string()));
        }
        // The user's cached plan target may no longer match
        state.sessions().remove(user_id).await;
        Ok(())
    }
}
