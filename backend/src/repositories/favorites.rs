//! Favorite meals repository

use anyhow::Result;
use chrono::{DateTime, Utc};
use foodbuddy_shared::Meal;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FavoriteRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub meal: Json<Meal>,
    pub created_at: DateTime<Utc>,
}

pub struct FavoriteRepository;

impl FavoriteRepository {
    pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<FavoriteRecord>> {
        let records = sqlx::query_as::<_, FavoriteRecord>(
            r#"
            SELECT id, user_id, meal, created_at
            FROM favorites
            WHERE user_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    pub async fn insert(pool: &PgPool, user_id: Uuid, meal: &Meal) -> Result<FavoriteRecord> {
        let record = sqlx::query_as::<_, FavoriteRecord>(
            r#"
            INSERT INTO favorites (user_id, meal)
            VALUES ($1, $2)
            RETURNING id, user_id, meal, created_at
            "#,
        )
        .bind(user_id)
        .bind(Json(meal))
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Scoped to the owner so a stale id cannot remove another user's row
    pub async fn delete_by_id(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM favorites WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &PgPool) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM favorites")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
