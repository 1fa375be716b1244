//! Meal history repository

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use foodbuddy_shared::{DayPlan, HistoryItem};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct HistoryRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub timestamp: i64,
    pub plan: Json<DayPlan>,
    pub created_at: DateTime<Utc>,
}

impl From<HistoryRecord> for HistoryItem {
    fn from(record: HistoryRecord) -> Self {
        HistoryItem {
            id: record.id,
            date: record.date,
            timestamp: record.timestamp,
            plan: record.plan.0,
        }
    }
}

pub struct HistoryRepository;

impl HistoryRepository {
    /// Newest rows first
    pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<HistoryItem>> {
        let records = sqlx::query_as::<_, HistoryRecord>(
            r#"
            SELECT id, user_id, date, timestamp, plan, created_at
            FROM meal_history
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(records.into_iter().map(HistoryItem::from).collect())
    }

    /// Delete any rows for (user, date) then insert, in one transaction
    pub async fn replace_for_date(
        pool: &PgPool,
        user_id: Uuid,
        date: NaiveDate,
        timestamp: i64,
        plan: &DayPlan,
    ) -> Result<HistoryItem> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM meal_history WHERE user_id = $1 AND date = $2")
            .bind(user_id)
            .bind(date)
            .execute(&mut *tx)
            .await?;

        let record = sqlx::query_as::<_, HistoryRecord>(
            r#"
            INSERT INTO meal_history (user_id, date, timestamp, plan)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, date, timestamp, plan, created_at
            "#,
        )
        .bind(user_id)
        .bind(date)
        .bind(timestamp)
        .bind(Json(plan))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(record.into())
    }

    pub async fn count_for_date(pool: &PgPool, user_id: Uuid, date: NaiveDate) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM meal_history WHERE user_id = $1 AND date = $2")
                .bind(user_id)
                .bind(date)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }

    pub async fn count(pool: &PgPool) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM meal_history")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
