//! Profile repository
//!
//! Height and weight are stored as NUMERIC and surface as `Decimal`; the
//! domain works in `f64`.

use anyhow::Result;
use chrono::{DateTime, Utc};
use foodbuddy_shared::{
    is_complete, ActivitySelection, AdminUserSummary, Gender, GoalSelection, Role, UserProfile,
};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

const PROFILE_COLUMNS: &str = "id, email, name, age, gender, height_cm, weight_kg, \
    activity_level, custom_activity, goal, custom_goal, dietary_restrictions, \
    bmr, tdee, role, created_at, updated_at";

/// Profile record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProfileRecord {
    pub id: Uuid,
    pub email: Option<String>,
    pub name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub height_cm: Option<Decimal>,
    pub weight_kg: Option<Decimal>,
    pub activity_level: Option<String>,
    pub custom_activity: Option<String>,
    pub goal: Option<String>,
    pub custom_goal: Option<String>,
    pub dietary_restrictions: Vec<String>,
    pub bmr: Option<i32>,
    pub tdee: Option<i32>,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileRecord {
    fn age(&self) -> Option<u32> {
        self.age.and_then(|a| u32::try_from(a).ok())
    }

    fn height(&self) -> Option<f64> {
        self.height_cm.and_then(|d| d.to_f64())
    }

    fn weight(&self) -> Option<f64> {
        self.weight_kg.and_then(|d| d.to_f64())
    }

    pub fn role(&self) -> Role {
        Role::from_db(&self.role)
    }

    /// Domain profile, or `None` while onboarding is unfinished
    pub fn to_profile(&self) -> Option<UserProfile> {
        let (age, height_cm, weight_kg) = (self.age(), self.height(), self.weight());
        if !is_complete(age, height_cm, weight_kg) {
            return None;
        }

        Some(UserProfile {
            name: self.name.clone().unwrap_or_default(),
            email: self.email.clone(),
            age: age?,
            gender: self
                .gender
                .as_deref()
                .and_then(|g| g.parse().ok())
                .unwrap_or(Gender::Other),
            height_cm: height_cm?,
            weight_kg: weight_kg?,
            activity: ActivitySelection::from_columns(
                self.activity_level.as_deref(),
                self.custom_activity.as_deref(),
            ),
            goal: GoalSelection::from_columns(self.goal.as_deref(), self.custom_goal.as_deref()),
            dietary_restrictions: self.dietary_restrictions.iter().cloned().collect(),
            bmr: self.bmr,
            tdee: self.tdee,
        })
    }

    pub fn to_summary(&self) -> AdminUserSummary {
        AdminUserSummary {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
            goal: self.custom_goal.clone().or_else(|| self.goal.clone()),
            role: self.role(),
            created_at: self.created_at,
        }
    }
}

pub struct ProfileRepository;

impl ProfileRepository {
    pub async fn find(pool: &PgPool, user_id: Uuid) -> Result<Option<ProfileRecord>> {
        let record = sqlx::query_as::<_, ProfileRecord>(&format!(
            "SELECT {} FROM profiles WHERE id = $1",
            PROFILE_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Insert or overwrite the owner's answers. The role column is never touched here.
    pub async fn upsert(pool: &PgPool, user_id: Uuid, profile: &UserProfile) -> Result<ProfileRecord> {
        let restrictions: Vec<String> = profile.dietary_restrictions.iter().cloned().collect();

        let record = sqlx::query_as::<_, ProfileRecord>(&format!(
            r#"
            INSERT INTO profiles (
                id, email, name, age, gender, height_cm, weight_kg, activity_level,
                custom_activity, goal, custom_goal, dietary_restrictions, bmr, tdee
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ON CONFLICT (id) DO UPDATE SET
                email = COALESCE(EXCLUDED.email, profiles.email),
                name = EXCLUDED.name,
                age = EXCLUDED.age,
                gender = EXCLUDED.gender,
                height_cm = EXCLUDED.height_cm,
                weight_kg = EXCLUDED.weight_kg,
                activity_level = EXCLUDED.activity_level,
                custom_activity = EXCLUDED.custom_activity,
                goal = EXCLUDED.goal,
                custom_goal = EXCLUDED.custom_goal,
                dietary_restrictions = EXCLUDED.dietary_restrictions,
                bmr = EXCLUDED.bmr,
                tdee = EXCLUDED.tdee,
                updated_at = NOW()
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        ))
        .bind(user_id)
        .bind(&profile.email)
        .bind(&profile.name)
        .bind(profile.age as i32)
        .bind(profile.gender.as_str())
        .bind(Decimal::from_f64(profile.height_cm))
        .bind(Decimal::from_f64(profile.weight_kg))
        .bind(profile.activity.resolve().as_str())
        .bind(profile.activity.custom_text())
        .bind(profile.goal.resolve().as_str())
        .bind(profile.goal.custom_text())
        .bind(&restrictions)
        .bind(profile.bmr)
        .bind(profile.tdee)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Returns false when no row existed
    pub async fn delete(pool: &PgPool, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Users without a profile row are plain users
    pub async fn role_of(pool: &PgPool, user_id: Uuid) -> Result<Role> {
        let role: Option<String> = sqlx::query_scalar("SELECT role FROM profiles WHERE id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

        Ok(role.map(|r| Role::from_db(&r)).unwrap_or_default())
    }

    pub async fn set_role(pool: &PgPool, user_id: Uuid, role: Role) -> Result<bool> {
        let result = sqlx::query("UPDATE profiles SET role = $2, updated_at = NOW() WHERE id = $1")
            .bind(user_id)
            .bind(role.as_str())
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Admin override. Free text lands in the goal column as-is and is read
    /// back as a custom goal.
    pub async fn update_goal(pool: &PgPool, user_id: Uuid, goal: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE profiles
            SET goal = $2, custom_goal = NULL, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(goal)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Newest first
    pub async fn list_all(pool: &PgPool) -> Result<Vec<ProfileRecord>> {
        let records = sqlx::query_as::<_, ProfileRecord>(&format!(
            "SELECT {} FROM profiles ORDER BY created_at DESC",
            PROFILE_COLUMNS
        ))
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    pub async fn count(pool: &PgPool) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM profiles")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
