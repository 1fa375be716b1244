//! Favorite meals with optimistic toggling
//!
//! A toggle flips the in-memory set and answers right away; the database
//! write happens in a spawned task. If that write fails the local state is
//! not rolled back, it is only logged, and the next session load reconciles
//! with the store.

use crate::error::ApiError;
use crate::repositories::FavoriteRepository;
use crate::state::AppState;
use foodbuddy_shared::favorites::first_by_name;
use foodbuddy_shared::{FavoriteChange, FavoriteSet, FavoriteToggleResponse, Meal};
use sqlx::PgPool;
use tracing::{debug, error};
use uuid::Uuid;

pub struct FavoritesService;

impl FavoritesService {
    /// Current favorites, hydrating from the store on first use
    pub async fn list(state: &AppState, user_id: Uuid) -> anyhow::Result<Vec<Meal>> {
        let cached = state
            .sessions()
            .inspect(user_id, |s| {
                s.and_then(|s| s.favorites.as_ref())
                    .map(|set| set.meals().to_vec())
            })
            .await;
        if let Some(meals) = cached {
            return Ok(meals);
        }

        let records = FavoriteRepository::list_by_user(state.db(), user_id).await?;
        let loaded = FavoriteSet::from_meals(records.into_iter().map(|r| r.meal.0).collect());
        let meals = state
            .sessions()
            .with_session(user_id, |s| s.favorites.get_or_insert(loaded).meals().to_vec())
            .await;
        Ok(meals)
    }

    pub async fn toggle(
        state: &AppState,
        user_id: Uuid,
        meal: Meal,
    ) -> Result<FavoriteToggleResponse, ApiError> {
        Self::list(state, user_id).await?;

        let (change, favorites) = state
            .sessions()
            .with_session(user_id, |s| {
                let set = s.favorites.get_or_insert_with(FavoriteSet::default);
                let change = set.toggle(meal);
                (change, set.meals().to_vec())
            })
            .await;

        metrics::counter!("favorite_toggles_total", "action" => change.label()).increment(1);
        let favorite = change.is_favorite();
        spawn_persist(state.db().clone(), user_id, change);

        Ok(FavoriteToggleResponse {
            favorite,
            favorites,
        })
    }
}

fn spawn_persist(pool: PgPool, user_id: Uuid, change: FavoriteChange) {
    tokio::spawn(async move {
        let action = change.label();
        match persist(&pool, user_id, change).await {
            Ok(()) => debug!(%user_id, action, "Favorite change persisted"),
            Err(err) => error!(%user_id, action, error = ?err, "Failed to persist favorite change"),
        }
    });
}

async fn persist(pool: &PgPool, user_id: Uuid, change: FavoriteChange) -> anyhow::Result<()> {
    match change {
        FavoriteChange::Added { meal } => {
            FavoriteRepository::insert(pool, user_id, &meal).await?;
        }
        FavoriteChange::Removed { name } => {
            let rows = FavoriteRepository::list_by_user(pool, user_id).await?;
            if let Some(row) = first_by_name(&rows, &name, |r| &r.meal.0) {
                FavoriteRepository::delete_by_id(pool, user_id, row.id).await?;
            }
        }
    }
    Ok(())
}
