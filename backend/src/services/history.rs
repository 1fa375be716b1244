//! Meal history: confirmed plans, newest first

use crate::error::ApiError;
use crate::repositories::HistoryRepository;
use crate::state::AppState;
use chrono::{NaiveDate, Utc};
use foodbuddy_shared::history::{feed, record_local};
use foodbuddy_shared::{DayPlan, HistoryItem};
use uuid::Uuid;

pub struct HistoryService;

impl HistoryService {
    /// The user's history, loaded once per session and then kept in step
    /// with confirmations
    pub async fn items(state: &AppState, user_id: Uuid) -> anyhow::Result<Vec<HistoryItem>> {
        let cached = state
            .sessions()
            .inspect(user_id, |s| s.and_then(|s| s.history.clone()))
            .await;
        if let Some(items) = cached {
            return Ok(items);
        }

        let loaded = HistoryRepository::list_by_user(state.db(), user_id).await?;
        let items = state
            .sessions()
            .with_session(user_id, |s| s.history.get_or_insert(loaded).clone())
            .await;
        Ok(items)
    }

    /// Display order: confirmation time, newest first
    pub async fn feed(state: &AppState, user_id: Uuid) -> Result<Vec<HistoryItem>, ApiError> {
        let items = Self::items(state, user_id).await?;
        Ok(feed(&items))
    }

    /// Store a confirmed plan, replacing any earlier entry for the same day
    pub async fn record(
        state: &AppState,
        user_id: Uuid,
        date: NaiveDate,
        plan: &DayPlan,
    ) -> anyhow::Result<HistoryItem> {
        let timestamp = Utc::now().timestamp_millis();
        let item = HistoryRepository::replace_for_date(state.db(), user_id, date, timestamp, plan).await?;

        let local = item.clone();
        state
            .sessions()
            .with_session(user_id, |s| {
                if let Some(history) = s.history.as_mut() {
                    record_local(history, local);
                }
            })
            .await;

        Ok(item)
    }
}
