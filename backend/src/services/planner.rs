//! Today's plan and the weekly plan
//!
//! The per-user [`DailyPlanner`] lives in the session store. Generation is
//! awaited with no lock held: the planner hands out a ticket, the model call
//! runs, and the result is applied only if the ticket is still current.
//!
//! The model call runs in its own task so the ticket is always settled, even
//! when the request that started it is dropped.

use crate::error::ApiError;
use crate::generation::PromptContext;
use crate::services::{FavoritesService, HistoryService, ProfileService};
use crate::session::UserSession;
use crate::state::AppState;
use chrono::{NaiveDate, Utc};
use foodbuddy_shared::{
    DailyPlanner, DayPlan, GenerationTicket, HistoryItem, Message, PlanError, PlanView, UserProfile,
    WeeklyPlan,
};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

pub struct PlannerService;

impl PlannerService {
    /// Today's plan. An empty day starts generating a draft straight away.
    pub async fn today(state: &AppState, user_id: Uuid) -> Result<PlanView, ApiError> {
        let (profile, target) = planning_profile(state, user_id).await?;
        let history = HistoryService::items(state, user_id).await?;
        let favorites = FavoritesService::list(state, user_id).await?;
        let today = today();

        let ticket = state
            .sessions()
            .with_session(user_id, |s| {
                let now = Utc::now();
                let planner = current_planner(s, today, &history);
                if planner.needs_generation(now) {
                    planner.begin_generation(now).ok()
                } else {
                    None
                }
            })
            .await;

        if let Some(ticket) = ticket {
            let ctx = PromptContext::new(profile, target)
                .with_favorites(&favorites)
                .with_history(&history);
            Self::generate(state, user_id, ticket, ctx).await;
        }

        Self::view(state, user_id, target).await
    }

    /// Replace the draft with a fresh one. Refused once the day is confirmed.
    pub async fn regenerate(state: &AppState, user_id: Uuid) -> Result<PlanView, ApiError> {
        let locale = state.locale();
        let (profile, target) = planning_profile(state, user_id).await?;
        let history = HistoryService::items(state, user_id).await?;
        let favorites = FavoritesService::list(state, user_id).await?;
        let today = today();

        let ticket = state
            .sessions()
            .with_session(user_id, |s| {
                current_planner(s, today, &history).begin_generation(Utc::now())
            })
            .await
            .map_err(|e| ApiError::plan(e, locale))?;

        let ctx = PromptContext::new(profile, target)
            .with_favorites(&favorites)
            .with_history(&history);
        Self::generate(state, user_id, ticket, ctx).await;
        Self::view(state, user_id, target).await
    }

    /// Lock today's draft and write it to history
    pub async fn confirm(state: &AppState, user_id: Uuid) -> Result<PlanView, ApiError> {
        let locale = state.locale();
        let (_, target) = planning_profile(state, user_id).await?;
        let today = today();

        let (date, plan) = state
            .sessions()
            .with_session(user_id, |s| {
                let planner = s.planner.as_mut().ok_or(PlanError::NothingToConfirm)?;
                planner.roll_over(today);
                planner.confirm().map(|plan| (planner.date(), plan))
            })
            .await
            .map_err(|e| ApiError::plan(e, locale))?;

        let mut view = Self::view(state, user_id, target).await?;

        match HistoryService::record(state, user_id, date, &plan).await {
            Ok(item) => {
                metrics::counter!("plans_confirmed_total").increment(1);
                info!(%user_id, %date, history_id = %item.id, "Plan confirmed");
            }
            Err(err) => {
                warn!(%user_id, %date, error = ?err, "Confirmed plan could not be saved");
                view.error = Some(locale.text(Message::PlanSaveFailed).to_string());
            }
        }

        Ok(view)
    }

    /// A fresh seven-day plan. Not stored.
    pub async fn weekly(state: &AppState, user_id: Uuid) -> Result<WeeklyPlan, ApiError> {
        let (profile, target) = planning_profile(state, user_id).await?;
        let favorites = FavoritesService::list(state, user_id).await?;
        let ctx = PromptContext::new(profile, target).with_favorites(&favorites);

        state
            .generator()
            .weekly_plan(&ctx)
            .await
            .map_err(|_| ApiError::generation(Message::PlanGenerationFailed, state.locale()))
    }

    /// Runs the model call in a spawned task that settles `ticket` itself.
    /// Waiting here only delays the response until the plan is in place.
    async fn generate(state: &AppState, user_id: Uuid, ticket: GenerationTicket, ctx: PromptContext) {
        let task_state = state.clone();
        let task = tokio::spawn(async move {
            let plan = match task_state.generator().daily_plan(&ctx).await {
                Ok(plan) => Some(plan),
                Err(err) => {
                    warn!(%user_id, error = %err, "Daily plan generation failed");
                    None
                }
            };
            settle(&task_state, user_id, ticket, plan).await;
        });

        if let Err(err) = task.await {
            error!(%user_id, error = %err, "Plan generation task failed");
            settle(state, user_id, ticket, None).await;
        }
    }

    async fn view(state: &AppState, user_id: Uuid, target: i32) -> Result<PlanView, ApiError> {
        state
            .sessions()
            .inspect(user_id, |s| {
                s.and_then(|s| s.planner.as_ref())
                    .map(|planner| PlanView::from_planner(planner, target))
            })
            .await
            .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("planner missing for {}", user_id)))
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Apply a finished generation to the session if its ticket is still current.
/// `None` records the localized failure.
async fn settle(state: &AppState, user_id: Uuid, ticket: GenerationTicket, plan: Option<DayPlan>) {
    let message = state.locale().text(Message::PlanGenerationFailed);

    let applied = state
        .sessions()
        .with_session(user_id, |s| {
            let Some(planner) = s.planner.as_mut() else {
                return false;
            };
            match plan {
                Some(plan) => planner.apply_generated(ticket, plan),
                None => planner.generation_failed(ticket, message),
            }
        })
        .await;

    if !applied {
        debug!(%user_id, date = %ticket.date(), "Stale generation result dropped");
    }
}

async fn planning_profile(state: &AppState, user_id: Uuid) -> Result<(UserProfile, i32), ApiError> {
    let profile = ProfileService::require(state.db(), user_id, state.locale()).await?;
    let target = profile.target_calories_or(state.config().session.fallback_target_calories);
    Ok((profile, target))
}

/// The session's planner for `today`: hydrated from history on first use,
/// rolled over when the calendar day changed.
fn current_planner<'a>(
    session: &'a mut UserSession,
    today: NaiveDate,
    history: &[HistoryItem],
) -> &'a mut DailyPlanner {
    let planner = session
        .planner
        .get_or_insert_with(|| DailyPlanner::hydrate(today, history));
    if planner.roll_over(today) {
        *planner = DailyPlanner::hydrate(today, history);
    }
    planner
}
