//! Profile service - onboarding, session bootstrap and energy figures

use crate::error::ApiError;
use crate::repositories::{ProfileRepository, UserRepository};
use crate::state::AppState;
use foodbuddy_shared::{
    calculate_bmi_result, EnergyResponse, Locale, Message, ProfileDraft, Role, SessionResponse,
    SessionStatus, UserProfile,
};
use sqlx::PgPool;
use tracing::{error, info, warn};
use uuid::Uuid;

pub struct ProfileService;

impl ProfileService {
    /// Decide where a signed-in user lands.
    ///
    /// The lookup is bounded by the bootstrap timeout; a slow or failing
    /// store yields the `error` state rather than `needs_onboarding`, so a
    /// transient outage never sends an existing user back through onboarding.
    pub async fn session(state: &AppState, user_id: Uuid) -> SessionResponse {
        let locale = state.locale();
        let timeout = state.config().session.bootstrap_timeout();

        match tokio::time::timeout(timeout, ProfileRepository::find(state.db(), user_id)).await {
            Ok(Ok(Some(record))) => {
                let role = record.role();
                match record.to_profile() {
                    Some(profile) => SessionResponse {
                        status: SessionStatus::Ready,
                        role,
                        profile: Some(profile),
                        message: None,
                    },
                    None => needs_onboarding(role),
                }
            }
            Ok(Ok(None)) => needs_onboarding(Role::User),
            Ok(Err(err)) => {
                error!(%user_id, error = ?err, "Profile fetch failed during bootstrap");
                session_error(locale)
            }
            Err(_) => {
                warn!(%user_id, timeout_secs = timeout.as_secs(), "Profile fetch timed out during bootstrap");
                session_error(locale)
            }
        }
    }

    /// Complete profile, or `None` while onboarding is unfinished
    pub async fn load(pool: &PgPool, user_id: Uuid) -> anyhow::Result<Option<UserProfile>> {
        let record = ProfileRepository::find(pool, user_id).await?;
        Ok(record.and_then(|r| r.to_profile()))
    }

    /// Like [`load`](Self::load) but an unfinished profile is an error
    pub async fn require(pool: &PgPool, user_id: Uuid, locale: Locale) -> Result<UserProfile, ApiError> {
        Self::load(pool, user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(locale.text(Message::ProfileRequired).to_string()))
    }

    /// Validate the onboarding answers, cache BMR/TDEE and store them
    pub async fn save(
        pool: &PgPool,
        user_id: Uuid,
        locale: Locale,
        draft: ProfileDraft,
    ) -> Result<UserProfile, ApiError> {
        let email = UserRepository::find_by_id(pool, user_id)
            .await?
            .map(|user| user.email);

        let profile = draft
            .into_profile(email)
            .map_err(|e| ApiError::profile(e, locale))?;

        let record = ProfileRepository::upsert(pool, user_id, &profile).await?;
        info!(%user_id, bmr = ?profile.bmr, tdee = ?profile.tdee, "Profile saved");

        Ok(record.to_profile().unwrap_or(profile))
    }

    pub async fn energy(pool: &PgPool, user_id: Uuid, locale: Locale) -> Result<EnergyResponse, ApiError> {
        let profile = Self::require(pool, user_id, locale).await?;
        Ok(energy_response(&profile))
    }
}

fn needs_onboarding(role: Role) -> SessionResponse {
    SessionResponse {
        status: SessionStatus::NeedsOnboarding,
        role,
        profile: None,
        message: None,
    }
}

fn session_error(locale: Locale) -> SessionResponse {
    SessionResponse {
        status: SessionStatus::Error,
        role: Role::User,
        profile: None,
        message: Some(locale.text(Message::ProfileUnavailable).to_string()),
    }
}

pub fn energy_response(profile: &UserProfile) -> EnergyResponse {
    let summary = profile.energy();
    EnergyResponse {
        bmr: summary.bmr,
        tdee: summary.tdee,
        target_calories: summary.target_calories,
        meal_ceiling: summary.meal_ceiling,
        bmi: calculate_bmi_result(profile.weight_kg, profile.height_cm),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foodbuddy_shared::{ActivitySelection, BmiCategory, Gender, Goal, GoalSelection};

    fn draft() -> ProfileDraft {
        ProfileDraft {
            name: Some("Somchai".to_string()),
            age: Some(30),
            gender: Some(Gender::Male),
            height_cm: Some(175.0),
            weight_kg: Some(70.0),
            activity: None,
            goal: Some(GoalSelection::Preset(Goal::GainMuscle)),
            dietary_restrictions: vec![],
        }
    }

    #[test]
    fn test_energy_response_for_profile() {
        let profile = draft().into_profile(None).unwrap();
        assert_eq!(profile.activity, ActivitySelection::Tier(foodbuddy_shared::ActivityLevel::Sedentary));

        let energy = energy_response(&profile);
        assert_eq!(energy.bmr, 1649);
        assert_eq!(energy.tdee, 1979);
        assert_eq!(energy.target_calories, 2279);
        assert_eq!(energy.meal_ceiling, 760);
        assert_eq!(energy.bmi.value, 22.9);
        assert_eq!(energy.bmi.category, BmiCategory::Normal);
    }

    #[test]
    fn test_error_state_is_distinct_from_onboarding() {
        let err = session_error(Locale::En);
        assert_eq!(err.status, SessionStatus::Error);
        assert!(err.message.is_some());

        let onboarding = needs_onboarding(Role::Admin);
        assert_eq!(onboarding.status, SessionStatus::NeedsOnboarding);
        assert_eq!(onboarding.role, Role::Admin);
        assert!(onboarding.message.is_none());
    }
}
