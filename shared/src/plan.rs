//! Daily plan lifecycle
//!
//! A day starts `Absent`, becomes a `Draft` once a generated plan lands and
//! turns `Confirmed` when the user saves it. A confirmed day is locked: no
//! regeneration, no second confirmation.
//!
//! Generation is asynchronous. `begin_generation` hands out a ticket and the
//! result is applied only if that ticket is still current, so a response
//! arriving after the user moved on (confirmed, regenerated again, or rolled
//! over to a new day) is dropped. A generation that never reports back (its
//! task was lost) stops blocking the automatic one after
//! [`GENERATION_STALE_AFTER_SECS`].

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::PlanError;
use crate::history::find_for_date;
use crate::meal::{DayPlan, HistoryItem};

/// Longer than a fully retried model call
pub const GENERATION_STALE_AFTER_SECS: i64 = 300;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "plan", rename_all = "snake_case")]
pub enum PlanState {
    Absent,
    Draft(DayPlan),
    Confirmed(DayPlan),
}

impl PlanState {
    pub fn status(&self) -> PlanStatus {
        match self {
            PlanState::Absent => PlanStatus::Absent,
            PlanState::Draft(_) => PlanStatus::Draft,
            PlanState::Confirmed(_) => PlanStatus::Confirmed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    Absent,
    Draft,
    Confirmed,
}

/// Proof that a generation was started against a particular planner state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationTicket {
    date: NaiveDate,
    epoch: u64,
}

impl GenerationTicket {
    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyPlanner {
    date: NaiveDate,
    state: PlanState,
    epoch: u64,
    /// Start of the in-flight generation
    generating_since: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

impl DailyPlanner {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            state: PlanState::Absent,
            epoch: 0,
            generating_since: None,
            last_error: None,
        }
    }

    /// Start from stored history: a saved entry for `date` means the day is
    /// already confirmed.
    pub fn hydrate(date: NaiveDate, history: &[HistoryItem]) -> Self {
        let mut planner = Self::new(date);
        if let Some(item) = find_for_date(history, date) {
            planner.state = PlanState::Confirmed(item.plan.clone());
        }
        planner
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn state(&self) -> &PlanState {
        &self.state
    }

    pub fn plan(&self) -> Option<&DayPlan> {
        match &self.state {
            PlanState::Absent => None,
            PlanState::Draft(plan) | PlanState::Confirmed(plan) => Some(plan),
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self.state, PlanState::Confirmed(_))
    }

    pub fn is_generating(&self) -> bool {
        self.generating_since.is_some()
    }

    /// Localized message from the latest failed generation
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Absent days generate automatically on first view, and again once an
    /// earlier generation has gone quiet for too long
    pub fn needs_generation(&self, now: DateTime<Utc>) -> bool {
        if !matches!(self.state, PlanState::Absent) {
            return false;
        }
        match self.generating_since {
            None => true,
            Some(started) => now - started >= Duration::seconds(GENERATION_STALE_AFTER_SECS),
        }
    }

    pub fn begin_generation(&mut self, now: DateTime<Utc>) -> Result<GenerationTicket, PlanError> {
        if self.is_confirmed() {
            return Err(PlanError::AlreadyConfirmed);
        }
        self.epoch += 1;
        self.generating_since = Some(now);
        self.last_error = None;
        Ok(GenerationTicket {
            date: self.date,
            epoch: self.epoch,
        })
    }

    fn is_current(&self, ticket: &GenerationTicket) -> bool {
        ticket.date == self.date && ticket.epoch == self.epoch && !self.is_confirmed()
    }

    /// Install a generated plan as the new draft. Returns false for stale tickets.
    pub fn apply_generated(&mut self, ticket: GenerationTicket, plan: DayPlan) -> bool {
        if !self.is_current(&ticket) {
            return false;
        }
        self.state = PlanState::Draft(plan);
        self.generating_since = None;
        self.last_error = None;
        true
    }

    /// Close a failed generation. The current plan, if any, stays.
    pub fn generation_failed(&mut self, ticket: GenerationTicket, message: impl Into<String>) -> bool {
        if !self.is_current(&ticket) {
            return false;
        }
        self.generating_since = None;
        self.last_error = Some(message.into());
        true
    }

    /// Lock the draft and return it for persistence
    pub fn confirm(&mut self) -> Result<DayPlan, PlanError> {
        match &self.state {
            PlanState::Absent => Err(PlanError::NothingToConfirm),
            PlanState::Confirmed(_) => Err(PlanError::AlreadyConfirmed),
            PlanState::Draft(plan) => {
                let plan = plan.clone();
                self.state = PlanState::Confirmed(plan.clone());
                self.epoch += 1;
                self.generating_since = None;
                self.last_error = None;
                Ok(plan)
            }
        }
    }

    /// Move to a new calendar day. Returns true when the date changed.
    pub fn roll_over(&mut self, today: NaiveDate) -> bool {
        if today == self.date {
            return false;
        }
        self.date = today;
        self.state = PlanState::Absent;
        self.epoch += 1;
        self.generating_since = None;
        self.last_error = None;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meal::fixtures::day_plan;
    use proptest::prelude::*;
    use uuid::Uuid;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn at() -> DateTime<Utc> {
        day(1).and_hms_opt(7, 0, 0).unwrap().and_utc()
    }

    #[test]
    fn test_new_planner_is_absent_and_needs_generation() {
        let planner = DailyPlanner::new(day(1));
        assert_eq!(planner.state().status(), PlanStatus::Absent);
        assert!(planner.needs_generation(at()));
        assert!(planner.plan().is_none());
    }

    #[test]
    fn test_hydrate_locks_day_with_history() {
        let history = vec![HistoryItem {
            id: Uuid::new_v4(),
            date: day(1),
            timestamp: 1_709_251_200_000,
            plan: day_plan("Friday"),
        }];
        let mut planner = DailyPlanner::hydrate(day(1), &history);
        assert!(planner.is_confirmed());
        assert_eq!(planner.begin_generation(at()), Err(PlanError::AlreadyConfirmed));

        let other_day = DailyPlanner::hydrate(day(2), &history);
        assert_eq!(other_day.state().status(), PlanStatus::Absent);
    }

    #[test]
    fn test_generation_then_confirm() {
        let mut planner = DailyPlanner::new(day(1));
        let ticket = planner.begin_generation(at()).unwrap();
        assert!(planner.is_generating());
        assert!(planner.apply_generated(ticket, day_plan("Friday")));
        assert_eq!(planner.state().status(), PlanStatus::Draft);

        let saved = planner.confirm().unwrap();
        assert_eq!(saved.day, "Friday");
        assert!(planner.is_confirmed());
        assert_eq!(planner.confirm(), Err(PlanError::AlreadyConfirmed));
    }

    #[test]
    fn test_unanswered_generation_blocks_until_stale() {
        let mut planner = DailyPlanner::new(day(1));
        let lost = planner.begin_generation(at()).unwrap();
        assert!(!planner.needs_generation(at() + Duration::seconds(60)));

        let later = at() + Duration::seconds(GENERATION_STALE_AFTER_SECS);
        assert!(planner.needs_generation(later));

        let fresh = planner.begin_generation(later).unwrap();
        assert!(!planner.needs_generation(later));
        assert!(!planner.apply_generated(lost, day_plan("Lost")));
        assert!(planner.apply_generated(fresh, day_plan("Fresh")));
        assert!(!planner.needs_generation(later + Duration::seconds(GENERATION_STALE_AFTER_SECS)));
    }

    #[test]
    fn test_confirm_without_plan_fails() {
        let mut planner = DailyPlanner::new(day(1));
        assert_eq!(planner.confirm(), Err(PlanError::NothingToConfirm));
    }

    #[test]
    fn test_failed_regeneration_keeps_previous_draft() {
        let mut planner = DailyPlanner::new(day(1));
        let first = planner.begin_generation(at()).unwrap();
        planner.apply_generated(first, day_plan("Friday"));

        let second = planner.begin_generation(at()).unwrap();
        assert!(planner.generation_failed(second, "boom"));
        assert_eq!(planner.plan().map(|p| p.day.as_str()), Some("Friday"));
        assert_eq!(planner.last_error(), Some("boom"));
        assert!(!planner.is_generating());

        let third = planner.begin_generation(at()).unwrap();
        assert_eq!(planner.last_error(), None);
        planner.apply_generated(third, day_plan("Saturday"));
        assert_eq!(planner.plan().map(|p| p.day.as_str()), Some("Saturday"));
    }

    #[test]
    fn test_stale_result_after_confirm_is_dropped() {
        let mut planner = DailyPlanner::new(day(1));
        let first = planner.begin_generation(at()).unwrap();
        planner.apply_generated(first, day_plan("Friday"));

        let late = planner.begin_generation(at()).unwrap();
        planner.confirm().unwrap();

        assert!(!planner.apply_generated(late, day_plan("Replacement")));
        assert_eq!(planner.plan().map(|p| p.day.as_str()), Some("Friday"));
        assert!(planner.is_confirmed());
    }

    #[test]
    fn test_superseded_ticket_is_dropped() {
        let mut planner = DailyPlanner::new(day(1));
        let old = planner.begin_generation(at()).unwrap();
        let new = planner.begin_generation(at()).unwrap();
        assert!(planner.apply_generated(new, day_plan("Newest")));
        assert!(!planner.apply_generated(old, day_plan("Older")));
        assert_eq!(planner.plan().map(|p| p.day.as_str()), Some("Newest"));
    }

    #[test]
    fn test_roll_over_resets_and_invalidates() {
        let mut planner = DailyPlanner::new(day(1));
        let ticket = planner.begin_generation(at()).unwrap();
        assert!(!planner.roll_over(day(1)));
        assert!(planner.roll_over(day(2)));
        assert_eq!(planner.date(), day(2));
        assert!(!planner.apply_generated(ticket, day_plan("Yesterday")));
        assert_eq!(planner.state().status(), PlanStatus::Absent);
    }

    #[test]
    fn test_state_serializes_with_status_tag() {
        let value = serde_json::to_value(PlanState::Absent).unwrap();
        assert_eq!(value["status"], "absent");
        let value = serde_json::to_value(PlanState::Draft(day_plan("Friday"))).unwrap();
        assert_eq!(value["status"], "draft");
        assert_eq!(value["plan"]["day"], "Friday");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: once confirmed, no sequence of operations changes the plan
        #[test]
        fn prop_confirmed_plan_is_locked(ops in proptest::collection::vec(0u8..4, 0..20)) {
            let mut planner = DailyPlanner::new(day(1));
            let ticket = planner.begin_generation(at()).unwrap();
            planner.apply_generated(ticket, day_plan("Locked"));
            planner.confirm().unwrap();

            for op in ops {
                match op {
                    0 => { let _ = planner.begin_generation(at()); }
                    1 => { let _ = planner.confirm(); }
                    2 => {
                        if let Ok(t) = planner.begin_generation(at()) {
                            planner.apply_generated(t, day_plan("Other"));
                        }
                    }
                    _ => { let _ = planner.roll_over(day(1)); }
                }
            }
            prop_assert!(planner.is_confirmed());
            prop_assert_eq!(planner.plan().map(|p| p.day.clone()), Some("Locked".to_string()));
        }
    }
}
