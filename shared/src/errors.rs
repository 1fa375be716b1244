//! Domain error types shared by the backend and WASM crates

use thiserror::Error;

use crate::validation::ValidationError;

/// Daily plan lifecycle errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("today's plan is already confirmed")]
    AlreadyConfirmed,

    #[error("there is no plan to confirm")]
    NothingToConfirm,

    #[error("weekly plan must contain {expected} days, got {actual}")]
    WeekLength { expected: usize, actual: usize },
}

/// Onboarding and profile errors
#[derive(Error, Debug, Clone)]
pub enum ProfileError {
    #[error("missing required fields: {}", .0.join(", "))]
    Incomplete(Vec<&'static str>),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}
