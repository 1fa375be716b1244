//! Application error handling
//!
//! This module provides unified error handling for the API,
//! converting internal errors to appropriate HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use foodbuddy_shared::validation::ValidationError;
use foodbuddy_shared::{ErrorDetail, ErrorResponse, Locale, Message, PlanError, ProfileError};
use thiserror::Error;
use tracing::error;

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {message}")]
    Validation {
        field: Option<String>,
        message: String,
    },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// The generative model failed after all retries; message is user-facing
    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn validation(err: &ValidationError, locale: Locale) -> Self {
        ApiError::Validation {
            field: Some(err.field.clone()),
            message: err.localized(locale),
        }
    }

    pub fn profile(err: ProfileError, locale: Locale) -> Self {
        match err {
            ProfileError::Invalid(err) => Self::validation(&err, locale),
            ProfileError::Incomplete(fields) => ApiError::Validation {
                field: fields.first().map(|f| f.to_string()),
                message: err_incomplete(&fields, locale),
            },
        }
    }

    pub fn plan(err: PlanError, locale: Locale) -> Self {
        match err {
            PlanError::AlreadyConfirmed => {
                ApiError::Conflict(locale.text(Message::PlanAlreadyConfirmed).to_string())
            }
            PlanError::NothingToConfirm => {
                ApiError::Conflict(locale.text(Message::NothingToConfirm).to_string())
            }
            PlanError::WeekLength { .. } => {
                ApiError::Generation(locale.text(Message::PlanGenerationFailed).to_string())
            }
        }
    }

    pub fn generation(message: Message, locale: Locale) -> Self {
        ApiError::Generation(locale.text(message).to_string())
    }
}

fn err_incomplete(fields: &[&'static str], locale: Locale) -> String {
    match locale {
        Locale::Th => locale.text(Message::ProfileRequired).to_string(),
        Locale::En => format!(
            "Missing required fields: {}",
            foodbuddy_shared::validation::get_missing_fields_labels(fields).join(", ")
        ),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, field) = match self {
            ApiError::Validation { field, message } => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message, field)
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg, None),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg, None),
            ApiError::Generation(msg) => (StatusCode::BAD_GATEWAY, "GENERATION_FAILED", msg, None),
            ApiError::Internal(err) => {
                error!("Internal error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
            ApiError::Database(err) => {
                error!("Database error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                field,
            },
        });

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
