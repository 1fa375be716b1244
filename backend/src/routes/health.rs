//! Health and metrics endpoints
//!
//! - /health: process is up
//! - /health/ready: database reachable and generator configured
//! - /health/live: always OK while serving
//! - /metrics: Prometheus text exposition

use crate::{db, state::AppState, telemetry};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<HealthChecks>,
}

/// Individual health checks
#[derive(Serialize)]
pub struct HealthChecks {
    pub database: CheckStatus,
    pub generator: CheckStatus,
}

/// Status of an individual check
#[derive(Serialize)]
pub struct CheckStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Basic health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
    })
}

impl CheckStatus {
    fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            message: None,
        }
    }

    fn unhealthy(message: impl Into<String>) -> Self {
        Self {
            status: "unhealthy".to_string(),
            message: Some(message.into()),
        }
    }

    fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Readiness probe. 503 when the database is unreachable or no model API
/// key is configured.
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let database = match db::health_check(state.db()).await {
        Ok(_) => CheckStatus::healthy(),
        Err(e) => CheckStatus::unhealthy(e.to_string()),
    };
    let generator = if state.config().ai.has_api_key() {
        CheckStatus::healthy()
    } else {
        CheckStatus::unhealthy("model API key not configured")
    };

    let is_healthy = database.is_healthy() && generator.is_healthy();

    let response = HealthResponse {
        status: if is_healthy { "ready" } else { "not_ready" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: Some(HealthChecks { database, generator }),
    };

    if is_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

/// Liveness probe - checks if the service is alive
/// Always returns OK if the server is running
pub async fn liveness_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "alive".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
    })
}

/// Prometheus scrape endpoint
pub async fn metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        telemetry::render_metrics(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check_returns_healthy() {
        let response = health_check().await;
        assert_eq!(response.status, "healthy");
        assert!(!response.version.is_empty());
    }

    #[tokio::test]
    async fn test_liveness_check_returns_alive() {
        let response = liveness_check().await;
        assert_eq!(response.status, "alive");
    }

    #[test]
    fn test_check_status_serialization() {
        let json = serde_json::to_value(CheckStatus::unhealthy("down")).unwrap();
        assert_eq!(json["status"], "unhealthy");
        assert_eq!(json["message"], "down");

        let json = serde_json::to_value(CheckStatus::healthy()).unwrap();
        assert!(json.get("message").is_none());
    }
}
