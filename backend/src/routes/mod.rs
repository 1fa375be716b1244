//! Route definitions for the FoodBuddy API
//!
//! This module organizes all API routes and applies middleware.

use crate::state::AppState;
use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod admin;
mod auth;
mod favorites;
mod health;
mod meals;
mod plans;
mod profile;

pub use admin::admin_routes;
pub use auth::auth_routes;
pub use favorites::favorite_routes;
pub use meals::meal_routes;
pub use plans::plan_routes;
pub use profile::profile_routes;

/// Create the main application router with all middleware
pub fn create_router(state: AppState) -> Router {
    // Generation with retries can run long; the budget comes from config
    let timeout = Duration::from_secs(state.config().server.request_timeout_secs);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .route("/metrics", get(health::metrics))
        .nest("/api/v1", api_routes(state.config().server.max_image_bytes))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(timeout))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API v1 routes
fn api_routes(max_image_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { "FoodBuddy API v1" }))
        .route("/session", get(profile::get_session))
        .route("/history", get(favorites::history))
        .route("/chat", post(meals::chat))
        .nest("/auth", auth_routes())
        .nest("/profile", profile_routes())
        .nest("/plans", plan_routes())
        .nest("/meals", meal_routes(max_image_bytes))
        .nest("/favorites", favorite_routes())
        .nest("/admin", admin_routes())
}
