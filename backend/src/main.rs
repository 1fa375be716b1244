//! FoodBuddy Backend
//!
//! Nutrition planning API: onboarding and energy targets, model-generated
//! daily and weekly meal plans, favorites, history, chat and an admin console.
//!
//! ## Architecture
//!
//! - Routes: HTTP request handling and routing
//! - Services: business logic and per-user session state
//! - Generation: the Gemini client behind the `MealGenerator` trait
//! - Repositories: data access on PostgreSQL with SQLx

use anyhow::Result;
use foodbuddy_backend::{
    config::AppConfig, db, generation::GeminiClient, routes, state::AppState, telemetry,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let production = AppConfig::is_production();
    telemetry::init_tracing(production);
    telemetry::init_metrics()?;

    let config = AppConfig::load()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        env = if production { "production" } else { "development" },
        model = %config.ai.model,
        "Starting FoodBuddy backend"
    );

    if production {
        validate_production_config(&config)?;
    } else if !config.ai.has_api_key() {
        warn!("No model API key configured; plan generation, suggestions and chat will fail");
    }

    info!("Connecting to database...");
    let db_pool = db::create_pool(&config.database).await?;

    // Production runs migrations as a separate job
    if !production {
        info!("Running database migrations...");
        db::run_migrations(&db_pool).await?;
    }

    let generator = Arc::new(GeminiClient::new(&config.ai)?);
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let state = AppState::new(db_pool, config, generator);
    let session_config = &state.config().session;
    state
        .sessions()
        .spawn_sweeper(session_config.idle_timeout(), session_config.sweep_interval());
    let app = routes::create_router(state);

    info!(address = %addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Refuse to start in production with development defaults
fn validate_production_config(config: &AppConfig) -> Result<()> {
    let mut errors = Vec::new();

    if config.jwt.secret.contains("development") || config.jwt.secret.len() < 32 {
        errors.push("JWT secret must be at least 32 characters and not contain 'development'");
    }

    if !config.ai.has_api_key() {
        errors.push("FB__AI__API_KEY must be set");
    }

    let generation_budget = config.ai.worst_case_duration();
    if Duration::from_secs(config.server.request_timeout_secs) < generation_budget {
        warn!(
            request_timeout_secs = config.server.request_timeout_secs,
            generation_budget_secs = generation_budget.as_secs(),
            "Request timeout is shorter than a fully retried generation call"
        );
    }

    if config.database.url.contains("localhost") || config.database.url.contains("127.0.0.1") {
        warn!("Database URL contains localhost - ensure this is intentional for production");
    }

    if !errors.is_empty() {
        for err in &errors {
            error!("Configuration error: {}", err);
        }
        anyhow::bail!("Invalid production configuration");
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting graceful shutdown"),
        _ = terminate => info!("Received SIGTERM, starting graceful shutdown"),
    }
}
