//! Database connection and pool management

use anyhow::Result;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::DatabaseConfig;

/// Pool tuning
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

impl From<&DatabaseConfig> for DbConfig {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            url: config.url.clone(),
            max_connections: config.max_connections,
            min_connections: 1,
            // Not above the session bootstrap timeout
            acquire_timeout_secs: 5,
            idle_timeout_secs: 600,
        }
    }
}

pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    create_pool_with_config(&DbConfig::from(config)).await
}

pub async fn create_pool_with_config(config: &DbConfig) -> Result<PgPool> {
    let connect_options = PgConnectOptions::from_str(&config.url)?.application_name("foodbuddy");

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .connect_with(connect_options)
        .await?;

    info!(
        max = config.max_connections,
        min = config.min_connections,
        "Database pool created"
    );

    Ok(pool)
}

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations completed successfully");
    Ok(())
}

/// Check database health
pub async fn health_check(pool: &PgPool) -> Result<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map(|_| ())
        .map_err(|e| {
            warn!("Database health check failed: {}", e);
            e.into()
        })
}
