//! Application state management
//!
//! Everything handlers need, built once at startup and cloned per request.
//! All fields are `Arc`-backed or already cheap to clone.

use crate::auth::JwtService;
use crate::config::AppConfig;
use crate::generation::MealGenerator;
use crate::session::SessionStore;
use foodbuddy_shared::Locale;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    /// Pre-initialized JWT service with cached keys
    pub jwt: JwtService,
    pub generator: Arc<dyn MealGenerator>,
    pub sessions: SessionStore,
}

impl AppState {
    /// Derives the JWT keys from the configured secret, so call this once at
    /// startup.
    pub fn new(db: PgPool, config: AppConfig, generator: Arc<dyn MealGenerator>) -> Self {
        let jwt = JwtService::new(
            &config.jwt.secret,
            config.jwt.access_token_expiry_secs,
            config.jwt.refresh_token_expiry_secs,
        );

        Self {
            db,
            config: Arc::new(config),
            jwt,
            generator,
            sessions: SessionStore::new(),
        }
    }

    #[inline]
    pub fn db(&self) -> &PgPool {
        &self.db
    }

    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[inline]
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    #[inline]
    pub fn generator(&self) -> &dyn MealGenerator {
        self.generator.as_ref()
    }

    #[inline]
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Language for user-facing messages
    #[inline]
    pub fn locale(&self) -> Locale {
        self.config.locale
    }
}
