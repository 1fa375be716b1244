//! Account service: sign-up, sign-in, token refresh
//!
//! Password hashing and verification run on the blocking pool. Failure text
//! goes through the auth error translator so the client gets the same
//! localized wording whichever layer rejected the request.

use crate::auth::{JwtService, PasswordService};
use crate::error::ApiError;
use crate::repositories::{ProfileRepository, UserRecord, UserRepository};
use foodbuddy_shared::i18n::auth_error_text;
use foodbuddy_shared::validation::{validate_email, validate_new_password};
use foodbuddy_shared::{
    AccountResponse, AuthResponse, AuthTokens, Locale, LoginRequest, RegisterRequest, Role,
};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

const INVALID_CREDENTIALS: &str = "Invalid login credentials";
const ALREADY_REGISTERED: &str = "User already registered";

pub struct UserService;

impl UserService {
    /// Validation happens before any database work
    pub async fn register(
        pool: &PgPool,
        jwt: &JwtService,
        locale: Locale,
        req: &RegisterRequest,
    ) -> Result<AuthResponse, ApiError> {
        let email = normalize_email(&req.email);
        validate_email(&email).map_err(|e| ApiError::validation(&e, locale))?;
        validate_new_password(&req.password, &req.confirm_password)
            .map_err(|e| ApiError::validation(&e, locale))?;

        if UserRepository::find_by_email(pool, &email).await?.is_some() {
            return Err(ApiError::Conflict(auth_error_text(ALREADY_REGISTERED, locale)));
        }

        let password_hash = PasswordService::hash(req.password.clone()).await?;

        let user = UserRepository::create(pool, &email, &password_hash)
            .await
            .map_err(|err| registration_failure(err, locale))?;

        info!(user_id = %user.id, "Account registered");
        Self::auth_response(jwt, &user, Role::User)
    }

    pub async fn login(
        pool: &PgPool,
        jwt: &JwtService,
        locale: Locale,
        req: &LoginRequest,
    ) -> Result<AuthResponse, ApiError> {
        let email = normalize_email(&req.email);
        let invalid = || ApiError::Unauthorized(auth_error_text(INVALID_CREDENTIALS, locale));

        let user = UserRepository::find_by_email(pool, &email)
            .await?
            .ok_or_else(invalid)?;

        let valid = PasswordService::verify(req.password.clone(), user.password_hash.clone()).await?;
        if !valid {
            warn!(user_id = %user.id, "Failed login attempt");
            return Err(invalid());
        }

        let role = ProfileRepository::role_of(pool, user.id).await?;
        Self::auth_response(jwt, &user, role)
    }

    /// Issue a fresh token pair for a still-existing account
    pub async fn refresh(
        pool: &PgPool,
        jwt: &JwtService,
        refresh_token: &str,
    ) -> Result<AuthResponse, ApiError> {
        let claims = jwt
            .validate_refresh_token(refresh_token)
            .map_err(|e| ApiError::Unauthorized(format!("Invalid refresh token: {}", e)))?;
        let user_id = claims
            .user_id()
            .map_err(|e| ApiError::Unauthorized(e.to_string()))?;

        let user = UserRepository::find_by_id(pool, user_id)
            .await?
            .ok_or_else(|| ApiError::Unauthorized("User not found".to_string()))?;

        let role = ProfileRepository::role_of(pool, user.id).await?;
        Self::auth_response(jwt, &user, role)
    }

    pub async fn me(pool: &PgPool, user_id: Uuid) -> Result<AccountResponse, ApiError> {
        let user = UserRepository::find_by_id(pool, user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
        let role = ProfileRepository::role_of(pool, user_id).await?;
        Ok(account(&user, role))
    }

    fn auth_response(jwt: &JwtService, user: &UserRecord, role: Role) -> Result<AuthResponse, ApiError> {
        let tokens = AuthTokens {
            access_token: jwt.generate_access_token(user.id)?,
            refresh_token: jwt.generate_refresh_token(user.id)?,
            token_type: "Bearer".to_string(),
            expires_in: jwt.access_token_expiry_secs(),
        };

        Ok(AuthResponse {
            tokens,
            account: account(user, role),
        })
    }
}

fn account(user: &UserRecord, role: Role) -> AccountResponse {
    AccountResponse {
        id: user.id,
        email: user.email.clone(),
        role,
        created_at: user.created_at,
    }
}

fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// A concurrent sign-up with the same email loses on the unique index
fn registration_failure(err: anyhow::Error, locale: Locale) -> ApiError {
    match err.downcast_ref::<sqlx::Error>() {
        Some(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            ApiError::Conflict(auth_error_text(db_err.message(), locale))
        }
        _ => ApiError::Internal(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_is_normalized() {
        assert_eq!(normalize_email("  Somchai@Example.COM "), "somchai@example.com");
    }

    #[test]
    fn test_unexpected_failure_stays_internal() {
        let err = registration_failure(anyhow::anyhow!("connection reset"), Locale::Th);
        assert!(matches!(err, ApiError::Internal(_)));
    }

    #[test]
    fn test_canned_messages_translate() {
        assert_eq!(auth_error_text(INVALID_CREDENTIALS, Locale::Th), "อีเมลหรือรหัสผ่านไม่ถูกต้อง");
        assert_eq!(auth_error_text(ALREADY_REGISTERED, Locale::En), "This email is already registered.");
    }
}
