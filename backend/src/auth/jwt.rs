//! JWT token generation and validation
//!
//! Access and refresh tokens share one HMAC secret; the `kind` claim keeps a
//! refresh token from being accepted as an access token and vice versa.

use anyhow::{anyhow, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
    pub kind: TokenKind,
    /// Unique per token so two tokens minted in the same second differ
    pub jti: String,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid> {
        Uuid::parse_str(&self.sub).map_err(|_| anyhow!("Invalid user ID in token"))
    }
}

/// Keys are derived once and shared behind `Arc`
#[derive(Clone)]
pub struct JwtService {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl JwtService {
    pub fn new(secret: &str, access_ttl_secs: i64, refresh_ttl_secs: i64) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
            access_ttl_secs,
            refresh_ttl_secs,
        }
    }

    pub fn generate_access_token(&self, user_id: Uuid) -> Result<String> {
        self.issue(user_id, TokenKind::Access, self.access_ttl_secs)
    }

    pub fn generate_refresh_token(&self, user_id: Uuid) -> Result<String> {
        self.issue(user_id, TokenKind::Refresh, self.refresh_ttl_secs)
    }

    fn issue(&self, user_id: Uuid, kind: TokenKind, ttl_secs: i64) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + Duration::seconds(ttl_secs)).timestamp(),
            iat: now.timestamp(),
            kind,
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| anyhow!("Failed to generate {:?} token: {}", kind, e))
    }

    /// Decode, check signature and expiry, then check the token kind
    pub fn validate(&self, token: &str, expected: TokenKind) -> Result<Claims> {
        let claims = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|e| anyhow!("Invalid token: {}", e))?
            .claims;
        if claims.kind != expected {
            return Err(anyhow!("Expected a {:?} token", expected));
        }
        Ok(claims)
    }

    #[inline]
    pub fn validate_access_token(&self, token: &str) -> Result<Claims> {
        self.validate(token, TokenKind::Access)
    }

    #[inline]
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims> {
        self.validate(token, TokenKind::Refresh)
    }

    #[inline]
    pub fn access_token_expiry_secs(&self) -> i64 {
        self.access_ttl_secs
    }
}
