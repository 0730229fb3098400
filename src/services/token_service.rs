//! Session token service.
//!
//! Issues and verifies the signed, time-limited bearer tokens that prove a
//! prior successful login. Tokens are stateless JWTs; the optional
//! [`RevocationList`] seam lets a host add server-side revocation without
//! touching callers.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{AppError, Result};

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user email)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Server-side revocation check consulted during verification.
#[async_trait]
pub trait RevocationList: Send + Sync {
    /// True when the token was revoked before its natural expiry.
    async fn is_revoked(&self, token: &str) -> Result<bool>;
}

/// Default revocation list: tokens are never revoked (fully stateless).
pub struct NoRevocation;

#[async_trait]
impl RevocationList for NoRevocation {
    async fn is_revoked(&self, _token: &str) -> Result<bool> {
        Ok(false)
    }
}

/// Session token service
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    default_ttl: Duration,
    revocation: Arc<dyn RevocationList>,
}

impl TokenService {
    /// Create a token service over a shared signing secret.
    pub fn new(secret: &str, default_ttl: Duration) -> Self {
        let mut validation = Validation::default();
        // Expiry comparison must be exact; the library default allows 60s of
        // clock leeway, which would keep just-expired tokens alive.
        validation.leeway = 0;
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            default_ttl,
            revocation: Arc::new(NoRevocation),
        }
    }

    /// Create a token service from application configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.secret_key,
            Duration::minutes(config.access_token_expire_minutes),
        )
    }

    /// Replace the revocation list (defaults to [`NoRevocation`]).
    pub fn with_revocation_list(mut self, revocation: Arc<dyn RevocationList>) -> Self {
        self.revocation = revocation;
        self
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Issue a token for `subject` using the configured lifetime.
    pub fn issue(&self, subject: &str) -> Result<String> {
        self.issue_with_ttl(subject, self.default_ttl)
    }

    /// Issue a token for `subject` expiring at now + `ttl`.
    pub fn issue_with_ttl(&self, subject: &str, ttl: Duration) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_owned(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Token encoding failed: {}", e)))
    }

    /// Verify a token and return its subject.
    ///
    /// Expired, malformed, badly signed and revoked tokens all collapse into
    /// [`AppError::InvalidToken`]; the claims are only read after the
    /// signature has been checked.
    pub async fn verify(&self, token: &str) -> Result<String> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| AppError::InvalidToken)?;
        if self.revocation.is_revoked(token).await? {
            return Err(AppError::InvalidToken);
        }
        Ok(data.claims.sub)
    }
}
