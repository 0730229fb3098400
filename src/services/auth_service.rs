//! Authentication service.
//!
//! Handles the login and request-authentication flow: credential checks,
//! session token issuance, and resolving a bearer token back to an active
//! user. Each request follows the same path: verify the token, load the
//! user, check the active flag.

use std::sync::Arc;

use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::user::User;
use crate::services::password_service;
use crate::services::token_service::TokenService;
use crate::store::DirectoryStore;

/// Token response returned by a successful login.
#[derive(Debug, Clone, Serialize)]
pub struct SessionToken {
    pub access_token: String,
    pub token_type: String,
    /// Seconds until the token expires
    pub expires_in: i64,
}

/// Authentication service
pub struct AuthService {
    store: Arc<dyn DirectoryStore>,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(store: Arc<dyn DirectoryStore>, tokens: Arc<TokenService>) -> Self {
        Self { store, tokens }
    }

    /// Authenticate credentials and issue a session token.
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionToken> {
        let user = self
            .store
            .find_user_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !password_service::verify_password(password, &user.password_hash) {
            return Err(AppError::InvalidCredentials);
        }

        let access_token = self.tokens.issue(&user.email)?;
        tracing::debug!(user_id = user.id, "session token issued");

        Ok(SessionToken {
            access_token,
            token_type: "bearer".to_string(),
            expires_in: self.tokens.default_ttl().num_seconds(),
        })
    }

    /// Resolve a bearer token to its user, without the active-flag check.
    ///
    /// An invalid token and a token whose user no longer exists produce the
    /// same `Unauthenticated` failure, so callers cannot probe for accounts.
    pub async fn resolve(&self, token: &str) -> Result<User> {
        let email = match self.tokens.verify(token).await {
            Ok(email) => email,
            Err(AppError::InvalidToken) => return Err(AppError::Unauthenticated),
            Err(e) => return Err(e),
        };

        self.store
            .find_user_by_email(&email)
            .await?
            .ok_or(AppError::Unauthenticated)
    }

    /// Reject deactivated accounts.
    pub fn require_active(user: User) -> Result<User> {
        if user.is_active {
            Ok(user)
        } else {
            Err(AppError::InactiveAccount)
        }
    }

    /// Full request-side authentication: token → user → active check.
    ///
    /// The user row is read fresh on every call, so a deactivation takes
    /// effect on the next request even while the token is still valid.
    pub async fn authenticate(&self, token: &str) -> Result<User> {
        let user = self.resolve(token).await?;
        Self::require_active(user)
    }
}
