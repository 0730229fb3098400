//! Common test utilities for integration tests.
//!
//! Provides a fully wired service stack over the in-memory store plus data
//! factories, so each test can exercise the login → authenticate → authorize
//! chain without a database.

#![allow(dead_code)]

pub mod fixtures;

use std::sync::Arc;

use chrono::Duration;

use cms_guard::services::access_guard::AccessGuard;
use cms_guard::services::auth_service::AuthService;
use cms_guard::services::role_service::RoleService;
use cms_guard::services::token_service::TokenService;
use cms_guard::services::user_service::UserService;
use cms_guard::store::memory::MemoryStore;

pub const TEST_SECRET: &str = "integration-test-secret";

/// Test context wiring every service over one shared in-memory store.
pub struct TestBackend {
    pub store: Arc<MemoryStore>,
    pub auth: AuthService,
    pub users: UserService,
    pub roles: Arc<RoleService>,
    pub guard: AccessGuard,
}

impl TestBackend {
    /// Build a backend with the default 30 minute token lifetime.
    pub fn new() -> Self {
        Self::with_token_ttl(Duration::minutes(30))
    }

    /// Build a backend with a custom token lifetime (used by expiry tests).
    pub fn with_token_ttl(ttl: Duration) -> Self {
        let store = Arc::new(MemoryStore::new());
        let tokens = Arc::new(TokenService::new(TEST_SECRET, ttl));
        let roles = Arc::new(RoleService::new(store.clone()));
        Self {
            auth: AuthService::new(store.clone(), tokens),
            users: UserService::new(store.clone()),
            guard: AccessGuard::new(roles.clone()),
            roles,
            store,
        }
    }
}
