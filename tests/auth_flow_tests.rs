//! Login and authentication flow tests.
//!
//! Covers the credential → token → user chain end to end over the in-memory
//! store: successful logins, rejection of bad credentials, token expiry, and
//! account deactivation taking effect while a token is still valid.

mod common;

use chrono::Duration;

use cms_guard::AppError;
use common::fixtures::TestUser;
use common::TestBackend;

#[tokio::test]
async fn login_then_authenticate_returns_the_active_user() {
    let backend = TestBackend::new();
    backend
        .users
        .create_user(TestUser::with_email("a@x.com").into_new_user(None))
        .await
        .unwrap();

    let session = backend.auth.login("a@x.com", "password123").await.unwrap();
    assert_eq!(session.token_type, "bearer");
    assert_eq!(session.expires_in, 30 * 60);

    let user = backend
        .auth
        .authenticate(&session.access_token)
        .await
        .unwrap();
    assert_eq!(user.email, "a@x.com");
    assert!(user.is_active);
}

#[tokio::test]
async fn wrong_password_is_invalid_credentials() {
    let backend = TestBackend::new();
    backend
        .users
        .create_user(TestUser::with_email("a@x.com").into_new_user(None))
        .await
        .unwrap();

    assert!(matches!(
        backend.auth.login("a@x.com", "not-the-password").await,
        Err(AppError::InvalidCredentials)
    ));
}

#[tokio::test]
async fn expired_token_is_unauthenticated() {
    let backend = TestBackend::with_token_ttl(Duration::seconds(1));
    backend
        .users
        .create_user(TestUser::with_email("a@x.com").into_new_user(None))
        .await
        .unwrap();

    let session = backend.auth.login("a@x.com", "password123").await.unwrap();
    assert!(backend
        .auth
        .authenticate(&session.access_token)
        .await
        .is_ok());

    tokio::time::sleep(std::time::Duration::from_secs(2)).await;

    assert!(matches!(
        backend.auth.authenticate(&session.access_token).await,
        Err(AppError::Unauthenticated)
    ));
}

#[tokio::test]
async fn deactivation_rejects_a_still_valid_token() {
    let backend = TestBackend::new();
    let user = backend
        .users
        .create_user(TestUser::with_email("a@x.com").into_new_user(None))
        .await
        .unwrap();

    let session = backend.auth.login("a@x.com", "password123").await.unwrap();
    assert!(backend
        .auth
        .authenticate(&session.access_token)
        .await
        .is_ok());

    backend.users.set_active(user.id, false).await.unwrap();

    assert!(matches!(
        backend.auth.authenticate(&session.access_token).await,
        Err(AppError::InactiveAccount)
    ));
}

#[tokio::test]
async fn garbled_bearer_token_is_unauthenticated() {
    let backend = TestBackend::new();
    assert!(matches!(
        backend.auth.authenticate("definitely-not-a-jwt").await,
        Err(AppError::Unauthenticated)
    ));
}
