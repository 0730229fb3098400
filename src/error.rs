//! Application error types and result alias.
//!
//! Authentication and authorization failures carry stable, generic messages:
//! the caller can map them to HTTP responses, but none of them reveal which
//! factor failed (unknown email vs. wrong password, expired vs. malformed
//! token).

use thiserror::Error;

/// Application result type alias
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Login failure: unknown email or wrong password, indistinguishable
    #[error("Incorrect email or password")]
    InvalidCredentials,

    /// Token failure: expired, malformed, badly signed or revoked
    #[error("Could not validate credentials")]
    InvalidToken,

    /// Request carries no usable identity (bad token, or its user is gone)
    #[error("Could not validate credentials")]
    Unauthenticated,

    /// Valid identity, deactivated account
    #[error("Inactive user")]
    InactiveAccount,

    /// Valid active identity, insufficient role or permission
    #[error("Not enough permissions")]
    Forbidden,

    /// Role parent assignment would make a role its own ancestor
    #[error("Invalid role hierarchy: {0}")]
    InvalidRoleHierarchy(String),

    /// Conflict error (e.g., duplicate email or role name)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Not found error
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
