//! Business logic services.

pub mod access_guard;
pub mod auth_service;
pub mod password_service;
pub mod role_service;
pub mod token_service;
pub mod user_service;
