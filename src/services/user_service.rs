//! User management service.
//!
//! Registration, profile updates, activation state, and deletion. Passwords
//! only exist in plaintext inside the create/update payloads; the stored row
//! always carries the bcrypt hash.

use std::sync::Arc;

use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::user::User;
use crate::services::password_service;
use crate::store::{DirectoryStore, NewUserRecord};

fn default_active() -> bool {
    true
}

/// Payload for registering or creating a user.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub role_id: Option<i64>,
}

/// Payload for updating a user; the stored password hash is kept when no new
/// password is supplied.
#[derive(Debug, Clone, Deserialize)]
pub struct UserUpdate {
    pub name: String,
    pub email: String,
    pub password: Option<String>,
    pub is_active: bool,
    pub is_admin: bool,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub role_id: Option<i64>,
}

/// User management service
pub struct UserService {
    store: Arc<dyn DirectoryStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn DirectoryStore>) -> Self {
        Self { store }
    }

    /// Create a user, hashing the plaintext password. Duplicate email is a
    /// conflict; an assigned role must exist.
    pub async fn create_user(&self, user: NewUser) -> Result<User> {
        if self.store.find_user_by_email(&user.email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".into()));
        }
        if let Some(role_id) = user.role_id {
            self.ensure_role_exists(role_id).await?;
        }

        let password_hash = password_service::hash_password(&user.password)?;
        let created = self
            .store
            .insert_user(NewUserRecord {
                name: user.name,
                email: user.email,
                password_hash,
                is_active: user.is_active,
                is_admin: user.is_admin,
                bio: user.bio,
                profile_picture: user.profile_picture,
                role_id: user.role_id,
            })
            .await?;
        tracing::debug!(user_id = created.id, "user created");
        Ok(created)
    }

    /// Update a user. The password is re-hashed only when a new one arrives.
    pub async fn update_user(&self, id: i64, update: UserUpdate) -> Result<User> {
        let mut user = self
            .store
            .find_user(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;

        if update.email != user.email {
            if let Some(other) = self.store.find_user_by_email(&update.email).await? {
                if other.id != id {
                    return Err(AppError::Conflict("Email already registered".into()));
                }
            }
        }
        if let Some(role_id) = update.role_id {
            self.ensure_role_exists(role_id).await?;
        }
        if let Some(password) = &update.password {
            user.password_hash = password_service::hash_password(password)?;
        }

        user.name = update.name;
        user.email = update.email;
        user.is_active = update.is_active;
        user.is_admin = update.is_admin;
        user.bio = update.bio;
        user.profile_picture = update.profile_picture;
        user.role_id = update.role_id;
        self.store.update_user(&user).await
    }

    /// Flip the active flag without touching anything else.
    pub async fn set_active(&self, id: i64, is_active: bool) -> Result<User> {
        let mut user = self
            .store
            .find_user(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;
        user.is_active = is_active;
        self.store.update_user(&user).await
    }

    pub async fn delete_user(&self, id: i64) -> Result<()> {
        if !self.store.delete_user(id).await? {
            return Err(AppError::NotFound("User not found".into()));
        }
        Ok(())
    }

    pub async fn get_user(&self, id: i64) -> Result<Option<User>> {
        self.store.find_user(id).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.store.find_user_by_email(email).await
    }

    pub async fn list_users(&self, skip: i64, limit: i64) -> Result<Vec<User>> {
        self.store.list_users(skip, limit).await
    }

    async fn ensure_role_exists(&self, role_id: i64) -> Result<()> {
        self.store
            .find_role(role_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Role not found".into()))?;
        Ok(())
    }
}
