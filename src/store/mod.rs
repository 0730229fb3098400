//! Persistence backends for the user and role directory.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::role::{PermissionSet, Role};
use crate::models::user::User;

/// Fields for inserting a new user row. The password arrives already hashed.
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub is_active: bool,
    pub is_admin: bool,
    pub bio: Option<String>,
    pub profile_picture: Option<String>,
    pub role_id: Option<i64>,
}

/// Fields for inserting a new role row.
#[derive(Debug, Clone)]
pub struct NewRoleRecord {
    pub name: String,
    pub description: Option<String>,
    pub permissions: PermissionSet,
    pub parent_id: Option<i64>,
}

/// User and role directory the access-control core reads and writes.
///
/// Lookups return `Ok(None)` when a row is absent; errors are reserved for
/// I/O failures. Callers must treat every method as potentially latent and
/// never hold a process-wide lock across an await.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    async fn find_user(&self, id: i64) -> Result<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn list_users(&self, skip: i64, limit: i64) -> Result<Vec<User>>;

    async fn insert_user(&self, user: NewUserRecord) -> Result<User>;

    /// Persist the given user state, returning the stored row with fresh
    /// timestamps.
    async fn update_user(&self, user: &User) -> Result<User>;

    /// Returns false when no such user existed.
    async fn delete_user(&self, id: i64) -> Result<bool>;

    async fn count_users_with_role(&self, role_id: i64) -> Result<i64>;

    async fn find_role(&self, id: i64) -> Result<Option<Role>>;

    async fn find_role_by_name(&self, name: &str) -> Result<Option<Role>>;

    async fn list_roles(&self, skip: i64, limit: i64) -> Result<Vec<Role>>;

    async fn insert_role(&self, role: NewRoleRecord) -> Result<Role>;

    async fn update_role(&self, role: &Role) -> Result<Role>;

    /// Returns false when no such role existed.
    async fn delete_role(&self, id: i64) -> Result<bool>;

    /// Roles whose parent reference points at `id`.
    async fn child_roles(&self, id: i64) -> Result<Vec<Role>>;
}
