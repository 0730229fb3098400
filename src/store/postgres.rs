//! Postgres-backed directory store.
//!
//! Expects the host schema's `users` and `roles` tables with integer
//! surrogate keys, a self-referential `roles.parent_id` column, and the
//! resource/action map in a `roles.permissions` JSONB column. Statements are
//! runtime-checked (`query_as` + `bind`), so no database is needed at build
//! time.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use sqlx::FromRow;

use crate::error::Result;
use crate::models::role::{PermissionSet, Role};
use crate::models::user::User;
use crate::store::{DirectoryStore, NewRoleRecord, NewUserRecord};

const USER_COLUMNS: &str = "id, name, email, password_hash, is_active, is_admin, \
     bio, profile_picture, role_id, created_at, updated_at";

const ROLE_COLUMNS: &str = "id, name, description, permissions, parent_id, created_at, updated_at";

/// Row shape for `roles`; the JSONB permissions column needs unwrapping.
#[derive(FromRow)]
struct RoleRow {
    id: i64,
    name: String,
    description: Option<String>,
    permissions: Json<PermissionSet>,
    parent_id: Option<i64>,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<RoleRow> for Role {
    fn from(row: RoleRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            permissions: row.permissions.0,
            parent_id: row.parent_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Postgres implementation of [`DirectoryStore`].
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wrap an existing connection pool supplied by the host.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Convenience constructor for hosts that hand over just the URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(20)
            .acquire_timeout(Duration::from_secs(30))
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl DirectoryStore for PgStore {
    async fn find_user(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn list_users(&self, skip: i64, limit: i64) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id OFFSET $1 LIMIT $2"
        ))
        .bind(skip.max(0))
        .bind(limit.max(0))
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn insert_user(&self, user: NewUserRecord) -> Result<User> {
        let row = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, email, password_hash, is_active, is_admin, \
             bio, profile_picture, role_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_active)
        .bind(user.is_admin)
        .bind(&user.bio)
        .bind(&user.profile_picture)
        .bind(user.role_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_user(&self, user: &User) -> Result<User> {
        let row = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET name = $2, email = $3, password_hash = $4, \
             is_active = $5, is_admin = $6, bio = $7, profile_picture = $8, \
             role_id = $9, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_active)
        .bind(user.is_admin)
        .bind(&user.bio)
        .bind(&user.profile_picture)
        .bind(user.role_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_users_with_role(&self, role_id: i64) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE role_id = $1",
        )
        .bind(role_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn find_role(&self, id: i64) -> Result<Option<Role>> {
        let role = sqlx::query_as::<_, RoleRow>(&format!(
            "SELECT {ROLE_COLUMNS} FROM roles WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(role.map(Role::from))
    }

    async fn find_role_by_name(&self, name: &str) -> Result<Option<Role>> {
        let role = sqlx::query_as::<_, RoleRow>(&format!(
            "SELECT {ROLE_COLUMNS} FROM roles WHERE name = $1"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(role.map(Role::from))
    }

    async fn list_roles(&self, skip: i64, limit: i64) -> Result<Vec<Role>> {
        let roles = sqlx::query_as::<_, RoleRow>(&format!(
            "SELECT {ROLE_COLUMNS} FROM roles ORDER BY id OFFSET $1 LIMIT $2"
        ))
        .bind(skip.max(0))
        .bind(limit.max(0))
        .fetch_all(&self.pool)
        .await?;
        Ok(roles.into_iter().map(Role::from).collect())
    }

    async fn insert_role(&self, role: NewRoleRecord) -> Result<Role> {
        let row = sqlx::query_as::<_, RoleRow>(&format!(
            "INSERT INTO roles (name, description, permissions, parent_id) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {ROLE_COLUMNS}"
        ))
        .bind(&role.name)
        .bind(&role.description)
        .bind(Json(&role.permissions))
        .bind(role.parent_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn update_role(&self, role: &Role) -> Result<Role> {
        let row = sqlx::query_as::<_, RoleRow>(&format!(
            "UPDATE roles SET name = $2, description = $3, permissions = $4, \
             parent_id = $5, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {ROLE_COLUMNS}"
        ))
        .bind(role.id)
        .bind(&role.name)
        .bind(&role.description)
        .bind(Json(&role.permissions))
        .bind(role.parent_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn delete_role(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn child_roles(&self, id: i64) -> Result<Vec<Role>> {
        let roles = sqlx::query_as::<_, RoleRow>(&format!(
            "SELECT {ROLE_COLUMNS} FROM roles WHERE parent_id = $1 ORDER BY id"
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        Ok(roles.into_iter().map(Role::from).collect())
    }
}
