//! Access guard.
//!
//! Turns (user, resource, action) into an allow/deny decision. Two gating
//! mechanisms coexist as separate checks: a coarse role-name allow-list and
//! the fine-grained resource/action permission map. A route may use either
//! or both. The user's role row is re-read on every call, so a permission
//! edit takes effect on the very next request.

use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::role::Role;
use crate::models::user::User;
use crate::services::role_service::RoleService;

/// Access guard
pub struct AccessGuard {
    roles: Arc<RoleService>,
}

impl AccessGuard {
    pub fn new(roles: Arc<RoleService>) -> Self {
        Self { roles }
    }

    /// Fine-grained check: does the user's current role grant `action` on
    /// `resource`? Users without a role, or whose role row is gone, are
    /// denied rather than erroring.
    pub async fn authorize(&self, user: &User, resource: &str, action: &str) -> Result<()> {
        let role = self.current_role(user).await?;
        if self.roles.has_permission(&role, resource, action).await? {
            Ok(())
        } else {
            tracing::debug!(
                user_id = user.id,
                role = %role.name,
                resource,
                action,
                "permission denied"
            );
            Err(AppError::Forbidden)
        }
    }

    /// Coarse-grained check: is the user's current role name in the
    /// allow-list?
    pub async fn authorize_role(&self, user: &User, allowed_names: &[&str]) -> Result<()> {
        let role = self.current_role(user).await?;
        if allowed_names.contains(&role.name.as_str()) {
            Ok(())
        } else {
            tracing::debug!(user_id = user.id, role = %role.name, "role not in allow-list");
            Err(AppError::Forbidden)
        }
    }

    async fn current_role(&self, user: &User) -> Result<Role> {
        let role_id = user.role_id.ok_or(AppError::Forbidden)?;
        self.roles
            .get_role(role_id)
            .await?
            .ok_or(AppError::Forbidden)
    }
}
