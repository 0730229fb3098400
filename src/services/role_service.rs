//! Role hierarchy service.
//!
//! Roles are named permission bundles arranged as a forest: a role without a
//! parent is a root, and children reference their parent through a
//! self-referential id column. The parent chain is kept acyclic at write
//! time; nothing at read time needs to worry about cycles.

use std::sync::Arc;

use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::role::{PermissionSet, Role};
use crate::store::{DirectoryStore, NewRoleRecord};

/// Payload for creating a role.
#[derive(Debug, Clone, Deserialize)]
pub struct NewRole {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: PermissionSet,
    pub parent_id: Option<i64>,
}

/// Payload for updating a role; every field is replaced.
#[derive(Debug, Clone, Deserialize)]
pub struct RoleUpdate {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: PermissionSet,
    pub parent_id: Option<i64>,
}

/// Role hierarchy service
pub struct RoleService {
    store: Arc<dyn DirectoryStore>,
}

impl RoleService {
    pub fn new(store: Arc<dyn DirectoryStore>) -> Self {
        Self { store }
    }

    /// Create a role. The parent, when given, must exist; a brand-new role
    /// cannot introduce a cycle because nothing references it yet.
    pub async fn create_role(&self, role: NewRole) -> Result<Role> {
        if self.store.find_role_by_name(&role.name).await?.is_some() {
            return Err(AppError::Conflict("Role name already registered".into()));
        }
        if let Some(parent_id) = role.parent_id {
            self.store
                .find_role(parent_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Parent role not found".into()))?;
        }

        let role = self
            .store
            .insert_role(NewRoleRecord {
                name: role.name,
                description: role.description,
                permissions: role.permissions,
                parent_id: role.parent_id,
            })
            .await?;
        tracing::debug!(role_id = role.id, role_name = %role.name, "role created");
        Ok(role)
    }

    /// Update a role, re-checking the hierarchy invariant when the parent
    /// reference changes.
    pub async fn update_role(&self, id: i64, update: RoleUpdate) -> Result<Role> {
        let mut role = self
            .store
            .find_role(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Role not found".into()))?;

        if update.name != role.name {
            if let Some(other) = self.store.find_role_by_name(&update.name).await? {
                if other.id != id {
                    return Err(AppError::Conflict("Role name already registered".into()));
                }
            }
        }
        if let Some(parent_id) = update.parent_id {
            self.ensure_acyclic(id, parent_id).await?;
        }

        role.name = update.name;
        role.description = update.description;
        role.permissions = update.permissions;
        role.parent_id = update.parent_id;
        self.store.update_role(&role).await
    }

    /// Delete a role. Refused while child roles or assigned users still
    /// reference it.
    pub async fn delete_role(&self, id: i64) -> Result<()> {
        self.store
            .find_role(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Role not found".into()))?;

        if !self.store.child_roles(id).await?.is_empty() {
            return Err(AppError::Conflict("Role still has child roles".into()));
        }
        if self.store.count_users_with_role(id).await? > 0 {
            return Err(AppError::Conflict("Role is still assigned to users".into()));
        }

        self.store.delete_role(id).await?;
        Ok(())
    }

    pub async fn get_role(&self, id: i64) -> Result<Option<Role>> {
        self.store.find_role(id).await
    }

    pub async fn get_role_by_name(&self, name: &str) -> Result<Option<Role>> {
        self.store.find_role_by_name(name).await
    }

    pub async fn list_roles(&self, skip: i64, limit: i64) -> Result<Vec<Role>> {
        self.store.list_roles(skip, limit).await
    }

    /// Roles whose parent is `id`.
    pub async fn child_roles(&self, id: i64) -> Result<Vec<Role>> {
        self.store.child_roles(id).await
    }

    /// Resolve the permission set a role grants.
    ///
    /// Resolution is direct-only: the stored parent chain is not consulted.
    /// Ancestor-union inheritance, if ever wanted, belongs here behind this
    /// same signature (`PermissionSet::merge` over the parent walk) so no
    /// caller changes.
    pub async fn permissions_for(&self, role: &Role) -> Result<PermissionSet> {
        Ok(role.permissions.clone())
    }

    /// True iff `action` on `resource` is in the role's resolved permissions.
    pub async fn has_permission(&self, role: &Role, resource: &str, action: &str) -> Result<bool> {
        Ok(self.permissions_for(role).await?.allows(resource, action))
    }

    /// Walk the ancestor chain starting at `parent_id`; assigning it to
    /// `role_id` must not make the role its own ancestor.
    async fn ensure_acyclic(&self, role_id: i64, parent_id: i64) -> Result<()> {
        let mut cursor = Some(parent_id);
        while let Some(ancestor_id) = cursor {
            if ancestor_id == role_id {
                return Err(AppError::InvalidRoleHierarchy(
                    "Role cannot be its own ancestor".into(),
                ));
            }
            let ancestor = self
                .store
                .find_role(ancestor_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Parent role not found".into()))?;
            cursor = ancestor.parent_id;
        }
        Ok(())
    }
}
