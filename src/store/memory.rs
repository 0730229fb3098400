//! In-memory directory store.
//!
//! Keeps users and roles in process-local maps. Used by the test suite and
//! by hosts that embed the core without a database.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::error::Result;
use crate::models::role::Role;
use crate::models::user::User;
use crate::store::{DirectoryStore, NewRoleRecord, NewUserRecord};

#[derive(Default)]
struct Tables {
    users: HashMap<i64, User>,
    roles: HashMap<i64, Role>,
    next_user_id: i64,
    next_role_id: i64,
}

/// In-memory implementation of [`DirectoryStore`].
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl DirectoryStore for MemoryStore {
    async fn find_user(&self, id: i64) -> Result<Option<User>> {
        Ok(self.read().users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .read()
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list_users(&self, skip: i64, limit: i64) -> Result<Vec<User>> {
        let tables = self.read();
        let mut users: Vec<User> = tables.users.values().cloned().collect();
        users.sort_by_key(|u| u.id);
        Ok(users
            .into_iter()
            .skip(skip.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn insert_user(&self, user: NewUserRecord) -> Result<User> {
        let mut tables = self.write();
        tables.next_user_id += 1;
        let now = Utc::now();
        let row = User {
            id: tables.next_user_id,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            is_active: user.is_active,
            is_admin: user.is_admin,
            bio: user.bio,
            profile_picture: user.profile_picture,
            role_id: user.role_id,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_user(&self, user: &User) -> Result<User> {
        let mut tables = self.write();
        let mut row = user.clone();
        row.updated_at = Utc::now();
        tables.users.insert(row.id, row.clone());
        Ok(row)
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        Ok(self.write().users.remove(&id).is_some())
    }

    async fn count_users_with_role(&self, role_id: i64) -> Result<i64> {
        Ok(self
            .read()
            .users
            .values()
            .filter(|u| u.role_id == Some(role_id))
            .count() as i64)
    }

    async fn find_role(&self, id: i64) -> Result<Option<Role>> {
        Ok(self.read().roles.get(&id).cloned())
    }

    async fn find_role_by_name(&self, name: &str) -> Result<Option<Role>> {
        Ok(self
            .read()
            .roles
            .values()
            .find(|r| r.name == name)
            .cloned())
    }

    async fn list_roles(&self, skip: i64, limit: i64) -> Result<Vec<Role>> {
        let tables = self.read();
        let mut roles: Vec<Role> = tables.roles.values().cloned().collect();
        roles.sort_by_key(|r| r.id);
        Ok(roles
            .into_iter()
            .skip(skip.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn insert_role(&self, role: NewRoleRecord) -> Result<Role> {
        let mut tables = self.write();
        tables.next_role_id += 1;
        let now = Utc::now();
        let row = Role {
            id: tables.next_role_id,
            name: role.name,
            description: role.description,
            permissions: role.permissions,
            parent_id: role.parent_id,
            created_at: now,
            updated_at: now,
        };
        tables.roles.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_role(&self, role: &Role) -> Result<Role> {
        let mut tables = self.write();
        let mut row = role.clone();
        row.updated_at = Utc::now();
        tables.roles.insert(row.id, row.clone());
        Ok(row)
    }

    async fn delete_role(&self, id: i64) -> Result<bool> {
        Ok(self.write().roles.remove(&id).is_some())
    }

    async fn child_roles(&self, id: i64) -> Result<Vec<Role>> {
        let tables = self.read();
        let mut children: Vec<Role> = tables
            .roles
            .values()
            .filter(|r| r.parent_id == Some(id))
            .cloned()
            .collect();
        children.sort_by_key(|r| r.id);
        Ok(children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::role::PermissionSet;

    fn sample_user(email: &str) -> NewUserRecord {
        NewUserRecord {
            name: "Test".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            is_active: true,
            is_admin: false,
            bio: None,
            profile_picture: None,
            role_id: None,
        }
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids() {
        let store = MemoryStore::new();
        let a = store.insert_user(sample_user("a@x.com")).await.unwrap();
        let b = store.insert_user(sample_user("b@x.com")).await.unwrap();
        assert_eq!(a.id + 1, b.id);
    }

    #[tokio::test]
    async fn lookup_by_email_and_missing_rows() {
        let store = MemoryStore::new();
        store.insert_user(sample_user("a@x.com")).await.unwrap();
        assert!(store
            .find_user_by_email("a@x.com")
            .await
            .unwrap()
            .is_some());
        assert!(store.find_user_by_email("b@x.com").await.unwrap().is_none());
        assert!(store.find_user(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn child_roles_follow_parent_reference() {
        let store = MemoryStore::new();
        let parent = store
            .insert_role(NewRoleRecord {
                name: "Parent".to_string(),
                description: None,
                permissions: PermissionSet::new(),
                parent_id: None,
            })
            .await
            .unwrap();
        let child = store
            .insert_role(NewRoleRecord {
                name: "Child".to_string(),
                description: None,
                permissions: PermissionSet::new(),
                parent_id: Some(parent.id),
            })
            .await
            .unwrap();

        let children = store.child_roles(parent.id).await.unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].id, child.id);
        assert!(store.child_roles(child.id).await.unwrap().is_empty());
    }
}
