//! Test fixtures and data factories.

#![allow(dead_code)]

use cms_guard::models::role::PermissionSet;
use cms_guard::services::role_service::NewRole;
use cms_guard::services::user_service::NewUser;

/// Test user credentials
pub struct TestUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl TestUser {
    pub fn admin() -> Self {
        Self {
            name: "Admin".to_string(),
            email: "admin@test.local".to_string(),
            password: "admin123".to_string(),
        }
    }

    pub fn regular() -> Self {
        Self {
            name: "Test User".to_string(),
            email: "testuser@test.local".to_string(),
            password: "password123".to_string(),
        }
    }

    pub fn with_email(email: &str) -> Self {
        Self {
            name: "Test User".to_string(),
            email: email.to_string(),
            password: "password123".to_string(),
        }
    }

    /// Turn the fixture into a creation payload, optionally pre-assigned to
    /// a role.
    pub fn into_new_user(self, role_id: Option<i64>) -> NewUser {
        NewUser {
            name: self.name,
            email: self.email,
            password: self.password,
            is_active: true,
            is_admin: false,
            bio: None,
            profile_picture: None,
            role_id,
        }
    }
}

/// An editor role: may read and update content, nothing more.
pub fn editor_role() -> NewRole {
    NewRole {
        name: "Editor".to_string(),
        description: Some("Can edit content".to_string()),
        permissions: PermissionSet::new().granting("content", ["read", "update"]),
        parent_id: None,
    }
}

/// An admin role granting full control over users and roles.
pub fn admin_role() -> NewRole {
    NewRole {
        name: "Admin".to_string(),
        description: Some("Administers users and roles".to_string()),
        permissions: PermissionSet::new()
            .granting("users", ["create", "read", "update", "delete"])
            .granting("roles", ["create", "read", "update", "delete"]),
        parent_id: None,
    }
}
