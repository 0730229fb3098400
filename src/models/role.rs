//! Role model and permission set.
//!
//! Roles form a forest: each role may reference a parent role in the same
//! table, and the parent chain must stay acyclic. The permission set is a
//! JSON-encoded mapping from resource name to the set of allowed actions,
//! e.g. `{"content": ["read", "update"]}`.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Mapping from resource name to the set of permitted action names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeMap<String, BTreeSet<String>>);

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `action` to the set of allowed actions on `resource`.
    pub fn grant(&mut self, resource: impl Into<String>, action: impl Into<String>) {
        self.0
            .entry(resource.into())
            .or_default()
            .insert(action.into());
    }

    /// Builder-style `grant`, convenient for constructing fixtures.
    pub fn granting<I, S>(mut self, resource: impl Into<String>, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entry = self.0.entry(resource.into()).or_default();
        entry.extend(actions.into_iter().map(Into::into));
        self
    }

    /// True iff `action` is allowed on `resource`. Absent resource keys are
    /// simply not allowed, never an error.
    pub fn allows(&self, resource: &str, action: &str) -> bool {
        self.0
            .get(resource)
            .map(|actions| actions.contains(action))
            .unwrap_or(false)
    }

    /// Actions allowed on `resource`, if any are granted.
    pub fn actions_for(&self, resource: &str) -> Option<&BTreeSet<String>> {
        self.0.get(resource)
    }

    /// Union `other` into this set, keeping existing grants.
    pub fn merge(&mut self, other: &PermissionSet) {
        for (resource, actions) in &other.0 {
            self.0
                .entry(resource.clone())
                .or_default()
                .extend(actions.iter().cloned());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Role entity
#[derive(Debug, Clone, Serialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub permissions: PermissionSet,
    pub parent_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
