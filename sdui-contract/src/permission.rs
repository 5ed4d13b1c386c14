//! Resource-scoped permission model.
//!
//! Permissions are plain strings of the form `<resource>:<verb>`, e.g.
//! `users:delete`. Two wildcards are recognised:
//! - `<resource>:*` grants every verb on that resource
//! - `*` grants everything

use sdui_model::ScreenEvent;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, RwLock};

/// Answers whether the current user holds a permission string.
pub trait PermissionOracle: Send + Sync {
    fn has_permission(&self, permission: &str) -> bool;
}

/// CRUD verb a screen event requires on its contract's resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verb {
    Read,
    Create,
    Update,
    Delete,
}

impl Verb {
    /// The verb an event needs. `REFRESH` needs none.
    pub fn for_event(event: ScreenEvent) -> Option<Self> {
        match event {
            ScreenEvent::LoadData
            | ScreenEvent::Search
            | ScreenEvent::SelectItem
            | ScreenEvent::LoadMore => Some(Self::Read),
            ScreenEvent::SaveNew | ScreenEvent::Create => Some(Self::Create),
            ScreenEvent::SaveExisting => Some(Self::Update),
            ScreenEvent::Delete => Some(Self::Delete),
            ScreenEvent::Refresh => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// `<resource>:<verb>`.
    pub fn permission(self, resource: &str) -> String {
        format!("{resource}:{}", self.as_str())
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of permission strings granted to the current user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSet {
    granted: HashSet<String>,
}

impl PermissionSet {
    pub fn new<I, S>(permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            granted: permissions.into_iter().map(Into::into).collect(),
        }
    }

    /// A set granting everything.
    pub fn all_granted() -> Self {
        Self::new(["*"])
    }

    pub fn grant(&mut self, permission: impl Into<String>) {
        self.granted.insert(permission.into());
    }

    pub fn revoke(&mut self, permission: &str) {
        self.granted.remove(permission);
    }

    pub fn is_granted(&self, permission: &str) -> bool {
        if self.granted.contains(permission) || self.granted.contains("*") {
            return true;
        }
        match permission.split_once(':') {
            Some((resource, _)) => self.granted.contains(&format!("{resource}:*")),
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.granted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.granted.is_empty()
    }
}

impl PermissionOracle for PermissionSet {
    fn has_permission(&self, permission: &str) -> bool {
        self.is_granted(permission)
    }
}

/// A [`PermissionSet`] that can be swapped after a sync while the
/// orchestrator holds a reference to it.
#[derive(Debug, Clone, Default)]
pub struct SharedPermissions {
    inner: Arc<RwLock<PermissionSet>>,
}

impl SharedPermissions {
    pub fn new(set: PermissionSet) -> Self {
        Self {
            inner: Arc::new(RwLock::new(set)),
        }
    }

    /// Replaces the whole set.
    pub fn replace(&self, set: PermissionSet) {
        match self.inner.write() {
            Ok(mut guard) => *guard = set,
            Err(poisoned) => *poisoned.into_inner() = set,
        }
    }

    pub fn snapshot(&self) -> PermissionSet {
        match self.inner.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl PermissionOracle for SharedPermissions {
    fn has_permission(&self, permission: &str) -> bool {
        // A poisoned lock denies rather than guessing.
        self.inner
            .read()
            .map(|set| set.is_granted(permission))
            .unwrap_or(false)
    }
}
