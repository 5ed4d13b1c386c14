//! Payloads of the full and delta sync endpoints.
//!
//! These use snake_case field names on the wire, unlike screen definitions.

use crate::screen::ScreenDefinition;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub key: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_key: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuItem>,
}

/// A context (role, organisation, ...) the user can switch into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserContext {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub metadata: Value,
}

/// A screen as shipped inside a sync bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenBundleEntry {
    #[serde(flatten)]
    pub definition: ScreenDefinition,
    /// Name of the screen handler the client should attach, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handler_key: Option<String>,
}

impl From<ScreenDefinition> for ScreenBundleEntry {
    fn from(definition: ScreenDefinition) -> Self {
        Self {
            definition,
            handler_key: None,
        }
    }
}

/// Everything a user needs offline: menu, permissions, screens, contexts.
///
/// `hashes` maps every bucket key (see [`BucketKey`]) to the content hash
/// of that bucket and is the only input to "has this bucket changed".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserDataBundle {
    #[serde(default)]
    pub menu: Vec<MenuItem>,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub screens: HashMap<String, ScreenBundleEntry>,
    #[serde(default)]
    pub available_contexts: Vec<UserContext>,
    #[serde(default)]
    pub hashes: HashMap<String, String>,
}

/// A named partition of the sync bundle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BucketKey {
    Menu,
    Permissions,
    AvailableContexts,
    Screen(String),
}

impl BucketKey {
    const SCREEN_PREFIX: &'static str = "screen:";

    /// Parses a wire bucket key. Unknown keys yield `None`.
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "menu" => Some(Self::Menu),
            "permissions" => Some(Self::Permissions),
            "available_contexts" => Some(Self::AvailableContexts),
            other => other
                .strip_prefix(Self::SCREEN_PREFIX)
                .filter(|k| !k.is_empty())
                .map(|k| Self::Screen(k.to_string())),
        }
    }

    pub fn screen(key: impl Into<String>) -> Self {
        Self::Screen(key.into())
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Menu => f.write_str("menu"),
            Self::Permissions => f.write_str("permissions"),
            Self::AvailableContexts => f.write_str("available_contexts"),
            Self::Screen(key) => write!(f, "{}{key}", Self::SCREEN_PREFIX),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeltaSyncRequest {
    pub hashes: HashMap<String, String>,
}

/// New content for one bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketDelta {
    #[serde(default)]
    pub data: Value,
    pub hash: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeltaSyncResponse {
    #[serde(default)]
    pub changed: HashMap<String, BucketDelta>,
    #[serde(default)]
    pub unchanged: Vec<String>,
}
