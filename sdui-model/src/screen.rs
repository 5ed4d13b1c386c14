use crate::action::ActionDefinition;
use crate::slot::Slot;
use crate::zone::Zone;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A complete, declarative description of one application screen.
///
/// `screen_key` is globally unique and is the partition key for both the
/// screen cache and delta sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenDefinition {
    pub screen_id: String,
    pub screen_key: String,
    #[serde(default)]
    pub screen_name: String,
    #[serde(default)]
    pub version: u32,
    pub pattern: ScreenPattern,
    pub template: ScreenTemplate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_config: Option<DataConfig>,
    #[serde(default)]
    pub actions: Vec<ActionDefinition>,
    /// Opaque per-user preferences; never interpreted by the engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_preferences: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ScreenDefinition {
    /// Creates an empty screen with the given identity and pattern.
    pub fn new(screen_key: impl Into<String>, pattern: ScreenPattern) -> Self {
        let screen_key = screen_key.into();
        Self {
            screen_id: screen_key.clone(),
            screen_name: screen_key.clone(),
            screen_key,
            version: 1,
            pattern,
            template: ScreenTemplate::default(),
            data_endpoint: None,
            data_config: None,
            actions: Vec::new(),
            user_preferences: None,
            updated_at: None,
        }
    }

    /// Replaces the zone list.
    pub fn with_zones(mut self, zones: Vec<Zone>) -> Self {
        self.template.zones = zones;
        self
    }

    /// Appends an action.
    pub fn with_action(mut self, action: ActionDefinition) -> Self {
        self.actions.push(action);
        self
    }

    /// Looks up an action by id.
    pub fn action(&self, id: &str) -> Option<&ActionDefinition> {
        self.actions.iter().find(|a| a.id == id)
    }

    /// Top-level zones.
    pub fn zones(&self) -> &[Zone] {
        &self.template.zones
    }

    /// Every slot in the screen, depth-first, including item layouts.
    pub fn slots(&self) -> Vec<&Slot> {
        let mut out = Vec::new();
        for zone in &self.template.zones {
            zone.collect_slots(&mut out);
        }
        out
    }

    /// Field names of every required slot that round-trips data.
    pub fn required_fields(&self) -> Vec<String> {
        self.slots()
            .into_iter()
            .filter(|s| s.required)
            .filter_map(|s| s.field.clone())
            .collect()
    }

    /// Returns a copy with the override for `platform` applied.
    ///
    /// Override zones replace the whole zone list and override navigation
    /// replaces the navigation config. Unknown platforms return the screen
    /// unchanged.
    pub fn for_platform(&self, platform: &str) -> ScreenDefinition {
        let mut screen = self.clone();
        let Some(over) = self
            .template
            .platform_overrides
            .as_ref()
            .and_then(|o| o.get(platform))
        else {
            return screen;
        };
        if let Some(zones) = &over.zones {
            screen.template.zones = zones.clone();
        }
        if let Some(navigation) = &over.navigation {
            screen.template.navigation = Some(navigation.clone());
        }
        screen
    }
}

/// The high-level screen archetype. Drives cache TTL defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScreenPattern {
    Login,
    Form,
    List,
    Dashboard,
    Settings,
    Detail,
    Search,
    Profile,
    Modal,
    Notification,
    Onboarding,
    EmptyState,
}

/// Layout part of a screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenTemplate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigation: Option<NavigationConfig>,
    #[serde(default)]
    pub zones: Vec<Zone>,
    /// Keyed by target platform (e.g. "android", "ios", "web").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_overrides: Option<HashMap<String, PlatformOverride>>,
}

/// Top bar configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub show_back: bool,
    /// Action ids rendered as trailing top-bar buttons.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trailing_actions: Vec<String>,
}

/// Per-platform replacement of parts of the template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zones: Option<Vec<Zone>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigation: Option<NavigationConfig>,
}

/// How a screen's data endpoint is queried.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataConfig {
    #[serde(default)]
    pub default_params: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_interval_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationConfig {
    pub page_size: u32,
}
