use crate::event::HttpMethod;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A declarative action embedded in a screen.
///
/// `config` is opaque here; its shape depends on `action_type` and is read
/// through [`ActionDefinition::config_as`] by the handler that owns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDefinition {
    pub id: String,
    #[serde(default)]
    pub trigger: ActionTrigger,
    #[serde(rename = "type")]
    pub action_type: ActionType,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub config: Value,
}

impl ActionDefinition {
    pub fn new(id: impl Into<String>, action_type: ActionType) -> Self {
        Self {
            id: id.into(),
            trigger: ActionTrigger::default(),
            action_type,
            config: Value::Null,
        }
    }

    pub fn with_trigger(mut self, trigger: ActionTrigger) -> Self {
        self.trigger = trigger;
        self
    }

    pub fn with_config(mut self, config: Value) -> Self {
        self.config = config;
        self
    }

    /// Decodes `config` into a typed view. A missing config decodes as `{}`.
    pub fn config_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        match &self.config {
            Value::Null => serde_json::from_value(Value::Object(Default::default())),
            config => serde_json::from_value(config.clone()),
        }
    }
}

/// What user gesture fires an action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionTrigger {
    #[default]
    ButtonClick,
    ItemClick,
    PullRefresh,
    FabClick,
    Swipe,
    LongPress,
}

/// The generic action vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    Navigate,
    NavigateBack,
    ApiCall,
    SubmitForm,
    Refresh,
    Confirm,
    Logout,
}

/// Config of a `NAVIGATE` action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NavigateConfig {
    #[serde(alias = "screenKey", alias = "targetScreen")]
    pub target: Option<String>,
    pub params: HashMap<String, String>,
}

/// Config of an `API_CALL` action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiCallConfig {
    pub endpoint: Option<String>,
    pub method: Option<HttpMethod>,
    pub body: Option<Value>,
    pub success_message: Option<String>,
}

/// Config of a `SUBMIT_FORM` action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SubmitFormConfig {
    pub endpoint: Option<String>,
    pub method: Option<HttpMethod>,
    pub success_message: Option<String>,
    /// Screen to navigate to after a successful submit.
    pub success_target: Option<String>,
}

/// Config of a `CONFIRM` action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfirmConfig {
    pub title: Option<String>,
    pub message: Option<String>,
    pub confirm_label: Option<String>,
}
