//! Generic handlers for the built-in action vocabulary.

use crate::action::ActionHandler;
use crate::context::{ActionContext, SessionControl};
use crate::loader::DataLoader;
use async_trait::async_trait;
use sdui_model::{
    ActionDefinition, ActionResult, ActionType, ApiCallConfig, ConfirmConfig, HttpMethod,
    NavigateConfig, SubmitFormConfig,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

fn config<T: DeserializeOwned>(action: &ActionDefinition) -> Result<T, ActionResult> {
    action.config_as().map_err(|e| {
        warn!(action_id = %action.id, error = %e, "Invalid action config");
        ActionResult::error(format!("Invalid config for action '{}': {e}", action.id), false)
    })
}

pub struct NavigateHandler;

#[async_trait]
impl ActionHandler for NavigateHandler {
    fn action_type(&self) -> ActionType {
        ActionType::Navigate
    }

    async fn handle(&self, action: &ActionDefinition, _ctx: &ActionContext) -> ActionResult {
        let config: NavigateConfig = match config(action) {
            Ok(c) => c,
            Err(result) => return result,
        };
        match config.target {
            Some(screen_key) if !screen_key.is_empty() => ActionResult::NavigateTo {
                screen_key,
                params: config.params,
            },
            _ => ActionResult::error(
                format!("Action '{}' has no navigation target", action.id),
                false,
            ),
        }
    }
}

pub struct NavigateBackHandler;

#[async_trait]
impl ActionHandler for NavigateBackHandler {
    fn action_type(&self) -> ActionType {
        ActionType::NavigateBack
    }

    async fn handle(&self, _action: &ActionDefinition, _ctx: &ActionContext) -> ActionResult {
        ActionResult::NavigateBack
    }
}

/// Calls an arbitrary endpoint with the configured body merged with the
/// screen's field values.
pub struct ApiCallHandler {
    loader: Arc<dyn DataLoader>,
}

impl ApiCallHandler {
    pub fn new(loader: Arc<dyn DataLoader>) -> Self {
        Self { loader }
    }
}

#[async_trait]
impl ActionHandler for ApiCallHandler {
    fn action_type(&self) -> ActionType {
        ActionType::ApiCall
    }

    async fn handle(&self, action: &ActionDefinition, ctx: &ActionContext) -> ActionResult {
        let config: ApiCallConfig = match config(action) {
            Ok(c) => c,
            Err(result) => return result,
        };
        let Some(endpoint) = config.endpoint.filter(|e| !e.is_empty()) else {
            return ActionResult::error(format!("Action '{}' has no endpoint", action.id), false);
        };

        let mut body = match config.body {
            Some(Value::Object(map)) => map,
            _ => Default::default(),
        };
        body.extend(ctx.fields_body());
        let body = Value::Object(body);

        let outcome = match config.method.unwrap_or(HttpMethod::Post) {
            HttpMethod::Get => self
                .loader
                .load(&endpoint, &Default::default())
                .await
                .map(|page| Value::Array(page.items)),
            HttpMethod::Delete => self.loader.delete(&endpoint).await.map(|()| Value::Null),
            method => self.loader.submit(method, &endpoint, &body).await,
        };

        match outcome {
            Ok(data) => ActionResult::Success {
                message: config.success_message,
                data: Some(data),
            },
            Err(e) => ActionResult::error(e.message, e.retryable),
        }
    }
}

/// Validates required fields then submits the form.
pub struct SubmitFormHandler {
    loader: Arc<dyn DataLoader>,
}

impl SubmitFormHandler {
    pub fn new(loader: Arc<dyn DataLoader>) -> Self {
        Self { loader }
    }
}

#[async_trait]
impl ActionHandler for SubmitFormHandler {
    fn action_type(&self) -> ActionType {
        ActionType::SubmitForm
    }

    async fn handle(&self, action: &ActionDefinition, ctx: &ActionContext) -> ActionResult {
        let config: SubmitFormConfig = match config(action) {
            Ok(c) => c,
            Err(result) => return result,
        };

        let missing = ctx.missing_required_fields();
        if !missing.is_empty() {
            return ActionResult::error(
                format!("Please fill in: {}", missing.join(", ")),
                false,
            );
        }

        let Some(endpoint) = config.endpoint.filter(|e| !e.is_empty()) else {
            return ActionResult::error(format!("Action '{}' has no endpoint", action.id), false);
        };
        let method = config.method.unwrap_or(HttpMethod::Post);
        let body = Value::Object(ctx.fields_body());

        match self.loader.submit(method, &endpoint, &body).await {
            Ok(response) => match config.success_target {
                Some(target) => ActionResult::navigate(target),
                None => ActionResult::Success {
                    message: config.success_message,
                    data: Some(response),
                },
            },
            Err(e) => ActionResult::error(e.message, e.retryable),
        }
    }
}

pub struct RefreshHandler;

#[async_trait]
impl ActionHandler for RefreshHandler {
    fn action_type(&self) -> ActionType {
        ActionType::Refresh
    }

    async fn handle(&self, _action: &ActionDefinition, _ctx: &ActionContext) -> ActionResult {
        ActionResult::Refresh
    }
}

pub struct ConfirmHandler;

#[async_trait]
impl ActionHandler for ConfirmHandler {
    fn action_type(&self) -> ActionType {
        ActionType::Confirm
    }

    async fn handle(&self, action: &ActionDefinition, ctx: &ActionContext) -> ActionResult {
        let config: ConfirmConfig = match config(action) {
            Ok(c) => c,
            Err(result) => return result,
        };
        let Some(confirmer) = &ctx.confirmer else {
            return ActionResult::error("No confirmation prompt available", false);
        };
        let title = config.title.as_deref().unwrap_or("Confirm");
        let message = config.message.as_deref().unwrap_or("Are you sure?");
        if confirmer.confirm(title, message).await {
            ActionResult::ok()
        } else {
            ActionResult::Cancelled
        }
    }
}

/// Ends the session, when one is wired, then signals logout.
pub struct LogoutHandler {
    session: Option<Arc<dyn SessionControl>>,
}

impl LogoutHandler {
    pub fn new(session: Option<Arc<dyn SessionControl>>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl ActionHandler for LogoutHandler {
    fn action_type(&self) -> ActionType {
        ActionType::Logout
    }

    async fn handle(&self, _action: &ActionDefinition, ctx: &ActionContext) -> ActionResult {
        let Some(session) = &self.session else {
            return ActionResult::Logout;
        };
        match session.end_session().await {
            Ok(()) => {
                info!(screen_key = %ctx.screen_key, "Session ended");
                ActionResult::Logout
            }
            Err(e) => {
                warn!(error = %e, "Failed to end session");
                ActionResult::error(format!("Logout failed: {e}"), true)
            }
        }
    }
}
