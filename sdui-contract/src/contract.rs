//! Per-screen contracts.
//!
//! A contract tells the orchestrator, for each [`ScreenEvent`], which
//! endpoint to call, which permission is required and how to shape the
//! request and response. Custom behaviour that does not fit the CRUD mould
//! is registered as a named [`CustomEventHandler`].

use crate::context::EventContext;
use crate::loader::DataLoader;
use crate::permission::Verb;
use async_trait::async_trait;
use sdui_model::{EventResult, HttpMethod, ScreenEvent};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Custom handler id consulted when `SELECT_ITEM` has no endpoint.
pub const SELECT_ITEM_HANDLER: &str = "select-item";
/// Custom handler id consulted when `CREATE` has no endpoint.
pub const CREATE_HANDLER: &str = "create";

/// Binds a screen to the backend.
pub trait ScreenContract: Send + Sync {
    fn screen_key(&self) -> &str;

    /// Resource name used to build permission strings.
    fn resource(&self) -> &str;

    /// Endpoint for `event`, or `None` when the event has no HTTP mapping.
    fn endpoint_for(&self, event: ScreenEvent, ctx: &EventContext) -> Option<String>;

    /// Permission required for `event`. Defaults to `<resource>:<verb>`.
    fn permission_for(&self, event: ScreenEvent) -> Option<String> {
        Verb::for_event(event).map(|verb| verb.permission(self.resource()))
    }

    /// Overrides the event's default HTTP method.
    fn method_for(&self, event: ScreenEvent) -> Option<HttpMethod> {
        let _ = event;
        None
    }

    /// Shapes the body of a POST/PUT.
    fn before_request(&self, event: ScreenEvent, ctx: &EventContext, body: Value) -> Value {
        let _ = (event, ctx);
        body
    }

    /// Shapes a POST/PUT response before it is returned.
    fn after_response(&self, event: ScreenEvent, response: Value) -> Value {
        let _ = event;
        response
    }

    fn custom_handler(&self, id: &str) -> Option<Arc<dyn CustomEventHandler>> {
        let _ = id;
        None
    }
}

/// Named behaviour attached to a contract.
#[async_trait]
pub trait CustomEventHandler: Send + Sync {
    /// Permission checked by `execute_custom` before running the handler.
    fn required_permission(&self) -> Option<&str> {
        None
    }

    async fn handle(&self, ctx: &EventContext, loader: &dyn DataLoader) -> EventResult;
}

/// A data-driven contract for a conventional CRUD resource.
///
/// Default endpoints, relative to `base`:
///
/// | Event | Endpoint |
/// |---|---|
/// | LOAD_DATA, SEARCH, LOAD_MORE, REFRESH, SAVE_NEW | `base` |
/// | SAVE_EXISTING, DELETE | `base/{id}` |
/// | SELECT_ITEM, CREATE | none |
///
/// Explicit endpoints may use an `{id}` token filled from the selected item.
pub struct CrudContract {
    screen_key: String,
    resource: String,
    base_endpoint: String,
    endpoints: HashMap<ScreenEvent, String>,
    permissions: HashMap<ScreenEvent, Option<String>>,
    methods: HashMap<ScreenEvent, HttpMethod>,
    custom: HashMap<String, Arc<dyn CustomEventHandler>>,
}

impl CrudContract {
    pub fn new(
        screen_key: impl Into<String>,
        resource: impl Into<String>,
        base_endpoint: impl Into<String>,
    ) -> Self {
        Self {
            screen_key: screen_key.into(),
            resource: resource.into(),
            base_endpoint: base_endpoint.into().trim_end_matches('/').to_string(),
            endpoints: HashMap::new(),
            permissions: HashMap::new(),
            methods: HashMap::new(),
            custom: HashMap::new(),
        }
    }

    pub fn with_endpoint(mut self, event: ScreenEvent, endpoint: impl Into<String>) -> Self {
        self.endpoints.insert(event, endpoint.into());
        self
    }

    /// Overrides the permission for an event. `None` makes it unrestricted.
    pub fn with_permission(mut self, event: ScreenEvent, permission: Option<&str>) -> Self {
        self.permissions
            .insert(event, permission.map(str::to_string));
        self
    }

    pub fn with_method(mut self, event: ScreenEvent, method: HttpMethod) -> Self {
        self.methods.insert(event, method);
        self
    }

    pub fn with_custom_handler(
        mut self,
        id: impl Into<String>,
        handler: Arc<dyn CustomEventHandler>,
    ) -> Self {
        self.custom.insert(id.into(), handler);
        self
    }

    pub fn base_endpoint(&self) -> &str {
        &self.base_endpoint
    }

    fn item_endpoint(&self, ctx: &EventContext) -> Option<String> {
        ctx.selected_item_id()
            .map(|id| format!("{}/{id}", self.base_endpoint))
    }
}

impl ScreenContract for CrudContract {
    fn screen_key(&self) -> &str {
        &self.screen_key
    }

    fn resource(&self) -> &str {
        &self.resource
    }

    fn endpoint_for(&self, event: ScreenEvent, ctx: &EventContext) -> Option<String> {
        if let Some(template) = self.endpoints.get(&event) {
            if !template.contains("{id}") {
                return Some(template.clone());
            }
            return ctx
                .selected_item_id()
                .map(|id| template.replace("{id}", &id));
        }
        match event {
            ScreenEvent::LoadData
            | ScreenEvent::Search
            | ScreenEvent::LoadMore
            | ScreenEvent::Refresh
            | ScreenEvent::SaveNew => Some(self.base_endpoint.clone()),
            ScreenEvent::SaveExisting | ScreenEvent::Delete => self.item_endpoint(ctx),
            ScreenEvent::SelectItem | ScreenEvent::Create => None,
        }
    }

    fn permission_for(&self, event: ScreenEvent) -> Option<String> {
        match self.permissions.get(&event) {
            Some(over) => over.clone(),
            None => Verb::for_event(event).map(|verb| verb.permission(&self.resource)),
        }
    }

    fn method_for(&self, event: ScreenEvent) -> Option<HttpMethod> {
        self.methods.get(&event).copied()
    }

    fn custom_handler(&self, id: &str) -> Option<Arc<dyn CustomEventHandler>> {
        self.custom.get(id).cloned()
    }
}
