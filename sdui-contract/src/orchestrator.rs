//! Routes screen events through contracts.
//!
//! Order per event: contract lookup, permission check, endpoint, method,
//! loader call. A denied permission returns before the loader is touched.
//! Every failure is folded into [`EventResult::Error`].

use crate::context::EventContext;
use crate::contract::{ScreenContract, CREATE_HANDLER, SELECT_ITEM_HANDLER};
use crate::error::OrchestratorError;
use crate::loader::DataLoader;
use crate::permission::PermissionOracle;
use crate::registry::ContractRegistry;
use sdui_model::{EventResult, HttpMethod, ScreenEvent};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct EventOrchestrator {
    contracts: Arc<ContractRegistry>,
    loader: Arc<dyn DataLoader>,
    permissions: Arc<dyn PermissionOracle>,
}

impl EventOrchestrator {
    pub fn new(
        contracts: Arc<ContractRegistry>,
        loader: Arc<dyn DataLoader>,
        permissions: Arc<dyn PermissionOracle>,
    ) -> Self {
        Self {
            contracts,
            loader,
            permissions,
        }
    }

    pub fn contracts(&self) -> &ContractRegistry {
        &self.contracts
    }

    /// Executes `event` on `screen_key`'s contract.
    pub async fn execute(
        &self,
        screen_key: &str,
        event: ScreenEvent,
        ctx: &EventContext,
    ) -> EventResult {
        match self.try_execute(screen_key, event, ctx).await {
            Ok(result) => result,
            Err(e) => {
                warn!(screen_key, %event, error = %e, "Screen event failed");
                EventResult::error(e.to_string(), e.is_retryable())
            }
        }
    }

    async fn try_execute(
        &self,
        screen_key: &str,
        event: ScreenEvent,
        ctx: &EventContext,
    ) -> Result<EventResult, OrchestratorError> {
        let contract = self.contract(screen_key)?;

        if let Some(permission) = contract.permission_for(event) {
            if !self.permissions.has_permission(&permission) {
                info!(screen_key, %event, %permission, "Screen event denied");
                return Ok(EventResult::PermissionDenied { permission });
            }
        }

        let Some(endpoint) = contract.endpoint_for(event, ctx) else {
            return self.fallback(contract.as_ref(), event, ctx).await;
        };

        let method = contract
            .method_for(event)
            .unwrap_or_else(|| event.default_method());
        debug!(screen_key, %event, %method, %endpoint, "Executing screen event");

        match method {
            HttpMethod::Get => {
                let page = self.loader.load(&endpoint, &ctx.query_params()).await?;
                Ok(EventResult::Success {
                    items: page.items,
                    has_more: page.has_more,
                    extra: page.extra,
                })
            }
            HttpMethod::Post | HttpMethod::Put => {
                let body = contract.before_request(event, ctx, ctx.fields_body());
                let response = self.loader.submit(method, &endpoint, &body).await?;
                Ok(EventResult::Submitted {
                    response: contract.after_response(event, response),
                })
            }
            HttpMethod::Delete => {
                let item_id = ctx
                    .selected_item_id()
                    .ok_or_else(|| OrchestratorError::MissingItemId(screen_key.to_string()))?;
                Ok(EventResult::PendingDelete { item_id, endpoint })
            }
        }
    }

    /// Events without an endpoint.
    async fn fallback(
        &self,
        contract: &dyn ScreenContract,
        event: ScreenEvent,
        ctx: &EventContext,
    ) -> Result<EventResult, OrchestratorError> {
        match event {
            ScreenEvent::SelectItem => match contract.custom_handler(SELECT_ITEM_HANDLER) {
                Some(handler) => Ok(handler.handle(ctx, self.loader.as_ref()).await),
                None => Ok(EventResult::NoOp),
            },
            ScreenEvent::Create => match contract.custom_handler(CREATE_HANDLER) {
                Some(handler) => Ok(handler.handle(ctx, self.loader.as_ref()).await),
                None => Ok(EventResult::navigate(format!("{}-form", contract.resource()))),
            },
            other => Err(OrchestratorError::NoEndpoint {
                screen_key: contract.screen_key().to_string(),
                event: other,
            }),
        }
    }

    /// Runs a named custom handler after checking its own permission.
    pub async fn execute_custom(
        &self,
        screen_key: &str,
        handler_id: &str,
        ctx: &EventContext,
    ) -> EventResult {
        let contract = match self.contract(screen_key) {
            Ok(contract) => contract,
            Err(e) => return EventResult::error(e.to_string(), false),
        };
        let Some(handler) = contract.custom_handler(handler_id) else {
            let e = OrchestratorError::NoCustomHandler {
                screen_key: screen_key.to_string(),
                handler_id: handler_id.to_string(),
            };
            warn!(screen_key, handler_id, "Unknown custom handler");
            return EventResult::error(e.to_string(), false);
        };
        if let Some(permission) = handler.required_permission() {
            if !self.permissions.has_permission(permission) {
                info!(screen_key, handler_id, permission, "Custom handler denied");
                return EventResult::PermissionDenied {
                    permission: permission.to_string(),
                };
            }
        }
        handler.handle(ctx, self.loader.as_ref()).await
    }

    /// Performs a delete previously returned as `PendingDelete`.
    pub async fn confirm_delete(
        &self,
        screen_key: &str,
        item_id: &str,
        endpoint: &str,
    ) -> EventResult {
        let contract = match self.contract(screen_key) {
            Ok(contract) => contract,
            Err(e) => return EventResult::error(e.to_string(), false),
        };
        if let Some(permission) = contract.permission_for(ScreenEvent::Delete) {
            if !self.permissions.has_permission(&permission) {
                return EventResult::PermissionDenied { permission };
            }
        }
        match self.loader.delete(endpoint).await {
            Ok(()) => {
                info!(screen_key, item_id, "Item deleted");
                EventResult::Deleted {
                    item_id: item_id.to_string(),
                }
            }
            Err(e) => {
                warn!(screen_key, item_id, error = %e, "Delete failed");
                let e = OrchestratorError::from(e);
                EventResult::error(e.to_string(), e.is_retryable())
            }
        }
    }

    /// Whether the user may run `event` on `screen_key`. No side effects.
    pub fn can_execute(&self, screen_key: &str, event: ScreenEvent) -> bool {
        let Some(contract) = self.contracts.get(screen_key) else {
            return false;
        };
        contract
            .permission_for(event)
            .is_none_or(|permission| self.permissions.has_permission(&permission))
    }

    /// Whether the custom handler exists and its permission is held.
    pub fn can_execute_custom(&self, screen_key: &str, handler_id: &str) -> bool {
        let Some(handler) = self
            .contracts
            .get(screen_key)
            .and_then(|contract| contract.custom_handler(handler_id))
        else {
            return false;
        };
        handler
            .required_permission()
            .is_none_or(|permission| self.permissions.has_permission(permission))
    }

    fn contract(&self, screen_key: &str) -> Result<Arc<dyn ScreenContract>, OrchestratorError> {
        self.contracts
            .get(screen_key)
            .ok_or_else(|| OrchestratorError::UnknownScreen(screen_key.to_string()))
    }
}
