use crate::action::ActionRegistry;
use crate::context::ActionContext;
use crate::screen_handler::ScreenHandlerRegistry;
use sdui_model::{ActionDefinition, ActionResult};
use std::sync::Arc;
use tracing::debug;

/// Which handler an action would run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchRoute {
    ScreenHandler,
    Generic,
    Unhandled,
}

/// Picks between a screen override and the generic handler.
pub struct ActionDispatcher {
    screen_handlers: Arc<ScreenHandlerRegistry>,
    actions: Arc<ActionRegistry>,
}

impl ActionDispatcher {
    pub fn new(screen_handlers: Arc<ScreenHandlerRegistry>, actions: Arc<ActionRegistry>) -> Self {
        Self {
            screen_handlers,
            actions,
        }
    }

    /// Pure lookup of the route `dispatch` would take.
    pub fn route(&self, screen_key: &str, action: &ActionDefinition) -> DispatchRoute {
        if self.screen_handlers.find(screen_key, action).is_some() {
            DispatchRoute::ScreenHandler
        } else if self.actions.contains(action.action_type) {
            DispatchRoute::Generic
        } else {
            DispatchRoute::Unhandled
        }
    }

    /// Runs exactly one handler for `action`.
    pub async fn dispatch(
        &self,
        screen_key: &str,
        action: &ActionDefinition,
        ctx: &ActionContext,
    ) -> ActionResult {
        if let Some(handler) = self.screen_handlers.find(screen_key, action) {
            debug!(screen_key, action_id = %action.id, "Screen handler override");
            return handler.handle(action, ctx).await;
        }
        self.actions.handle(action, ctx).await
    }
}
