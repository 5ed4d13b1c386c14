use crate::context::{ActionContext, SessionControl};
use crate::handlers::{
    ApiCallHandler, ConfirmHandler, LogoutHandler, NavigateBackHandler, NavigateHandler,
    RefreshHandler, SubmitFormHandler,
};
use crate::loader::DataLoader;
use async_trait::async_trait;
use sdui_model::{ActionDefinition, ActionResult, ActionType};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Generic executor for one [`ActionType`].
#[async_trait]
pub trait ActionHandler: Send + Sync {
    fn action_type(&self) -> ActionType;

    async fn handle(&self, action: &ActionDefinition, ctx: &ActionContext) -> ActionResult;
}

/// Immutable map of action type to its generic handler.
#[derive(Default)]
pub struct ActionRegistry {
    handlers: HashMap<ActionType, Arc<dyn ActionHandler>>,
}

impl ActionRegistry {
    /// Indexes handlers by the type they report. Later entries win.
    pub fn new(handlers: Vec<Arc<dyn ActionHandler>>) -> Self {
        Self {
            handlers: handlers
                .into_iter()
                .map(|h| (h.action_type(), h))
                .collect(),
        }
    }

    /// The standard handler set for every [`ActionType`].
    pub fn with_defaults(
        loader: Arc<dyn DataLoader>,
        session: Option<Arc<dyn SessionControl>>,
    ) -> Self {
        Self::new(vec![
            Arc::new(NavigateHandler),
            Arc::new(NavigateBackHandler),
            Arc::new(ApiCallHandler::new(Arc::clone(&loader))),
            Arc::new(SubmitFormHandler::new(loader)),
            Arc::new(RefreshHandler),
            Arc::new(ConfirmHandler),
            Arc::new(LogoutHandler::new(session)),
        ])
    }

    pub fn get(&self, action_type: ActionType) -> Option<Arc<dyn ActionHandler>> {
        self.handlers.get(&action_type).cloned()
    }

    pub fn contains(&self, action_type: ActionType) -> bool {
        self.handlers.contains_key(&action_type)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Runs the generic handler for `action`.
    pub async fn handle(&self, action: &ActionDefinition, ctx: &ActionContext) -> ActionResult {
        match self.handlers.get(&action.action_type) {
            Some(handler) => {
                debug!(action_id = %action.id, action_type = ?action.action_type, "Running action");
                handler.handle(action, ctx).await
            }
            None => {
                warn!(action_id = %action.id, action_type = ?action.action_type, "No handler for action");
                ActionResult::error(
                    format!("No handler registered for action '{}'", action.id),
                    false,
                )
            }
        }
    }
}
