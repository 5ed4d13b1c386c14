use crate::context::ActionContext;
use async_trait::async_trait;
use sdui_model::{ActionDefinition, ActionResult};
use std::collections::HashMap;
use std::sync::Arc;

/// Screen-specific override for actions.
///
/// When registered for a screen and [`can_handle`](Self::can_handle) returns
/// true, it runs instead of the generic handler.
#[async_trait]
pub trait ScreenHandler: Send + Sync {
    fn can_handle(&self, action: &ActionDefinition) -> bool;

    async fn handle(&self, action: &ActionDefinition, ctx: &ActionContext) -> ActionResult;
}

/// Immutable map of screen key to its handler.
#[derive(Default)]
pub struct ScreenHandlerRegistry {
    handlers: HashMap<String, Arc<dyn ScreenHandler>>,
}

impl ScreenHandlerRegistry {
    pub fn new<I, K>(handlers: I) -> Self
    where
        I: IntoIterator<Item = (K, Arc<dyn ScreenHandler>)>,
        K: Into<String>,
    {
        Self {
            handlers: handlers.into_iter().map(|(k, h)| (k.into(), h)).collect(),
        }
    }

    pub fn get(&self, screen_key: &str) -> Option<Arc<dyn ScreenHandler>> {
        self.handlers.get(screen_key).cloned()
    }

    /// The handler for `screen_key` if it claims `action`.
    pub fn find(
        &self,
        screen_key: &str,
        action: &ActionDefinition,
    ) -> Option<Arc<dyn ScreenHandler>> {
        self.handlers
            .get(screen_key)
            .filter(|handler| handler.can_handle(action))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
