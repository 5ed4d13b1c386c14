//! Per-screen state machine the UI layer binds to.
//!
//! A [`ScreenViewModel`] owns three observable values: the resolved screen,
//! the screen's data, and the form field values. Every operation folds its
//! errors into those states or into the returned result enum.

use crate::state::StateHolder;
use sdui_contract::{
    ActionContext, ActionDispatcher, Confirmer, EventContext, EventOrchestrator,
};
use sdui_model::{
    ActionResult, DataBag, EventResult, LoadState, ScreenDefinition, ScreenEvent, Zone,
};
use sdui_resolver::ResolverPipeline;
use sdui_sync::{RecentScreenTracker, ScreenLoader};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Data bag key holding the loaded rows.
pub const ITEMS_KEY: &str = "items";

/// Lifecycle of the screen definition. `Success` holds the definition with
/// data and placeholders resolved into it.
pub type ScreenState = LoadState<ScreenDefinition>;

/// Lifecycle of the screen's list data.
#[derive(Debug, Clone, PartialEq)]
pub enum DataState {
    /// No data request has run, or the screen has no contract.
    Idle,
    Loading,
    Loaded {
        items: Vec<Value>,
        has_more: bool,
        page: u32,
    },
    PermissionDenied { permission: String },
    Failed { message: String, retry: bool },
}

/// Shared collaborators every view-model needs.
#[derive(Clone)]
pub struct EngineContext {
    pub screens: Arc<dyn ScreenLoader>,
    pub orchestrator: Arc<EventOrchestrator>,
    pub dispatcher: Arc<ActionDispatcher>,
    pub recent: Arc<RecentScreenTracker>,
    pub pipeline: ResolverPipeline,
    pub confirmer: Option<Arc<dyn Confirmer>>,
}

#[derive(Default)]
struct Inner {
    definition: Option<ScreenDefinition>,
    bag: DataBag,
    query: Option<String>,
    selected: Option<Value>,
    page: u32,
    items: Vec<Value>,
    has_more: bool,
}

pub struct ScreenViewModel {
    screen_key: String,
    params: HashMap<String, String>,
    ctx: EngineContext,
    inner: Mutex<Inner>,
    screen: StateHolder<ScreenState>,
    data: StateHolder<DataState>,
    fields: StateHolder<HashMap<String, Value>>,
}

impl ScreenViewModel {
    pub fn new(
        screen_key: impl Into<String>,
        params: HashMap<String, String>,
        ctx: EngineContext,
    ) -> Self {
        Self {
            screen_key: screen_key.into(),
            params,
            ctx,
            inner: Mutex::new(Inner {
                page: 1,
                ..Inner::default()
            }),
            screen: StateHolder::new(ScreenState::Loading),
            data: StateHolder::new(DataState::Idle),
            fields: StateHolder::default(),
        }
    }

    pub fn screen_key(&self) -> &str {
        &self.screen_key
    }

    pub fn screen(&self) -> &StateHolder<ScreenState> {
        &self.screen
    }

    pub fn data(&self) -> &StateHolder<DataState> {
        &self.data
    }

    pub fn fields(&self) -> &StateHolder<HashMap<String, Value>> {
        &self.fields
    }

    /// Loads the definition, then the screen's data when it has a contract.
    pub async fn load(&self) {
        self.screen.set(ScreenState::Loading);
        let definition = match self.ctx.screens.load_screen(&self.screen_key).await {
            Ok(definition) => definition,
            Err(e) => {
                warn!(screen_key = %self.screen_key, error = %e, "Screen load failed");
                self.screen.set(ScreenState::Failure {
                    message: e.to_string(),
                    retry: e.is_retryable(),
                });
                return;
            }
        };
        self.ctx.recent.record_access(&self.screen_key).await;

        let mut inner = self.inner.lock().await;
        inner.bag = self
            .params
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        inner.definition = Some(definition);
        inner.page = 1;
        inner.items.clear();
        inner.has_more = false;
        inner.query = None;
        inner.selected = None;

        if self.has_contract() {
            self.run_read(&mut inner, ScreenEvent::LoadData, false).await;
        }
        self.publish(&inner);
        self.seed_fields();
    }

    /// Re-runs the data request from page one.
    pub async fn reload_data(&self) {
        let mut inner = self.inner.lock().await;
        if inner.definition.is_none() || !self.has_contract() {
            return;
        }
        inner.page = 1;
        self.run_read(&mut inner, ScreenEvent::Refresh, false).await;
        self.publish(&inner);
    }

    pub async fn search(&self, query: impl Into<String>) {
        let mut inner = self.inner.lock().await;
        inner.query = Some(query.into());
        inner.page = 1;
        self.run_read(&mut inner, ScreenEvent::Search, false).await;
        self.publish(&inner);
    }

    /// Appends the next page. Does nothing when the last page said no more.
    pub async fn load_more(&self) {
        let mut inner = self.inner.lock().await;
        if !inner.has_more {
            debug!(screen_key = %self.screen_key, "No more pages");
            return;
        }
        inner.page += 1;
        let before = inner.page;
        self.run_read(&mut inner, ScreenEvent::LoadMore, true).await;
        if !matches!(self.data.current(), DataState::Loaded { .. }) {
            // Failed page: the next attempt asks for the same page again.
            inner.page = before - 1;
        }
        self.publish(&inner);
    }

    pub async fn select_item(&self, item: Value) -> EventResult {
        let mut inner = self.inner.lock().await;
        inner.selected = Some(item);
        let ctx = self.event_context(&inner);
        self.ctx
            .orchestrator
            .execute(&self.screen_key, ScreenEvent::SelectItem, &ctx)
            .await
    }

    pub async fn clear_selection(&self) {
        self.inner.lock().await.selected = None;
    }

    /// Submits the form: an update when an item is selected, a create otherwise.
    pub async fn save(&self) -> EventResult {
        let inner = self.inner.lock().await;
        let event = if inner.selected.is_some() {
            ScreenEvent::SaveExisting
        } else {
            ScreenEvent::SaveNew
        };
        let ctx = self.event_context(&inner);
        self.ctx
            .orchestrator
            .execute(&self.screen_key, event, &ctx)
            .await
    }

    /// Asks to delete the selected item. The caller confirms the pending
    /// result through [`confirm_delete`](Self::confirm_delete).
    pub async fn delete_selected(&self) -> EventResult {
        let inner = self.inner.lock().await;
        let ctx = self.event_context(&inner);
        self.ctx
            .orchestrator
            .execute(&self.screen_key, ScreenEvent::Delete, &ctx)
            .await
    }

    /// Executes a `PendingDelete` and drops the row on success.
    pub async fn confirm_delete(&self, pending: &EventResult) -> EventResult {
        let EventResult::PendingDelete { item_id, endpoint } = pending else {
            return EventResult::NoOp;
        };
        let result = self
            .ctx
            .orchestrator
            .confirm_delete(&self.screen_key, item_id, endpoint)
            .await;

        if let EventResult::Deleted { item_id } = &result {
            let mut inner = self.inner.lock().await;
            inner.items.retain(|row| !row_has_id(row, item_id));
            if inner.selected.as_ref().is_some_and(|s| row_has_id(s, item_id)) {
                inner.selected = None;
            }
            let rows = Value::Array(inner.items.clone());
            inner.bag.insert(ITEMS_KEY.to_string(), rows);
            self.data.set(DataState::Loaded {
                items: inner.items.clone(),
                has_more: inner.has_more,
                page: inner.page,
            });
            self.publish(&inner);
        }
        result
    }

    pub async fn create(&self) -> EventResult {
        let inner = self.inner.lock().await;
        let ctx = self.event_context(&inner);
        self.ctx
            .orchestrator
            .execute(&self.screen_key, ScreenEvent::Create, &ctx)
            .await
    }

    pub fn update_field(&self, field: impl Into<String>, value: Value) {
        let field = field.into();
        self.fields.update(|fields| {
            fields.insert(field, value);
        });
    }

    /// Top-level zones, and their children, whose conditions hold.
    pub async fn visible_zones(&self) -> Vec<Zone> {
        let ScreenState::Success(screen) = self.screen.current() else {
            return Vec::new();
        };
        let inner = self.inner.lock().await;
        filter_zones(screen.zones(), &inner.bag)
    }

    /// Runs one of the screen's declared actions.
    pub async fn handle_action(&self, action_id: &str) -> ActionResult {
        let ScreenState::Success(screen) = self.screen.current() else {
            return ActionResult::error("screen is not loaded", true);
        };
        let Some(action) = screen.action(action_id) else {
            warn!(screen_key = %self.screen_key, action_id, "Unknown action");
            return ActionResult::error(format!("unknown action '{action_id}'"), false);
        };

        let mut ctx = ActionContext::new(self.screen_key.clone())
            .with_required(screen.required_fields());
        ctx.field_values = self.fields.current();
        let selected = self.inner.lock().await.selected.clone();
        if let Some(item) = selected {
            ctx = ctx.with_selected_item(item);
        }
        if let Some(confirmer) = &self.ctx.confirmer {
            ctx = ctx.with_confirmer(Arc::clone(confirmer));
        }

        let result = self
            .ctx
            .dispatcher
            .dispatch(&self.screen_key, action, &ctx)
            .await;
        info!(screen_key = %self.screen_key, action_id, "Action handled");
        if result == ActionResult::Refresh {
            self.reload_data().await;
        }
        result
    }

    pub fn can_execute(&self, event: ScreenEvent) -> bool {
        self.ctx.orchestrator.can_execute(&self.screen_key, event)
    }

    fn has_contract(&self) -> bool {
        self.ctx.orchestrator.contracts().contains(&self.screen_key)
    }

    fn event_context(&self, inner: &Inner) -> EventContext {
        let mut ctx = EventContext::new().with_page(inner.page);
        if let Some(config) = inner.definition.as_ref().and_then(|d| d.data_config.as_ref()) {
            ctx.params = config.default_params.clone();
        }
        ctx.search_query = inner.query.clone();
        ctx.selected_item = inner.selected.clone();
        ctx.field_values = self.fields.current();
        ctx
    }

    async fn run_read(&self, inner: &mut Inner, event: ScreenEvent, append: bool) {
        self.data.set(DataState::Loading);
        let ctx = self.event_context(inner);
        let result = self
            .ctx
            .orchestrator
            .execute(&self.screen_key, event, &ctx)
            .await;

        match result {
            EventResult::Success {
                items,
                has_more,
                extra,
            } => {
                if append {
                    inner.items.extend(items);
                } else {
                    inner.items = items;
                }
                inner.has_more = has_more;
                inner.bag.extend(extra);
                inner
                    .bag
                    .insert(ITEMS_KEY.to_string(), Value::Array(inner.items.clone()));
                self.data.set(DataState::Loaded {
                    items: inner.items.clone(),
                    has_more,
                    page: inner.page,
                });
            }
            EventResult::PermissionDenied { permission } => {
                self.data.set(DataState::PermissionDenied { permission });
            }
            EventResult::Error { message, retry } => {
                self.data.set(DataState::Failed { message, retry });
            }
            other => {
                debug!(screen_key = %self.screen_key, %event, ?other, "Read event had no rows");
                self.data.set(DataState::Idle);
            }
        }
    }

    fn publish(&self, inner: &Inner) {
        if let Some(definition) = &inner.definition {
            let resolved = self.ctx.pipeline.resolve(definition, &inner.bag);
            self.screen.set(ScreenState::Success(resolved));
        }
    }

    /// Copies literal slot values into the field map without overwriting
    /// anything the user typed.
    fn seed_fields(&self) {
        let ScreenState::Success(screen) = self.screen.current() else {
            return;
        };
        self.fields.update(|fields| {
            for slot in screen.slots() {
                if let (Some(field), Some(value)) = (&slot.field, &slot.value) {
                    fields
                        .entry(field.clone())
                        .or_insert_with(|| Value::String(value.clone()));
                }
            }
        });
    }
}

fn filter_zones(zones: &[Zone], bag: &DataBag) -> Vec<Zone> {
    zones
        .iter()
        .filter(|zone| zone.is_visible(bag))
        .map(|zone| {
            let mut zone = zone.clone();
            zone.zones = filter_zones(&zone.zones, bag);
            zone
        })
        .collect()
}

fn row_has_id(row: &Value, id: &str) -> bool {
    match row.get("id") {
        Some(Value::String(s)) => s == id,
        Some(Value::Number(n)) => n.to_string() == id,
        _ => false,
    }
}
