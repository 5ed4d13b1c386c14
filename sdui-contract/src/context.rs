use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// Inputs to a screen event.
#[derive(Debug, Clone, PartialEq)]
pub struct EventContext {
    pub search_query: Option<String>,
    /// The row the user picked, as a JSON object.
    pub selected_item: Option<Value>,
    pub field_values: HashMap<String, Value>,
    /// 1-based page number.
    pub page: u32,
    /// Extra query parameters, e.g. a screen's default params.
    pub params: HashMap<String, String>,
}

impl Default for EventContext {
    fn default() -> Self {
        Self {
            search_query: None,
            selected_item: None,
            field_values: HashMap::new(),
            page: 1,
            params: HashMap::new(),
        }
    }
}

impl EventContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.search_query = Some(query.into());
        self
    }

    pub fn with_selected_item(mut self, item: Value) -> Self {
        self.selected_item = Some(item);
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.field_values.insert(name.into(), value);
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// The selected item's `id`, whether it is a string or a number.
    pub fn selected_item_id(&self) -> Option<String> {
        match self.selected_item.as_ref()?.get("id")? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Query parameters for a read request: extra params, then `q` and `page`.
    pub fn query_params(&self) -> BTreeMap<String, String> {
        let mut params: BTreeMap<String, String> = self
            .params
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        if let Some(q) = self.search_query.as_deref().filter(|q| !q.is_empty()) {
            params.insert("q".to_string(), q.to_string());
        }
        params.insert("page".to_string(), self.page.to_string());
        params
    }

    /// Field values as a JSON object request body.
    pub fn fields_body(&self) -> Value {
        Value::Object(
            self.field_values
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect::<Map<String, Value>>(),
        )
    }
}

/// Asks the user to confirm something.
#[async_trait]
pub trait Confirmer: Send + Sync {
    async fn confirm(&self, title: &str, message: &str) -> bool;
}

/// Ends the signed-in session.
#[async_trait]
pub trait SessionControl: Send + Sync {
    async fn end_session(&self) -> Result<(), String>;
}

/// Inputs to an action handler.
#[derive(Clone, Default)]
pub struct ActionContext {
    pub screen_key: String,
    pub field_values: HashMap<String, Value>,
    pub selected_item: Option<Value>,
    /// Field names that must be non-empty before a form submits.
    pub required_fields: Vec<String>,
    pub confirmer: Option<Arc<dyn Confirmer>>,
}

impl ActionContext {
    pub fn new(screen_key: impl Into<String>) -> Self {
        Self {
            screen_key: screen_key.into(),
            ..Self::default()
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.field_values.insert(name.into(), value);
        self
    }

    pub fn with_required(mut self, fields: Vec<String>) -> Self {
        self.required_fields = fields;
        self
    }

    pub fn with_selected_item(mut self, item: Value) -> Self {
        self.selected_item = Some(item);
        self
    }

    pub fn with_confirmer(mut self, confirmer: Arc<dyn Confirmer>) -> Self {
        self.confirmer = Some(confirmer);
        self
    }

    /// Required fields that are absent, null or blank.
    pub fn missing_required_fields(&self) -> Vec<&str> {
        self.required_fields
            .iter()
            .filter(|name| match self.field_values.get(name.as_str()) {
                None | Some(Value::Null) => true,
                Some(Value::String(s)) => s.trim().is_empty(),
                Some(_) => false,
            })
            .map(String::as_str)
            .collect()
    }

    pub fn fields_body(&self) -> Map<String, Value> {
        self.field_values
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl fmt::Debug for ActionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionContext")
            .field("screen_key", &self.screen_key)
            .field("field_values", &self.field_values)
            .field("selected_item", &self.selected_item)
            .field("required_fields", &self.required_fields)
            .field("has_confirmer", &self.confirmer.is_some())
            .finish()
    }
}
