use crate::error::LoaderError;
use async_trait::async_trait;
use sdui_model::HttpMethod;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Query parameters of a read request, ordered for stable URLs.
pub type QueryParams = BTreeMap<String, String>;

/// One page of a list response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub items: Vec<Value>,
    pub has_more: bool,
    /// Every other top-level field of the response.
    pub extra: Map<String, Value>,
}

impl Page {
    pub fn new(items: Vec<Value>, has_more: bool) -> Self {
        Self {
            items,
            has_more,
            extra: Map::new(),
        }
    }

    /// Interprets a list response body.
    ///
    /// A bare array is the item list. An object contributes `items` and
    /// `hasMore` (or `has_more`); its remaining fields land in `extra`. Any
    /// other value is an empty page.
    pub fn from_response(body: Value) -> Self {
        match body {
            Value::Array(items) => Self::new(items, false),
            Value::Object(mut fields) => {
                let items = match fields.remove("items") {
                    Some(Value::Array(items)) => items,
                    _ => Vec::new(),
                };
                let has_more = fields
                    .remove("hasMore")
                    .or_else(|| fields.remove("has_more"))
                    .and_then(|v| v.as_bool())
                    .unwrap_or(false);
                Self {
                    items,
                    has_more,
                    extra: fields,
                }
            }
            _ => Self::default(),
        }
    }
}

/// Executes the HTTP side of screen events and actions.
#[async_trait]
pub trait DataLoader: Send + Sync {
    /// GET a list endpoint.
    async fn load(&self, endpoint: &str, params: &QueryParams) -> Result<Page, LoaderError>;

    /// POST or PUT a JSON body. Returns the response body, `Null` when empty.
    async fn submit(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: &Value,
    ) -> Result<Value, LoaderError>;

    async fn delete(&self, endpoint: &str) -> Result<(), LoaderError>;
}
