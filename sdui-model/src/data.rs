use serde_json::Value;
use std::collections::HashMap;

/// Run-time data a screen is resolved against, keyed by top-level name.
pub type DataBag = HashMap<String, Value>;

/// Renders a scalar JSON value as display text.
///
/// Strings are returned verbatim, numbers and booleans use their JSON text.
/// Null, arrays and objects have no scalar rendering.
pub fn render_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
