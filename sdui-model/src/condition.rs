//! Zone visibility expressions.
//!
//! Grammar: `key`, `!key`, `key == 'literal'`, `key != 'literal'`.
//! Anything else evaluates to `true` so a malformed expression never hides
//! content.

use crate::data::{render_scalar, DataBag};
use serde_json::Value;

/// Evaluates a zone condition against a data bag.
pub fn evaluate_condition(expr: &str, data: &DataBag) -> bool {
    let expr = expr.trim();
    if expr.is_empty() {
        return true;
    }

    if let Some((key, equal, literal)) = split_operator(expr) {
        return match comparison(key, literal) {
            Some((key, literal)) => (scalar_text(data, key) == literal) == equal,
            None => true,
        };
    }

    if let Some(key) = expr.strip_prefix('!') {
        let key = key.trim();
        return if is_key(key) { !truthy(data.get(key)) } else { true };
    }

    if is_key(expr) { truthy(data.get(expr)) } else { true }
}

/// Splits at the first `==` or `!=`. Keys never contain either, so a later
/// occurrence belongs to the literal. The flag is `true` for `==`.
fn split_operator(expr: &str) -> Option<(&str, bool, &str)> {
    let (at, equal) = match (expr.find("=="), expr.find("!=")) {
        (Some(eq), Some(ne)) if ne < eq => (ne, false),
        (Some(eq), _) => (eq, true),
        (None, Some(ne)) => (ne, false),
        (None, None) => return None,
    };
    Some((&expr[..at], equal, &expr[at + 2..]))
}

fn comparison<'a>(key: &'a str, literal: &'a str) -> Option<(&'a str, &'a str)> {
    let key = key.trim();
    if !is_key(key) {
        return None;
    }
    let literal = literal.trim();
    let unquoted = literal
        .strip_prefix('\'')
        .and_then(|l| l.strip_suffix('\''))
        .or_else(|| literal.strip_prefix('"').and_then(|l| l.strip_suffix('"')))
        .unwrap_or(literal);
    Some((key, unquoted))
}

fn is_key(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

fn scalar_text(data: &DataBag, key: &str) -> String {
    data.get(key).and_then(render_scalar).unwrap_or_default()
}

fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(_)) => true,
    }
}
