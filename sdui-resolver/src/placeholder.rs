use sdui_model::{ScreenDefinition, Slot, Zone};
use std::collections::HashMap;

/// Placeholder name → substitution text.
pub type Placeholders = HashMap<String, String>;

/// Substitutes `{key}` tokens in every slot's label, value and placeholder,
/// and in the navigation title.
pub fn resolve_placeholders(
    screen: &ScreenDefinition,
    placeholders: &Placeholders,
) -> ScreenDefinition {
    let mut resolved = screen.clone();
    if placeholders.is_empty() {
        return resolved;
    }
    let expansions = Expansions::new(placeholders);
    if let Some(nav) = &mut resolved.template.navigation {
        substitute_opt(&mut nav.title, &expansions);
    }
    for zone in &mut resolved.template.zones {
        substitute_zone(zone, &expansions);
    }
    resolved
}

/// Replaces `{key}` tokens found in `placeholders`; unmatched tokens are kept
/// verbatim, as is a `{` with no closing brace.
///
/// Replacement text is itself expanded, so the result never contains a token
/// a second call would change. A key whose expansion refers back to itself is
/// left as its `{key}` token.
pub fn substitute(text: &str, placeholders: &Placeholders) -> String {
    Expansions::new(placeholders).apply(text)
}

/// Fully expanded replacement per key; `None` marks a key that reaches a cycle.
struct Expansions {
    resolved: HashMap<String, Option<String>>,
}

impl Expansions {
    fn new(placeholders: &Placeholders) -> Self {
        let mut resolved = HashMap::with_capacity(placeholders.len());
        let mut stack = Vec::new();
        for key in placeholders.keys() {
            expand_key(key, placeholders, &mut resolved, &mut stack);
        }
        Self { resolved }
    }

    fn lookup(&self, key: &str) -> Option<String> {
        self.resolved.get(key).cloned().flatten()
    }

    /// Substitutes until the text stops changing. Braces split across a
    /// replacement and its surroundings can form new tokens; text that never
    /// settles within the bound is returned untouched.
    fn apply(&self, text: &str) -> String {
        let mut current = replace_tokens(text, |key| self.lookup(key));
        for _ in 0..=self.resolved.len() {
            let next = replace_tokens(&current, |key| self.lookup(key));
            if next == current {
                return current;
            }
            current = next;
        }
        text.to_string()
    }
}

fn expand_key(
    key: &str,
    placeholders: &Placeholders,
    resolved: &mut HashMap<String, Option<String>>,
    stack: &mut Vec<String>,
) -> Option<String> {
    if let Some(done) = resolved.get(key) {
        return done.clone();
    }
    if stack.iter().any(|k| k == key) {
        return None;
    }
    let raw = placeholders.get(key)?;

    stack.push(key.to_string());
    let mut cyclic = false;
    let expanded = replace_tokens(raw, |inner| {
        if !placeholders.contains_key(inner) {
            return None;
        }
        let value = expand_key(inner, placeholders, resolved, stack);
        cyclic |= value.is_none();
        value
    });
    stack.pop();

    let result = (!cyclic).then_some(expanded);
    resolved.insert(key.to_string(), result.clone());
    result
}

/// Scans `text` for `{key}` tokens and replaces those `replace` maps.
fn replace_tokens(text: &str, mut replace: impl FnMut(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };
        let key = &after[..close];
        // A nested `{` means this brace is literal text; retry from the inner one.
        if key.contains('{') {
            out.push('{');
            rest = after;
            continue;
        }
        match replace(key) {
            Some(replacement) => out.push_str(&replacement),
            None => {
                out.push('{');
                out.push_str(key);
                out.push('}');
            }
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    out
}

fn substitute_zone(zone: &mut Zone, expansions: &Expansions) {
    for slot in &mut zone.slots {
        substitute_slot(slot, expansions);
    }
    if let Some(layout) = &mut zone.item_layout {
        for slot in &mut layout.slots {
            substitute_slot(slot, expansions);
        }
    }
    for child in &mut zone.zones {
        substitute_zone(child, expansions);
    }
}

fn substitute_slot(slot: &mut Slot, expansions: &Expansions) {
    substitute_opt(&mut slot.label, expansions);
    substitute_opt(&mut slot.value, expansions);
    substitute_opt(&mut slot.placeholder, expansions);
}

fn substitute_opt(text: &mut Option<String>, expansions: &Expansions) {
    if let Some(current) = text.as_deref().filter(|t| t.contains('{')) {
        *text = Some(expansions.apply(current));
    }
}
