use crate::form_fields::resolve_form_fields;
use crate::placeholder::{resolve_placeholders, Placeholders};
use crate::slot_binding::resolve_slot_bindings;
use sdui_model::{DataBag, ScreenDefinition};

/// Runs the resolvers in their required order: form fields, slot bindings,
/// placeholders.
#[derive(Debug, Clone, Default)]
pub struct ResolverPipeline {
    placeholders: Placeholders,
}

impl ResolverPipeline {
    pub fn new(placeholders: Placeholders) -> Self {
        Self { placeholders }
    }

    pub fn placeholders(&self) -> &Placeholders {
        &self.placeholders
    }

    /// Adds or replaces one placeholder.
    pub fn with_placeholder(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.placeholders.insert(key.into(), value.into());
        self
    }

    pub fn resolve(&self, screen: &ScreenDefinition, data: &DataBag) -> ScreenDefinition {
        let screen = resolve_form_fields(screen, data);
        let screen = resolve_slot_bindings(&screen, data);
        resolve_placeholders(&screen, &self.placeholders)
    }
}
