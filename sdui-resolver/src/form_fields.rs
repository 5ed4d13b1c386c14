use sdui_model::{ControlType, DataBag, ScreenDefinition, Slot, Zone, ZoneType};
use serde_json::Value;

/// Data bag key holding the `[{key, type, label, placeholder, required}]` array.
pub const FIELDS_KEY: &str = "fields";

/// Fills every slot-less form section with slots built from `data["fields"]`.
///
/// Sections that already have slots are left alone, which is what makes the
/// resolver idempotent. Field entries without a `key` are skipped.
pub fn resolve_form_fields(screen: &ScreenDefinition, data: &DataBag) -> ScreenDefinition {
    let mut resolved = screen.clone();
    let Some(Value::Array(fields)) = data.get(FIELDS_KEY) else {
        return resolved;
    };

    let slots: Vec<Slot> = fields.iter().filter_map(field_slot).collect();
    if slots.is_empty() {
        return resolved;
    }

    for zone in &mut resolved.template.zones {
        fill_form_sections(zone, &slots);
    }
    resolved
}

fn fill_form_sections(zone: &mut Zone, slots: &[Slot]) {
    if zone.zone_type == ZoneType::FormSection && zone.slots.is_empty() {
        zone.slots = slots.to_vec();
    }
    for child in &mut zone.zones {
        fill_form_sections(child, slots);
    }
}

fn field_slot(field: &Value) -> Option<Slot> {
    let key = field.get("key")?.as_str()?;
    let text = |name: &str| field.get(name).and_then(Value::as_str).map(str::to_string);

    let control_type = text("type")
        .map(|t| ControlType::from_field_type(&t))
        .unwrap_or(ControlType::TextInput);

    let mut slot = Slot::new(key, control_type).with_field(key);
    slot.label = text("label");
    slot.placeholder = text("placeholder");
    slot.required = field.get("required").and_then(Value::as_bool).unwrap_or(false);
    Some(slot)
}
