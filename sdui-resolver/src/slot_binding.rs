use sdui_model::{render_scalar, BindingTarget, DataBag, ScreenDefinition, Slot, Zone};

/// Copies bound data into slots that do not already carry a literal.
///
/// A slot bound with `slot:<key>` receives `data[key]` into `label` if its
/// control type is label-bearing, otherwise into `value`. Existing literals
/// are never overwritten.
pub fn resolve_slot_bindings(screen: &ScreenDefinition, data: &DataBag) -> ScreenDefinition {
    let mut resolved = screen.clone();
    if data.is_empty() {
        return resolved;
    }
    for zone in &mut resolved.template.zones {
        bind_zone(zone, data);
    }
    resolved
}

fn bind_zone(zone: &mut Zone, data: &DataBag) {
    for slot in &mut zone.slots {
        bind_slot(slot, data);
    }
    // Item layouts are row templates, bound per row through `bind_item_layout`.
    for child in &mut zone.zones {
        bind_zone(child, data);
    }
}

/// Binds one row of data into a list zone's item layout.
///
/// Returns the zone's row slots with `slot:<key>` references resolved
/// against `row`; zones without an item layout yield no slots.
pub fn bind_item_layout(zone: &Zone, row: &DataBag) -> Vec<Slot> {
    let Some(layout) = &zone.item_layout else {
        return Vec::new();
    };
    layout
        .slots
        .iter()
        .cloned()
        .map(|mut slot| {
            bind_slot(&mut slot, row);
            slot
        })
        .collect()
}

fn bind_slot(slot: &mut Slot, data: &DataBag) {
    let Some(text) = slot
        .bind_key()
        .and_then(|key| data.get(key))
        .and_then(render_scalar)
    else {
        return;
    };

    let target = match slot.control_type.binding_target() {
        BindingTarget::Label => &mut slot.label,
        BindingTarget::Value => &mut slot.value,
    };
    if target.is_none() {
        *target = Some(text);
    }
}
