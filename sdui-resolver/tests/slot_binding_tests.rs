use pretty_assertions::assert_eq;
use sdui_model::{
    ControlType, DataBag, ItemLayout, ScreenDefinition, ScreenPattern, Slot, Zone, ZoneType,
};
use sdui_resolver::{bind_item_layout, resolve_slot_bindings};
use serde_json::json;

fn bag() -> DataBag {
    let mut data = DataBag::new();
    data.insert("user_name".into(), json!("Ada"));
    data.insert("total".into(), json!(42));
    data.insert("active".into(), json!(true));
    data.insert("profile".into(), json!({ "nested": true }));
    data
}

fn screen_with(slots: Vec<Slot>) -> ScreenDefinition {
    ScreenDefinition::new("s", ScreenPattern::Dashboard)
        .with_zones(vec![Zone::new("z", ZoneType::Container).with_slots(slots)])
}

// ── Targets ──────────────────────────────────────────────────────

#[test]
fn label_bearing_control_binds_into_label() {
    let screen = screen_with(vec![Slot::new("greeting", ControlType::Label).with_bind("user_name")]);
    let resolved = resolve_slot_bindings(&screen, &bag());
    let slot = &resolved.zones()[0].slots[0];
    assert_eq!(slot.label.as_deref(), Some("Ada"));
    assert_eq!(slot.value, None);
}

#[test]
fn value_bearing_control_binds_into_value() {
    let screen = screen_with(vec![
        Slot::new("metric", ControlType::MetricCard).with_bind("total"),
        Slot::new("toggle", ControlType::Switch).with_bind("active"),
    ]);
    let resolved = resolve_slot_bindings(&screen, &bag());
    assert_eq!(resolved.zones()[0].slots[0].value.as_deref(), Some("42"));
    assert_eq!(resolved.zones()[0].slots[1].value.as_deref(), Some("true"));
}

#[test]
fn nested_zones_are_bound() {
    let screen = ScreenDefinition::new("s", ScreenPattern::Dashboard).with_zones(vec![
        Zone::new("outer", ZoneType::Container).with_zones(vec![
            Zone::new("inner", ZoneType::MetricGrid)
                .with_slots(vec![Slot::new("m", ControlType::MetricCard).with_bind("total")]),
        ]),
    ]);
    let resolved = resolve_slot_bindings(&screen, &bag());
    assert_eq!(resolved.zones()[0].zones[0].slots[0].value.as_deref(), Some("42"));
}

// ── Literals win ─────────────────────────────────────────────────

#[test]
fn never_overwrites_literal_label() {
    let screen = screen_with(vec![
        Slot::new("greeting", ControlType::Label)
            .with_bind("user_name")
            .with_label("Hello"),
    ]);
    let resolved = resolve_slot_bindings(&screen, &bag());
    assert_eq!(resolved.zones()[0].slots[0].label.as_deref(), Some("Hello"));
}

#[test]
fn never_overwrites_literal_value() {
    let screen = screen_with(vec![
        Slot::new("name", ControlType::TextInput)
            .with_bind("user_name")
            .with_value("typed"),
    ]);
    let resolved = resolve_slot_bindings(&screen, &bag());
    assert_eq!(resolved.zones()[0].slots[0].value.as_deref(), Some("typed"));
}

// ── Unresolvable ─────────────────────────────────────────────────

#[test]
fn missing_key_and_non_scalar_leave_slot_unresolved() {
    let screen = screen_with(vec![
        Slot::new("a", ControlType::Label).with_bind("missing"),
        Slot::new("b", ControlType::Label).with_bind("profile"),
    ]);
    let resolved = resolve_slot_bindings(&screen, &bag());
    assert_eq!(resolved, screen);
}

#[test]
fn non_slot_binds_are_ignored() {
    let mut slot = Slot::new("a", ControlType::Label);
    slot.bind = Some("user_name".into());
    let screen = screen_with(vec![slot]);
    assert_eq!(resolve_slot_bindings(&screen, &bag()), screen);
}

// ── Item layouts ─────────────────────────────────────────────────

#[test]
fn item_layouts_are_left_for_rows() {
    let mut zone = Zone::new("rows", ZoneType::SimpleList);
    zone.item_layout = Some(ItemLayout {
        slots: vec![Slot::new("row", ControlType::ListItem).with_bind("user_name")],
    });
    let screen = ScreenDefinition::new("s", ScreenPattern::List).with_zones(vec![zone]);

    let resolved = resolve_slot_bindings(&screen, &bag());
    assert_eq!(resolved, screen);

    let mut row = DataBag::new();
    row.insert("user_name".into(), json!("Grace"));
    let bound = bind_item_layout(&resolved.zones()[0], &row);
    assert_eq!(bound[0].label.as_deref(), Some("Grace"));
}

#[test]
fn bind_item_layout_without_layout_is_empty() {
    let zone = Zone::new("z", ZoneType::Container);
    assert!(bind_item_layout(&zone, &bag()).is_empty());
}
