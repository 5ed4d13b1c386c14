use sdui_model::{BindingTarget, ControlType, Slot};

// ── Binding targets ──────────────────────────────────────────────

#[test]
fn label_bearing_controls() {
    for ct in [
        ControlType::Label,
        ControlType::FilledButton,
        ControlType::OutlinedButton,
        ControlType::TextButton,
        ControlType::ListItem,
        ControlType::Chip,
    ] {
        assert_eq!(ct.binding_target(), BindingTarget::Label, "{ct:?}");
    }
}

#[test]
fn value_bearing_controls() {
    for ct in [
        ControlType::TextInput,
        ControlType::NumberInput,
        ControlType::MetricCard,
        ControlType::Switch,
        ControlType::Image,
        ControlType::Unknown,
    ] {
        assert_eq!(ct.binding_target(), BindingTarget::Value, "{ct:?}");
    }
}

#[test]
fn inputs_are_flagged() {
    assert!(ControlType::EmailInput.is_input());
    assert!(ControlType::Select.is_input());
    assert!(!ControlType::Label.is_input());
    assert!(!ControlType::Divider.is_input());
}

// ── Field type mapping ───────────────────────────────────────────

#[test]
fn field_types_map_to_controls() {
    assert_eq!(ControlType::from_field_type("email"), ControlType::EmailInput);
    assert_eq!(ControlType::from_field_type("PASSWORD"), ControlType::PasswordInput);
    assert_eq!(ControlType::from_field_type("number"), ControlType::NumberInput);
    assert_eq!(ControlType::from_field_type("toggle"), ControlType::Switch);
    assert_eq!(ControlType::from_field_type("dropdown"), ControlType::Select);
    assert_eq!(ControlType::from_field_type("radio"), ControlType::RadioGroup);
}

#[test]
fn unknown_field_type_is_text_input() {
    assert_eq!(ControlType::from_field_type("color"), ControlType::TextInput);
    assert_eq!(ControlType::from_field_type(""), ControlType::TextInput);
}

// ── Bind keys ────────────────────────────────────────────────────

#[test]
fn bind_key_strips_prefix() {
    let slot = Slot::new("s", ControlType::Label).with_bind("user_name");
    assert_eq!(slot.bind.as_deref(), Some("slot:user_name"));
    assert_eq!(slot.bind_key(), Some("user_name"));
}

#[test]
fn non_slot_bind_has_no_key() {
    let mut slot = Slot::new("s", ControlType::Label);
    slot.bind = Some("data:user".into());
    assert_eq!(slot.bind_key(), None);
    slot.bind = None;
    assert_eq!(slot.bind_key(), None);
}
