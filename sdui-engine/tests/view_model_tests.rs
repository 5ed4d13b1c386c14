mod common;

use async_trait::async_trait;
use common::{harness, harness_with, rows, users_contract, users_screen, Harness};
use pretty_assertions::assert_eq;
use sdui_contract::mock::LoaderCall;
use sdui_contract::{ActionContext, Confirmer, LoaderError, Page, ScreenHandler};
use sdui_engine::{DataState, EngineConfig, ScreenState};
use sdui_model::{
    ActionDefinition, ActionResult, ActionType, ControlType, EventResult, HttpMethod,
    ScreenDefinition, ScreenEvent, ScreenPattern, Slot, Zone, ZoneType,
};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

async fn users(granted: Value) -> Harness {
    let h = harness(vec![users_screen()], |b| b.contract(users_contract()));
    h.sync.set("permissions", granted);
    h.engine.sync().await.unwrap();
    h
}

fn loaded_ids(state: DataState) -> Vec<u64> {
    match state {
        DataState::Loaded { items, .. } => items
            .iter()
            .filter_map(|row| row["id"].as_u64())
            .collect(),
        other => panic!("expected loaded data, got {other:?}"),
    }
}

// ── Load ──

#[tokio::test]
async fn screen_without_contract_loads_without_data() {
    let h = harness(
        vec![ScreenDefinition::new("about", ScreenPattern::Detail)],
        |b| b,
    );
    let vm = h.engine.view_model("about");
    vm.load().await;

    assert!(matches!(vm.screen().current(), ScreenState::Success(_)));
    assert_eq!(vm.data().current(), DataState::Idle);
    assert_eq!(h.loader.call_count(), 0);
    assert_eq!(h.engine.context().recent.len().await, 1);
}

#[tokio::test]
async fn missing_screen_fails_without_retry() {
    let h = harness(vec![], |b| b);
    let vm = h.engine.view_model("ghost");
    vm.load().await;

    match vm.screen().current() {
        ScreenState::Failure { retry, .. } => assert!(!retry),
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(h.engine.context().recent.is_empty().await);
}

#[tokio::test]
async fn load_resolves_rows_extras_params_and_placeholders() {
    let screen = ScreenDefinition::new("users-list", ScreenPattern::List).with_zones(vec![
        Zone::new("header", ZoneType::Container).with_slots(vec![
            Slot::new("title", ControlType::Label).with_bind("title"),
            Slot::new("org", ControlType::Label).with_bind("org"),
            Slot::new("greeting", ControlType::Label).with_label("Hello {user}"),
        ]),
    ]);
    let config = EngineConfig {
        placeholders: HashMap::from([("user".to_string(), "Ada".to_string())]),
        ..EngineConfig::default()
    };
    let h = harness_with(config, vec![screen], |b| b.contract(users_contract()));
    h.sync.set("permissions", json!(["users:read"]));
    h.engine.sync().await.unwrap();

    let mut extra = Map::new();
    extra.insert("title".into(), json!("All users"));
    h.loader.set_page(Page {
        items: rows(&[1, 2]),
        has_more: false,
        extra,
    });

    let vm = h
        .engine
        .view_model_with_params("users-list", HashMap::from([("org".into(), "acme".into())]));
    vm.load().await;

    let ScreenState::Success(screen) = vm.screen().current() else {
        panic!("screen not ready");
    };
    let labels: Vec<_> = screen.slots().iter().map(|s| s.label.clone()).collect();
    assert_eq!(
        labels,
        vec![
            Some("All users".to_string()),
            Some("acme".to_string()),
            Some("Hello Ada".to_string()),
        ]
    );
    assert_eq!(loaded_ids(vm.data().current()), vec![1, 2]);
}

#[tokio::test]
async fn denied_read_never_reaches_loader() {
    let h = users(json!([])).await;
    let vm = h.engine.view_model("users-list");
    vm.load().await;

    assert_eq!(
        vm.data().current(),
        DataState::PermissionDenied {
            permission: "users:read".to_string()
        }
    );
    assert!(matches!(vm.screen().current(), ScreenState::Success(_)));
    assert_eq!(h.loader.call_count(), 0);
}

#[tokio::test]
async fn transport_failure_is_retryable_data_state() {
    let h = users(json!(["users:read"])).await;
    h.loader.fail_with(LoaderError::status(503, "maintenance"));
    let vm = h.engine.view_model("users-list");
    vm.load().await;

    match vm.data().current() {
        DataState::Failed { retry, .. } => assert!(retry),
        other => panic!("expected failure, got {other:?}"),
    }
}

// ── Paging and search ──

#[tokio::test]
async fn load_more_appends_then_stops() {
    let h = users(json!(["users:read"])).await;
    h.loader.set_page(Page::new(rows(&[1, 2]), true));
    let vm = h.engine.view_model("users-list");
    vm.load().await;

    h.loader.set_page(Page::new(rows(&[3]), false));
    vm.load_more().await;

    assert_eq!(loaded_ids(vm.data().current()), vec![1, 2, 3]);
    let DataState::Loaded { page, has_more, .. } = vm.data().current() else {
        unreachable!();
    };
    assert_eq!((page, has_more), (2, false));
    match h.loader.calls().last() {
        Some(LoaderCall::Load { params, .. }) => assert_eq!(params["page"], "2"),
        other => panic!("unexpected call {other:?}"),
    }

    vm.load_more().await;
    assert_eq!(h.loader.call_count(), 2);
}

#[tokio::test]
async fn search_sends_query_from_first_page() {
    let h = users(json!(["users:read"])).await;
    let vm = h.engine.view_model("users-list");
    vm.load().await;
    vm.search("ada").await;

    match h.loader.calls().last() {
        Some(LoaderCall::Load { endpoint, params }) => {
            assert_eq!(endpoint, "/api/users");
            assert_eq!(params["q"], "ada");
            assert_eq!(params["page"], "1");
        }
        other => panic!("unexpected call {other:?}"),
    }
}

#[tokio::test]
async fn reload_starts_without_previous_query_or_selection() {
    let h = users(json!(["users:read", "users:create"])).await;
    let vm = h.engine.view_model("users-list");
    vm.load().await;
    vm.search("ada").await;
    vm.select_item(json!({"id": 7})).await;

    vm.load().await;
    match h.loader.calls().last() {
        Some(LoaderCall::Load { params, .. }) => {
            assert!(!params.contains_key("q"));
            assert_eq!(params["page"], "1");
        }
        other => panic!("unexpected call {other:?}"),
    }

    vm.save().await;
    assert!(matches!(
        h.loader.calls().last(),
        Some(LoaderCall::Submit { method: HttpMethod::Post, .. })
    ));
}

// ── Save and delete ──

#[tokio::test]
async fn save_creates_without_selection_and_updates_with_one() {
    let h = users(json!(["users:read", "users:create", "users:update"])).await;
    let vm = h.engine.view_model("users-list");
    vm.load().await;
    vm.update_field("name", json!("Ada"));

    let created = vm.save().await;
    assert!(matches!(created, EventResult::Submitted { .. }));

    vm.select_item(json!({"id": 7})).await;
    vm.save().await;

    let submits: Vec<_> = h
        .loader
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            LoaderCall::Submit {
                method,
                endpoint,
                body,
            } => Some((method, endpoint, body)),
            _ => None,
        })
        .collect();
    assert_eq!(
        submits,
        vec![
            (HttpMethod::Post, "/api/users".to_string(), json!({"name": "Ada"})),
            (HttpMethod::Put, "/api/users/7".to_string(), json!({"name": "Ada"})),
        ]
    );
}

#[tokio::test]
async fn delete_is_pending_until_confirmed() {
    let h = users(json!(["users:read", "users:delete"])).await;
    h.loader.set_page(Page::new(rows(&[1, 2, 3]), false));
    let vm = h.engine.view_model("users-list");
    vm.load().await;

    vm.select_item(json!({"id": 2})).await;
    let pending = vm.delete_selected().await;
    assert_eq!(
        pending,
        EventResult::PendingDelete {
            item_id: "2".to_string(),
            endpoint: "/api/users/2".to_string(),
        }
    );
    assert!(!h
        .loader
        .calls()
        .iter()
        .any(|c| matches!(c, LoaderCall::Delete { .. })));

    let done = vm.confirm_delete(&pending).await;
    assert_eq!(
        done,
        EventResult::Deleted {
            item_id: "2".to_string()
        }
    );
    assert_eq!(loaded_ids(vm.data().current()), vec![1, 3]);
}

#[tokio::test]
async fn confirm_delete_ignores_other_results() {
    let h = users(json!(["users:read"])).await;
    let vm = h.engine.view_model("users-list");
    assert_eq!(vm.confirm_delete(&EventResult::NoOp).await, EventResult::NoOp);
}

#[tokio::test]
async fn create_falls_back_to_form_screen() {
    let h = users(json!(["users:create"])).await;
    let vm = h.engine.view_model("users-list");
    assert_eq!(vm.create().await, EventResult::navigate("users-form"));
}

// ── Fields and zones ──

#[tokio::test]
async fn literal_slot_values_seed_fields_once() {
    let screen = ScreenDefinition::new("profile", ScreenPattern::Form).with_zones(vec![
        Zone::new("form", ZoneType::FormSection).with_slots(vec![
            Slot::new("name", ControlType::TextInput)
                .with_field("name")
                .with_value("Ada"),
        ]),
    ]);
    let h = harness(vec![screen], |b| b);
    let vm = h.engine.view_model("profile");
    vm.load().await;
    assert_eq!(vm.fields().current()["name"], json!("Ada"));

    vm.update_field("name", json!("Grace"));
    vm.load().await;
    assert_eq!(vm.fields().current()["name"], json!("Grace"));
}

#[tokio::test]
async fn visible_zones_follow_data() {
    let screen = ScreenDefinition::new("users-list", ScreenPattern::List).with_zones(vec![
        Zone::new("list", ZoneType::SimpleList).with_condition("items"),
        Zone::new("empty", ZoneType::Container).with_condition("!items"),
        Zone::new("always", ZoneType::Container),
    ]);
    let h = harness(vec![screen], |b| b.contract(users_contract()));
    h.sync.set("permissions", json!(["users:read"]));
    h.engine.sync().await.unwrap();
    let vm = h.engine.view_model("users-list");

    vm.load().await;
    let ids: Vec<_> = vm.visible_zones().await.into_iter().map(|z| z.id).collect();
    assert_eq!(ids, vec!["empty", "always"]);

    h.loader.set_page(Page::new(rows(&[1]), false));
    vm.reload_data().await;
    let ids: Vec<_> = vm.visible_zones().await.into_iter().map(|z| z.id).collect();
    assert_eq!(ids, vec!["list", "always"]);
}

// ── Actions ──

#[tokio::test]
async fn refresh_action_reloads_data() {
    let h = users(json!(["users:read"])).await;
    let vm = h.engine.view_model("users-list");
    vm.load().await;
    assert_eq!(h.loader.call_count(), 1);

    assert_eq!(vm.handle_action("refresh").await, ActionResult::Refresh);
    assert_eq!(h.loader.call_count(), 2);
}

#[tokio::test]
async fn unknown_action_is_an_error() {
    let h = users(json!(["users:read"])).await;
    let vm = h.engine.view_model("users-list");
    vm.load().await;
    assert!(vm.handle_action("nope").await.is_error());
}

#[tokio::test]
async fn action_before_load_is_retryable_error() {
    let h = users(json!(["users:read"])).await;
    let vm = h.engine.view_model("users-list");
    assert_eq!(
        vm.handle_action("refresh").await,
        ActionResult::error("screen is not loaded", true)
    );
}

#[tokio::test]
async fn submit_form_checks_required_fields() {
    let screen = ScreenDefinition::new("profile", ScreenPattern::Form)
        .with_zones(vec![Zone::new("form", ZoneType::FormSection).with_slots(vec![
            Slot::new("email", ControlType::EmailInput)
                .with_field("email")
                .required(),
        ])])
        .with_action(
            ActionDefinition::new("save", ActionType::SubmitForm)
                .with_config(json!({"endpoint": "/api/profile"})),
        );
    let h = harness(vec![screen], |b| b);
    let vm = h.engine.view_model("profile");
    vm.load().await;

    assert!(vm.handle_action("save").await.is_error());
    assert_eq!(h.loader.call_count(), 0);

    vm.update_field("email", json!("ada@example.com"));
    assert!(!vm.handle_action("save").await.is_error());
    assert_eq!(h.loader.call_count(), 1);
}

struct LogoutOverride;

#[async_trait]
impl ScreenHandler for LogoutOverride {
    fn can_handle(&self, action: &ActionDefinition) -> bool {
        action.action_type == ActionType::Logout
    }

    async fn handle(&self, _action: &ActionDefinition, _ctx: &ActionContext) -> ActionResult {
        ActionResult::navigate("goodbye")
    }
}

#[tokio::test]
async fn screen_handler_overrides_generic_action() {
    let screen = ScreenDefinition::new("app-settings", ScreenPattern::Settings)
        .with_action(ActionDefinition::new("logout", ActionType::Logout));
    let h = harness(vec![screen], |b| {
        b.screen_handler("app-settings", Arc::new(LogoutOverride))
    });
    let vm = h.engine.view_model("app-settings");
    vm.load().await;

    assert_eq!(
        vm.handle_action("logout").await,
        ActionResult::navigate("goodbye")
    );
}

struct Decline;

#[async_trait]
impl Confirmer for Decline {
    async fn confirm(&self, _title: &str, _message: &str) -> bool {
        false
    }
}

#[tokio::test]
async fn confirmer_is_passed_to_actions() {
    let screen = ScreenDefinition::new("danger", ScreenPattern::Settings)
        .with_action(ActionDefinition::new("wipe", ActionType::Confirm));
    let h = harness(vec![screen], |b| b.confirmer(Arc::new(Decline)));
    let vm = h.engine.view_model("danger");
    vm.load().await;

    assert_eq!(vm.handle_action("wipe").await, ActionResult::Cancelled);
}

// ── Affordances ──

#[tokio::test]
async fn can_execute_reflects_permissions() {
    let h = users(json!(["users:read"])).await;
    let vm = h.engine.view_model("users-list");
    assert!(vm.can_execute(ScreenEvent::LoadData));
    assert!(!vm.can_execute(ScreenEvent::Delete));
    assert!(vm.can_execute(ScreenEvent::Refresh));
}
