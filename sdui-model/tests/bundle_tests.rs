use pretty_assertions::assert_eq;
use sdui_model::{BucketKey, DeltaSyncResponse, ScreenPattern, UserDataBundle};
use serde_json::json;

// ── Bucket keys ──────────────────────────────────────────────────

#[test]
fn bucket_keys_parse() {
    assert_eq!(BucketKey::parse("menu"), Some(BucketKey::Menu));
    assert_eq!(BucketKey::parse("permissions"), Some(BucketKey::Permissions));
    assert_eq!(BucketKey::parse("available_contexts"), Some(BucketKey::AvailableContexts));
    assert_eq!(BucketKey::parse("screen:users-list"), Some(BucketKey::screen("users-list")));
}

#[test]
fn bad_bucket_keys_are_rejected() {
    assert_eq!(BucketKey::parse("screen:"), None);
    assert_eq!(BucketKey::parse("widgets"), None);
}

#[test]
fn bucket_keys_display_as_wire_names() {
    assert_eq!(BucketKey::Menu.to_string(), "menu");
    assert_eq!(BucketKey::AvailableContexts.to_string(), "available_contexts");
    assert_eq!(BucketKey::screen("a").to_string(), "screen:a");
}

// ── Wire formats ─────────────────────────────────────────────────

#[test]
fn full_bundle_parses() {
    let bundle: UserDataBundle = serde_json::from_value(json!({
        "menu": [{ "key": "home", "label": "Home", "screen_key": "dashboard", "sort_order": 1 }],
        "permissions": ["users:read"],
        "screens": {
            "dashboard": {
                "screenId": "d1",
                "screenKey": "dashboard",
                "pattern": "DASHBOARD",
                "template": {},
                "handler_key": "dashboard"
            }
        },
        "available_contexts": [{ "id": "c1", "name": "North School", "role": "instructor" }],
        "hashes": { "menu": "h1", "permissions": "h2", "screen:dashboard": "h3" }
    }))
    .unwrap();

    assert_eq!(bundle.menu[0].screen_key.as_deref(), Some("dashboard"));
    let entry = &bundle.screens["dashboard"];
    assert_eq!(entry.definition.pattern, ScreenPattern::Dashboard);
    assert_eq!(entry.handler_key.as_deref(), Some("dashboard"));
    assert_eq!(bundle.available_contexts[0].role.as_deref(), Some("instructor"));
    assert_eq!(bundle.hashes.len(), 3);
}

#[test]
fn delta_response_defaults() {
    let delta: DeltaSyncResponse = serde_json::from_value(json!({})).unwrap();
    assert!(delta.changed.is_empty());
    assert!(delta.unchanged.is_empty());

    let delta: DeltaSyncResponse = serde_json::from_value(json!({
        "changed": { "menu": { "data": [], "hash": "new" } },
        "unchanged": ["permissions"]
    }))
    .unwrap();
    assert_eq!(delta.changed["menu"].hash, "new");
    assert_eq!(delta.unchanged, vec!["permissions".to_string()]);
}
