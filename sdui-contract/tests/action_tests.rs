use async_trait::async_trait;
use pretty_assertions::assert_eq;
use sdui_contract::handlers::{ConfirmHandler, NavigateHandler};
use sdui_contract::mock::{LoaderCall, RecordingLoader};
use sdui_contract::{
    ActionContext, ActionRegistry, Confirmer, LoaderError, Page, SessionControl,
};
use sdui_model::{ActionDefinition, ActionResult, ActionType, HttpMethod};
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct Answer(bool);

#[async_trait]
impl Confirmer for Answer {
    async fn confirm(&self, _title: &str, _message: &str) -> bool {
        self.0
    }
}

#[derive(Default)]
struct CountingSession {
    ended: AtomicUsize,
    fail: bool,
}

#[async_trait]
impl SessionControl for CountingSession {
    async fn end_session(&self) -> Result<(), String> {
        self.ended.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err("token revoke failed".into())
        } else {
            Ok(())
        }
    }
}

fn registry(loader: Arc<RecordingLoader>) -> ActionRegistry {
    ActionRegistry::with_defaults(loader, None)
}

// ── Registry ─────────────────────────────────────────────────────

#[test]
fn defaults_cover_every_action_type() {
    let registry = registry(Arc::new(RecordingLoader::new()));
    for action_type in [
        ActionType::Navigate,
        ActionType::NavigateBack,
        ActionType::ApiCall,
        ActionType::SubmitForm,
        ActionType::Refresh,
        ActionType::Confirm,
        ActionType::Logout,
    ] {
        assert!(registry.contains(action_type), "{action_type:?} missing");
    }
    assert_eq!(registry.len(), 7);
}

#[tokio::test]
async fn missing_handler_is_an_error() {
    let registry = ActionRegistry::new(vec![Arc::new(NavigateHandler)]);
    let result = registry
        .handle(
            &ActionDefinition::new("back", ActionType::NavigateBack),
            &ActionContext::new("home"),
        )
        .await;
    assert!(matches!(result, ActionResult::Error { retry: false, .. }));
}

// ── Navigation ───────────────────────────────────────────────────

#[tokio::test]
async fn navigate_reads_target_and_params() {
    let registry = registry(Arc::new(RecordingLoader::new()));
    let action = ActionDefinition::new("open", ActionType::Navigate)
        .with_config(json!({"target": "user-detail", "params": {"tab": "roles"}}));
    let result = registry.handle(&action, &ActionContext::new("users-list")).await;
    assert_eq!(
        result,
        ActionResult::NavigateTo {
            screen_key: "user-detail".into(),
            params: HashMap::from([("tab".to_string(), "roles".to_string())]),
        }
    );
}

#[tokio::test]
async fn navigate_accepts_screen_key_alias() {
    let registry = registry(Arc::new(RecordingLoader::new()));
    let action = ActionDefinition::new("open", ActionType::Navigate)
        .with_config(json!({"screenKey": "schools-list"}));
    let result = registry.handle(&action, &ActionContext::new("home")).await;
    assert_eq!(result, ActionResult::navigate("schools-list"));
}

#[tokio::test]
async fn navigate_without_target_is_an_error() {
    let registry = registry(Arc::new(RecordingLoader::new()));
    let action = ActionDefinition::new("open", ActionType::Navigate);
    let result = registry.handle(&action, &ActionContext::new("home")).await;
    assert!(result.is_error());
}

#[tokio::test]
async fn back_and_refresh_are_signals() {
    let registry = registry(Arc::new(RecordingLoader::new()));
    let ctx = ActionContext::new("home");
    assert_eq!(
        registry
            .handle(&ActionDefinition::new("b", ActionType::NavigateBack), &ctx)
            .await,
        ActionResult::NavigateBack
    );
    assert_eq!(
        registry
            .handle(&ActionDefinition::new("r", ActionType::Refresh), &ctx)
            .await,
        ActionResult::Refresh
    );
}

// ── API calls and forms ──────────────────────────────────────────

#[tokio::test]
async fn api_call_merges_body_with_fields() {
    let loader = Arc::new(RecordingLoader::new().with_submit_response(json!({"ok": true})));
    let registry = registry(loader.clone());
    let action = ActionDefinition::new("invite", ActionType::ApiCall).with_config(json!({
        "endpoint": "/api/invites",
        "body": {"role": "instructor", "email": "placeholder"},
        "successMessage": "Invite sent"
    }));
    let ctx = ActionContext::new("users-list").with_field("email", json!("ada@example.com"));

    let result = registry.handle(&action, &ctx).await;

    assert_eq!(
        result,
        ActionResult::Success {
            message: Some("Invite sent".into()),
            data: Some(json!({"ok": true})),
        }
    );
    assert_eq!(
        loader.calls(),
        vec![LoaderCall::Submit {
            method: HttpMethod::Post,
            endpoint: "/api/invites".into(),
            body: json!({"role": "instructor", "email": "ada@example.com"}),
        }]
    );
}

#[tokio::test]
async fn api_call_get_returns_items() {
    let loader = Arc::new(RecordingLoader::new().with_page(Page::new(vec![json!(1)], false)));
    let registry = registry(loader);
    let action = ActionDefinition::new("fetch", ActionType::ApiCall)
        .with_config(json!({"endpoint": "/api/stats", "method": "GET"}));
    let result = registry.handle(&action, &ActionContext::new("home")).await;
    assert_eq!(
        result,
        ActionResult::Success {
            message: None,
            data: Some(json!([1])),
        }
    );
}

#[tokio::test]
async fn api_call_failure_keeps_retry_flag() {
    let loader = Arc::new(RecordingLoader::new());
    loader.fail_with(LoaderError::network("connection reset"));
    let registry = registry(loader);
    let action = ActionDefinition::new("ping", ActionType::ApiCall)
        .with_config(json!({"endpoint": "/api/ping"}));
    let result = registry.handle(&action, &ActionContext::new("home")).await;
    assert_eq!(result, ActionResult::error("connection reset", true));
}

#[tokio::test]
async fn submit_form_rejects_blank_required_fields() {
    let loader = Arc::new(RecordingLoader::new());
    let registry = registry(loader.clone());
    let action = ActionDefinition::new("save", ActionType::SubmitForm)
        .with_config(json!({"endpoint": "/api/users"}));
    let ctx = ActionContext::new("user-form")
        .with_required(vec!["name".into(), "email".into()])
        .with_field("name", json!("  "));

    let result = registry.handle(&action, &ctx).await;

    assert_eq!(result, ActionResult::error("Please fill in: name, email", false));
    assert_eq!(loader.call_count(), 0);
}

#[tokio::test]
async fn submit_form_navigates_on_success() {
    let loader = Arc::new(RecordingLoader::new());
    let registry = registry(loader.clone());
    let action = ActionDefinition::new("save", ActionType::SubmitForm).with_config(json!({
        "endpoint": "/api/users",
        "method": "PUT",
        "successTarget": "users-list"
    }));
    let ctx = ActionContext::new("user-form")
        .with_required(vec!["name".into()])
        .with_field("name", json!("Ada"));

    let result = registry.handle(&action, &ctx).await;

    assert_eq!(result, ActionResult::navigate("users-list"));
    assert!(matches!(
        &loader.calls()[0],
        LoaderCall::Submit { method: HttpMethod::Put, .. }
    ));
}

// ── Confirm and logout ───────────────────────────────────────────

#[tokio::test]
async fn confirm_follows_the_answer() {
    let action = ActionDefinition::new("sure", ActionType::Confirm)
        .with_config(json!({"title": "Archive", "message": "Archive this school?"}));

    let yes = ActionContext::new("school-detail").with_confirmer(Arc::new(Answer(true)));
    assert_eq!(confirm(&action, &yes).await, ActionResult::ok());

    let no = ActionContext::new("school-detail").with_confirmer(Arc::new(Answer(false)));
    assert_eq!(confirm(&action, &no).await, ActionResult::Cancelled);

    let none = ActionContext::new("school-detail");
    assert!(confirm(&action, &none).await.is_error());
}

async fn confirm(action: &ActionDefinition, ctx: &ActionContext) -> ActionResult {
    ActionRegistry::new(vec![Arc::new(ConfirmHandler)])
        .handle(action, ctx)
        .await
}

#[tokio::test]
async fn logout_ends_session() {
    let session = Arc::new(CountingSession::default());
    let control: Arc<dyn SessionControl> = session.clone();
    let registry = ActionRegistry::with_defaults(Arc::new(RecordingLoader::new()), Some(control));
    let result = registry
        .handle(
            &ActionDefinition::new("logout", ActionType::Logout),
            &ActionContext::new("app-settings"),
        )
        .await;
    assert_eq!(result, ActionResult::Logout);
    assert_eq!(session.ended.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failed_logout_is_retryable() {
    let session: Arc<dyn SessionControl> = Arc::new(CountingSession {
        fail: true,
        ..Default::default()
    });
    let registry = ActionRegistry::with_defaults(Arc::new(RecordingLoader::new()), Some(session));
    let result = registry
        .handle(
            &ActionDefinition::new("logout", ActionType::Logout),
            &ActionContext::new("app-settings"),
        )
        .await;
    assert!(matches!(result, ActionResult::Error { retry: true, .. }));
}
