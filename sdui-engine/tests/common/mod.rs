#![allow(dead_code)]

use async_trait::async_trait;
use sdui_contract::mock::RecordingLoader;
use sdui_contract::{CrudContract, ScreenContract};
use sdui_engine::{EngineConfig, ScreenEngine, ScreenEngineBuilder};
use sdui_model::{
    ActionDefinition, ActionType, BucketDelta, DeltaSyncRequest, DeltaSyncResponse,
    NavItem, NavigationDefinition, ScreenBundleEntry, ScreenDefinition, ScreenPattern,
    UserDataBundle,
};
use sdui_storage::MemoryStore;
use sdui_sync::{ScreenLoader, SyncApi, SyncError, SyncResult};
use sdui_types::{content_hash, ManualClock};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Serves screens from a map and counts fetches.
#[derive(Default)]
pub struct FakeScreens {
    screens: Mutex<HashMap<String, ScreenDefinition>>,
    pub fetches: AtomicUsize,
}

impl FakeScreens {
    pub fn with(screens: Vec<ScreenDefinition>) -> Self {
        let fake = Self::default();
        for screen in screens {
            fake.put(screen);
        }
        fake
    }

    pub fn put(&self, screen: ScreenDefinition) {
        self.screens
            .lock()
            .unwrap()
            .insert(screen.screen_key.clone(), screen);
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScreenLoader for FakeScreens {
    async fn load_screen(&self, screen_key: &str) -> SyncResult<ScreenDefinition> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.screens
            .lock()
            .unwrap()
            .get(screen_key)
            .cloned()
            .ok_or_else(|| SyncError::Status {
                status: 404,
                body: format!("no screen '{screen_key}'"),
            })
    }

    async fn load_navigation(&self) -> SyncResult<NavigationDefinition> {
        Ok(NavigationDefinition {
            bottom_nav: vec![NavItem {
                id: "home".into(),
                label: "Home".into(),
                icon: None,
                screen_key: Some("home".into()),
                children: Vec::new(),
            }],
            drawer: Vec::new(),
            version: 1,
        })
    }
}

/// Sync server answering by per-bucket hash comparison.
#[derive(Default)]
pub struct FakeSync {
    buckets: Mutex<HashMap<String, Value>>,
}

impl FakeSync {
    pub fn set(&self, bucket: &str, data: Value) {
        self.buckets.lock().unwrap().insert(bucket.to_string(), data);
    }

    pub fn set_screen(&self, screen: &ScreenDefinition) {
        let entry = ScreenBundleEntry::from(screen.clone());
        self.set(
            &format!("screen:{}", screen.screen_key),
            serde_json::to_value(entry).unwrap(),
        );
    }
}

#[async_trait]
impl SyncApi for FakeSync {
    async fn full_sync(&self) -> SyncResult<UserDataBundle> {
        let buckets = self.buckets.lock().unwrap().clone();
        let mut bundle = UserDataBundle::default();
        for (key, data) in &buckets {
            match key.as_str() {
                "menu" => bundle.menu = serde_json::from_value(data.clone())?,
                "permissions" => bundle.permissions = serde_json::from_value(data.clone())?,
                "available_contexts" => {
                    bundle.available_contexts = serde_json::from_value(data.clone())?
                }
                other => {
                    let entry: ScreenBundleEntry = serde_json::from_value(data.clone())?;
                    bundle
                        .screens
                        .insert(other.trim_start_matches("screen:").to_string(), entry);
                }
            }
            bundle.hashes.insert(key.clone(), content_hash(data));
        }
        Ok(bundle)
    }

    async fn delta_sync(&self, request: &DeltaSyncRequest) -> SyncResult<DeltaSyncResponse> {
        let buckets = self.buckets.lock().unwrap().clone();
        let mut response = DeltaSyncResponse::default();
        for (key, data) in &buckets {
            let hash = content_hash(data);
            if request.hashes.get(key) == Some(&hash) {
                response.unchanged.push(key.clone());
            } else {
                response.changed.insert(
                    key.clone(),
                    BucketDelta {
                        data: data.clone(),
                        hash,
                    },
                );
            }
        }
        Ok(response)
    }
}

pub struct Harness {
    pub engine: ScreenEngine,
    pub screens: Arc<FakeScreens>,
    pub sync: Arc<FakeSync>,
    pub loader: Arc<RecordingLoader>,
    pub clock: Arc<ManualClock>,
}

pub fn users_contract() -> Arc<dyn ScreenContract> {
    Arc::new(CrudContract::new("users-list", "users", "/api/users"))
}

pub fn users_screen() -> ScreenDefinition {
    ScreenDefinition::new("users-list", ScreenPattern::List)
        .with_action(ActionDefinition::new("refresh", ActionType::Refresh))
}

pub fn rows(ids: &[u32]) -> Vec<Value> {
    ids.iter()
        .map(|id| json!({"id": id, "name": format!("user {id}")}))
        .collect()
}

/// An engine over in-memory fakes, customised by `configure`.
pub fn harness(
    screens: Vec<ScreenDefinition>,
    configure: impl FnOnce(ScreenEngineBuilder) -> ScreenEngineBuilder,
) -> Harness {
    harness_with(EngineConfig::default(), screens, configure)
}

pub fn harness_with(
    config: EngineConfig,
    screens: Vec<ScreenDefinition>,
    configure: impl FnOnce(ScreenEngineBuilder) -> ScreenEngineBuilder,
) -> Harness {
    let screens = Arc::new(FakeScreens::with(screens));
    let sync = Arc::new(FakeSync::default());
    let loader = Arc::new(RecordingLoader::new());
    let clock = Arc::new(ManualClock::new(1_000));

    let builder = ScreenEngine::builder(config)
        .screen_loader(screens.clone())
        .sync_api(sync.clone())
        .data_loader(loader.clone())
        .storage(Arc::new(MemoryStore::new()))
        .clock(clock.clone());
    let engine = configure(builder).build().unwrap();

    Harness {
        engine,
        screens,
        sync,
        loader,
        clock,
    }
}
