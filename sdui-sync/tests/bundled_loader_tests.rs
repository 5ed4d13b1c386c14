use async_trait::async_trait;
use pretty_assertions::assert_eq;
use sdui_model::{
    NavigationDefinition, ScreenBundleEntry, ScreenDefinition, ScreenPattern, UserDataBundle,
};
use sdui_storage::MemoryStore;
use sdui_sync::{BundledScreenLoader, LocalSyncStore, ScreenLoader, SyncError, SyncResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Serves a version-2 screen for every key unless switched off.
#[derive(Default)]
struct Remote {
    offline: AtomicBool,
}

#[async_trait]
impl ScreenLoader for Remote {
    async fn load_screen(&self, screen_key: &str) -> SyncResult<ScreenDefinition> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(SyncError::Network("offline".into()));
        }
        let mut screen = ScreenDefinition::new(screen_key, ScreenPattern::List);
        screen.version = 2;
        Ok(screen)
    }

    async fn load_navigation(&self) -> SyncResult<NavigationDefinition> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(SyncError::Network("offline".into()));
        }
        Ok(NavigationDefinition::default())
    }
}

async fn setup() -> (Arc<Remote>, BundledScreenLoader<Arc<Remote>>) {
    let store = Arc::new(LocalSyncStore::new(Arc::new(MemoryStore::new())));
    let bundle = UserDataBundle {
        screens: HashMap::from([(
            "schools-list".to_string(),
            ScreenBundleEntry::from(ScreenDefinition::new("schools-list", ScreenPattern::List)),
        )]),
        hashes: HashMap::from([("screen:schools-list".to_string(), "s1".to_string())]),
        ..UserDataBundle::default()
    };
    store.save_bundle(bundle).await.unwrap();

    let remote = Arc::new(Remote::default());
    let loader = BundledScreenLoader::new(remote.clone(), store);
    (remote, loader)
}

// ── Fallback ─────────────────────────────────────────────────────

#[tokio::test]
async fn remote_answer_is_preferred() {
    let (_remote, loader) = setup().await;
    let screen = loader.load_screen("schools-list").await.unwrap();
    assert_eq!(screen.version, 2);
}

#[tokio::test]
async fn synced_copy_serves_when_remote_fails() {
    let (remote, loader) = setup().await;
    remote.offline.store(true, Ordering::SeqCst);

    let screen = loader.load_screen("schools-list").await.unwrap();
    assert_eq!(screen.screen_key, "schools-list");
    assert_eq!(screen.version, 1);
}

#[tokio::test]
async fn remote_error_surfaces_without_synced_copy() {
    let (remote, loader) = setup().await;
    remote.offline.store(true, Ordering::SeqCst);

    let err = loader.load_screen("users-list").await.unwrap_err();
    assert!(matches!(err, SyncError::Network(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn navigation_is_not_served_from_the_bundle() {
    let (remote, loader) = setup().await;
    remote.offline.store(true, Ordering::SeqCst);
    assert!(loader.load_navigation().await.is_err());
}
