//! Falls back to the synced bundle when the remote cannot serve a screen.

use crate::error::SyncResult;
use crate::loader::ScreenLoader;
use crate::store::LocalSyncStore;
use async_trait::async_trait;
use sdui_model::{NavigationDefinition, ScreenDefinition};
use std::sync::Arc;
use tracing::{debug, warn};

/// Wraps a [`ScreenLoader`] so screens held by the local bundle still load
/// while the remote is unreachable or no longer knows them.
pub struct BundledScreenLoader<L> {
    remote: L,
    store: Arc<LocalSyncStore>,
}

impl<L: ScreenLoader> BundledScreenLoader<L> {
    pub fn new(remote: L, store: Arc<LocalSyncStore>) -> Self {
        Self { remote, store }
    }
}

#[async_trait]
impl<L: ScreenLoader> ScreenLoader for BundledScreenLoader<L> {
    async fn load_screen(&self, screen_key: &str) -> SyncResult<ScreenDefinition> {
        let error = match self.remote.load_screen(screen_key).await {
            Ok(screen) => return Ok(screen),
            Err(e) => e,
        };
        match self.store.screen(screen_key).await {
            Some(entry) => {
                warn!(screen_key, error = %error, "Remote screen load failed, serving synced copy");
                Ok(entry.definition)
            }
            None => {
                debug!(screen_key, "No synced copy to fall back to");
                Err(error)
            }
        }
    }

    async fn load_navigation(&self) -> SyncResult<NavigationDefinition> {
        self.remote.load_navigation().await
    }
}
