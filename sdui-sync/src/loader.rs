use crate::error::SyncResult;
use async_trait::async_trait;
use sdui_model::{NavigationDefinition, ScreenDefinition};
use std::sync::Arc;

/// Source of screen definitions and app navigation.
#[async_trait]
pub trait ScreenLoader: Send + Sync {
    async fn load_screen(&self, screen_key: &str) -> SyncResult<ScreenDefinition>;

    async fn load_navigation(&self) -> SyncResult<NavigationDefinition>;
}

#[async_trait]
impl<T: ScreenLoader + ?Sized> ScreenLoader for Arc<T> {
    async fn load_screen(&self, screen_key: &str) -> SyncResult<ScreenDefinition> {
        (**self).load_screen(screen_key).await
    }

    async fn load_navigation(&self) -> SyncResult<NavigationDefinition> {
        (**self).load_navigation().await
    }
}
