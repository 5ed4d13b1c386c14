use crate::error::SyncResult;
use crate::store::{DeltaOutcome, LocalSyncStore};
use async_trait::async_trait;
use sdui_model::{DeltaSyncRequest, DeltaSyncResponse, UserDataBundle};
use std::sync::Arc;
use tracing::info;

/// Server side of bundle sync.
#[async_trait]
pub trait SyncApi: Send + Sync {
    async fn full_sync(&self) -> SyncResult<UserDataBundle>;

    async fn delta_sync(&self, request: &DeltaSyncRequest) -> SyncResult<DeltaSyncResponse>;
}

/// Result of one sync round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// No local bundle existed; the whole bundle was downloaded.
    Full { screens: usize },
    Delta(DeltaOutcome),
}

/// Keeps a [`LocalSyncStore`] converged with the server.
pub struct DeltaSyncService {
    api: Arc<dyn SyncApi>,
    store: Arc<LocalSyncStore>,
}

impl DeltaSyncService {
    pub fn new(api: Arc<dyn SyncApi>, store: Arc<LocalSyncStore>) -> Self {
        Self { api, store }
    }

    pub fn store(&self) -> &Arc<LocalSyncStore> {
        &self.store
    }

    /// Full sync without a local bundle, delta sync otherwise.
    pub async fn sync(&self) -> SyncResult<SyncOutcome> {
        if !self.store.has_bundle().await {
            return self.full_sync().await;
        }

        let request = DeltaSyncRequest {
            hashes: self.store.hashes().await,
        };
        info!(buckets = request.hashes.len(), "Requesting sync delta");
        let response = self.api.delta_sync(&request).await?;
        let outcome = self.store.apply_delta(response).await?;
        Ok(SyncOutcome::Delta(outcome))
    }

    /// Downloads and stores the whole bundle regardless of local state.
    pub async fn full_sync(&self) -> SyncResult<SyncOutcome> {
        info!("Running full sync");
        let bundle = self.api.full_sync().await?;
        let screens = bundle.screens.len();
        self.store.save_bundle(bundle).await?;
        Ok(SyncOutcome::Full { screens })
    }
}
