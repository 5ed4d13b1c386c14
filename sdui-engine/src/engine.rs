//! Wires every layer into one [`ScreenEngine`].

use crate::config::{ConfigError, EngineConfig};
use crate::view_model::{EngineContext, ScreenViewModel};
use sdui_contract::{
    ActionDispatcher, ActionRegistry, Confirmer, ContractRegistry, DataLoader, EventOrchestrator,
    PermissionSet, ScreenContract, ScreenHandler, ScreenHandlerRegistry, SessionControl,
    SharedPermissions,
};
use sdui_model::{MenuItem, NavigationDefinition};
use sdui_resolver::ResolverPipeline;
use sdui_storage::{KeyValueStore, MemoryStore, SqliteStore, StorageError};
use sdui_sync::{
    BundledScreenLoader, CachedScreenLoader, DeltaSyncService, HttpDataLoader, LocalSyncStore,
    RecentScreenTracker, RemoteScreenLoader, RemoteSyncApi, ScreenLoader, SyncApi, SyncError,
    SyncOutcome,
};
use sdui_types::{Clock, SystemClock};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

type ScreenCache = CachedScreenLoader<Arc<dyn ScreenLoader>>;

/// Collects the app's contracts and handlers, then builds a [`ScreenEngine`].
///
/// Transports default to the HTTP implementations configured by
/// [`EngineConfig::remote`]; each can be replaced, which is how tests run
/// the engine without a network.
pub struct ScreenEngineBuilder {
    config: EngineConfig,
    contracts: Vec<Arc<dyn ScreenContract>>,
    screen_handlers: Vec<(String, Arc<dyn ScreenHandler>)>,
    confirmer: Option<Arc<dyn Confirmer>>,
    session: Option<Arc<dyn SessionControl>>,
    storage: Option<Arc<dyn KeyValueStore>>,
    clock: Option<Arc<dyn Clock>>,
    screen_loader: Option<Arc<dyn ScreenLoader>>,
    sync_api: Option<Arc<dyn SyncApi>>,
    data_loader: Option<Arc<dyn DataLoader>>,
}

impl ScreenEngineBuilder {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            contracts: Vec::new(),
            screen_handlers: Vec::new(),
            confirmer: None,
            session: None,
            storage: None,
            clock: None,
            screen_loader: None,
            sync_api: None,
            data_loader: None,
        }
    }

    pub fn contract(mut self, contract: Arc<dyn ScreenContract>) -> Self {
        self.contracts.push(contract);
        self
    }

    pub fn screen_handler(
        mut self,
        screen_key: impl Into<String>,
        handler: Arc<dyn ScreenHandler>,
    ) -> Self {
        self.screen_handlers.push((screen_key.into(), handler));
        self
    }

    pub fn confirmer(mut self, confirmer: Arc<dyn Confirmer>) -> Self {
        self.confirmer = Some(confirmer);
        self
    }

    pub fn session(mut self, session: Arc<dyn SessionControl>) -> Self {
        self.session = Some(session);
        self
    }

    /// Overrides the storage otherwise chosen from `storage_path`.
    pub fn storage(mut self, storage: Arc<dyn KeyValueStore>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn screen_loader(mut self, loader: Arc<dyn ScreenLoader>) -> Self {
        self.screen_loader = Some(loader);
        self
    }

    pub fn sync_api(mut self, api: Arc<dyn SyncApi>) -> Self {
        self.sync_api = Some(api);
        self
    }

    pub fn data_loader(mut self, loader: Arc<dyn DataLoader>) -> Self {
        self.data_loader = Some(loader);
        self
    }

    pub fn build(self) -> EngineResult<ScreenEngine> {
        let config = self.config;

        let storage: Arc<dyn KeyValueStore> = match (self.storage, &config.storage_path) {
            (Some(storage), _) => storage,
            (None, Some(path)) => Arc::new(SqliteStore::open(path)?),
            (None, None) => Arc::new(MemoryStore::new()),
        };
        let clock: Arc<dyn Clock> = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        let screen_loader: Arc<dyn ScreenLoader> = match self.screen_loader {
            Some(loader) => loader,
            None => Arc::new(RemoteScreenLoader::new(config.remote.clone())?),
        };
        let sync_api: Arc<dyn SyncApi> = match self.sync_api {
            Some(api) => api,
            None => Arc::new(RemoteSyncApi::new(config.remote.clone())?),
        };
        let data_loader: Arc<dyn DataLoader> = match self.data_loader {
            Some(loader) => loader,
            None => Arc::new(HttpDataLoader::new(config.remote.clone())?),
        };

        let store = Arc::new(LocalSyncStore::new(Arc::clone(&storage)));
        let screen_loader: Arc<dyn ScreenLoader> = Arc::new(BundledScreenLoader::new(
            screen_loader,
            Arc::clone(&store),
        ));
        let cache = Arc::new(CachedScreenLoader::new(
            screen_loader,
            Arc::clone(&storage),
            Arc::clone(&clock),
            config.cache.clone(),
        ));
        let recent = Arc::new(RecentScreenTracker::new(config.recent_capacity, clock));
        let sync = DeltaSyncService::new(sync_api, store);

        let permissions = SharedPermissions::default();
        let orchestrator = Arc::new(EventOrchestrator::new(
            Arc::new(ContractRegistry::new(self.contracts)),
            Arc::clone(&data_loader),
            Arc::new(permissions.clone()),
        ));
        let dispatcher = Arc::new(ActionDispatcher::new(
            Arc::new(ScreenHandlerRegistry::new(self.screen_handlers)),
            Arc::new(ActionRegistry::with_defaults(data_loader, self.session)),
        ));

        let context = EngineContext {
            screens: cache.clone(),
            orchestrator,
            dispatcher,
            recent,
            pipeline: ResolverPipeline::new(config.placeholders.clone()),
            confirmer: self.confirmer,
        };

        info!(
            base_url = %config.remote.base_url,
            persistent = config.storage_path.is_some(),
            "Screen engine built"
        );
        Ok(ScreenEngine {
            config,
            cache,
            sync,
            permissions,
            context,
        })
    }
}

/// The assembled engine. Hands out one [`ScreenViewModel`] per screen.
pub struct ScreenEngine {
    config: EngineConfig,
    cache: Arc<ScreenCache>,
    sync: DeltaSyncService,
    permissions: SharedPermissions,
    context: EngineContext,
}

impl ScreenEngine {
    pub fn builder(config: EngineConfig) -> ScreenEngineBuilder {
        ScreenEngineBuilder::new(config)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn context(&self) -> &EngineContext {
        &self.context
    }

    pub fn cache(&self) -> &ScreenCache {
        &self.cache
    }

    /// Loads the persisted bundle, if any, and applies its permissions.
    pub async fn restore(&self) -> EngineResult<bool> {
        let Some(bundle) = self.sync.store().load().await? else {
            debug!("No persisted bundle to restore");
            return Ok(false);
        };
        self.permissions
            .replace(PermissionSet::new(bundle.permissions));
        info!(screens = bundle.screens.len(), "Bundle restored");
        Ok(true)
    }

    pub fn view_model(&self, screen_key: &str) -> ScreenViewModel {
        self.view_model_with_params(screen_key, HashMap::new())
    }

    pub fn view_model_with_params(
        &self,
        screen_key: &str,
        params: HashMap<String, String>,
    ) -> ScreenViewModel {
        ScreenViewModel::new(screen_key, params, self.context.clone())
    }

    /// Syncs the bundle and drops cached screens the server changed.
    pub async fn sync(&self) -> EngineResult<SyncOutcome> {
        let outcome = self.sync.sync().await?;
        match &outcome {
            SyncOutcome::Full { screens } => {
                info!(screens, "Full sync, invalidating screen cache");
                self.cache.clear_cache().await;
            }
            SyncOutcome::Delta(delta) => {
                for screen_key in delta.touched_screens() {
                    self.cache.evict(screen_key).await;
                }
                info!(
                    applied = delta.applied.len(),
                    rejected = delta.rejected.len(),
                    "Delta sync applied"
                );
            }
        }
        let permissions = self.sync.store().permissions().await;
        self.permissions.replace(PermissionSet::new(permissions));
        Ok(outcome)
    }

    /// Prefetches screens opened within `window`. Returns how many loaded.
    pub async fn warm_recent(&self, window: Duration) -> usize {
        let keys = self.context.recent.recent_keys(window).await;
        self.cache.prefetch(&keys).await
    }

    /// Forgets everything tied to the signed-in user.
    pub async fn logout(&self) -> EngineResult<()> {
        self.sync.store().clear().await?;
        self.cache.clear_cache().await;
        self.context.recent.clear().await;
        self.permissions.replace(PermissionSet::default());
        info!("Engine state cleared for logout");
        Ok(())
    }

    pub async fn navigation(&self) -> EngineResult<NavigationDefinition> {
        Ok(self.cache.load_navigation().await?)
    }

    pub async fn menu(&self) -> Vec<MenuItem> {
        self.sync.store().menu().await
    }

    pub fn permissions(&self) -> PermissionSet {
        self.permissions.snapshot()
    }
}
