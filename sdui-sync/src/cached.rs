//! Two-tier screen cache in front of a [`ScreenLoader`].
//!
//! Lookup order is memory, persistent storage, remote. An entry is fresh
//! when it is younger than its TTL and, once [`CachedScreenLoader::clear_cache`]
//! has run, strictly newer than the invalidation watermark. Clearing only
//! moves the watermark; stale entries are overwritten by the next fetch.

use crate::cache_config::CacheConfig;
use crate::error::SyncResult;
use crate::loader::ScreenLoader;
use async_trait::async_trait;
use sdui_model::{NavigationDefinition, ScreenDefinition};
use sdui_storage::KeyValueStore;
use sdui_types::{Clock, Millis};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Storage key prefix of the persistent tier.
pub const SCREEN_CACHE_PREFIX: &str = "screen.cache.";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    payload: ScreenDefinition,
    cached_at: Millis,
}

/// Where a screen was served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheTier {
    Memory,
    Persistent,
    Remote,
}

pub struct CachedScreenLoader<L> {
    remote: L,
    storage: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    config: CacheConfig,
    memory: RwLock<HashMap<String, CacheEntry>>,
    invalidated_at: RwLock<Option<Millis>>,
}

impl<L: ScreenLoader> CachedScreenLoader<L> {
    pub fn new(
        remote: L,
        storage: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        config: CacheConfig,
    ) -> Self {
        Self {
            remote,
            storage,
            clock,
            config,
            memory: RwLock::new(HashMap::new()),
            invalidated_at: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Loads a screen, reporting which tier served it.
    pub async fn load_screen_traced(
        &self,
        screen_key: &str,
    ) -> SyncResult<(ScreenDefinition, CacheTier)> {
        let now = self.clock.now_millis();
        let watermark = *self.invalidated_at.read().await;

        if let Some(entry) = self.memory.read().await.get(screen_key) {
            if self.is_fresh(screen_key, entry, now, watermark) {
                debug!(screen_key, "Screen cache hit (memory)");
                return Ok((entry.payload.clone(), CacheTier::Memory));
            }
        }

        if let Some(entry) = self.read_persistent(screen_key).await {
            if self.is_fresh(screen_key, &entry, now, watermark) {
                debug!(screen_key, "Screen cache hit (persistent)");
                let payload = entry.payload.clone();
                self.remember(screen_key, entry).await;
                return Ok((payload, CacheTier::Persistent));
            }
        }

        debug!(screen_key, "Screen cache miss, fetching");
        let screen = self.remote.load_screen(screen_key).await?;
        self.store(screen_key, screen.clone()).await;
        Ok((screen, CacheTier::Remote))
    }

    /// Invalidates every entry cached so far. Entries are left in place.
    pub async fn clear_cache(&self) {
        let now = self.clock.now_millis();
        let mut watermark = self.invalidated_at.write().await;
        // Entries stamped just past the previous watermark must fall behind
        // the new one.
        let next = match *watermark {
            Some(previous) => now.max(previous + 1),
            None => now,
        };
        *watermark = Some(next);
        info!(watermark = next, "Screen cache invalidated");
    }

    /// Drops one screen from both tiers.
    pub async fn evict(&self, screen_key: &str) {
        self.memory.write().await.remove(screen_key);
        if let Err(e) = self.storage.remove(&persistent_key(screen_key)).await {
            warn!(screen_key, error = %e, "Failed to evict persisted screen");
        }
        debug!(screen_key, "Screen evicted from cache");
    }

    /// Loads each key through the cache. Returns how many loaded.
    pub async fn prefetch(&self, screen_keys: &[String]) -> usize {
        let mut loaded = 0;
        for key in screen_keys {
            match self.load_screen_traced(key).await {
                Ok(_) => loaded += 1,
                Err(e) => warn!(screen_key = %key, error = %e, "Prefetch failed"),
            }
        }
        loaded
    }

    /// Number of entries in the memory tier, fresh or not.
    pub async fn memory_len(&self) -> usize {
        self.memory.read().await.len()
    }

    fn is_fresh(
        &self,
        screen_key: &str,
        entry: &CacheEntry,
        now: Millis,
        watermark: Option<Millis>,
    ) -> bool {
        let ttl = self.config.ttl_for(screen_key, entry.payload.pattern).as_millis() as Millis;
        let young = now.saturating_sub(entry.cached_at) < ttl;
        young && watermark.is_none_or(|w| entry.cached_at > w)
    }

    async fn read_persistent(&self, screen_key: &str) -> Option<CacheEntry> {
        let raw = match self.storage.get(&persistent_key(screen_key)).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(screen_key, error = %e, "Persistent screen cache unreadable");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(screen_key, error = %e, "Corrupt persisted screen, treating as miss");
                None
            }
        }
    }

    async fn store(&self, screen_key: &str, payload: ScreenDefinition) {
        let now = self.clock.now_millis();
        // A fetch finishing in the same millisecond as a clear must still
        // count as newer than the watermark.
        let cached_at = match *self.invalidated_at.read().await {
            Some(w) if now <= w => w + 1,
            _ => now,
        };
        let entry = CacheEntry { payload, cached_at };

        match serde_json::to_string(&entry) {
            Ok(raw) => {
                if let Err(e) = self.storage.put(&persistent_key(screen_key), raw).await {
                    warn!(screen_key, error = %e, "Failed to persist screen");
                }
            }
            Err(e) => warn!(screen_key, error = %e, "Failed to encode screen for cache"),
        }

        self.remember(screen_key, entry).await;
    }

    async fn remember(&self, screen_key: &str, entry: CacheEntry) {
        let max = self.config.max_memory_entries;
        if max == 0 {
            return;
        }
        let mut memory = self.memory.write().await;
        memory.insert(screen_key.to_string(), entry);
        while memory.len() > max {
            let oldest = memory
                .iter()
                .filter(|(k, _)| k.as_str() != screen_key)
                .min_by_key(|(_, e)| e.cached_at)
                .map(|(k, _)| k.clone());
            match oldest {
                Some(key) => {
                    debug!(screen_key = %key, "Memory cache full, dropping oldest");
                    memory.remove(&key);
                }
                None => break,
            }
        }
    }
}

#[async_trait]
impl<L: ScreenLoader> ScreenLoader for CachedScreenLoader<L> {
    async fn load_screen(&self, screen_key: &str) -> SyncResult<ScreenDefinition> {
        self.load_screen_traced(screen_key)
            .await
            .map(|(screen, _)| screen)
    }

    async fn load_navigation(&self) -> SyncResult<NavigationDefinition> {
        self.remote.load_navigation().await
    }
}

fn persistent_key(screen_key: &str) -> String {
    format!("{SCREEN_CACHE_PREFIX}{screen_key}")
}
