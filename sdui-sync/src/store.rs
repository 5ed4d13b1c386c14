//! Offline copy of the user's sync bundle.
//!
//! The bundle is held in memory and mirrored to a [`KeyValueStore`] split
//! into one key per bucket, so a delta touching one screen rewrites one
//! key. Within a bucket update the payload is persisted before the hash
//! map: a crash in between leaves an old hash, which only causes a refetch.

use crate::error::SyncResult;
use sdui_model::{
    BucketKey, DeltaSyncResponse, MenuItem, ScreenBundleEntry, UserContext, UserDataBundle,
};
use sdui_storage::KeyValueStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

const MENU_KEY: &str = "sync.bundle.menu";
const PERMISSIONS_KEY: &str = "sync.bundle.permissions";
const CONTEXTS_KEY: &str = "sync.bundle.contexts";
const SCREEN_INDEX_KEY: &str = "sync.bundle.screens";
const HASHES_KEY: &str = "sync.bundle.hashes";
const SCREEN_PREFIX: &str = "sync.bundle.screen.";

/// What a delta did to the local bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeltaOutcome {
    /// Bucket keys whose data and hash were replaced.
    pub applied: Vec<String>,
    /// Screens added or replaced.
    pub changed_screens: Vec<String>,
    /// Screens the server no longer ships.
    pub removed_screens: Vec<String>,
    /// Bucket keys left untouched because their data was unusable.
    pub rejected: Vec<String>,
}

impl DeltaOutcome {
    pub fn is_empty(&self) -> bool {
        self.applied.is_empty() && self.rejected.is_empty()
    }

    /// Screens whose cached definitions are now stale.
    pub fn touched_screens(&self) -> impl Iterator<Item = &str> {
        self.changed_screens
            .iter()
            .chain(self.removed_screens.iter())
            .map(String::as_str)
    }
}

pub struct LocalSyncStore {
    storage: Arc<dyn KeyValueStore>,
    bundle: RwLock<Option<UserDataBundle>>,
}

impl LocalSyncStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            storage,
            bundle: RwLock::new(None),
        }
    }

    /// Reads the persisted bundle into memory.
    ///
    /// Returns `None` when nothing was persisted or any part is corrupt, in
    /// which case the caller should run a full sync.
    pub async fn load(&self) -> SyncResult<Option<UserDataBundle>> {
        let loaded = self.read_bundle().await?;
        if loaded.is_none() {
            debug!("No usable local bundle");
        }
        *self.bundle.write().await = loaded.clone();
        Ok(loaded)
    }

    async fn read_bundle(&self) -> SyncResult<Option<UserDataBundle>> {
        let Some(hashes) = self.read_json::<HashMap<String, String>>(HASHES_KEY).await? else {
            return Ok(None);
        };
        let Some(menu) = self.read_json::<Vec<MenuItem>>(MENU_KEY).await? else {
            return Ok(None);
        };
        let Some(permissions) = self.read_json::<Vec<String>>(PERMISSIONS_KEY).await? else {
            return Ok(None);
        };
        let Some(available_contexts) = self.read_json::<Vec<UserContext>>(CONTEXTS_KEY).await?
        else {
            return Ok(None);
        };
        let Some(index) = self.read_json::<Vec<String>>(SCREEN_INDEX_KEY).await? else {
            return Ok(None);
        };

        let mut screens = HashMap::with_capacity(index.len());
        for key in index {
            let Some(entry) = self
                .read_json::<ScreenBundleEntry>(&screen_storage_key(&key))
                .await?
            else {
                return Ok(None);
            };
            screens.insert(key, entry);
        }

        Ok(Some(UserDataBundle {
            menu,
            permissions,
            screens,
            available_contexts,
            hashes,
        }))
    }

    /// Replaces the whole bundle.
    pub async fn save_bundle(&self, bundle: UserDataBundle) -> SyncResult<()> {
        let mut guard = self.bundle.write().await;

        let stale: Vec<String> = guard
            .as_ref()
            .map(|old| {
                old.screens
                    .keys()
                    .filter(|k| !bundle.screens.contains_key(*k))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        for key in &stale {
            self.storage.remove(&screen_storage_key(key)).await?;
        }

        self.write_json(MENU_KEY, &bundle.menu).await?;
        self.write_json(PERMISSIONS_KEY, &bundle.permissions).await?;
        self.write_json(CONTEXTS_KEY, &bundle.available_contexts).await?;
        for (key, entry) in &bundle.screens {
            self.write_json(&screen_storage_key(key), entry).await?;
        }
        self.write_json(SCREEN_INDEX_KEY, &screen_index(&bundle)).await?;
        self.write_json(HASHES_KEY, &bundle.hashes).await?;

        info!(
            screens = bundle.screens.len(),
            permissions = bundle.permissions.len(),
            "Saved sync bundle"
        );
        *guard = Some(bundle);
        Ok(())
    }

    /// A copy of the in-memory bundle.
    pub async fn bundle(&self) -> Option<UserDataBundle> {
        self.bundle.read().await.clone()
    }

    pub async fn has_bundle(&self) -> bool {
        self.bundle.read().await.is_some()
    }

    /// Bucket hashes to send with a delta request. Empty without a bundle.
    pub async fn hashes(&self) -> HashMap<String, String> {
        self.bundle
            .read()
            .await
            .as_ref()
            .map(|b| b.hashes.clone())
            .unwrap_or_default()
    }

    pub async fn screen(&self, screen_key: &str) -> Option<ScreenBundleEntry> {
        self.bundle
            .read()
            .await
            .as_ref()
            .and_then(|b| b.screens.get(screen_key).cloned())
    }

    pub async fn permissions(&self) -> Vec<String> {
        self.bundle
            .read()
            .await
            .as_ref()
            .map(|b| b.permissions.clone())
            .unwrap_or_default()
    }

    pub async fn menu(&self) -> Vec<MenuItem> {
        self.bundle
            .read()
            .await
            .as_ref()
            .map(|b| b.menu.clone())
            .unwrap_or_default()
    }

    pub async fn update_menu(&self, menu: Vec<MenuItem>, hash: String) -> SyncResult<()> {
        let mut guard = self.bundle.write().await;
        let bundle = guard.get_or_insert_with(UserDataBundle::default);
        self.write_json(MENU_KEY, &menu).await?;
        bundle.menu = menu;
        self.set_hash(bundle, BucketKey::Menu, hash).await
    }

    pub async fn update_permissions(
        &self,
        permissions: Vec<String>,
        hash: String,
    ) -> SyncResult<()> {
        let mut guard = self.bundle.write().await;
        let bundle = guard.get_or_insert_with(UserDataBundle::default);
        self.write_json(PERMISSIONS_KEY, &permissions).await?;
        bundle.permissions = permissions;
        self.set_hash(bundle, BucketKey::Permissions, hash).await
    }

    pub async fn update_contexts(
        &self,
        contexts: Vec<UserContext>,
        hash: String,
    ) -> SyncResult<()> {
        let mut guard = self.bundle.write().await;
        let bundle = guard.get_or_insert_with(UserDataBundle::default);
        self.write_json(CONTEXTS_KEY, &contexts).await?;
        bundle.available_contexts = contexts;
        self.set_hash(bundle, BucketKey::AvailableContexts, hash).await
    }

    pub async fn update_screen(
        &self,
        screen_key: &str,
        entry: ScreenBundleEntry,
        hash: String,
    ) -> SyncResult<()> {
        let mut guard = self.bundle.write().await;
        let bundle = guard.get_or_insert_with(UserDataBundle::default);
        self.put_screen(bundle, screen_key, entry).await?;
        self.set_hash(bundle, BucketKey::screen(screen_key), hash)
            .await
    }

    pub async fn remove_screen(&self, screen_key: &str) -> SyncResult<()> {
        let mut guard = self.bundle.write().await;
        let Some(bundle) = guard.as_mut() else {
            return Ok(());
        };
        self.drop_screen(bundle, screen_key).await?;
        self.write_json(HASHES_KEY, &bundle.hashes).await
    }

    /// Applies a delta response bucket by bucket.
    ///
    /// Unchanged buckets are not touched. A bucket whose data does not
    /// decode keeps its old data and hash so the next delta asks again.
    pub async fn apply_delta(&self, response: DeltaSyncResponse) -> SyncResult<DeltaOutcome> {
        let mut guard = self.bundle.write().await;
        let bundle = guard.get_or_insert_with(UserDataBundle::default);
        let mut outcome = DeltaOutcome::default();

        let mut changed: Vec<_> = response.changed.into_iter().collect();
        changed.sort_by(|a, b| a.0.cmp(&b.0));

        for (bucket, delta) in changed {
            let Some(key) = BucketKey::parse(&bucket) else {
                warn!(bucket = %bucket, "Unknown sync bucket, ignoring");
                outcome.rejected.push(bucket);
                continue;
            };
            let applied = match &key {
                BucketKey::Menu => match decode_list::<MenuItem>(delta.data) {
                    Ok(menu) => {
                        self.write_json(MENU_KEY, &menu).await?;
                        bundle.menu = menu;
                        true
                    }
                    Err(e) => reject(&bucket, e),
                },
                BucketKey::Permissions => match decode_list::<String>(delta.data) {
                    Ok(permissions) => {
                        self.write_json(PERMISSIONS_KEY, &permissions).await?;
                        bundle.permissions = permissions;
                        true
                    }
                    Err(e) => reject(&bucket, e),
                },
                BucketKey::AvailableContexts => match decode_list::<UserContext>(delta.data) {
                    Ok(contexts) => {
                        self.write_json(CONTEXTS_KEY, &contexts).await?;
                        bundle.available_contexts = contexts;
                        true
                    }
                    Err(e) => reject(&bucket, e),
                },
                BucketKey::Screen(screen_key) if delta.data.is_null() => {
                    self.drop_screen(bundle, screen_key).await?;
                    outcome.removed_screens.push(screen_key.clone());
                    outcome.applied.push(bucket);
                    continue;
                }
                BucketKey::Screen(screen_key) => {
                    match serde_json::from_value::<ScreenBundleEntry>(delta.data) {
                        Ok(entry) => {
                            self.put_screen(bundle, screen_key, entry).await?;
                            outcome.changed_screens.push(screen_key.clone());
                            true
                        }
                        Err(e) => reject(&bucket, e),
                    }
                }
            };
            if applied {
                bundle.hashes.insert(bucket.clone(), delta.hash);
                outcome.applied.push(bucket);
            } else {
                outcome.rejected.push(bucket);
            }
        }

        self.write_json(HASHES_KEY, &bundle.hashes).await?;
        info!(
            applied = outcome.applied.len(),
            unchanged = response.unchanged.len(),
            rejected = outcome.rejected.len(),
            "Applied sync delta"
        );
        Ok(outcome)
    }

    /// Forgets the bundle in memory and storage.
    pub async fn clear(&self) -> SyncResult<()> {
        let mut guard = self.bundle.write().await;
        for key in self.storage.keys_with_prefix("sync.bundle.").await? {
            self.storage.remove(&key).await?;
        }
        *guard = None;
        info!("Cleared local sync bundle");
        Ok(())
    }

    async fn put_screen(
        &self,
        bundle: &mut UserDataBundle,
        screen_key: &str,
        entry: ScreenBundleEntry,
    ) -> SyncResult<()> {
        self.write_json(&screen_storage_key(screen_key), &entry)
            .await?;
        let is_new = bundle
            .screens
            .insert(screen_key.to_string(), entry)
            .is_none();
        if is_new {
            self.write_json(SCREEN_INDEX_KEY, &screen_index(bundle))
                .await?;
        }
        Ok(())
    }

    /// Removes a screen and its hash from memory; the caller persists hashes.
    async fn drop_screen(&self, bundle: &mut UserDataBundle, screen_key: &str) -> SyncResult<()> {
        bundle.screens.remove(screen_key);
        bundle.hashes.remove(&BucketKey::screen(screen_key).to_string());
        self.write_json(SCREEN_INDEX_KEY, &screen_index(bundle))
            .await?;
        self.storage.remove(&screen_storage_key(screen_key)).await?;
        Ok(())
    }

    async fn set_hash(
        &self,
        bundle: &mut UserDataBundle,
        key: BucketKey,
        hash: String,
    ) -> SyncResult<()> {
        bundle.hashes.insert(key.to_string(), hash);
        self.write_json(HASHES_KEY, &bundle.hashes).await
    }

    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> SyncResult<()> {
        let raw = serde_json::to_string(value)?;
        self.storage.put(key, raw).await?;
        Ok(())
    }

    /// `Ok(None)` when the key is missing or does not decode.
    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> SyncResult<Option<T>> {
        let Some(raw) = self.storage.get(key).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key, error = %e, "Corrupt sync bundle entry");
                Ok(None)
            }
        }
    }
}

fn screen_storage_key(screen_key: &str) -> String {
    format!("{SCREEN_PREFIX}{screen_key}")
}

fn screen_index(bundle: &UserDataBundle) -> Vec<String> {
    let mut keys: Vec<String> = bundle.screens.keys().cloned().collect();
    keys.sort_unstable();
    keys
}

/// List buckets: `null` means empty.
fn decode_list<T: DeserializeOwned>(data: Value) -> Result<Vec<T>, serde_json::Error> {
    if data.is_null() {
        return Ok(Vec::new());
    }
    serde_json::from_value(data)
}

fn reject(bucket: &str, e: serde_json::Error) -> bool {
    warn!(bucket, error = %e, "Undecodable sync bucket, keeping previous data");
    false
}
