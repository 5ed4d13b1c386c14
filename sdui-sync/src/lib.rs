//! Screen delivery and offline sync for the SDUI engine.
//!
//! - [`CachedScreenLoader`]: memory and persistent TTL cache in front of a
//!   [`ScreenLoader`], invalidated by a watermark
//! - [`BundledScreenLoader`]: serves synced screens when the remote cannot
//! - [`RecentScreenTracker`]: which screens were opened lately, for warming
//! - [`LocalSyncStore`] / [`DeltaSyncService`]: the user's bundle, kept in
//!   step with the server by per-bucket content hashes
//! - [`remote`]: reqwest transports for screens, sync and screen data

mod bundled;
mod cache_config;
mod cached;
mod delta;
mod error;
mod loader;
mod recent;
pub mod remote;
mod store;

pub use bundled::BundledScreenLoader;
pub use cache_config::CacheConfig;
pub use cached::{CacheTier, CachedScreenLoader, SCREEN_CACHE_PREFIX};
pub use delta::{DeltaSyncService, SyncApi, SyncOutcome};
pub use error::{SyncError, SyncResult};
pub use loader::ScreenLoader;
pub use recent::RecentScreenTracker;
pub use remote::{HttpDataLoader, RemoteConfig, RemoteScreenLoader, RemoteSyncApi};
pub use store::{DeltaOutcome, LocalSyncStore};
