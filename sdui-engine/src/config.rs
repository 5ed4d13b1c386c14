//! Engine configuration, loadable from TOML.
//!
//! ```toml
//! recent_capacity = 16
//! storage_path = "/var/lib/app/sdui.db"
//! log_filter = "sdui=debug"
//!
//! [remote]
//! base_url = "https://api.example.com"
//! platform = "android"
//!
//! [cache]
//! default_ttl_secs = 600
//! max_memory_entries = 32
//!
//! [cache.key_ttl_secs]
//! home = 30
//! ```

use sdui_sync::{CacheConfig, RemoteConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub remote: RemoteConfig,
    pub cache: CacheConfig,
    /// How many screens the recent tracker remembers.
    pub recent_capacity: usize,
    /// SQLite file for the persistent tiers. In-memory when unset.
    pub storage_path: Option<PathBuf>,
    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub log_filter: String,
    /// `{key}` substitutions applied to every screen.
    pub placeholders: HashMap<String, String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            remote: RemoteConfig::default(),
            cache: CacheConfig::default(),
            recent_capacity: 20,
            storage_path: None,
            log_filter: "info".to_string(),
            placeholders: HashMap::new(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }
}
