use sdui_model::ScreenPattern;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Freshness policy of the screen cache.
///
/// A screen's TTL is the first of: its per-key override, its pattern's
/// default, the global default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub default_ttl_secs: u64,
    pub pattern_ttl_secs: HashMap<ScreenPattern, u64>,
    pub key_ttl_secs: HashMap<String, u64>,
    /// Capacity of the in-memory tier. Zero disables it.
    pub max_memory_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_secs: 900,
            pattern_ttl_secs: HashMap::from([
                (ScreenPattern::Dashboard, 60),
                (ScreenPattern::List, 300),
                (ScreenPattern::Form, 3600),
                (ScreenPattern::Detail, 600),
                (ScreenPattern::Settings, 1800),
            ]),
            key_ttl_secs: HashMap::new(),
            max_memory_entries: 64,
        }
    }
}

impl CacheConfig {
    pub fn ttl_for(&self, screen_key: &str, pattern: ScreenPattern) -> Duration {
        let secs = self
            .key_ttl_secs
            .get(screen_key)
            .or_else(|| self.pattern_ttl_secs.get(&pattern))
            .copied()
            .unwrap_or(self.default_ttl_secs);
        Duration::from_secs(secs)
    }

    pub fn with_key_ttl(mut self, screen_key: impl Into<String>, ttl: Duration) -> Self {
        self.key_ttl_secs.insert(screen_key.into(), ttl.as_secs());
        self
    }

    pub fn with_pattern_ttl(mut self, pattern: ScreenPattern, ttl: Duration) -> Self {
        self.pattern_ttl_secs.insert(pattern, ttl.as_secs());
        self
    }

    pub fn with_max_memory_entries(mut self, max: usize) -> Self {
        self.max_memory_entries = max;
        self
    }
}
