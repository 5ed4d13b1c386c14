use crate::contract::ScreenContract;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// Immutable map of screen key to contract, built once at start-up.
#[derive(Default)]
pub struct ContractRegistry {
    contracts: HashMap<String, Arc<dyn ScreenContract>>,
}

impl ContractRegistry {
    /// Indexes `contracts` by screen key. A later duplicate replaces an
    /// earlier one.
    pub fn new(contracts: Vec<Arc<dyn ScreenContract>>) -> Self {
        let mut map: HashMap<String, Arc<dyn ScreenContract>> = HashMap::new();
        for contract in contracts {
            let key = contract.screen_key().to_string();
            if map.contains_key(&key) {
                warn!(screen_key = %key, "Duplicate screen contract, keeping the last one");
            }
            map.insert(key, contract);
        }
        Self { contracts: map }
    }

    pub fn get(&self, screen_key: &str) -> Option<Arc<dyn ScreenContract>> {
        self.contracts.get(screen_key).cloned()
    }

    pub fn contains(&self, screen_key: &str) -> bool {
        self.contracts.contains_key(screen_key)
    }

    /// Registered screen keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.contracts.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }
}
