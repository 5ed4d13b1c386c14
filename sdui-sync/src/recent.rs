use sdui_types::{Clock, Millis};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Bounded, access-ordered index of recently opened screens.
///
/// Used to pick screens worth warming after a sync or app start.
pub struct RecentScreenTracker {
    capacity: usize,
    clock: Arc<dyn Clock>,
    // Least recent at the front.
    entries: Mutex<VecDeque<(String, Millis)>>,
}

impl RecentScreenTracker {
    pub fn new(capacity: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            capacity: capacity.max(1),
            clock,
            entries: Mutex::new(VecDeque::new()),
        }
    }

    /// Marks `screen_key` as just accessed.
    pub async fn record_access(&self, screen_key: &str) {
        let now = self.clock.now_millis();
        let mut entries = self.entries.lock().await;
        entries.retain(|(k, _)| k != screen_key);
        entries.push_back((screen_key.to_string(), now));
        while entries.len() > self.capacity {
            entries.pop_front();
        }
    }

    /// Keys accessed within `window` of now, most recent first.
    pub async fn recent_keys(&self, window: Duration) -> Vec<String> {
        let now = self.clock.now_millis();
        let window = window.as_millis() as Millis;
        self.entries
            .lock()
            .await
            .iter()
            .rev()
            .filter(|(_, at)| now.saturating_sub(*at) <= window)
            .map(|(k, _)| k.clone())
            .collect()
    }

    pub async fn remove(&self, screen_key: &str) {
        self.entries.lock().await.retain(|(k, _)| k != screen_key);
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}
