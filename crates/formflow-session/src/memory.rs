//! In-memory key-value store with LRU eviction and per-entry TTL.

use std::collections::VecDeque;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lru::LruCache;
use serde_json::Value;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::config::StoreConfig;
use crate::error::{Result, SessionError};
use crate::key::SessionKey;
use crate::store::KeyValueStore;
use crate::ttl::TtlTracker;

/// What a key holds.
#[derive(Debug, Clone)]
enum Stored {
    Value(Value),
    Queue(VecDeque<Value>),
}

/// Inner state protected by RwLock.
struct StoreInner {
    /// LRU map of stored values.
    lru: LruCache<SessionKey, Stored>,

    /// Expiry deadlines.
    ttl: TtlTracker,
}

impl StoreInner {
    /// Drop the key if its deadline has passed.
    fn expire_if_stale(&mut self, key: &SessionKey) {
        if self.lru.contains(key) && self.ttl.is_expired(key) {
            debug!(key = %key, "Entry expired, removing from store");
            self.lru.pop(key);
            self.ttl.remove(key);
        }
    }

    fn insert(&mut self, key: &SessionKey, stored: Stored, ttl: Duration) {
        if let Some((evicted, _)) = self.lru.push(key.clone(), stored)
            && evicted != *key
        {
            debug!(key = %evicted, "Evicting LRU entry to make room");
            self.ttl.remove(&evicted);
        }
        self.ttl.touch(key, ttl);
    }
}

fn wrong_type(key: &SessionKey, expected: &str) -> SessionError {
    SessionError::Store(format!("key '{key}' does not hold a {expected}"))
}

/// Process-local [`KeyValueStore`].
///
/// All operations take the write lock, so `pop` is atomic and flash
/// messages are strictly one-shot on this backend. Suitable for a single
/// instance or for tests; multi-instance deployments register a shared
/// backend instead.
pub struct MemoryStore {
    inner: Arc<RwLock<StoreInner>>,
    config: StoreConfig,
}

impl MemoryStore {
    /// Create a new store.
    pub fn new(config: StoreConfig) -> Self {
        let cap = NonZeroUsize::new(config.max_entries).unwrap_or(NonZeroUsize::MIN);

        let inner = StoreInner {
            lru: LruCache::new(cap),
            ttl: TtlTracker::new(),
        };

        Self {
            inner: Arc::new(RwLock::new(inner)),
            config,
        }
    }

    /// Get the store configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Number of keys currently held, including not-yet-swept expired ones.
    pub async fn len(&self) -> usize {
        self.inner.read().await.lru.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.lru.is_empty()
    }

    /// Check if a live key exists (without touching LRU order).
    pub async fn contains(&self, key: &SessionKey) -> bool {
        let inner = self.inner.read().await;
        inner.lru.contains(key) && !inner.ttl.is_expired(key)
    }

    /// Remove every expired key.
    ///
    /// Called periodically by the task from [`spawn_cleanup_task`](Self::spawn_cleanup_task),
    /// but can also be called manually.
    pub async fn cleanup_expired(&self) -> usize {
        let mut inner = self.inner.write().await;
        let expired = inner.ttl.drain_expired();
        let count = expired.len();

        for key in expired {
            inner.lru.pop(&key);
        }

        if count > 0 {
            debug!(count = count, "Cleaned up expired entries");
        }

        count
    }

    /// Get store statistics.
    pub async fn stats(&self) -> StoreStats {
        let inner = self.inner.read().await;
        StoreStats {
            size: inner.lru.len(),
            capacity: self.config.max_entries,
            ttl_tracked: inner.ttl.len(),
        }
    }

    /// Start the periodic expiry sweep.
    ///
    /// Returns `None` when the cleanup task is disabled in config.
    pub fn spawn_cleanup_task(&self) -> Option<JoinHandle<()>> {
        if !self.config.enable_cleanup_task {
            return None;
        }

        let store = self.clone();
        let period = self.config.cleanup_interval;
        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                store.cleanup_expired().await;
            }
        }))
    }
}

impl Clone for MemoryStore {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            config: self.config.clone(),
        }
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &SessionKey) -> Result<Option<Value>> {
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;
        inner.expire_if_stale(key);

        match inner.lru.get(key) {
            None => {
                trace!(key = %key, "Store miss");
                Ok(None)
            }
            Some(Stored::Value(value)) => {
                trace!(key = %key, "Store hit");
                Ok(Some(value.clone()))
            }
            Some(Stored::Queue(_)) => Err(wrong_type(key, "value")),
        }
    }

    async fn set(&self, key: &SessionKey, value: Value, ttl: Duration) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.insert(key, Stored::Value(value), ttl);

        trace!(
            key = %key,
            ttl_ms = ttl.as_millis() as u64,
            size = inner.lru.len(),
            "Value stored"
        );

        Ok(())
    }

    async fn remove(&self, key: &SessionKey) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.ttl.remove(key);
        if inner.lru.pop(key).is_some() {
            debug!(key = %key, "Key removed from store");
        }
        Ok(())
    }

    async fn push(&self, key: &SessionKey, value: Value, ttl: Duration) -> Result<()> {
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;
        inner.expire_if_stale(key);

        match inner.lru.get_mut(key) {
            Some(Stored::Queue(queue)) => {
                queue.push_back(value);
                inner.ttl.touch(key, ttl);
            }
            Some(Stored::Value(_)) => return Err(wrong_type(key, "queue")),
            None => inner.insert(key, Stored::Queue(VecDeque::from([value])), ttl),
        }

        Ok(())
    }

    async fn pop(&self, key: &SessionKey) -> Result<Option<Value>> {
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;
        inner.expire_if_stale(key);

        match inner.lru.get_mut(key) {
            None => Ok(None),
            Some(Stored::Value(_)) => Err(wrong_type(key, "queue")),
            Some(Stored::Queue(queue)) => {
                let value = queue.pop_front();
                if queue.is_empty() {
                    inner.lru.pop(key);
                    inner.ttl.remove(key);
                }
                Ok(value)
            }
        }
    }
}

/// Store statistics.
#[derive(Debug, Clone)]
pub struct StoreStats {
    /// Current number of keys.
    pub size: usize,

    /// Maximum capacity.
    pub capacity: usize,

    /// Number of keys being tracked for TTL.
    pub ttl_tracked: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::time::sleep;

    const HOUR: Duration = Duration::from_secs(3600);

    fn key(id: &str) -> SessionKey {
        SessionKey::new(id)
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let store = MemoryStore::new(StoreConfig::new().with_max_entries(10));

        store.set(&key("a"), json!({ "name": "Ada" }), HOUR).await.unwrap();

        let value = store.get(&key("a")).await.unwrap();
        assert_eq!(value, Some(json!({ "name": "Ada" })));
    }

    #[tokio::test]
    async fn test_missing_key() {
        let store = MemoryStore::new(StoreConfig::new());
        assert_eq!(store.get(&key("nonexistent")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_replaces() {
        let store = MemoryStore::new(StoreConfig::new());
        store.set(&key("a"), json!(1), HOUR).await.unwrap();
        store.set(&key("a"), json!(2), HOUR).await.unwrap();

        assert_eq!(store.get(&key("a")).await.unwrap(), Some(json!(2)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_lru_eviction() {
        let store = MemoryStore::new(StoreConfig::new().with_max_entries(3));

        for i in 1..=3 {
            store.set(&key(&format!("k{i}")), json!(i), HOUR).await.unwrap();
        }

        // Reading k1 makes k2 the least recently used
        store.get(&key("k1")).await.unwrap();
        store.set(&key("k4"), json!(4), HOUR).await.unwrap();

        assert_eq!(store.len().await, 3);
        assert!(store.contains(&key("k1")).await);
        assert!(!store.contains(&key("k2")).await);
        assert!(store.contains(&key("k3")).await);
        assert!(store.contains(&key("k4")).await);
        assert_eq!(store.stats().await.ttl_tracked, 3);
    }

    #[tokio::test]
    async fn test_ttl_expiration() {
        let store = MemoryStore::new(StoreConfig::new());
        store.set(&key("a"), json!(1), Duration::from_millis(50)).await.unwrap();
        assert!(store.contains(&key("a")).await);

        sleep(Duration::from_millis(100)).await;

        assert!(!store.contains(&key("a")).await);
        assert_eq!(store.get(&key("a")).await.unwrap(), None);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_reads_do_not_extend_ttl() {
        let store = MemoryStore::new(StoreConfig::new());
        store.set(&key("a"), json!(1), Duration::from_millis(80)).await.unwrap();

        sleep(Duration::from_millis(50)).await;
        assert!(store.get(&key("a")).await.unwrap().is_some());
        sleep(Duration::from_millis(50)).await;

        assert_eq!(store.get(&key("a")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_remove() {
        let store = MemoryStore::new(StoreConfig::new());
        store.set(&key("a"), json!(1), HOUR).await.unwrap();

        store.remove(&key("a")).await.unwrap();
        store.remove(&key("never-set")).await.unwrap();

        assert_eq!(store.get(&key("a")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_queue_is_fifo_and_drains() {
        let store = MemoryStore::new(StoreConfig::new());
        store.push(&key("q"), json!("first"), HOUR).await.unwrap();
        store.push(&key("q"), json!("second"), HOUR).await.unwrap();

        assert_eq!(store.pop(&key("q")).await.unwrap(), Some(json!("first")));
        assert_eq!(store.pop(&key("q")).await.unwrap(), Some(json!("second")));
        assert_eq!(store.pop(&key("q")).await.unwrap(), None);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_type_mismatch_is_an_error() {
        let store = MemoryStore::new(StoreConfig::new());
        store.set(&key("v"), json!(1), HOUR).await.unwrap();
        store.push(&key("q"), json!(1), HOUR).await.unwrap();

        assert!(matches!(store.pop(&key("v")).await, Err(SessionError::Store(_))));
        assert!(matches!(store.get(&key("q")).await, Err(SessionError::Store(_))));
    }

    #[tokio::test]
    async fn test_concurrent_pops_see_message_once() {
        let store = MemoryStore::new(StoreConfig::new());
        store.push(&key("q"), json!("only"), HOUR).await.unwrap();

        let a = store.clone();
        let b = store.clone();
        let (ra, rb) = tokio::join!(
            async move { a.pop(&key("q")).await.unwrap() },
            async move { b.pop(&key("q")).await.unwrap() },
        );

        let hits = [ra, rb].into_iter().flatten().count();
        assert_eq!(hits, 1);
    }

    #[tokio::test]
    async fn test_cleanup_expired() {
        let store = MemoryStore::new(StoreConfig::new().with_max_entries(10));
        for i in 1..=3 {
            store
                .set(&key(&format!("k{i}")), json!(i), Duration::from_millis(50))
                .await
                .unwrap();
        }
        store.set(&key("keep"), json!(0), HOUR).await.unwrap();

        sleep(Duration::from_millis(100)).await;

        let cleaned = store.cleanup_expired().await;
        assert_eq!(cleaned, 3);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_cleanup_task_disabled() {
        let store = MemoryStore::new(StoreConfig::new().with_cleanup_task(false));
        assert!(store.spawn_cleanup_task().is_none());
    }

    #[tokio::test]
    async fn test_cleanup_task_sweeps() {
        let store = MemoryStore::new(
            StoreConfig::new().with_cleanup_interval(Duration::from_millis(20)),
        );
        store.set(&key("a"), json!(1), Duration::from_millis(10)).await.unwrap();

        let handle = store.spawn_cleanup_task().unwrap();
        sleep(Duration::from_millis(100)).await;
        handle.abort();

        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_stats() {
        let store = MemoryStore::new(StoreConfig::new().with_max_entries(100));
        for i in 1..=5 {
            store.set(&key(&format!("k{i}")), json!(i), HOUR).await.unwrap();
        }

        let stats = store.stats().await;
        assert_eq!(stats.size, 5);
        assert_eq!(stats.capacity, 100);
    }
}
