//! Key-value store abstraction the session policy is layered on.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{Result, SessionError};
use crate::key::SessionKey;

/// Backing store for session values.
///
/// Failures are returned as-is to the caller; this layer neither retries
/// nor locks. `pop` is expected to be atomic. A backend that cannot pop
/// atomically still works, but flash messages become best-effort: two
/// concurrent reads may both observe the same message.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value. `None` means the key is absent or expired.
    async fn get(&self, key: &SessionKey) -> Result<Option<Value>>;

    /// Write a value, replacing any existing one, expiring after `ttl`.
    async fn set(&self, key: &SessionKey, value: Value, ttl: Duration) -> Result<()>;

    /// Delete a key. Deleting an absent key is not an error.
    async fn remove(&self, key: &SessionKey) -> Result<()>;

    /// Append to the queue stored at `key`, refreshing its expiry.
    async fn push(&self, key: &SessionKey, value: Value, ttl: Duration) -> Result<()>;

    /// Remove and return the front of the queue stored at `key`.
    async fn pop(&self, key: &SessionKey) -> Result<Option<Value>>;
}

/// Named stores, selected by the `cache_name` setting.
#[derive(Clone, Default)]
pub struct StoreRegistry {
    stores: HashMap<String, Arc<dyn KeyValueStore>>,
}

impl StoreRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a store under `name`, replacing any previous one.
    pub fn register(&mut self, name: impl Into<String>, store: impl KeyValueStore + 'static) {
        self.stores.insert(name.into(), Arc::new(store));
    }

    /// Register an already shared store.
    pub fn register_shared(&mut self, name: impl Into<String>, store: Arc<dyn KeyValueStore>) {
        self.stores.insert(name.into(), store);
    }

    /// Resolve a store by name.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn KeyValueStore>> {
        self.stores
            .get(name)
            .cloned()
            .ok_or_else(|| SessionError::UnknownStore(name.to_string()))
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.stores.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
