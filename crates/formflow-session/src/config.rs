//! Configuration for the in-memory store.

use std::time::Duration;

use formflow_types::config_defaults;

/// Configuration for [`MemoryStore`](crate::MemoryStore).
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Maximum number of keys held before LRU eviction.
    pub max_entries: usize,

    /// Whether [`MemoryStore::spawn_cleanup_task`](crate::MemoryStore::spawn_cleanup_task)
    /// actually sweeps. If false, expired entries are only dropped on access.
    pub enable_cleanup_task: bool,

    /// Interval for the cleanup task.
    pub cleanup_interval: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_entries: config_defaults::MAX_ENTRIES,
            enable_cleanup_task: true,
            cleanup_interval: Duration::from_secs(60),
        }
    }
}

impl StoreConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of keys.
    pub fn with_max_entries(mut self, max: usize) -> Self {
        self.max_entries = max;
        self
    }

    /// Enable or disable the background cleanup task.
    pub fn with_cleanup_task(mut self, enabled: bool) -> Self {
        self.enable_cleanup_task = enabled;
        self
    }

    /// Set the cleanup interval.
    pub fn with_cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval = interval;
        self
    }
}
