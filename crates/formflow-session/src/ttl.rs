//! TTL tracking for stored keys.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::key::SessionKey;

/// Tracks expiry deadlines per key.
///
/// Unlike an idle timeout, each write sets its own deadline: the store
/// honours the TTL passed with that write, and reads do not extend it.
#[derive(Debug, Default)]
pub struct TtlTracker {
    deadlines: HashMap<SessionKey, Instant>,
}

impl TtlTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a write for a key, expiring `ttl` from now.
    pub fn touch(&mut self, key: &SessionKey, ttl: Duration) {
        self.deadlines.insert(key.clone(), Instant::now() + ttl);
    }

    /// Check if a key has expired.
    pub fn is_expired(&self, key: &SessionKey) -> bool {
        match self.deadlines.get(key) {
            None => true, // No write record = expired
            Some(deadline) => Instant::now() >= *deadline,
        }
    }

    /// Time left before a key expires.
    pub fn remaining(&self, key: &SessionKey) -> Option<Duration> {
        self.deadlines
            .get(key)
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Remove tracking for a key.
    pub fn remove(&mut self, key: &SessionKey) {
        self.deadlines.remove(key);
    }

    /// Get all expired keys.
    pub fn get_expired(&self) -> Vec<SessionKey> {
        let now = Instant::now();
        self.deadlines
            .iter()
            .filter(|(_, deadline)| now >= **deadline)
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Remove all expired entries and return their keys.
    pub fn drain_expired(&mut self) -> Vec<SessionKey> {
        let expired = self.get_expired();
        for key in &expired {
            self.deadlines.remove(key);
        }
        expired
    }

    /// Get the number of tracked keys.
    pub fn len(&self) -> usize {
        self.deadlines.len()
    }

    /// Check if there are no tracked keys.
    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }
}
