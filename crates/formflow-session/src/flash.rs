//! One-shot validation error messages carried across a redirect.

use std::sync::Arc;
use std::time::Duration;

use formflow_types::{FlashMessage, FormRequest};
use tracing::trace;

use crate::error::Result;
use crate::key::{SessionKey, derive_key_with};
use crate::persistence::{NoPersistence, SessionPersistence};
use crate::store::KeyValueStore;

/// Sub-namespace flash queues live under.
pub const FLASH_NAMESPACE: &str = "flash";

/// Queue of messages, each readable exactly once.
///
/// Set before redirecting, then read (and thereby cleared) by the handler
/// for the page redirected to. Strictly one-shot only when the backing
/// store pops atomically.
#[derive(Clone)]
pub struct FlashChannel {
    store: Arc<dyn KeyValueStore>,
    persistence: Arc<dyn SessionPersistence>,
    ttl: Duration,
}

impl FlashChannel {
    pub fn new(store: Arc<dyn KeyValueStore>, ttl: Duration) -> Self {
        Self::with_persistence(store, ttl, Arc::new(NoPersistence))
    }

    /// Create a channel whose keys follow the persistence strategy's generator.
    pub fn with_persistence(
        store: Arc<dyn KeyValueStore>,
        ttl: Duration,
        persistence: Arc<dyn SessionPersistence>,
    ) -> Self {
        Self {
            store,
            persistence,
            ttl,
        }
    }

    pub fn key(&self, request: &FormRequest) -> Result<SessionKey> {
        derive_key_with(request, Some(FLASH_NAMESPACE), self.persistence.as_ref())
    }

    /// Pop the oldest queued message, if any.
    pub async fn get_flash(&self, request: &FormRequest) -> Result<Option<FlashMessage>> {
        let key = self.key(request)?;
        match self.store.pop(&key).await? {
            Some(value) => {
                trace!(key = %key, "Flash message consumed");
                Ok(Some(serde_json::from_value(value)?))
            }
            None => Ok(None),
        }
    }

    /// Queue a message for the next read.
    pub async fn set_flash(&self, request: &FormRequest, message: FlashMessage) -> Result<()> {
        let key = self.key(request)?;
        self.store
            .push(&key, serde_json::to_value(&message)?, self.ttl)
            .await?;
        trace!(key = %key, errors = message.errors.len(), "Flash message queued");
        Ok(())
    }
}
