//! Confirmation state kept after a form is submitted.

use std::sync::Arc;
use std::time::Duration;

use formflow_types::{ConfirmationState, FormRequest};
use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::key::{SessionKey, derive_key_with};
use crate::persistence::{NoPersistence, SessionPersistence};
use crate::store::KeyValueStore;

/// Sub-namespace confirmation state lives under.
pub const CONFIRMATION_NAMESPACE: &str = "confirmation";

/// Store for [`ConfirmationState`].
///
/// Independent of the answer state: clearing one leaves the other alone.
#[derive(Clone)]
pub struct ConfirmationStore {
    store: Arc<dyn KeyValueStore>,
    persistence: Arc<dyn SessionPersistence>,
    ttl: Duration,
}

impl ConfirmationStore {
    pub fn new(store: Arc<dyn KeyValueStore>, ttl: Duration) -> Self {
        Self::with_persistence(store, ttl, Arc::new(NoPersistence))
    }

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
        derive_key_with(
            request,
            Some(CONFIRMATION_NAMESPACE),
            self.persistence.as_ref(),
        )
    }

    /// Current confirmation state; unconfirmed when nothing is stored.
    pub async fn get_confirmation_state(&self, request: &FormRequest) -> Result<ConfirmationState> {
        let key = self.key(request)?;
        match self.store.get(&key).await? {
            Some(Value::Null) | None => Ok(ConfirmationState::default()),
            Some(value) => Ok(serde_json::from_value(value)?),
        }
    }

    /// Write the confirmation state and return what the store now holds.
    pub async fn set_confirmation_state(
        &self,
        request: &FormRequest,
        state: ConfirmationState,
    ) -> Result<ConfirmationState> {
        let key = self.key(request)?;
        self.store
            .set(&key, serde_json::to_value(state)?, self.ttl)
            .await?;
        debug!(key = %key, confirmed = state.confirmed, "Confirmation state stored");
        self.get_confirmation_state(request).await
    }

    /// Drop the confirmation state. No-op without a session.
    pub async fn clear_confirmation_state(&self, request: &FormRequest) -> Result<()> {
        if request.session_id.is_none() {
            return Ok(());
        }
        let key = self.key(request)?;
        self.store.remove(&key).await
    }
}
