//! Per-session form answer state.

use std::sync::Arc;
use std::time::Duration;

use formflow_types::{FormRequest, FormState, HasSessionConfig};
use serde_json::Value;
use tracing::{debug, trace};

use crate::confirmation::ConfirmationStore;
use crate::error::Result;
use crate::flash::FlashChannel;
use crate::key::{SessionKey, derive_key_with};
use crate::merge::merge;
use crate::persistence::{NoPersistence, SessionPersistence};
use crate::store::{KeyValueStore, StoreRegistry};

/// Which part of the request addresses answer state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StateScope {
    /// One state per form instance; the page path is ignored, so every page
    /// reads and writes `<session>:<status>:<slug>:`.
    #[default]
    Form,
    /// One state per page, keyed by the request's page path.
    Page,
}

/// Reads and writes form answers for a request's session key.
///
/// The key is chosen by the store's [`StateScope`], not by the caller, so
/// handlers, the navigation layer and the persistence hooks all address the
/// same entry for a given request.
///
/// There is no locking or compare-and-swap here: two requests for the same
/// key racing through [`merge_state`](Self::merge_state) resolve as last
/// writer wins.
#[derive(Clone)]
pub struct StateStore {
    store: Arc<dyn KeyValueStore>,
    persistence: Arc<dyn SessionPersistence>,
    ttl: Duration,
    scope: StateScope,
}

impl StateStore {
    /// Create a cache-only state store.
    pub fn new(store: Arc<dyn KeyValueStore>, ttl: Duration) -> Self {
        Self::with_persistence(store, ttl, Arc::new(NoPersistence))
    }

    /// Create a state store with save-and-resume hooks.
    pub fn with_persistence(
        store: Arc<dyn KeyValueStore>,
        ttl: Duration,
        persistence: Arc<dyn SessionPersistence>,
    ) -> Self {
        Self {
            store,
            persistence,
            ttl,
            scope: StateScope::Form,
        }
    }

    /// Key state per page instead of per form instance.
    pub fn with_scope(mut self, scope: StateScope) -> Self {
        self.scope = scope;
        self
    }

    /// TTL applied to every write.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn scope(&self) -> StateScope {
        self.scope
    }

    pub fn key(&self, request: &FormRequest) -> Result<SessionKey> {
        derive_key_with(&self.scoped(request), None, self.persistence.as_ref())
    }

    fn scoped(&self, request: &FormRequest) -> FormRequest {
        match self.scope {
            StateScope::Form => request.form_scoped(),
            StateScope::Page => request.clone(),
        }
    }

    /// Load the answers for this request.
    ///
    /// On a miss (no entry at all) the hydration hook gets a chance to
    /// restore saved state, which is written back with the normal TTL.
    pub async fn get_state(&self, request: &FormRequest) -> Result<FormState> {
        let request = self.scoped(request);
        let key = self.key(&request)?;

        match self.store.get(&key).await? {
            Some(Value::Null) => Ok(FormState::new()),
            Some(value) => {
                trace!(key = %key, "State found in store");
                Ok(serde_json::from_value(value)?)
            }
            None => {
                let Some(state) = self.persistence.hydrate(&request).await? else {
                    trace!(key = %key, "State miss, starting empty");
                    return Ok(FormState::new());
                };

                debug!(key = %key, fields = state.len(), "State rehydrated from persistence");
                self.store
                    .set(&key, serde_json::to_value(&state)?, self.ttl)
                    .await?;
                Ok(state)
            }
        }
    }

    /// Replace the answers for this request.
    ///
    /// Returns what the store holds after the write, not the argument.
    pub async fn set_state(&self, request: &FormRequest, state: FormState) -> Result<FormState> {
        let key = self.key(request)?;

        self.store
            .set(&key, serde_json::to_value(&state)?, self.ttl)
            .await?;

        match self.store.get(&key).await? {
            Some(Value::Null) | None => Ok(FormState::new()),
            Some(value) => Ok(serde_json::from_value(value)?),
        }
    }

    /// Read, deep-merge `update`, and write back.
    pub async fn merge_state(&self, request: &FormRequest, update: FormState) -> Result<FormState> {
        let state = self.get_state(request).await?;
        self.set_state(request, merge(state, update)).await
    }

    /// Hand the current answers to the persistence hook ("save and exit").
    pub async fn persist_state(&self, request: &FormRequest) -> Result<()> {
        let state = self.get_state(request).await?;
        self.persistence
            .persist(&self.scoped(request), &state)
            .await?;
        debug!(fields = state.len(), "State persisted");
        Ok(())
    }

    /// Drop the answers for this request and purge any durable copy.
    ///
    /// A request without a session is a no-op, so teardown paths can call
    /// this unconditionally.
    pub async fn clear_state(&self, request: &FormRequest) -> Result<()> {
        if request.session_id.is_none() {
            return Ok(());
        }

        let key = self.key(request)?;
        self.store.remove(&key).await?;
        self.persistence.purge(&self.scoped(request)).await?;

        debug!(key = %key, "State cleared");
        Ok(())
    }
}

/// The three session stores, sharing one backing store and strategy.
#[derive(Clone)]
pub struct SessionStores {
    pub state: StateStore,
    pub flash: FlashChannel,
    pub confirmation: ConfirmationStore,
}

impl SessionStores {
    /// Build cache-only stores from configuration.
    pub fn from_config<C: HasSessionConfig>(config: &C, registry: &StoreRegistry) -> Result<Self> {
        Self::with_persistence(config, registry, Arc::new(NoPersistence))
    }

    /// Build stores with save-and-resume hooks.
    pub fn with_persistence<C: HasSessionConfig>(
        config: &C,
        registry: &StoreRegistry,
        persistence: Arc<dyn SessionPersistence>,
    ) -> Result<Self> {
        let store = registry.resolve(config.cache_name())?;

        Ok(Self {
            state: StateStore::with_persistence(
                Arc::clone(&store),
                config.session_timeout(),
                Arc::clone(&persistence),
            ),
            flash: FlashChannel::with_persistence(
                Arc::clone(&store),
                config.session_timeout(),
                Arc::clone(&persistence),
            ),
            confirmation: ConfirmationStore::with_persistence(
                store,
                config.confirmation_session_timeout(),
                persistence,
            ),
        })
    }
}
