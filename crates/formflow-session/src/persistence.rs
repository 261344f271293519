//! Save-and-resume persistence hooks.
//!
//! The answer store is a TTL cache. Deployments that let users leave and
//! come back later plug a [`SessionPersistence`] implementation in to key
//! state by something longer-lived than the cookie, reload it on a cache
//! miss, and write or purge the durable copy.

use async_trait::async_trait;
use formflow_types::{FormRequest, FormState};

use crate::error::Result;

/// Strategy for session keying and durable storage.
///
/// Every method has a default, so implementors only override the hooks
/// they need. With [`NoPersistence`] state is cache-only and is lost on
/// TTL expiry or eviction.
#[async_trait]
pub trait SessionPersistence: Send + Sync {
    /// Base id for the session key.
    ///
    /// Return `None` to use the default `<session>:<status>:<slug>:<path>`
    /// algorithm.
    fn key(&self, _request: &FormRequest) -> Option<String> {
        None
    }

    /// Load state from durable storage.
    ///
    /// Called only when the cache has no entry for the request's key.
    async fn hydrate(&self, _request: &FormRequest) -> Result<Option<FormState>> {
        Ok(None)
    }

    /// Write state to durable storage ("save and exit").
    async fn persist(&self, _request: &FormRequest, _state: &FormState) -> Result<()> {
        Ok(())
    }

    /// Remove the durable copy.
    async fn purge(&self, _request: &FormRequest) -> Result<()> {
        Ok(())
    }
}

/// Cache-only sessions.
#[derive(Debug, Clone, Default)]
pub struct NoPersistence;

impl SessionPersistence for NoPersistence {}
