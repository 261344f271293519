//! Form session state with flash messages and pluggable persistence.
//!
//! This crate layers form-specific policy on a key-value store:
//! - Session key derivation from a request ([`derive_key`])
//! - Answer state with deep merge and rehydration on miss ([`StateStore`])
//! - One-shot post-redirect error messages ([`FlashChannel`])
//! - Post-submission confirmation state ([`ConfirmationStore`])
//! - An in-memory LRU/TTL backend ([`MemoryStore`])
//!
//! # Example
//!
//! ```rust,ignore
//! use formflow_session::{MemoryStore, SessionStores, StoreConfig, StoreRegistry};
//! use formflow_types::SessionConfigProvider;
//!
//! let mut registry = StoreRegistry::new();
//! registry.register("session", MemoryStore::new(StoreConfig::default()));
//!
//! let stores = SessionStores::from_config(&SessionConfigProvider::default(), &registry)?;
//! let state = stores.state.get_state(&request).await?;
//! ```

mod config;
mod confirmation;
mod error;
mod flash;
mod key;
mod memory;
mod merge;
mod persistence;
mod state;
mod store;
mod ttl;

pub use config::StoreConfig;
pub use confirmation::{CONFIRMATION_NAMESPACE, ConfirmationStore};
pub use error::{Result, SessionError};
pub use flash::{FLASH_NAMESPACE, FlashChannel};
pub use key::{CACHE_SEGMENT, SessionKey, derive_key, derive_key_with};
pub use memory::{MemoryStore, StoreStats};
pub use merge::merge;
pub use persistence::{NoPersistence, SessionPersistence};
pub use state::{SessionStores, StateScope, StateStore};
pub use store::{KeyValueStore, StoreRegistry};
pub use ttl::TtlTracker;
