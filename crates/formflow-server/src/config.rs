//! Server configuration.

use std::time::Duration;

use formflow_config::FormflowConfig;
use formflow_model::ModelRoutes;
use formflow_session::StoreConfig;
use formflow_types::{ConfigProvider, HasSessionConfig, config_defaults};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// TTL for form answer state.
    pub session_timeout: Duration,

    /// TTL for confirmation state.
    pub confirmation_session_timeout: Duration,

    /// Name of the registered store holding session state.
    pub cache_name: String,

    /// Capacity of the built-in in-memory store.
    pub max_entries: usize,

    /// Route prefixes used for model base paths.
    pub routes: ModelRoutes,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            session_timeout: config_defaults::session_timeout(),
            confirmation_session_timeout: config_defaults::confirmation_session_timeout(),
            cache_name: config_defaults::CACHE_NAME.to_string(),
            max_entries: config_defaults::MAX_ENTRIES,
            routes: ModelRoutes::default(),
        }
    }
}

impl ServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a loaded config file.
    pub fn from_config(config: &FormflowConfig) -> Self {
        Self {
            session_timeout: config.session_timeout(),
            confirmation_session_timeout: config.confirmation_session_timeout(),
            cache_name: config.cache_name().to_string(),
            max_entries: config.max_entries(),
            routes: ModelRoutes {
                route_prefix: config.route_prefix().to_string(),
                preview_prefix: config.preview_prefix().to_string(),
            },
        }
    }

    /// Set the session state TTL.
    pub fn with_session_timeout(mut self, timeout: Duration) -> Self {
        self.session_timeout = timeout;
        self
    }

    /// Set the confirmation state TTL.
    pub fn with_confirmation_session_timeout(mut self, timeout: Duration) -> Self {
        self.confirmation_session_timeout = timeout;
        self
    }

    /// Set the store name.
    pub fn with_cache_name(mut self, name: impl Into<String>) -> Self {
        self.cache_name = name.into();
        self
    }

    /// Config for the built-in in-memory store.
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::new().with_max_entries(self.max_entries)
    }
}

impl ConfigProvider for ServerConfig {}

impl HasSessionConfig for ServerConfig {
    fn session_timeout(&self) -> Duration {
        self.session_timeout
    }

    fn confirmation_session_timeout(&self) -> Duration {
        self.confirmation_session_timeout
    }

    fn cache_name(&self) -> &str {
        &self.cache_name
    }
}
