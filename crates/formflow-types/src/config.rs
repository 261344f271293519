//! Configuration traits for decoupled config passing between crates.
//!
//! These traits allow components to depend on configuration capabilities without
//! requiring direct knowledge of the full configuration structure.

use std::time::Duration;

/// Base trait for all configuration types.
///
/// Implementations should be cheaply cloneable and thread-safe.
pub trait ConfigProvider: Clone + Send + Sync + 'static {}

/// Form session configuration.
///
/// Provides TTLs for the answer and confirmation stores plus the name of the
/// backing store segment.
pub trait HasSessionConfig: ConfigProvider {
    /// TTL applied to every write of form answer state.
    fn session_timeout(&self) -> Duration;

    /// TTL applied to confirmation state writes.
    fn confirmation_session_timeout(&self) -> Duration {
        self.session_timeout()
    }

    /// Name of the key-value store the session state lives in.
    fn cache_name(&self) -> &str {
        defaults::CACHE_NAME
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Default values
// ─────────────────────────────────────────────────────────────────────────────

/// Default session configuration values.
pub mod defaults {
    use std::time::Duration;

    /// Twenty minutes, in milliseconds.
    pub const SESSION_TIMEOUT_MS: u64 = 20 * 60 * 1000;
    pub const CONFIRMATION_SESSION_TIMEOUT_MS: u64 = 20 * 60 * 1000;
    pub const CACHE_NAME: &str = "session";
    pub const MAX_ENTRIES: usize = 10_000;
    pub const ROUTE_PREFIX: &str = "/form";
    pub const PREVIEW_PREFIX: &str = "/preview";

    pub fn session_timeout() -> Duration {
        Duration::from_millis(SESSION_TIMEOUT_MS)
    }

    pub fn confirmation_session_timeout() -> Duration {
        Duration::from_millis(CONFIRMATION_SESSION_TIMEOUT_MS)
    }
}

/// Standalone session configuration.
#[derive(Debug, Clone)]
pub struct SessionConfigProvider {
    pub session_timeout: Duration,
    pub confirmation_session_timeout: Duration,
    pub cache_name: String,
}

impl Default for SessionConfigProvider {
    fn default() -> Self {
        Self {
            session_timeout: defaults::session_timeout(),
            confirmation_session_timeout: defaults::confirmation_session_timeout(),
            cache_name: defaults::CACHE_NAME.to_string(),
        }
    }
}

impl ConfigProvider for SessionConfigProvider {}

impl HasSessionConfig for SessionConfigProvider {
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
