//! Configuration types mapping to the TOML schema.
//!
//! ```toml
//! [session]
//! session_timeout_ms = 1200000
//! confirmation_session_timeout_ms = 1200000
//! cache_name = "session"
//! max_entries = 10000
//!
//! [forms]
//! route_prefix = "/form"
//! preview_prefix = "/preview"
//! ```

use std::time::Duration;

use formflow_types::config_defaults as defaults;
use formflow_types::{ConfigProvider, HasSessionConfig};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

// ─────────────────────────────────────────────────────────────────────────────
// Top-level Config
// ─────────────────────────────────────────────────────────────────────────────

/// Root configuration structure.
///
/// All sections are optional so that partial configs (e.g. project-local
/// overrides) can be loaded and merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormflowConfig {
    /// Session state settings.
    pub session: Option<SessionSection>,

    /// Form routing settings.
    pub forms: Option<FormsSection>,
}

impl FormflowConfig {
    /// Create an empty config (all defaults).
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a TOML string and validate.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: FormflowConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Merge another config on top of this one (other takes priority).
    pub fn merge(&mut self, other: FormflowConfig) {
        if let Some(session) = other.session {
            match self.session.as_mut() {
                Some(current) => current.merge(session),
                None => self.session = Some(session),
            }
        }
        if let Some(forms) = other.forms {
            match self.forms.as_mut() {
                Some(current) => current.merge(forms),
                None => self.forms = Some(forms),
            }
        }
    }

    fn validate(&self) -> Result<()> {
        let Some(session) = &self.session else {
            return Ok(());
        };

        let positive = [
            ("session.session_timeout_ms", session.session_timeout_ms),
            (
                "session.confirmation_session_timeout_ms",
                session.confirmation_session_timeout_ms,
            ),
            ("session.max_entries", session.max_entries.map(|n| n as u64)),
        ];
        if let Some((field, _)) = positive.iter().find(|(_, value)| *value == Some(0)) {
            return Err(ConfigError::InvalidValue {
                field: field.to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// TTL for answer state.
    pub fn session_timeout(&self) -> Duration {
        self.session
            .as_ref()
            .and_then(|s| s.session_timeout_ms)
            .map(Duration::from_millis)
            .unwrap_or_else(defaults::session_timeout)
    }

    /// TTL for confirmation state.
    pub fn confirmation_session_timeout(&self) -> Duration {
        self.session
            .as_ref()
            .and_then(|s| s.confirmation_session_timeout_ms)
            .map(Duration::from_millis)
            .unwrap_or_else(defaults::confirmation_session_timeout)
    }

    /// Name of the store holding session state.
    pub fn cache_name(&self) -> &str {
        self.session
            .as_ref()
            .and_then(|s| s.cache_name.as_deref())
            .unwrap_or(defaults::CACHE_NAME)
    }

    /// Capacity of the in-memory store.
    pub fn max_entries(&self) -> usize {
        self.session
            .as_ref()
            .and_then(|s| s.max_entries)
            .unwrap_or(defaults::MAX_ENTRIES)
    }

    /// Prefix for live form routes.
    pub fn route_prefix(&self) -> &str {
        self.forms
            .as_ref()
            .and_then(|f| f.route_prefix.as_deref())
            .unwrap_or(defaults::ROUTE_PREFIX)
    }

    /// Prefix for preview routes.
    pub fn preview_prefix(&self) -> &str {
        self.forms
            .as_ref()
            .and_then(|f| f.preview_prefix.as_deref())
            .unwrap_or(defaults::PREVIEW_PREFIX)
    }
}

impl ConfigProvider for FormflowConfig {}

impl HasSessionConfig for FormflowConfig {
    fn session_timeout(&self) -> Duration {
        FormflowConfig::session_timeout(self)
    }

    fn confirmation_session_timeout(&self) -> Duration {
        FormflowConfig::confirmation_session_timeout(self)
    }

    fn cache_name(&self) -> &str {
        FormflowConfig::cache_name(self)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sections
// ─────────────────────────────────────────────────────────────────────────────

/// `[session]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    /// TTL in milliseconds for answer state.
    pub session_timeout_ms: Option<u64>,
    /// TTL in milliseconds for confirmation state.
    pub confirmation_session_timeout_ms: Option<u64>,
    /// Store name.
    pub cache_name: Option<String>,
    /// In-memory store capacity before LRU eviction.
    pub max_entries: Option<usize>,
}

impl SessionSection {
    fn merge(&mut self, other: SessionSection) {
        if other.session_timeout_ms.is_some() {
            self.session_timeout_ms = other.session_timeout_ms;
        }
        if other.confirmation_session_timeout_ms.is_some() {
            self.confirmation_session_timeout_ms = other.confirmation_session_timeout_ms;
        }
        if other.cache_name.is_some() {
            self.cache_name = other.cache_name;
        }
        if other.max_entries.is_some() {
            self.max_entries = other.max_entries;
        }
    }
}

/// `[forms]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormsSection {
    pub route_prefix: Option<String>,
    pub preview_prefix: Option<String>,
}

impl FormsSection {
    fn merge(&mut self, other: FormsSection) {
        if other.route_prefix.is_some() {
            self.route_prefix = other.route_prefix;
        }
        if other.preview_prefix.is_some() {
            self.preview_prefix = other.preview_prefix;
        }
    }
}
