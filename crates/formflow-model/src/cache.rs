//! Process-wide cache of compiled form models.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use formflow_types::{FormModel, FormStatus, config_defaults};
use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::error::{ModelError, Result};
use crate::provider::{FormDefinitionProvider, FormMetadataProvider, ModelBuilder};
use crate::types::BuildContext;

/// Route prefixes used to compute a model's base path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRoutes {
    /// Prefix for every form route, e.g. `/form`.
    pub route_prefix: String,
    /// Segment inserted before preview routes, e.g. `/preview`.
    pub preview_prefix: String,
}

impl Default for ModelRoutes {
    fn default() -> Self {
        Self {
            route_prefix: config_defaults::ROUTE_PREFIX.to_string(),
            preview_prefix: config_defaults::PREVIEW_PREFIX.to_string(),
        }
    }
}

impl ModelRoutes {
    /// Base path for a form: `{prefix}/{slug}` live, or
    /// `{prefix}{preview}/{status}/{slug}` in preview.
    pub fn base_path(&self, slug: &str, status: FormStatus, is_preview: bool) -> String {
        let prefix = self.route_prefix.trim_end_matches('/');
        if is_preview {
            let preview = self.preview_prefix.trim_end_matches('/');
            format!("{prefix}{preview}/{status}/{slug}")
        } else {
            format!("{prefix}/{slug}")
        }
    }
}

/// A compiled model and the metadata timestamp it was built from.
#[derive(Clone)]
pub struct CachedFormModel {
    pub model: Arc<dyn FormModel>,
    pub updated_at: DateTime<Utc>,
}

/// Cache of compiled models keyed by `{form_id}_{status}_{is_preview}`.
///
/// Owned by the server and shared by cloning. There is no lock around
/// check-build-store: concurrent loads of a cold or stale key may each
/// rebuild, and the last store wins. Entries are replaced, never evicted.
#[derive(Clone, Default)]
pub struct FormModelCache {
    entries: Arc<RwLock<HashMap<String, CachedFormModel>>>,
    routes: ModelRoutes,
}

impl FormModelCache {
    /// Create an empty cache with default routes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty cache with explicit routes.
    pub fn with_routes(routes: ModelRoutes) -> Self {
        Self {
            entries: Arc::default(),
            routes,
        }
    }

    pub fn routes(&self) -> &ModelRoutes {
        &self.routes
    }

    /// Cache key for a form version.
    pub fn cache_key(form_id: &str, status: FormStatus, is_preview: bool) -> String {
        format!("{form_id}_{status}_{is_preview}")
    }

    /// Load the compiled model for a form version, rebuilding if stale.
    pub async fn load_model(
        &self,
        slug: &str,
        status: FormStatus,
        is_preview: bool,
        metadata_provider: &dyn FormMetadataProvider,
        definition_provider: &dyn FormDefinitionProvider,
        builder: &dyn ModelBuilder,
    ) -> Result<Arc<dyn FormModel>> {
        let metadata = metadata_provider
            .get_form_metadata(slug)
            .await?
            .ok_or_else(|| ModelError::FormNotFound(slug.to_string()))?;

        let updated_at = metadata
            .state(status)
            .ok_or_else(|| ModelError::StatusNotFound {
                slug: slug.to_string(),
                status,
            })?
            .updated_at;

        let key = Self::cache_key(&metadata.id, status, is_preview);

        let cached = self.entries.read().get(&key).cloned();
        if let Some(entry) = cached
            && entry.updated_at == updated_at
        {
            trace!(key = %key, "Model cache hit");
            return Ok(entry.model);
        }

        debug!(key = %key, updated_at = %updated_at, "Model cache miss or stale, rebuilding");

        let definition = definition_provider
            .get_form_definition(&metadata.id, status)
            .await?
            .ok_or_else(|| ModelError::DefinitionNotFound {
                form_id: metadata.id.clone(),
                status,
            })?;

        let notification_email = metadata
            .notification_email
            .clone()
            .or_else(|| definition.output_email.clone());

        // Fail closed: a live form that cannot route submissions is not served.
        if status == FormStatus::Live && !is_preview && notification_email.is_none() {
            return Err(ModelError::MissingNotificationEmail(slug.to_string()));
        }

        let context = BuildContext {
            form_id: metadata.id.clone(),
            slug: slug.to_string(),
            status,
            is_preview,
            base_path: self.routes.base_path(slug, status, is_preview),
            notification_email,
        };

        let model = builder.build(definition, context)?;

        self.entries.write().insert(
            key.clone(),
            CachedFormModel {
                model: Arc::clone(&model),
                updated_at,
            },
        );
        debug!(key = %key, name = model.name(), "Model cached");

        Ok(model)
    }

    /// Snapshot of cache keys and the timestamps they were built from.
    pub fn cached_entries(&self) -> Vec<(String, DateTime<Utc>)> {
        let mut entries: Vec<_> = self
            .entries
            .read()
            .iter()
            .map(|(key, entry)| (key.clone(), entry.updated_at))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Drop one entry so the next load rebuilds it.
    pub fn invalidate(&self, key: &str) -> bool {
        self.entries.write().remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
