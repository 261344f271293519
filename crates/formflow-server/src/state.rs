//! Application state shared across handlers.

use std::sync::Arc;

use formflow_model::{FormDefinitionProvider, FormMetadataProvider, FormModelCache, ModelBuilder};
use formflow_session::{
    MemoryStore, NoPersistence, SessionPersistence, SessionStores, StoreRegistry,
};
use formflow_types::{FormModel, FormRequest};
use tracing::{debug, info};

use crate::config::ServerConfig;
use crate::error::{Result, ServerError};
use crate::navigation::NavigationResolver;
use crate::reference::{RandomReferenceGenerator, ReferenceNumberGenerator};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,

    /// State, flash and confirmation stores.
    pub stores: SessionStores,

    /// Compiled model cache, owned by this server instance.
    pub models: FormModelCache,

    /// Source of form metadata.
    pub metadata: Arc<dyn FormMetadataProvider>,

    /// Source of form definitions.
    pub definitions: Arc<dyn FormDefinitionProvider>,

    /// Compiles definitions into models.
    pub builder: Arc<dyn ModelBuilder>,

    /// Navigation resolver over `stores`.
    pub resolver: NavigationResolver,
}

impl AppState {
    /// Create state backed by an in-memory store registered under the
    /// configured cache name.
    pub fn new(
        config: ServerConfig,
        metadata: Arc<dyn FormMetadataProvider>,
        definitions: Arc<dyn FormDefinitionProvider>,
        builder: Arc<dyn ModelBuilder>,
    ) -> Result<Self> {
        let mut registry = StoreRegistry::new();
        registry.register(
            config.cache_name.clone(),
            MemoryStore::new(config.store_config()),
        );
        Self::with_registry(
            config,
            &registry,
            Arc::new(NoPersistence),
            metadata,
            definitions,
            builder,
        )
    }

    /// Create state over an existing store registry and persistence strategy.
    pub fn with_registry(
        config: ServerConfig,
        registry: &StoreRegistry,
        persistence: Arc<dyn SessionPersistence>,
        metadata: Arc<dyn FormMetadataProvider>,
        definitions: Arc<dyn FormDefinitionProvider>,
        builder: Arc<dyn ModelBuilder>,
    ) -> Result<Self> {
        let stores = SessionStores::with_persistence(&config, registry, persistence)?;
        let resolver = NavigationResolver::new(
            stores.state.clone(),
            stores.flash.clone(),
            Arc::new(RandomReferenceGenerator),
        );

        info!(
            cache_name = %config.cache_name,
            session_timeout_ms = config.session_timeout.as_millis() as u64,
            "Form session state initialized"
        );

        Ok(Self {
            models: FormModelCache::with_routes(config.routes.clone()),
            config: Arc::new(config),
            stores,
            metadata,
            definitions,
            builder,
            resolver,
        })
    }

    /// Replace the reference number generator.
    pub fn with_reference_generator(mut self, generator: Arc<dyn ReferenceNumberGenerator>) -> Self {
        self.resolver = NavigationResolver::new(
            self.stores.state.clone(),
            self.stores.flash.clone(),
            generator,
        );
        self
    }

    /// Load the model for the request's form version and attach it.
    pub async fn attach_model(&self, request: &mut FormRequest) -> Result<Arc<dyn FormModel>> {
        let slug = request
            .params
            .slug
            .clone()
            .ok_or_else(|| ServerError::NotFound("form slug missing from request".into()))?;
        let status = request
            .params
            .state
            .ok_or_else(|| ServerError::NotFound(format!("form status for '{}'", slug)))?;

        let model = self
            .models
            .load_model(
                &slug,
                status,
                request.is_preview,
                self.metadata.as_ref(),
                self.definitions.as_ref(),
                self.builder.as_ref(),
            )
            .await?;

        debug!(slug = %slug, status = %status, preview = request.is_preview, "Model attached");
        request.model = Some(Arc::clone(&model));
        Ok(model)
    }
}
