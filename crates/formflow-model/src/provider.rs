//! Collaborators the cache pulls definitions and models from.

use std::sync::Arc;

use async_trait::async_trait;
use formflow_types::{FormModel, FormStatus};

use crate::error::Result;
use crate::types::{BuildContext, FormDefinition, FormMetadata};

/// Source of form metadata. Called on every model load, so it should be cheap.
#[async_trait]
pub trait FormMetadataProvider: Send + Sync {
    /// Metadata for a slug, or `None` if no such form exists.
    async fn get_form_metadata(&self, slug: &str) -> Result<Option<FormMetadata>>;
}

/// Source of full form definitions. Called only when a model is (re)built.
#[async_trait]
pub trait FormDefinitionProvider: Send + Sync {
    async fn get_form_definition(
        &self,
        form_id: &str,
        status: FormStatus,
    ) -> Result<Option<FormDefinition>>;
}

/// Compiles a definition into a model the relevance engine can evaluate.
///
/// Must be a pure function of its inputs: concurrent cold-cache loads may
/// build the same model more than once and the last one stored wins.
pub trait ModelBuilder: Send + Sync {
    fn build(&self, definition: FormDefinition, context: BuildContext) -> Result<Arc<dyn FormModel>>;
}
