//! Compiled form model cache.
//!
//! Compiling a form definition (expanding pages, building the condition
//! graph and schemas) is expensive, so compiled models are cached per
//! `(form id, status, preview)`. Metadata is cheap and is fetched on every
//! load; a cached model is reused only while its `updated_at` still matches
//! the metadata, so newly published definitions are picked up on the next
//! request.

mod cache;
mod error;
mod provider;
mod types;

pub use cache::{CachedFormModel, FormModelCache, ModelRoutes};
pub use error::{ModelError, Result};
pub use provider::{FormDefinitionProvider, FormMetadataProvider, ModelBuilder};
pub use types::{
    BuildContext, FormDefinition, FormMetadata, FormMetadataState, PageDefinition, PageLink,
    REFERENCE_NUMBER_PREFIX_OPTION,
};
