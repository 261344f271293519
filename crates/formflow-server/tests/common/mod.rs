//! Shared fixtures: a linear relevance engine and in-memory form providers.
//!
//! Form `tax-form` has pages `first -> second -> summary`. Answering
//! `first` with `"skip"` jumps straight to `summary`.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use formflow_model::{
    BuildContext, FormDefinition, FormDefinitionProvider, FormMetadata, FormMetadataProvider,
    FormMetadataState, ModelBuilder, PageDefinition, PageLink, REFERENCE_NUMBER_PREFIX_OPTION,
};
use formflow_server::{AppState, ReferenceNumberGenerator, ServerConfig};
use formflow_session::{MemoryStore, NoPersistence, SessionPersistence, StoreRegistry};
use formflow_types::{
    FormContext, FormModel, FormPage, FormRequest, FormState, FormStatus, FormSubmissionError,
};
use serde_json::{Value, json};

pub const SESSION: &str = "abc";
pub const SLUG: &str = "tax-form";
pub const SUMMARY: &str = "summary";

/// Query flag the engine treats as a direct preview link.
pub const FORCE_PARAM: &str = "force";

struct LinearModel {
    name: String,
    base_path: String,
    pages: Vec<PageDefinition>,
    prefix: Option<Value>,
}

impl LinearModel {
    fn definition(&self, path: &str) -> Option<&PageDefinition> {
        self.pages.iter().find(|p| p.path == path)
    }

    /// Pages reachable from the start given the answers so far.
    fn reachable(&self, state: &FormState) -> Vec<String> {
        let mut reachable = Vec::new();
        let mut current = self.pages.first();

        while let Some(page) = current {
            reachable.push(page.path.clone());
            if page.next.is_empty() || !state.contains_key(&page.path) {
                break;
            }
            let answer = state.get(&page.path).and_then(|v| v.as_str());
            let next = page
                .next
                .iter()
                .find(|link| match &link.condition {
                    Some(condition) => answer == Some(condition.as_str()),
                    None => true,
                })
                .and_then(|link| self.definition(&link.path));
            current = next;
        }

        reachable
    }
}

impl FormModel for LinearModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn base_path(&self) -> &str {
        &self.base_path
    }

    fn page(&self, path: &str) -> Option<Arc<dyn FormPage>> {
        let page = self.definition(path)?;
        Some(Arc::new(LinearPage {
            path: page.path.clone(),
            base_path: self.base_path.clone(),
            has_next: !page.next.is_empty(),
        }))
    }

    fn reference_number_prefix(&self) -> Option<&Value> {
        self.prefix.as_ref()
    }

    fn form_context(
        &self,
        request: &FormRequest,
        state: &FormState,
        errors: &[FormSubmissionError],
    ) -> FormContext {
        FormContext {
            is_force_access: request.query.contains_key(FORCE_PARAM),
            state: state.clone(),
            errors: errors.to_vec(),
            relevant_pages: self.reachable(state),
            data: json!({ "name": self.name }),
        }
    }
}

struct LinearPage {
    path: String,
    base_path: String,
    has_next: bool,
}

impl FormPage for LinearPage {
    fn path(&self) -> &str {
        &self.path
    }

    fn href(&self, path: &str) -> String {
        format!("{}/{}", self.base_path, path)
    }

    fn relevant_path(&self, _request: &FormRequest, context: &FormContext) -> String {
        if context.relevant_pages.contains(&self.path) {
            return self.path.clone();
        }
        context.relevant_pages.last().cloned().unwrap_or_default()
    }

    fn summary_path(&self) -> String {
        SUMMARY.to_string()
    }

    fn has_next(&self) -> bool {
        self.has_next
    }
}

#[derive(Default)]
pub struct LinearBuilder {
    pub builds: AtomicUsize,
}

impl ModelBuilder for LinearBuilder {
    fn build(
        &self,
        definition: FormDefinition,
        context: BuildContext,
    ) -> formflow_model::Result<Arc<dyn FormModel>> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(LinearModel {
            prefix: definition.reference_number_prefix().cloned(),
            name: definition.name,
            base_path: context.base_path,
            pages: definition.pages,
        }))
    }
}

/// Metadata and definition source for the single `tax-form` form.
pub struct Forms {
    prefix: Option<Value>,
}

fn link(path: &str, condition: Option<&str>) -> PageLink {
    PageLink {
        path: path.to_string(),
        condition: condition.map(str::to_string),
    }
}

fn page(path: &str, next: Vec<PageLink>) -> PageDefinition {
    PageDefinition {
        path: path.to_string(),
        title: path.to_string(),
        next,
    }
}

#[async_trait]
impl FormMetadataProvider for Forms {
    async fn get_form_metadata(&self, slug: &str) -> formflow_model::Result<Option<FormMetadata>> {
        if slug != SLUG {
            return Ok(None);
        }
        Ok(Some(FormMetadata {
            id: "form-1".to_string(),
            slug: SLUG.to_string(),
            title: "Tax form".to_string(),
            draft: None,
            live: Some(FormMetadataState {
                updated_at: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
                updated_by: None,
            }),
            notification_email: Some("forms@example.com".to_string()),
        }))
    }
}

#[async_trait]
impl FormDefinitionProvider for Forms {
    async fn get_form_definition(
        &self,
        _form_id: &str,
        _status: FormStatus,
    ) -> formflow_model::Result<Option<FormDefinition>> {
        let mut metadata = serde_json::Map::new();
        if let Some(prefix) = &self.prefix {
            metadata.insert(REFERENCE_NUMBER_PREFIX_OPTION.to_string(), prefix.clone());
        }

        Ok(Some(FormDefinition {
            name: "Tax form".to_string(),
            start_page: Some("first".to_string()),
            pages: vec![
                page(
                    "first",
                    vec![link(SUMMARY, Some("skip")), link("second", None)],
                ),
                page("second", vec![link(SUMMARY, None)]),
                page(SUMMARY, Vec::new()),
            ],
            output_email: None,
            metadata,
        }))
    }
}

/// Deterministic references: `{prefix}-001-000`, `{prefix}-002-000`, ...
#[derive(Default)]
pub struct SequentialReferences {
    pub issued: AtomicUsize,
}

impl ReferenceNumberGenerator for SequentialReferences {
    fn generate(&self, prefix: Option<&str>) -> String {
        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{}-{:03}-000", prefix.unwrap_or("REF"), n)
    }
}

pub struct TestForm {
    pub state: AppState,
    pub builder: Arc<LinearBuilder>,
    pub references: Arc<SequentialReferences>,
}

impl TestForm {
    pub fn new() -> anyhow::Result<Self> {
        Self::with_prefix(None)
    }

    pub fn with_prefix(prefix: Option<Value>) -> anyhow::Result<Self> {
        Self::build(prefix, Arc::new(NoPersistence))
    }

    pub fn with_persistence(persistence: Arc<dyn SessionPersistence>) -> anyhow::Result<Self> {
        Self::build(None, persistence)
    }

    fn build(
        prefix: Option<Value>,
        persistence: Arc<dyn SessionPersistence>,
    ) -> anyhow::Result<Self> {
        let forms = Arc::new(Forms { prefix });
        let builder = Arc::new(LinearBuilder::default());
        let references = Arc::new(SequentialReferences::default());
        let config = ServerConfig::new();

        let mut registry = StoreRegistry::new();
        registry.register(config.cache_name.clone(), MemoryStore::new(config.store_config()));

        let state = AppState::with_registry(
            config,
            &registry,
            persistence,
            forms.clone(),
            forms,
            builder.clone(),
        )?
        .with_reference_generator(references.clone());

        Ok(Self {
            state,
            builder,
            references,
        })
    }

    /// A live request for `path` with the model attached.
    pub async fn request(&self, path: &str) -> anyhow::Result<FormRequest> {
        let mut request = FormRequest::new(SESSION)
            .with_slug(SLUG)
            .with_status(FormStatus::Live)
            .with_path(path);
        self.state.attach_model(&mut request).await?;
        Ok(request)
    }

    /// Record an answer the way a page handler would.
    pub async fn answer(&self, path: &str, value: &str) -> anyhow::Result<()> {
        let request = self.request(path).await?;
        self.state
            .resolver
            .merge_state(&request, FormState::new().with(path, value))
            .await?;
        Ok(())
    }
}
