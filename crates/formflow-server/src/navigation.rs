//! Per-request navigation: reachability check, then dispatch or redirect.

use std::future::Future;
use std::sync::Arc;

use axum::response::{IntoResponse, Redirect, Response};
use formflow_session::{FlashChannel, StateStore};
use formflow_types::{
    FormContext, FormModel, FormPage, FormRequest, FormState, REFERENCE_NUMBER_FIELD,
};
use tracing::{debug, trace};

use crate::error::{Result, ServerError};
use crate::reference::{ReferenceNumberGenerator, reference_prefix};

/// Query parameter carrying the summary href after a redirect.
pub const RETURN_URL_PARAM: &str = "returnUrl";

/// Decides whether the requested page is reachable and either renders it
/// or sends the user to the page they are entitled to see.
#[derive(Clone)]
pub struct NavigationResolver {
    state: StateStore,
    flash: FlashChannel,
    references: Arc<dyn ReferenceNumberGenerator>,
}

impl NavigationResolver {
    pub fn new(
        state: StateStore,
        flash: FlashChannel,
        references: Arc<dyn ReferenceNumberGenerator>,
    ) -> Self {
        Self {
            state,
            flash,
            references,
        }
    }

    /// Resolve a GET or POST for a form page.
    ///
    /// `make_handler` runs only when the page is reachable (or access is
    /// forced). Otherwise the response is a redirect to the relevant page.
    /// Any lookup failure aborts with [`ServerError::NotFound`].
    ///
    /// Answers are keyed by the state store's scope, per form instance by
    /// default, so every page sees the same state and reference number.
    /// Flash errors stay keyed by page.
    pub async fn resolve<H, Fut, R>(
        &self,
        request: &mut FormRequest,
        make_handler: H,
    ) -> Result<Response>
    where
        H: FnOnce(Arc<dyn FormPage>, FormContext) -> Fut,
        Fut: Future<Output = R>,
        R: IntoResponse,
    {
        let model = request
            .model
            .clone()
            .ok_or_else(|| ServerError::NotFound("no form model attached to request".into()))?;

        let page = model
            .page(request.path())
            .ok_or_else(|| ServerError::NotFound(format!("page '{}'", request.path())))?;

        let state = self.ensure_reference_number(request, model.as_ref()).await?;

        let errors = self
            .flash
            .get_flash(request)
            .await?
            .map(|message| message.errors)
            .unwrap_or_default();

        let context = model.form_context(request, &state, &errors);
        let relevant_path = page.relevant_path(request, &context);
        let summary_path = page.summary_path();

        if relevant_path.starts_with(page.path()) || context.is_force_access {
            trace!(
                path = %page.path(),
                force = context.is_force_access,
                "Dispatching page handler"
            );
            return Ok(make_handler(page, context).await.into_response());
        }

        let mut location = page.href(&relevant_path);

        match model.page(&relevant_path) {
            Some(relevant) if relevant.has_next() => {
                let return_url = page.href(&summary_path);
                request
                    .query
                    .insert(RETURN_URL_PARAM.to_string(), return_url.clone());
                location = with_query(&location, RETURN_URL_PARAM, &return_url);
            }
            Some(_) => {}
            None => {
                debug!(relevant = %relevant_path, "Relevant page not in model");
            }
        }

        debug!(
            requested = %page.path(),
            relevant = %relevant_path,
            location = %location,
            "Redirecting to relevant page"
        );

        Ok(Redirect::to(&location).into_response())
    }

    /// Answers visible to the page handling `request`.
    pub async fn get_state(&self, request: &FormRequest) -> Result<FormState> {
        Ok(self.state.get_state(request).await?)
    }

    /// Merge `update` into the answers for `request` and return the result.
    pub async fn merge_state(&self, request: &FormRequest, update: FormState) -> Result<FormState> {
        Ok(self.state.merge_state(request, update).await?)
    }

    /// Load state, assigning a reference number on first touch.
    ///
    /// The reference is written to the cache only; the persistence hook runs
    /// when the user saves, not on every new visitor.
    async fn ensure_reference_number(
        &self,
        request: &FormRequest,
        model: &dyn FormModel,
    ) -> Result<FormState> {
        let state = self.state.get_state(request).await?;
        if state.reference_number().is_some() {
            return Ok(state);
        }

        let prefix = reference_prefix(model)?;
        let reference = self.references.generate(prefix.as_deref());
        debug!(form = %model.name(), reference = %reference, "Assigned reference number");

        let update = FormState::new().with(REFERENCE_NUMBER_FIELD, reference);
        Ok(self.state.merge_state(request, update).await?)
    }
}

fn with_query(location: &str, name: &str, value: &str) -> String {
    let encoded = url::form_urlencoded::Serializer::new(String::new())
        .append_pair(name, value)
        .finish();
    let separator = if location.contains('?') { '&' } else { '?' };
    format!("{location}{separator}{encoded}")
}
