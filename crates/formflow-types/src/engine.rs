//! Contract with the external relevance engine.
//!
//! The engine owns the branching rules: given the answers so far it decides
//! which page a user may currently reach. The navigation layer only asks the
//! questions below and acts on the answers.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::message::FormSubmissionError;
use crate::request::FormRequest;
use crate::state::FormState;

/// Evaluated view of a form for one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormContext {
    /// Escape hatch for direct preview-link access: skip the relevance check.
    pub is_force_access: bool,
    /// State the context was evaluated against.
    pub state: FormState,
    /// Flash errors consumed for this request.
    pub errors: Vec<FormSubmissionError>,
    /// Paths of the pages currently relevant, in order.
    pub relevant_pages: Vec<String>,
    /// Opaque rendering data.
    pub data: serde_json::Value,
}

/// A compiled form definition.
pub trait FormModel: Send + Sync {
    /// Definition name, used in logs.
    fn name(&self) -> &str;

    /// Routing base path the model was compiled for.
    fn base_path(&self) -> &str;

    /// Look up a page by its path.
    fn page(&self, path: &str) -> Option<Arc<dyn FormPage>>;

    /// Raw `referenceNumberPrefix` option from the definition, if configured.
    fn reference_number_prefix(&self) -> Option<&serde_json::Value> {
        None
    }

    /// Evaluate the form against the current answers.
    fn form_context(
        &self,
        request: &FormRequest,
        state: &FormState,
        errors: &[FormSubmissionError],
    ) -> FormContext;
}

/// One page of a compiled form.
pub trait FormPage: Send + Sync {
    fn path(&self) -> &str;

    /// Absolute href for a page path within this form.
    fn href(&self, path: &str) -> String;

    /// The furthest page the user is currently entitled to reach.
    fn relevant_path(&self, request: &FormRequest, context: &FormContext) -> String;

    /// Path of the form's check-answers page.
    fn summary_path(&self) -> String;

    /// Whether the page has at least one outgoing transition.
    fn has_next(&self) -> bool;
}
