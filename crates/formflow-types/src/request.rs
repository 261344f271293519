//! The slice of an HTTP request the session core needs.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::engine::FormModel;

/// Publication status of a form definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormStatus {
    Draft,
    Live,
}

impl FormStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormStatus::Draft => "draft",
            FormStatus::Live => "live",
        }
    }
}

impl fmt::Display for FormStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(FormStatus::Draft),
            "live" => Ok(FormStatus::Live),
            other => Err(format!("unknown form status '{other}'")),
        }
    }
}

/// Route parameters identifying the form and page being requested.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormParams {
    /// Form slug, e.g. `tax-form`.
    pub slug: Option<String>,
    /// Page path within the form, without a leading slash.
    pub path: Option<String>,
    /// Status segment for preview routes.
    pub state: Option<FormStatus>,
}

/// A request as seen by the session and navigation layers.
///
/// The routing layer builds this from the incoming HTTP request, attaches
/// the compiled model once it has been loaded, and hands it on.
#[derive(Clone, Default)]
pub struct FormRequest {
    /// Cookie-derived session identifier.
    pub session_id: Option<String>,
    pub params: FormParams,
    /// Query string; navigation may add `returnUrl`.
    pub query: BTreeMap<String, String>,
    pub is_preview: bool,
    /// Compiled form model attached upstream.
    pub model: Option<Arc<dyn FormModel>>,
}

impl FormRequest {
    /// Create a request for the given session.
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: Some(session_id.into()),
            ..Default::default()
        }
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.params.slug = Some(slug.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.params.path = Some(path.into());
        self
    }

    pub fn with_status(mut self, status: FormStatus) -> Self {
        self.params.state = Some(status);
        self
    }

    pub fn with_preview(mut self, is_preview: bool) -> Self {
        self.is_preview = is_preview;
        self
    }

    pub fn with_model(mut self, model: Arc<dyn FormModel>) -> Self {
        self.model = Some(model);
        self
    }

    /// Requested page path, empty when absent.
    pub fn path(&self) -> &str {
        self.params.path.as_deref().unwrap_or_default()
    }

    /// The same request with the page path cleared, addressing state
    /// shared by every page of the form instance.
    pub fn form_scoped(&self) -> FormRequest {
        let mut scoped = self.clone();
        scoped.params.path = None;
        scoped
    }
}

impl fmt::Debug for FormRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormRequest")
            .field("session_id", &self.session_id)
            .field("params", &self.params)
            .field("query", &self.query)
            .field("is_preview", &self.is_preview)
            .field("model", &self.model.as_ref().map(|m| m.name().to_string()))
            .finish()
    }
}
