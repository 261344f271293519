//! Form metadata and definition types as served by the form manager.

use chrono::{DateTime, Utc};
use formflow_types::FormStatus;
use serde::{Deserialize, Serialize};

/// Definition option holding the reference number prefix.
pub const REFERENCE_NUMBER_PREFIX_OPTION: &str = "referenceNumberPrefix";

/// Per-status publication record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormMetadataState {
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

/// Cheap summary of a form, fetched on every model load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormMetadata {
    pub id: String,
    pub slug: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub draft: Option<FormMetadataState>,
    #[serde(default)]
    pub live: Option<FormMetadataState>,
    #[serde(default)]
    pub notification_email: Option<String>,
}

impl FormMetadata {
    /// Publication record for a status, if that version exists.
    pub fn state(&self, status: FormStatus) -> Option<&FormMetadataState> {
        match status {
            FormStatus::Draft => self.draft.as_ref(),
            FormStatus::Live => self.live.as_ref(),
        }
    }
}

/// Outgoing transition from a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLink {
    pub path: String,
    /// Name of the condition guarding this transition, evaluated by the engine.
    #[serde(default)]
    pub condition: Option<String>,
}

/// A page as authored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageDefinition {
    pub path: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub next: Vec<PageLink>,
}

/// Full authored form definition.
///
/// Only `output_email` and the `referenceNumberPrefix` metadata entry are
/// interpreted here; the rest is passed through to the model builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDefinition {
    pub name: String,
    #[serde(default)]
    pub start_page: Option<String>,
    #[serde(default)]
    pub pages: Vec<PageDefinition>,
    #[serde(default)]
    pub output_email: Option<String>,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl FormDefinition {
    /// Raw reference number prefix option, if configured.
    pub fn reference_number_prefix(&self) -> Option<&serde_json::Value> {
        self.metadata.get(REFERENCE_NUMBER_PREFIX_OPTION)
    }
}

/// Everything a builder needs besides the definition itself.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildContext {
    pub form_id: String,
    pub slug: String,
    pub status: FormStatus,
    pub is_preview: bool,
    /// Routing base path, distinct for live and preview.
    pub base_path: String,
    /// Resolved submission address; `None` only for drafts and previews.
    pub notification_email: Option<String>,
}
